//! One-dimensional barcode decoding backed by `rxing`

use crate::domain::model::{DetectedSymbol, Point};
use crate::domain::ports::BarcodeDecoder;
use crate::utils::error::{Result, ScanError};
use image::RgbImage;
use rxing::{BarcodeFormat, Exceptions};

#[derive(Debug, Clone, Copy, Default)]
pub struct RxingBarcodeDecoder;

impl RxingBarcodeDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl BarcodeDecoder for RxingBarcodeDecoder {
    fn name(&self) -> &'static str {
        "rxing"
    }

    fn decode_multi(&self, image: &RgbImage) -> Result<Vec<DetectedSymbol>> {
        let gray = image::imageops::grayscale(image);
        let (width, height) = gray.dimensions();

        let found = match rxing::helpers::detect_multiple_in_luma(gray.into_raw(), width, height) {
            Ok(found) => found,
            Err(Exceptions::NotFoundException(_)) => return Ok(Vec::new()),
            Err(e) => {
                return Err(ScanError::Detector {
                    detector: "rxing",
                    message: e.to_string(),
                })
            }
        };

        // QR 碼已由 QR 解碼器處理
        let symbols = found
            .iter()
            .filter(|r| *r.getBarcodeFormat() != BarcodeFormat::QR_CODE)
            .map(|r| {
                let points: Vec<Point> = r.getPoints().iter().map(|p| Point(p.x, p.y)).collect();
                let corners = if points.is_empty() { None } else { Some(points) };
                let subtype = format!("{:?}", r.getBarcodeFormat()).to_lowercase();
                DetectedSymbol::barcode(subtype, r.getText(), corners)
            })
            .collect();

        Ok(symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use qrcode::{Color, QrCode};
    use rxing::{MultiFormatWriter, Writer};

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    fn render_code128(text: &str) -> RgbImage {
        let matrix = MultiFormatWriter
            .encode(text, &BarcodeFormat::CODE_128, 0, 0)
            .unwrap();
        let (bar_px, bar_height, margin) = (3, 80, 20);

        let mut image = RgbImage::from_pixel(
            matrix.getWidth() * bar_px + 2 * margin,
            bar_height + 2 * margin,
            WHITE,
        );
        for x in 0..matrix.getWidth() {
            if !matrix.get(x, 0) {
                continue;
            }
            for dx in 0..bar_px {
                for y in 0..bar_height {
                    image.put_pixel(margin + x * bar_px + dx, margin + y, BLACK);
                }
            }
        }
        image
    }

    fn render_qr(text: &str) -> RgbImage {
        let code = QrCode::new(text.as_bytes()).unwrap();
        let modules = code.width() as u32;
        let (module_px, quiet) = (6, 4);

        let side = (modules + 2 * quiet) * module_px;
        let mut image = RgbImage::from_pixel(side, side, WHITE);
        for (i, color) in code.to_colors().into_iter().enumerate() {
            if color == Color::Dark {
                let x0 = (i as u32 % modules + quiet) * module_px;
                let y0 = (i as u32 / modules + quiet) * module_px;
                for dy in 0..module_px {
                    for dx in 0..module_px {
                        image.put_pixel(x0 + dx, y0 + dy, BLACK);
                    }
                }
            }
        }
        image
    }

    #[test]
    fn test_blank_image_is_empty_not_error() {
        let image = RgbImage::from_pixel(120, 60, WHITE);
        let symbols = RxingBarcodeDecoder::new().decode_multi(&image).unwrap();
        assert!(symbols.is_empty());
    }

    #[test]
    fn test_qr_results_are_left_to_qr_decoder() {
        let symbols = RxingBarcodeDecoder::new()
            .decode_multi(&render_qr("DOC:12345"))
            .unwrap();
        assert!(symbols.iter().all(|s| s.kind.as_str() != "qr_code"));
        assert!(symbols.iter().all(|s| s.text != "DOC:12345"));
    }

    #[test]
    fn test_code128_reports_symbology() {
        let symbols = RxingBarcodeDecoder::new()
            .decode_multi(&render_code128("BOX-42"))
            .unwrap();

        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].kind.as_str(), "code_128");
        assert_eq!(symbols[0].text, "BOX-42");
        assert!(symbols[0].corners.as_ref().is_some_and(|c| !c.is_empty()));
    }
}
