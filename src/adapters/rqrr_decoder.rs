//! QR decoding backed by `rqrr`

use crate::domain::model::{DetectedSymbol, Point};
use crate::domain::ports::QrDecoder;
use image::RgbImage;
use rqrr::PreparedImage;

#[derive(Debug, Clone, Copy, Default)]
pub struct RqrrDecoder;

impl RqrrDecoder {
    pub fn new() -> Self {
        Self
    }

    fn scan(&self, image: &RgbImage, limit: Option<usize>) -> Vec<DetectedSymbol> {
        let gray = image::imageops::grayscale(image);
        let mut prepared =
            PreparedImage::prepare_from_greyscale(gray.width() as usize, gray.height() as usize, |x, y| {
                gray.get_pixel(x as u32, y as u32)[0]
            });

        let mut results = Vec::new();
        for grid in prepared.detect_grids() {
            match grid.decode() {
                Ok((_, content)) => {
                    let corners = grid
                        .bounds
                        .iter()
                        .map(|p| Point(p.x as f32, p.y as f32))
                        .collect();
                    results.push(DetectedSymbol::qr(content, Some(corners)));
                }
                Err(e) => {
                    tracing::debug!("QR grid found but could not be decoded: {:?}", e);
                }
            }

            if limit.is_some_and(|max| results.len() >= max) {
                break;
            }
        }
        results
    }
}

impl QrDecoder for RqrrDecoder {
    fn decode_single(&self, image: &RgbImage) -> Option<DetectedSymbol> {
        self.scan(image, Some(1)).into_iter().next()
    }

    fn decode_multi(&self, image: &RgbImage) -> Vec<DetectedSymbol> {
        self.scan(image, None)
    }
}
