use crate::domain::model::DetectedSymbol;
use crate::domain::ports::{BarcodeDecoder, QrDecoder};
use image::RgbImage;
use std::sync::Arc;

/// 組合 QR 單張、QR 多張與（可選的）條碼解碼
#[derive(Clone)]
pub struct CodeDetector {
    qr: Arc<dyn QrDecoder>,
    barcodes: Option<Arc<dyn BarcodeDecoder>>,
}

impl CodeDetector {
    pub fn new(qr: Arc<dyn QrDecoder>, barcodes: Option<Arc<dyn BarcodeDecoder>>) -> Self {
        Self { qr, barcodes }
    }

    pub fn barcodes_available(&self) -> bool {
        self.barcodes.is_some()
    }

    pub fn detect_all(&self, image: &RgbImage) -> Vec<DetectedSymbol> {
        let mut results: Vec<DetectedSymbol> = Vec::new();

        if let Some(symbol) = self.qr.decode_single(image) {
            if !symbol.text.is_empty() {
                results.push(symbol);
            }
        }

        for symbol in self.qr.decode_multi(image) {
            // 同一段文字只保留第一次出現
            if symbol.text.is_empty() || results.iter().any(|r| r.text == symbol.text) {
                continue;
            }
            results.push(symbol);
        }

        if let Some(decoder) = &self.barcodes {
            match decoder.decode_multi(image) {
                Ok(found) => results.extend(found.into_iter().filter(|s| !s.text.is_empty())),
                Err(e) => {
                    tracing::warn!("Barcode detection skipped ({}): {}", decoder.name(), e);
                }
            }
        }

        tracing::debug!(
            "Detected {} symbols in {}x{} image",
            results.len(),
            image.width(),
            image.height()
        );
        results
    }

    pub fn detect_qr_multi(&self, image: &RgbImage) -> Vec<DetectedSymbol> {
        self.qr.decode_multi(image)
    }
}
