pub mod rqrr_decoder;
#[cfg(feature = "barcode")]
pub mod rxing_barcode;

use crate::domain::ports::BarcodeDecoder;
use std::sync::Arc;

pub use rqrr_decoder::RqrrDecoder;

/// 在啟動時決定是否提供條碼解碼
pub fn barcode_decoder(enabled: bool) -> Option<Arc<dyn BarcodeDecoder>> {
    if !enabled {
        tracing::info!("Barcode detection disabled by configuration");
        return None;
    }

    #[cfg(feature = "barcode")]
    {
        tracing::info!("Barcode detection enabled (rxing)");
        Some(Arc::new(rxing_barcode::RxingBarcodeDecoder::new()))
    }

    #[cfg(not(feature = "barcode"))]
    {
        tracing::info!("Barcode detection unavailable: built without the `barcode` feature");
        None
    }
}
