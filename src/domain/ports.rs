use crate::domain::model::DetectedSymbol;
use crate::utils::error::Result;
use image::RgbImage;
use std::time::Duration;

/// QR 解碼能力，由外部視覺函式庫提供
pub trait QrDecoder: Send + Sync {
    /// 最多回傳一個符號
    fn decode_single(&self, image: &RgbImage) -> Option<DetectedSymbol>;

    /// 依偵測順序回傳影像中所有 QR 碼
    fn decode_multi(&self, image: &RgbImage) -> Vec<DetectedSymbol>;
}

/// 一維條碼解碼能力，部署時可能不存在
pub trait BarcodeDecoder: Send + Sync {
    fn name(&self) -> &'static str;

    /// 找不到條碼時回傳空陣列；其他錯誤以 `ScanError::Detector` 回報
    fn decode_multi(&self, image: &RgbImage) -> Result<Vec<DetectedSymbol>>;
}

pub trait ConfigProvider: Send + Sync {
    fn host(&self) -> &str;
    fn port(&self) -> u16;
    fn fetch_timeout(&self) -> Duration;
    fn max_upload_bytes(&self) -> usize;
    fn max_download_bytes(&self) -> usize;
}
