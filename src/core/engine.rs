use crate::core::commands::CommandParser;
use crate::core::detector::CodeDetector;
use crate::core::loader::{ImageLoader, ImageSource};
use crate::domain::model::{CommandReport, DetectedSymbol, DetectionReport};
use crate::utils::error::{Result, ScanError};
use image::RgbImage;

/// 載入圖片 → 偵測 → （串流模式）解析指令
#[derive(Clone)]
pub struct ScanEngine {
    loader: ImageLoader,
    detector: CodeDetector,
    parser: CommandParser,
}

impl ScanEngine {
    pub fn new(loader: ImageLoader, detector: CodeDetector, parser: CommandParser) -> Self {
        Self {
            loader,
            detector,
            parser,
        }
    }

    pub async fn detect_codes(&self, source: ImageSource) -> Result<DetectionReport> {
        let image = self.loader.load(source).await?;
        let detector = self.detector.clone();
        let symbols = run_detection(image, move |image| detector.detect_all(image)).await?;

        tracing::info!("Detected {} codes", symbols.len());
        Ok(DetectionReport::from(symbols))
    }

    pub async fn detect_commands(&self, source: ImageSource) -> Result<CommandReport> {
        let image = self.loader.load(source).await?;
        let detector = self.detector.clone();
        let symbols = run_detection(image, move |image| detector.detect_qr_multi(image)).await?;

        let report = self.parser.parse_all(symbols.iter().map(|s| s.text.as_str()));
        tracing::info!(
            "Parsed {} workflow commands (has_workflow_commands={})",
            report.count,
            report.has_workflow_commands
        );
        Ok(report)
    }
}

/// 解碼是 CPU 密集工作，移到 blocking 執行緒
async fn run_detection<F>(image: RgbImage, detect: F) -> Result<Vec<DetectedSymbol>>
where
    F: FnOnce(&RgbImage) -> Vec<DetectedSymbol> + Send + 'static,
{
    tokio::task::spawn_blocking(move || detect(&image))
        .await
        .map_err(|e| ScanError::Internal {
            message: format!("Detection task failed: {}", e),
        })
}
