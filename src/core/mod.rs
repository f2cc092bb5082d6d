pub mod commands;
pub mod detector;
pub mod engine;
pub mod loader;

pub use crate::domain::model::{CommandReport, DetectedSymbol, DetectionReport, WorkflowCommand};
pub use crate::domain::ports::{BarcodeDecoder, ConfigProvider, QrDecoder};
pub use crate::utils::error::Result;
