pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::ServiceConfig;
pub use core::{commands::CommandParser, detector::CodeDetector, engine::ScanEngine};
pub use server::{build_router, serve, AppState};
pub use utils::error::{Result, ScanError};
