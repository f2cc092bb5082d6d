use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("{message}")]
    InputMissing { message: String },

    #[error("Could not decode image: {0}")]
    DecodeFailure(#[from] image::ImageError),

    #[error("Failed to fetch image from {url}: {message}")]
    RemoteFetch { url: String, message: String },

    #[error("Malformed request: {message}")]
    MalformedRequest { message: String },

    #[error("Request body too large: {message}")]
    PayloadTooLarge { message: String },

    #[error("Not found")]
    NotFound,

    #[error("{detector} detector failed: {message}")]
    Detector {
        detector: &'static str,
        message: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 請求本身有問題，回 400
    Input,
    /// 遠端圖片下載失敗
    Remote,
    /// 偵測器內部錯誤，只記錄不回傳
    Detector,
    Configuration,
    System,
}

impl ScanError {
    pub fn input_missing(message: impl Into<String>) -> Self {
        Self::InputMissing {
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedRequest {
            message: message.into(),
        }
    }

    pub fn remote(url: &str, message: impl Into<String>) -> Self {
        Self::RemoteFetch {
            url: url.to_string(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InputMissing { .. }
            | Self::DecodeFailure(_)
            | Self::MalformedRequest { .. }
            | Self::PayloadTooLarge { .. }
            | Self::NotFound => ErrorCategory::Input,
            Self::RemoteFetch { .. } => ErrorCategory::Remote,
            Self::Detector { .. } => ErrorCategory::Detector,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            Self::IoError(_) | Self::Internal { .. } => ErrorCategory::System,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::PayloadTooLarge { .. } => return StatusCode::PAYLOAD_TOO_LARGE,
            Self::NotFound => return StatusCode::NOT_FOUND,
            _ => {}
        }
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Remote => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ScanError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_client_error() {
            tracing::warn!("Rejected request ({:?}): {}", self.category(), self);
        } else {
            tracing::error!("Request failed ({:?}): {}", self.category(), self);
        }

        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
