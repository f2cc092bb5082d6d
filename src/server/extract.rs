//! Request extractors that turn an upload or a JSON `url` body into an [`ImageSource`].

use crate::core::loader::ImageSource;
use crate::utils::error::{Result, ScanError};
use async_trait::async_trait;
use axum::extract::multipart::MultipartError;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::{header, StatusCode};
use axum::Json;
use serde::Deserialize;

pub const NO_IMAGE_MESSAGE: &str = "No image provided: send a multipart 'file' field or a JSON body with 'url'";
pub const NO_FILE_MESSAGE: &str = "No file provided: send the image as a multipart 'file' field";

#[derive(Debug, Deserialize)]
pub struct UrlRequest {
    pub url: Option<String>,
}

/// `file` 上傳優先，其次是 `url`（JSON 或 multipart 文字欄位）
#[derive(Debug)]
pub struct AnySource(pub ImageSource);

/// 只接受 multipart `file`
#[derive(Debug)]
pub struct UploadSource(pub ImageSource);

#[async_trait]
impl<S> FromRequest<S> for AnySource
where
    S: Send + Sync,
{
    type Rejection = ScanError;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        match body_kind(&req) {
            BodyKind::Multipart => {
                let multipart = Multipart::from_request(req, state)
                    .await
                    .map_err(|e| ScanError::malformed(e.body_text()))?;
                let parts = read_parts(multipart, true).await?;

                if let Some(file) = parts.file {
                    Ok(Self(ImageSource::Upload(file)))
                } else if let Some(url) = parts.url {
                    Ok(Self(ImageSource::Remote(url)))
                } else {
                    Err(ScanError::input_missing(NO_IMAGE_MESSAGE))
                }
            }
            BodyKind::Json => {
                let Json(body) = Json::<UrlRequest>::from_request(req, state)
                    .await
                    .map_err(|e| rejection_error(e.status(), e.body_text()))?;

                match body.url.map(|u| u.trim().to_string()) {
                    Some(url) if !url.is_empty() => Ok(Self(ImageSource::Remote(url))),
                    _ => Err(ScanError::input_missing(NO_IMAGE_MESSAGE)),
                }
            }
            BodyKind::Other => Err(ScanError::input_missing(NO_IMAGE_MESSAGE)),
        }
    }
}

#[async_trait]
impl<S> FromRequest<S> for UploadSource
where
    S: Send + Sync,
{
    type Rejection = ScanError;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        if body_kind(&req) != BodyKind::Multipart {
            return Err(ScanError::input_missing(NO_FILE_MESSAGE));
        }

        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| ScanError::malformed(e.body_text()))?;

        match read_parts(multipart, false).await?.file {
            Some(file) => Ok(Self(ImageSource::Upload(file))),
            None => Err(ScanError::input_missing(NO_FILE_MESSAGE)),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum BodyKind {
    Multipart,
    Json,
    Other,
}

fn body_kind(req: &Request) -> BodyKind {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        BodyKind::Multipart
    } else if content_type.starts_with("application/json") {
        BodyKind::Json
    } else {
        BodyKind::Other
    }
}

#[derive(Default)]
struct FormParts {
    file: Option<bytes::Bytes>,
    url: Option<String>,
}

async fn read_parts(mut multipart: Multipart, accept_url: bool) -> Result<FormParts> {
    let mut parts = FormParts::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") if parts.file.is_none() => {
                let data = field.bytes().await.map_err(multipart_error)?;
                tracing::debug!("Received upload of {} bytes", data.len());
                // 空檔案視同沒有上傳
                if !data.is_empty() {
                    parts.file = Some(data);
                }
            }
            Some("url") if accept_url && parts.url.is_none() => {
                let text = field.text().await.map_err(multipart_error)?;
                let text = text.trim();
                if !text.is_empty() {
                    parts.url = Some(text.to_string());
                }
            }
            _ => {}
        }
    }

    Ok(parts)
}

fn multipart_error(e: MultipartError) -> ScanError {
    rejection_error(e.status(), e.body_text())
}

/// 超過 body 上限一律回 413，其他解析失敗回 400
fn rejection_error(status: StatusCode, message: String) -> ScanError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ScanError::PayloadTooLarge { message }
    } else {
        ScanError::malformed(message)
    }
}
