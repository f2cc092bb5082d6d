use crate::core::ConfigProvider;
use crate::utils::error::{Result, ScanError};
use crate::utils::validation::validate_url;
use bytes::Bytes;
use image::RgbImage;
use reqwest::Client;

/// 圖片來源：上傳檔案或遠端網址
#[derive(Debug, Clone)]
pub enum ImageSource {
    Upload(Bytes),
    Remote(String),
}

#[derive(Debug, Clone)]
pub struct ImageLoader {
    client: Client,
    max_download_bytes: usize,
}

impl ImageLoader {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.fetch_timeout())
            .build()
            .map_err(|e| ScanError::ConfigError {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            max_download_bytes: config.max_download_bytes(),
        })
    }

    pub async fn load(&self, source: ImageSource) -> Result<RgbImage> {
        let bytes = match source {
            ImageSource::Upload(bytes) => bytes,
            ImageSource::Remote(url) => self.fetch(&url).await?,
        };
        decode_image(&bytes)
    }

    pub async fn fetch(&self, url: &str) -> Result<Bytes> {
        let parsed = validate_url("url", url).map_err(|e| ScanError::remote(url, e.to_string()))?;

        tracing::debug!("Fetching image from: {}", parsed);
        let response = self.client.get(parsed).send().await.map_err(|e| {
            if e.is_timeout() {
                ScanError::remote(url, "request timed out")
            } else {
                ScanError::remote(url, e.to_string())
            }
        })?;

        let status = response.status();
        tracing::debug!("Remote image response status: {}", status);
        if !status.is_success() {
            return Err(ScanError::remote(url, format!("HTTP status {}", status)));
        }

        if let Some(length) = response.content_length() {
            if length as usize > self.max_download_bytes {
                return Err(ScanError::remote(
                    url,
                    format!("image is {} bytes, limit is {}", length, self.max_download_bytes),
                ));
            }
        }

        let bytes = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                ScanError::remote(url, "request timed out")
            } else {
                ScanError::remote(url, e.to_string())
            }
        })?;

        if bytes.len() > self.max_download_bytes {
            return Err(ScanError::remote(
                url,
                format!("image is {} bytes, limit is {}", bytes.len(), self.max_download_bytes),
            ));
        }

        Ok(bytes)
    }
}

/// 解碼為 RGB 影像
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage> {
    if bytes.is_empty() {
        return Err(ScanError::input_missing("Uploaded image is empty"));
    }
    let image = image::load_from_memory(bytes)?;
    Ok(image.to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use httpmock::prelude::*;
    use image::{ImageFormat, Rgb};
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let image = RgbImage::from_pixel(8, 8, Rgb([255, 255, 255]));
        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    fn loader() -> ImageLoader {
        ImageLoader::new(&ServiceConfig::default()).unwrap()
    }

    #[test]
    fn test_decode_valid_png() {
        let image = decode_image(&png_bytes()).unwrap();
        assert_eq!(image.dimensions(), (8, 8));
    }

    #[test]
    fn test_decode_garbage_is_decode_failure() {
        let result = decode_image(b"definitely not an image");
        assert!(matches!(result, Err(ScanError::DecodeFailure(_))));
    }

    #[test]
    fn test_decode_empty_is_input_missing() {
        assert!(matches!(
            decode_image(&[]),
            Err(ScanError::InputMissing { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_from_remote_url() {
        let server = MockServer::start_async().await;
        let body = png_bytes();
        let mock = server.mock_async(|when, then| {
            when.method(GET).path("/qr.png");
            then.status(200)
                .header("Content-Type", "image/png")
                .body(body.clone());
        })
        .await;

        let image = loader()
            .load(ImageSource::Remote(server.url("/qr.png")))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(image.width(), 8);
    }

    #[tokio::test]
    async fn test_remote_error_status_fails() {
        let server = MockServer::start_async().await;
        let mock = server.mock_async(|when, then| {
            when.method(GET).path("/missing.png");
            then.status(404);
        })
        .await;

        let result = loader().fetch(&server.url("/missing.png")).await;

        mock.assert_async().await;
        match result {
            Err(ScanError::RemoteFetch { message, .. }) => assert!(message.contains("404")),
            other => panic!("expected RemoteFetch error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_remote_timeout_fails() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(GET).path("/slow.png");
            then.status(200)
                .body(png_bytes())
                .delay(std::time::Duration::from_secs(3));
        })
        .await;

        let config = ServiceConfig::from_toml_str("[fetch]\ntimeout_seconds = 1\n").unwrap();
        let loader = ImageLoader::new(&config).unwrap();
        let result = loader.fetch(&server.url("/slow.png")).await;

        match result {
            Err(ScanError::RemoteFetch { message, .. }) => assert_eq!(message, "request timed out"),
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[test]
    fn test_non_http_url_is_rejected_without_fetching() {
        let result = tokio_test::block_on(loader().fetch("file:///etc/hosts"));
        assert!(matches!(result, Err(ScanError::RemoteFetch { .. })));
    }

    #[tokio::test]
    async fn test_oversized_download_is_rejected() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(GET).path("/big.png");
            then.status(200).body(vec![0u8; 2 * 1024 * 1024 + 1]);
        })
        .await;

        let config = ServiceConfig::from_toml_str("[fetch]\nmax_download_mb = 2\n").unwrap();
        let loader = ImageLoader::new(&config).unwrap();
        let result = loader.fetch(&server.url("/big.png")).await;

        assert!(matches!(result, Err(ScanError::RemoteFetch { .. })));
    }
}
