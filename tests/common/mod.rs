#![allow(dead_code)]

use codescan::core::commands::{CommandParser, CommandPolicy};
use codescan::core::detector::CodeDetector;
use codescan::core::loader::ImageLoader;
use codescan::core::{DetectedSymbol, QrDecoder};
use codescan::domain::model::Point;
use codescan::{build_router, AppState, ScanEngine, ServiceConfig};
use image::{ImageFormat, Rgb, RgbImage};
use qrcode::{Color, QrCode};
use std::io::Cursor;
use std::sync::Arc;
use tokio::net::TcpListener;

/// 固定回傳預設文字的 QR 解碼器，代替真正的視覺函式庫
pub struct ScriptedQr {
    pub single: Option<&'static str>,
    pub multi: Vec<&'static str>,
}

impl ScriptedQr {
    pub fn multi(texts: Vec<&'static str>) -> Self {
        Self {
            single: None,
            multi: texts,
        }
    }
}

impl QrDecoder for ScriptedQr {
    fn decode_single(&self, _image: &RgbImage) -> Option<DetectedSymbol> {
        self.single.map(|text| {
            DetectedSymbol::qr(
                text,
                Some(vec![
                    Point(10.0, 10.0),
                    Point(90.0, 10.0),
                    Point(90.0, 90.0),
                    Point(10.0, 90.0),
                ]),
            )
        })
    }

    fn decode_multi(&self, _image: &RgbImage) -> Vec<DetectedSymbol> {
        self.multi
            .iter()
            .map(|text| DetectedSymbol::qr(*text, None))
            .collect()
    }
}

pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub async fn spawn_server(qr: ScriptedQr) -> TestServer {
    spawn_server_with(qr, CommandPolicy::Open, ServiceConfig::default()).await
}

pub async fn spawn_server_with(
    qr: ScriptedQr,
    policy: CommandPolicy,
    config: ServiceConfig,
) -> TestServer {
    use codescan::core::ConfigProvider;

    let loader = ImageLoader::new(&config).unwrap();
    let detector = CodeDetector::new(Arc::new(qr), None);
    let engine = ScanEngine::new(loader, detector, CommandParser::new(policy));
    spawn_state(AppState::new(engine, config.max_upload_bytes())).await
}

/// 使用真正的 rqrr 解碼器
pub async fn spawn_real_server(config: &ServiceConfig) -> TestServer {
    spawn_state(AppState::from_config(config).unwrap()).await
}

async fn spawn_state(state: AppState) -> TestServer {
    let app = build_router(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base_url: format!("http://{}", addr),
        client: reqwest::Client::new(),
    }
}

pub fn png_bytes() -> Vec<u8> {
    let image = RgbImage::from_pixel(16, 16, Rgb([255, 255, 255]));
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png).unwrap();
    buffer.into_inner()
}

/// 把每段文字繪成 QR 碼，左右並排後輸出 PNG
pub fn qr_png(texts: &[&str]) -> Vec<u8> {
    const MODULE_PX: u32 = 6;
    const QUIET_ZONE: u32 = 4;

    let codes: Vec<QrCode> = texts.iter().map(|t| QrCode::new(t.as_bytes()).unwrap()).collect();
    let side = |code: &QrCode| (code.width() as u32 + 2 * QUIET_ZONE) * MODULE_PX;

    let width = codes.iter().map(side).sum();
    let height = codes.iter().map(side).max().unwrap_or(0);
    let mut image = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));

    let mut offset = 0;
    for code in &codes {
        let modules = code.width();
        for (i, color) in code.to_colors().into_iter().enumerate() {
            if color != Color::Dark {
                continue;
            }
            let x0 = offset + ((i % modules) as u32 + QUIET_ZONE) * MODULE_PX;
            let y0 = ((i / modules) as u32 + QUIET_ZONE) * MODULE_PX;
            for dy in 0..MODULE_PX {
                for dx in 0..MODULE_PX {
                    image.put_pixel(x0 + dx, y0 + dy, Rgb([0, 0, 0]));
                }
            }
        }
        offset += side(code);
    }

    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png).unwrap();
    buffer.into_inner()
}

pub fn file_form(bytes: Vec<u8>) -> reqwest::multipart::Form {
    let part = reqwest::multipart::Part::bytes(bytes)
        .file_name("scan.png")
        .mime_str("image/png")
        .unwrap();
    reqwest::multipart::Form::new().part("file", part)
}
