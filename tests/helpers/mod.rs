//! Test helper utilities: in-process server, QR image generation, upload calls

#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;

use image::{ImageFormat, Rgb, RgbImage};
use metrics_exporter_prometheus::PrometheusBuilder;
use qrcodegen::{QrCode, QrCodeEcc};
use reqwest::multipart;
use reqwest::StatusCode;
use serde_json::Value;

use qr_scan_hw::app;
use qr_scan_hw::app_state::AppState;
use qr_scan_hw::config::AppConfig;

/// Pixels per QR module in generated images.
pub const MODULE_SCALE: u32 = 6;

/// Quiet zone around each generated code, in modules.
pub const QUIET_ZONE: u32 = 4;

/// Serve `state` on an ephemeral local port and return its base URL.
pub async fn spawn_app_with_state(state: AppState) -> String {
    // Recorder is built but not installed globally; tests run in parallel
    let prometheus = Arc::new(PrometheusBuilder::new().build_recorder().handle());
    let router = app::router(state, prometheus);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("No local address");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Test server error");
    });

    format!("http://{}", addr)
}

pub async fn spawn_app(config: AppConfig) -> String {
    spawn_app_with_state(AppState::from_config(config)).await
}

pub async fn spawn_default_app() -> String {
    spawn_app(AppConfig::default()).await
}

/// Render `text` as a black-on-white QR code.
pub fn qr_image(text: &str) -> RgbImage {
    qr_row(&[text])
}

/// Render several QR codes side by side in one image, left to right.
pub fn qr_row(texts: &[&str]) -> RgbImage {
    let codes: Vec<QrCode> = texts
        .iter()
        .map(|t| QrCode::encode_text(t, QrCodeEcc::Medium).expect("Payload too long for QR"))
        .collect();

    let cell = |qr: &QrCode| (qr.size() as u32 + 2 * QUIET_ZONE) * MODULE_SCALE;
    let width: u32 = codes.iter().map(cell).sum();
    let height: u32 = codes.iter().map(cell).max().unwrap_or(0);

    let mut img = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
    let mut offset = 0;
    for qr in &codes {
        let side = cell(qr);
        for y in 0..side {
            for x in 0..side {
                let mx = (x / MODULE_SCALE) as i32 - QUIET_ZONE as i32;
                let my = (y / MODULE_SCALE) as i32 - QUIET_ZONE as i32;
                if qr.get_module(mx, my) {
                    img.put_pixel(offset + x, y, Rgb([0, 0, 0]));
                }
            }
        }
        offset += side;
    }
    img
}

pub fn encode(img: &RgbImage, format: ImageFormat) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format).expect("Failed to encode test image");
    out.into_inner()
}

pub fn png(img: &RgbImage) -> Vec<u8> {
    encode(img, ImageFormat::Png)
}

/// Multipart form with a single `file` part.
pub fn file_form(bytes: Vec<u8>, file_name: &str) -> multipart::Form {
    multipart::Form::new().part("file", multipart::Part::bytes(bytes).file_name(file_name.to_string()))
}

/// POST the form to /upload and return the status with the parsed JSON body.
pub async fn post_upload(base_url: &str, form: multipart::Form) -> (StatusCode, Value) {
    let response = reqwest::Client::new()
        .post(format!("{}/upload", base_url))
        .multipart(form)
        .send()
        .await
        .expect("Upload request failed");
    json_body(response).await
}

/// Status and parsed JSON body; panics if the body is not JSON.
pub async fn json_body(response: reqwest::Response) -> (StatusCode, Value) {
    let status = response.status();
    let text = response.text().await.expect("Failed to read body");
    let body = serde_json::from_str(&text)
        .unwrap_or_else(|e| panic!("Body is not JSON ({}): {:?}", e, text));
    (status, body)
}
