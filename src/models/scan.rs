use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

/// Message returned alongside an empty `qr_data`.
pub const NO_CODES_MESSAGE: &str = "No QR codes were detected";

/// Successful body of `POST /upload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResponse {
    pub ok: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,

    pub qr_data: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Failure body shared by every route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: String,
}

/// What the first decoded payload turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Redirect { url: String, qr_data: Vec<String> },
    Data { qr_data: Vec<String> },
    Empty,
}

/// Label for the `qr_uploads_total` counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ScanOutcome {
    Redirect,
    Decoded,
    Empty,
    Rejected,
    Failed,
}

impl From<&Classification> for ScanOutcome {
    fn from(classification: &Classification) -> Self {
        match classification {
            Classification::Redirect { .. } => ScanOutcome::Redirect,
            Classification::Data { .. } => ScanOutcome::Decoded,
            Classification::Empty => ScanOutcome::Empty,
        }
    }
}

impl From<Classification> for ScanResponse {
    fn from(classification: Classification) -> Self {
        match classification {
            Classification::Redirect { url, qr_data } => ScanResponse {
                ok: true,
                redirect_url: Some(url),
                qr_data,
                message: None,
            },
            Classification::Data { qr_data } => ScanResponse {
                ok: true,
                redirect_url: None,
                qr_data,
                message: None,
            },
            Classification::Empty => ScanResponse {
                ok: true,
                redirect_url: None,
                qr_data: Vec::new(),
                message: Some(NO_CODES_MESSAGE.to_string()),
            },
        }
    }
}
