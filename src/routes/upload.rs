use std::time::Instant;

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::models::scan::{ScanOutcome, ScanResponse};
use crate::services::validation::{self, UploadedFile, ValidationError, FILE_FIELD};
use crate::services::{classifier, decoder};

/// POST /upload — decode the QR codes in the uploaded `file` part.
pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ScanResponse>, ApiError> {
    let result = scan(&state, multipart).await;

    let outcome = match &result {
        Ok((outcome, _)) => *outcome,
        Err(ApiError::Internal(_)) => ScanOutcome::Failed,
        Err(_) => ScanOutcome::Rejected,
    };
    let label: &'static str = outcome.into();
    metrics::counter!("qr_uploads_total", "outcome" => label).increment(1);

    result.map(|(_, response)| Json(response))
}

async fn scan(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(ScanOutcome, ScanResponse), ApiError> {
    let multipart = multipart.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Request is not multipart");
        ValidationError::MissingFile
    })?;

    let limit = state.config.max_upload_bytes;
    let file = validation::validate_upload(read_file_field(multipart, limit).await?)?;

    tracing::info!(
        file_name = file.file_name.as_deref().unwrap_or_default(),
        size = file.bytes.len(),
        "Scanning uploaded image"
    );

    let started = Instant::now();
    let extractor = state.extractor.clone();
    let qr_data = tokio::task::spawn_blocking(move || -> Result<Vec<String>, ApiError> {
        let image = decoder::decode_image(&file.bytes)?;
        extractor
            .extract(&image)
            .map_err(|e| ApiError::Internal(format!("QR extraction failed: {e}")))
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Scan task did not complete: {e}")))??;

    metrics::histogram!("qr_extract_seconds").record(started.elapsed().as_secs_f64());
    metrics::counter!("qr_codes_decoded_total").increment(qr_data.len() as u64);

    let classification = classifier::classify(qr_data);
    let outcome = ScanOutcome::from(&classification);
    tracing::info!(outcome = ?outcome, "Scan finished");

    Ok((outcome, classification.into()))
}

/// Pull the first `file` part out of the body. Other parts are skipped.
async fn read_file_field(
    mut multipart: Multipart,
    limit: usize,
) -> Result<Option<UploadedFile>, ApiError> {
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if file.is_some() || field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| multipart_error(e, limit))?;
        file = Some(UploadedFile { file_name, bytes });
    }

    Ok(file)
}

fn multipart_error(err: MultipartError, limit: usize) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!(limit, "Upload exceeded body limit");
        return ApiError::PayloadTooLarge(Some(limit));
    }
    ValidationError::Malformed(err.body_text()).into()
}
