use axum::body::Bytes;

/// Multipart field that carries the image.
pub const FILE_FIELD: &str = "file";

/// A `file` part pulled out of the multipart body, not yet checked.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub bytes: Bytes,
}

/// Check the upload before any decoding work is spent on it.
///
/// Requires the `file` part to be present and to carry a non-empty filename,
/// which is what browsers send when the file input is left blank. Zero-length
/// content with a filename is left for the image decoder to reject.
pub fn validate_upload(file: Option<UploadedFile>) -> Result<UploadedFile, ValidationError> {
    let file = file.ok_or(ValidationError::MissingFile)?;

    match file.file_name.as_deref() {
        Some(name) if !name.is_empty() => Ok(file),
        _ => Err(ValidationError::EmptyFileName),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("No file was sent")]
    MissingFile,

    #[error("Empty file")]
    EmptyFileName,

    #[error("Malformed multipart request")]
    Malformed(String),
}
