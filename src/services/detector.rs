//! QR code extraction on top of `rqrr`.
//!
//! Two detection strategies sit behind [`QrDetector`]:
//!
//! - [`MultiDetect`] decodes every grid located in the image.
//! - [`SingleDetect`] stops at the first grid that decodes.
//!
//! [`QrExtractor`] runs the multi strategy when it was offered one and falls
//! back to the single strategy whenever multi detection fails or yields
//! nothing usable.

use std::panic::{self, AssertUnwindSafe};

use image::{GrayImage, RgbImage};
use rqrr::PreparedImage;

use crate::boundary::panic_message;

/// A QR detection strategy.
pub trait QrDetector: Send + Sync {
    /// Short label used in logs and the health report.
    fn name(&self) -> &'static str;

    /// Decode the QR payloads found in `image`, in detection order.
    fn detect(&self, image: &GrayImage) -> Result<Vec<String>, DetectError>;
}

/// Locate grids and decode them in order, stopping after the first non-empty
/// payload when `first_only` is set.
fn decode_grids(image: &GrayImage, first_only: bool) -> (usize, Vec<Result<String, String>>) {
    let (width, height) = image.dimensions();
    let mut prepared = PreparedImage::prepare_from_greyscale(width as usize, height as usize, |x, y| {
        image.get_pixel(x as u32, y as u32)[0]
    });
    let grids = prepared.detect_grids();

    let mut results = Vec::with_capacity(grids.len());
    for grid in &grids {
        let result = grid.decode().map(|(_, content)| content).map_err(|e| e.to_string());
        let done = first_only && matches!(&result, Ok(content) if !content.is_empty());
        results.push(result);
        if done {
            break;
        }
    }
    (grids.len(), results)
}

/// Locate and decode every QR code in the image.
#[derive(Debug, Default, Clone, Copy)]
pub struct MultiDetect;

impl QrDetector for MultiDetect {
    fn name(&self) -> &'static str {
        "multi"
    }

    fn detect(&self, image: &GrayImage) -> Result<Vec<String>, DetectError> {
        let (located, results) = decode_grids(image, false);
        let decoded: Vec<String> = results
            .into_iter()
            .filter_map(|result| match result {
                Ok(content) => Some(content),
                Err(e) => {
                    tracing::debug!(error = %e, "Located grid failed to decode");
                    None
                }
            })
            .collect();

        tracing::debug!(located, decoded = decoded.len(), "Multi detection finished");
        Ok(decoded)
    }
}

/// Decode the first QR code that yields a non-empty payload.
#[derive(Debug, Default, Clone, Copy)]
pub struct SingleDetect;

impl QrDetector for SingleDetect {
    fn name(&self) -> &'static str {
        "single"
    }

    fn detect(&self, image: &GrayImage) -> Result<Vec<String>, DetectError> {
        let (_, results) = decode_grids(image, true);
        let first = results
            .into_iter()
            .find_map(|result| result.ok().filter(|content| !content.is_empty()));

        Ok(first.into_iter().collect())
    }
}

/// Runs the configured detectors with multi-to-single fallback.
pub struct QrExtractor {
    multi: Option<Box<dyn QrDetector>>,
    single: Box<dyn QrDetector>,
}

impl QrExtractor {
    /// Build the extractor from the strategies available in this build.
    pub fn from_flags(multi_detect: bool) -> Self {
        let multi: Option<Box<dyn QrDetector>> = if multi_detect {
            Some(Box::new(MultiDetect))
        } else {
            None
        };
        Self::with_detectors(multi, Box::new(SingleDetect))
    }

    pub fn with_detectors(
        multi: Option<Box<dyn QrDetector>>,
        single: Box<dyn QrDetector>,
    ) -> Self {
        Self { multi, single }
    }

    /// Names of the strategies in the order they are tried.
    pub fn strategies(&self) -> Vec<&'static str> {
        self.multi
            .iter()
            .map(|d| d.name())
            .chain(std::iter::once(self.single.name()))
            .collect()
    }

    /// Extract decoded payloads from a color image. Zero codes is `Ok(vec![])`.
    pub fn extract(&self, image: &RgbImage) -> Result<Vec<String>, DetectError> {
        let gray = image::imageops::grayscale(image);

        if let Some(multi) = &self.multi {
            // a panicking detector is a failed attempt like any other
            let attempt = panic::catch_unwind(AssertUnwindSafe(|| multi.detect(&gray)))
                .unwrap_or_else(|payload| Err(DetectError::Panicked(panic_message(payload.as_ref()))));

            match attempt {
                Ok(found) => {
                    let found = non_empty(found);
                    if !found.is_empty() {
                        return Ok(found);
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        detector = multi.name(),
                        error = %e,
                        "Multi detection failed, falling back to single detection"
                    );
                    metrics::counter!("qr_multi_detect_fallbacks_total").increment(1);
                }
            }
        }

        self.single.detect(&gray).map(non_empty)
    }
}

fn non_empty(decoded: Vec<String>) -> Vec<String> {
    decoded.into_iter().filter(|s| !s.is_empty()).collect()
}

#[derive(Debug, thiserror::Error)]
pub enum DetectError {
    #[error("Detector panicked: {0}")]
    Panicked(String),

    #[error("Detector failed: {0}")]
    Failed(String),
}
