use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::scan::Classification;

/// Web-address shape: scheme or `www.` prefix, then a host-ish start and no whitespace.
static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(https?://|www\.)[^\s/$.?#].[^\s]*$").unwrap());

/// Returns the redirect target for `candidate` if it looks like a URL.
///
/// Bare `www.` addresses get an `https://` prefix; anything already carrying a
/// scheme is returned untouched.
pub fn redirect_target(candidate: &str) -> Option<String> {
    if !URL_PATTERN.is_match(candidate) {
        return None;
    }

    if candidate.to_lowercase().starts_with("www.") {
        Some(format!("https://{candidate}"))
    } else {
        Some(candidate.to_string())
    }
}

/// Classify a decoded set by its first entry. Only the first payload can
/// produce a redirect; the whole set is always returned.
pub fn classify(qr_data: Vec<String>) -> Classification {
    let Some(first) = qr_data.first() else {
        return Classification::Empty;
    };

    match redirect_target(first.trim()) {
        Some(url) => Classification::Redirect { url, qr_data },
        None => Classification::Data { qr_data },
    }
}
