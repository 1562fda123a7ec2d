use thiserror::Error;

/// Attribute holding the element's primary source URL.
pub const PRIMARY_ATTRIBUTE: &str = "src";
/// Attribute some feeds use to carry the real URL while `src` is a placeholder.
pub const FALLBACK_ATTRIBUTE: &str = "data-url";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("invalid URL: no source attribute")]
    MissingSource,
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("invalid URL: could not read attribute {attribute}: {message}")]
    Unreadable { attribute: String, message: String },
}

pub fn has_web_scheme(candidate: &str) -> bool {
    candidate.starts_with("http:") || candidate.starts_with("https:")
}

/// Picks the URL to download from an image's attribute values.
///
/// A primary with a web scheme wins outright. Otherwise a non-empty fallback
/// replaces it, and whatever remains must carry a web scheme. Empty strings
/// count as absent for both attributes.
pub fn resolve_source(primary: Option<&str>, fallback: Option<&str>) -> Result<String, ResolveError> {
    let primary = primary.filter(|value| !value.is_empty());
    if let Some(url) = primary.filter(|value| has_web_scheme(value)) {
        return Ok(url.to_string());
    }

    let candidate = fallback.filter(|value| !value.is_empty()).or(primary);
    match candidate {
        None => Err(ResolveError::MissingSource),
        Some(url) if has_web_scheme(url) => Ok(url.to_string()),
        Some(other) => Err(ResolveError::InvalidUrl(other.to_string())),
    }
}
