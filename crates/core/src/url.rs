//! URL validation
//!
//! Links accept absolute `http`/`https` URLs only. Validation runs before
//! any mutation; a rejected URL never reaches the store.

use thiserror::Error;
// Leading `::` disambiguates the crate from this module
use ::url::Url;

/// Validate a link URL
///
/// # Examples
///
/// ```
/// use linkstacks_core::url::validate_url;
///
/// assert!(validate_url("https://example.com/a?b=c").is_ok());
/// assert!(validate_url("ftp://example.com").is_err());
/// assert!(validate_url("not a url").is_err());
/// ```
pub fn validate_url(raw: &str) -> Result<(), UrlError> {
    let parsed = Url::parse(raw).map_err(|e| UrlError::Malformed {
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(UrlError::UnsupportedScheme {
                scheme: other.to_string(),
            })
        }
    }

    if parsed.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(())
}

/// URL validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    /// The string is not a parseable absolute URL
    #[error("URL is not valid: {reason}")]
    Malformed {
        /// Parser diagnostic
        reason: String,
    },

    /// Scheme other than http/https
    #[error("URL must start with http:// or https://, got '{scheme}'")]
    UnsupportedScheme {
        /// The rejected scheme
        scheme: String,
    },

    /// URL parsed but carries no host
    #[error("URL must include a host")]
    MissingHost,
}
