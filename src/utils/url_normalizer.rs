//! Destination URL and domain normalization.
//!
//! Destination URLs get an `http://` prefix when no scheme is given and are
//! otherwise stored exactly as submitted, so a redirect returns what the
//! client shortened. Domains are stored without scheme and trailing slash.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

static MAIN_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)((www\.)?([a-zA-Z0-9-]+\.)+[a-zA-Z]{2,})([/?].*)?$")
        .expect("main url regex is valid")
});

static DOMAIN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(http://|https://)?([a-zA-Z0-9-]+\.)+[a-zA-Z]{2,}$")
        .expect("domain regex is valid")
});

/// Errors that can occur during normalization.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlNormalizationError {
    #[error("Invalid main URL format")]
    InvalidFormat,

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("Invalid custom domain format")]
    InvalidDomain,
}

/// Normalizes a destination URL.
///
/// # Rules
///
/// 1. Surrounding whitespace is trimmed
/// 2. `http://` is prepended when the input has no `http://`/`https://` prefix
/// 3. The host must be a dotted name ending in an alphabetic TLD
/// 4. Anything else (path, query, fragment) is kept verbatim
///
/// # Errors
///
/// Returns [`UrlNormalizationError::UnsupportedProtocol`] for other schemes
/// such as `javascript:` or `ftp://`, and
/// [`UrlNormalizationError::InvalidFormat`] for malformed URLs.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_main_url("example.com").unwrap(), "http://example.com");
/// assert_eq!(normalize_main_url("https://example.com/a?b=1").unwrap(), "https://example.com/a?b=1");
/// ```
pub fn normalize_main_url(input: &str) -> Result<String, UrlNormalizationError> {
    let trimmed = input.trim();

    let candidate = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else if has_foreign_scheme(trimmed) {
        return Err(UrlNormalizationError::UnsupportedProtocol);
    } else {
        format!("http://{trimmed}")
    };

    if !MAIN_URL_REGEX.is_match(&candidate) {
        return Err(UrlNormalizationError::InvalidFormat);
    }

    Url::parse(&candidate).map_err(|_| UrlNormalizationError::InvalidFormat)?;

    Ok(candidate)
}

/// Resolves the domain a code is scoped to.
///
/// A supplied domain is validated and stripped of its scheme and trailing
/// slash; when absent, `default_domain` is used after the same stripping.
///
/// # Errors
///
/// Returns [`UrlNormalizationError::InvalidDomain`] if a supplied domain is
/// not a dotted host name.
pub fn normalize_domain(
    custom_domain: Option<&str>,
    default_domain: &str,
) -> Result<String, UrlNormalizationError> {
    let raw = match custom_domain.map(str::trim).filter(|d| !d.is_empty()) {
        Some(domain) => {
            let without_slash = domain.trim_end_matches('/');
            if !DOMAIN_REGEX.is_match(without_slash) {
                return Err(UrlNormalizationError::InvalidDomain);
            }
            without_slash
        }
        None => default_domain,
    };

    Ok(strip_scheme(raw).trim_end_matches('/').to_string())
}

fn strip_scheme(domain: &str) -> &str {
    domain
        .strip_prefix("http://")
        .or_else(|| domain.strip_prefix("https://"))
        .unwrap_or(domain)
}

/// True for inputs like `javascript:alert(1)` or `ftp://host`, but not for
/// `host:8080/path`.
fn has_foreign_scheme(input: &str) -> bool {
    match input.split_once(':') {
        Some((scheme, rest)) => {
            let looks_like_scheme = !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
                && !scheme.contains('.');
            let is_port = rest.chars().next().is_some_and(|c| c.is_ascii_digit());
            looks_like_scheme && !is_port
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes_missing_scheme() {
        assert_eq!(normalize_main_url("example.com").unwrap(), "http://example.com");
        assert_eq!(
            normalize_main_url("www.example.com/path?q=1").unwrap(),
            "http://www.example.com/path?q=1"
        );
    }

    #[test]
    fn test_keeps_existing_scheme() {
        assert_eq!(
            normalize_main_url("https://example.com").unwrap(),
            "https://example.com"
        );
        assert_eq!(
            normalize_main_url("http://sub.example.co.uk/a/b").unwrap(),
            "http://sub.example.co.uk/a/b"
        );
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(normalize_main_url("  example.com  ").unwrap(), "http://example.com");
    }

    #[test]
    fn test_rejects_dangerous_schemes() {
        assert_eq!(
            normalize_main_url("javascript:alert(1)"),
            Err(UrlNormalizationError::UnsupportedProtocol)
        );
        assert_eq!(
            normalize_main_url("ftp://example.com"),
            Err(UrlNormalizationError::UnsupportedProtocol)
        );
    }

    #[test]
    fn test_rejects_malformed_urls() {
        assert_eq!(
            normalize_main_url("not-a-url"),
            Err(UrlNormalizationError::InvalidFormat)
        );
        assert_eq!(normalize_main_url(""), Err(UrlNormalizationError::InvalidFormat));
        assert_eq!(
            normalize_main_url("http://example"),
            Err(UrlNormalizationError::InvalidFormat)
        );
    }

    #[test]
    fn test_domain_defaults_and_strips() {
        assert_eq!(
            normalize_domain(None, "http://127.0.0.1:8000").unwrap(),
            "127.0.0.1:8000"
        );
        assert_eq!(normalize_domain(Some(""), "sho.rt").unwrap(), "sho.rt");
    }

    #[test]
    fn test_custom_domain_is_normalized() {
        assert_eq!(
            normalize_domain(Some("https://go.example.com/"), "sho.rt").unwrap(),
            "go.example.com"
        );
        assert_eq!(
            normalize_domain(Some("go.example.com"), "sho.rt").unwrap(),
            "go.example.com"
        );
    }

    #[test]
    fn test_custom_domain_is_validated() {
        assert_eq!(
            normalize_domain(Some("not a domain"), "sho.rt"),
            Err(UrlNormalizationError::InvalidDomain)
        );
        assert_eq!(
            normalize_domain(Some("localhost"), "sho.rt"),
            Err(UrlNormalizationError::InvalidDomain)
        );
    }
}
