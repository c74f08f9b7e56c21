//! Destination URL normalization.
//!
//! Two destinations are "the same" for idempotent alias creation when their
//! normalized forms are equal.

use url::Url;

/// Errors that can occur during URL normalization.
#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,

    #[error("Failed to normalize URL: {0}")]
    NormalizationFailed(String),
}

/// Normalizes a destination URL to its canonical form.
///
/// # Normalization Rules
///
/// 1. Surrounding whitespace is trimmed
/// 2. Only `http` and `https` are accepted
/// 3. The host is lowercased
/// 4. Default ports (80 / 443) are dropped
/// 5. The fragment is dropped
///
/// Path and query are preserved byte for byte after `url` crate parsing.
///
/// # Errors
///
/// See [`UrlNormalizationError`].
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     normalize_url("HTTPS://EXAMPLE.COM:443/Path#top").unwrap(),
///     "https://example.com/Path"
/// );
/// ```
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let mut url = Url::parse(input.trim())
        .map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(UrlNormalizationError::UnsupportedProtocol);
    }

    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or(UrlNormalizationError::MissingHost)?
        .to_ascii_lowercase();
    url.set_host(Some(&host))
        .map_err(|e| UrlNormalizationError::NormalizationFailed(e.to_string()))?;

    url.set_fragment(None);

    if matches!((url.scheme(), url.port()), ("http", Some(80)) | ("https", Some(443))) {
        url.set_port(None).map_err(|_| {
            UrlNormalizationError::NormalizationFailed("cannot clear default port".to_string())
        })?;
    }

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_adds_root_path() {
        assert_eq!(normalize_url("http://example.com").unwrap(), "http://example.com/");
    }

    #[test]
    fn test_normalize_lowercases_host_only() {
        assert_eq!(
            normalize_url("https://ExAmPlE.CoM/Path?Key=VALUE").unwrap(),
            "https://example.com/Path?Key=VALUE"
        );
    }

    #[test]
    fn test_normalize_drops_default_ports() {
        assert_eq!(
            normalize_url("http://example.com:80/a").unwrap(),
            "http://example.com/a"
        );
        assert_eq!(
            normalize_url("https://example.com:443/a").unwrap(),
            "https://example.com/a"
        );
    }

    #[test]
    fn test_normalize_keeps_custom_port() {
        assert_eq!(
            normalize_url("http://localhost:3000/test").unwrap(),
            "http://localhost:3000/test"
        );
        assert_eq!(
            normalize_url("https://example.com:80/").unwrap(),
            "https://example.com:80/"
        );
    }

    #[test]
    fn test_normalize_drops_fragment() {
        assert_eq!(
            normalize_url("https://example.com/page?x=1#section").unwrap(),
            "https://example.com/page?x=1"
        );
    }

    #[test]
    fn test_normalize_trims_whitespace() {
        assert_eq!(
            normalize_url("  https://example.com/a \n").unwrap(),
            "https://example.com/a"
        );
    }

    #[test]
    fn test_equivalent_inputs_normalize_equal() {
        let a = normalize_url("HTTPS://Example.com:443/x#frag").unwrap();
        let b = normalize_url("https://example.com/x").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_normalize_rejects_non_http_schemes() {
        for input in [
            "ftp://example.com/file.txt",
            "javascript:alert('xss')",
            "data:text/plain,Hello",
            "mailto:test@example.com",
            "file:///etc/passwd",
        ] {
            assert!(
                matches!(
                    normalize_url(input),
                    Err(UrlNormalizationError::UnsupportedProtocol)
                ),
                "{input}"
            );
        }
    }

    #[test]
    fn test_normalize_rejects_malformed() {
        for input in ["", "example.com", "not a valid url"] {
            assert!(
                matches!(normalize_url(input), Err(UrlNormalizationError::InvalidFormat(_))),
                "{input}"
            );
        }
    }
}
