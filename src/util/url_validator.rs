use std::net::IpAddr;
use thiserror::Error;
use url::Url;

/// Errors from validating a configured API or image base URL.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// Plain HTTP pointed at a non-loopback host.
    #[error("Insecure base URL: HTTPS required (except loopback hosts for testing)")]
    Insecure,
}

/// Validates a base URL that will receive the bearer token.
///
/// HTTPS is required. Plain HTTP is accepted only for loopback hosts
/// (`localhost`, `127.0.0.1`, `::1`) so a local mock server can stand in
/// for the real API.
///
/// # Examples
///
/// ```
/// use marquee::util::validate_base_url;
///
/// assert!(validate_base_url("https://api.themoviedb.org/3").is_ok());
/// assert!(validate_base_url("http://127.0.0.1:8080").is_ok());
/// assert!(validate_base_url("http://api.example.com").is_err());
/// assert!(validate_base_url("ftp://api.example.com").is_err());
/// ```
pub fn validate_base_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str)?;

    match url.scheme() {
        "https" => Ok(url),
        "http" if is_loopback(&url) => {
            tracing::warn!(base_url = %url, "Using non-HTTPS base URL (loopback only)");
            Ok(url)
        }
        "http" => Err(UrlValidationError::Insecure),
        scheme => Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }
}

fn is_loopback(url: &Url) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    if host == "localhost" {
        return true;
    }
    let host = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    host.parse::<IpAddr>().is_ok_and(|ip| ip.is_loopback())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_https_accepted() {
        let url = validate_base_url("https://api.themoviedb.org/3").unwrap();
        assert_eq!(url.host_str(), Some("api.themoviedb.org"));
    }

    #[test]
    fn test_http_loopback_accepted() {
        assert!(validate_base_url("http://localhost:3000").is_ok());
        assert!(validate_base_url("http://127.0.0.1:41234/3").is_ok());
        assert!(validate_base_url("http://[::1]:8080").is_ok());
    }

    #[test]
    fn test_http_remote_rejected() {
        assert!(matches!(
            validate_base_url("http://api.themoviedb.org/3"),
            Err(UrlValidationError::Insecure)
        ));
        assert!(matches!(
            validate_base_url("http://192.168.1.10"),
            Err(UrlValidationError::Insecure)
        ));
    }

    #[test]
    fn test_other_schemes_rejected() {
        assert!(matches!(
            validate_base_url("file:///etc/passwd"),
            Err(UrlValidationError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            validate_base_url("not a url"),
            Err(UrlValidationError::InvalidUrl(_))
        ));
    }
}
