//! Error types for the bounded fetcher

use reqwest::StatusCode;
use std::fmt;
use std::time::Duration;

#[derive(Debug)]
pub enum FetchError {
    /// No response within the bound; the request was cancelled
    Timeout { url: String, after: Duration },
    /// Response arrived with a non-success status
    Remote { url: String, status: StatusCode },
    /// Transport-level failure
    Http(reqwest::Error),
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout { url, after } => {
                write!(f, "Request to {url} timed out after {}ms", after.as_millis())
            }
            Self::Remote { url, status } => write!(f, "{url} returned status {status}"),
            Self::Http(e) => write!(f, "HTTP error: {e}"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display() {
        let err = FetchError::Timeout {
            url: "https://example.com/feed".to_string(),
            after: Duration::from_millis(9000),
        };
        assert!(err.is_timeout());
        assert_eq!(
            err.to_string(),
            "Request to https://example.com/feed timed out after 9000ms"
        );
    }

    #[test]
    fn test_remote_carries_status() {
        let err = FetchError::Remote {
            url: "https://example.com".to_string(),
            status: StatusCode::TOO_MANY_REQUESTS,
        };
        assert_eq!(err.status(), Some(StatusCode::TOO_MANY_REQUESTS));
        assert!(err.to_string().contains("429"));
        assert!(!err.is_timeout());
    }
}
