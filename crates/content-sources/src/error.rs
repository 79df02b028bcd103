//! Error types for content sources

use bounded_fetch::FetchError;
use std::fmt;

#[derive(Debug)]
pub enum SourceError {
    /// Request failed, timed out (body included) or returned a non-success status
    Fetch(FetchError),
    /// Response body was not the expected shape
    Decode {
        adapter: String,
        error: serde_json::Error,
    },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(e) => write!(f, "{e}"),
            Self::Decode { adapter, error } => {
                write!(f, "{adapter}: unexpected response shape: {error}")
            }
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Fetch(e) => Some(e),
            Self::Decode { error, .. } => Some(error),
        }
    }
}

impl From<FetchError> for SourceError {
    fn from(e: FetchError) -> Self {
        Self::Fetch(e)
    }
}

pub type Result<T> = std::result::Result<T, SourceError>;
