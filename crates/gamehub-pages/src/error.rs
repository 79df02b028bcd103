//! Error types for the page loader binary

use std::fmt;

#[derive(Debug)]
pub enum PagesError {
    Io(std::io::Error),
    Store(timed_store::StoreError),
    Json(serde_json::Error),
    Config(String),
}

impl fmt::Display for PagesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Store(e) => write!(f, "Cache store error: {e}"),
            Self::Json(e) => write!(f, "JSON error: {e}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for PagesError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Store(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Config(_) => None,
        }
    }
}

impl From<std::io::Error> for PagesError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<timed_store::StoreError> for PagesError {
    fn from(e: timed_store::StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<serde_json::Error> for PagesError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<tracing_subscriber::filter::ParseError> for PagesError {
    fn from(e: tracing_subscriber::filter::ParseError) -> Self {
        Self::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PagesError>;
