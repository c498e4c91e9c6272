//! Error types for Appx
//!
//! Every fallible operation in the crate returns [`Result`].

use thiserror::Error;

/// Main error type for Appx operations
#[derive(Error, Debug)]
pub enum AppxError {
    #[error("Invalid base URL '{0}': {1}")]
    InvalidBaseUrl(String, url::ParseError),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to read catalog '{0}': {1}")]
    CatalogFile(String, String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Error loading data: {0}")]
    LoadFailed(String),

    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),

    #[error("Server error: {0}")]
    Server(String),
}

/// Result type alias for Appx operations
pub type Result<T> = std::result::Result<T, AppxError>;

impl AppxError {
    /// Short, user-facing reason shown in the error state of the browser
    pub fn reason(&self) -> String {
        match self {
            AppxError::Status { status, .. } => format!("server responded with HTTP {}", status),
            AppxError::Http(e) if e.is_connect() => "could not connect to the server".to_string(),
            AppxError::Http(e) if e.is_decode() => "unexpected response body".to_string(),
            other => other.to_string(),
        }
    }

    /// Whether the failure came from talking to the data source
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            AppxError::Http(_)
                | AppxError::Status { .. }
                | AppxError::Json(_)
                | AppxError::LoadFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_reason_mentions_code() {
        let err = AppxError::Status {
            url: "http://localhost/api/apps".to_string(),
            status: 503,
        };
        assert_eq!(err.reason(), "server responded with HTTP 503");
        assert!(err.is_fetch_error());
        assert_eq!(err.to_string(), "http://localhost/api/apps returned HTTP 503");
    }

    #[test]
    fn load_failure_counts_as_fetch_error() {
        let err = AppxError::LoadFailed("could not connect to the server".to_string());
        assert!(err.is_fetch_error());
        assert_eq!(err.to_string(), "Error loading data: could not connect to the server");
    }

    #[test]
    fn clipboard_is_not_a_fetch_error() {
        let err = AppxError::Clipboard("no display".to_string());
        assert!(!err.is_fetch_error());
        assert_eq!(err.reason(), "Clipboard unavailable: no display");
    }
}
