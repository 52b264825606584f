//! Custom error types for the application.
//!
//! Each domain gets its own enum:
//!
//! - [`FetchError`] - Network/fetch-related errors for HTTP requests
//! - [`RenderError`] - Markdown and API fragment transforms
//! - [`OutlineError`] - The embedded sidebar outline

use thiserror::Error;

/// Network/fetch-related errors for HTTP requests.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// Browser window not available
    #[error("Browser window not available")]
    NoWindow,
    /// Failed to create HTTP request
    #[error("Failed to create request")]
    RequestCreationFailed,
    /// Network request failed (CORS, connection refused, etc.)
    #[error("Network error: {0}")]
    NetworkError(String),
    /// HTTP error response (non-2xx status) with the raw response text
    #[error("HTTP error: {status}")]
    HttpError { status: u16, body: String },
    /// Failed to read response body
    #[error("Failed to read response")]
    ResponseReadFailed,
    /// Invalid response content (not text)
    #[error("Invalid response content")]
    InvalidContent,
    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParseError(String),
    /// Request timed out
    #[error("Request timed out")]
    Timeout,
}

impl FetchError {
    /// HTTP status, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text for diagnostic panels: the raw response body for HTTP errors,
    /// the error message otherwise.
    pub fn technical_text(&self) -> String {
        match self {
            Self::HttpError { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }
}

/// Document transform errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    /// Markdown could not be converted to HTML
    #[error("markdown rendering failed: {0}")]
    Markdown(String),
    /// Pre-rendered API fragment could not be spliced in
    #[error("{0}")]
    Fragment(String),
}

/// Sidebar outline errors.
#[derive(Debug, Error)]
pub enum OutlineError {
    #[error("invalid sidebar outline: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_technical_text() {
        let err = FetchError::HttpError {
            status: 500,
            body: "Traceback: parse failure".to_string(),
        };
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.technical_text(), "Traceback: parse failure");
        assert_eq!(err.to_string(), "HTTP error: 500");

        assert_eq!(FetchError::Timeout.status(), None);
        assert_eq!(FetchError::Timeout.technical_text(), "Request timed out");
    }
}
