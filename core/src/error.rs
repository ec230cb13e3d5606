//! Structured error types for textlens
//!
//! Provides type-safe error handling with user-friendly messages for the
//! intake validation rules and the analysis request lifecycle.

use std::time::Duration;
use thiserror::Error;

/// Primary error type for textlens operations
#[derive(Error, Debug)]
pub enum TextLensError {
    // =========================================================================
    // Intake / Validation Errors
    // =========================================================================
    /// Uploaded file has a MIME type outside the allow-list
    #[error("unsupported file type: {mime_type}")]
    InvalidFileType { mime_type: String },

    /// Uploaded file exceeds the size cap
    #[error("file too large: {size_bytes} bytes (max {max_bytes})")]
    FileTooLarge { size_bytes: u64, max_bytes: u64 },

    /// Nothing to analyze: no file and no non-whitespace text
    #[error("no content to analyze")]
    EmptyContent,

    /// Raw file bytes could not be decoded as text
    #[error("failed to decode file content: {reason}")]
    DecodeFailure { reason: String },

    // =========================================================================
    // Engine / Network Errors
    // =========================================================================
    /// The analysis engine reported a failure
    #[error("analysis failed: {message}")]
    AnalysisFailure { message: String },

    /// Authentication/authorization errors
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    /// Rate limit exceeded (429)
    #[error("rate limit exceeded")]
    RateLimitExceeded,

    /// Engine endpoint returned a non-success status
    #[error("provider error: {status} - {message}")]
    ProviderError { status: u16, message: String },

    /// Network/connection error
    #[error("connection failed: {message}")]
    ConnectionFailed { message: String },

    /// Request exceeded the configured timeout
    #[error("analysis timed out after {duration:?}")]
    Timeout { duration: Duration },

    // =========================================================================
    // Configuration / Internal Errors
    // =========================================================================
    /// Invalid configuration
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Internal system error
    #[error("internal error: {message}")]
    Internal { message: String },

    // =========================================================================
    // External Error Wrappers
    // =========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(String),
}

impl TextLensError {
    /// Check if error is retryable (transient)
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionFailed { .. } => true,
            Self::Timeout { .. } => true,
            Self::RateLimitExceeded => true,
            Self::ProviderError { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),

            Self::Io(io_err) => matches!(
                io_err.kind(),
                std::io::ErrorKind::Interrupted
                    | std::io::ErrorKind::WouldBlock
                    | std::io::ErrorKind::TimedOut
            ),

            // Never retry these
            Self::InvalidFileType { .. }
            | Self::FileTooLarge { .. }
            | Self::EmptyContent
            | Self::DecodeFailure { .. }
            | Self::AnalysisFailure { .. }
            | Self::Unauthorized { .. }
            | Self::InvalidConfig { .. }
            | Self::Internal { .. }
            | Self::Json { .. } => false,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidFileType { .. } => {
                "Please upload a valid text file (TXT, PDF, DOC, DOCX).".to_string()
            }
            Self::FileTooLarge { max_bytes, .. } => {
                format!("File size must be less than {} MB.", max_bytes / 1024 / 1024)
            }
            Self::EmptyContent => {
                "Please enter some text or upload a document to analyze.".to_string()
            }
            Self::Unauthorized { .. } => {
                "Authentication failed. Please check your API key.".to_string()
            }
            Self::RateLimitExceeded => "Rate limit exceeded. Please try again later.".to_string(),
            Self::Timeout { .. } => {
                "The analysis took too long and was abandoned. Please try again.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Convert from anyhow::Error to TextLensError
impl From<anyhow::Error> for TextLensError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(io_err) = err.downcast_ref::<std::io::Error>() {
            return Self::Io(std::io::Error::new(io_err.kind(), io_err.to_string()));
        }

        Self::Internal {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for TextLensError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias using TextLensError
pub type Result<T> = std::result::Result<T, TextLensError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(TextLensError::Timeout {
            duration: Duration::from_secs(30)
        }
        .is_retryable());

        assert!(TextLensError::ConnectionFailed {
            message: "timeout".to_string()
        }
        .is_retryable());

        assert!(TextLensError::ProviderError {
            status: 503,
            message: "maintenance".to_string()
        }
        .is_retryable());

        assert!(!TextLensError::InvalidFileType {
            mime_type: "application/zip".to_string()
        }
        .is_retryable());

        assert!(!TextLensError::EmptyContent.is_retryable());
    }

    #[test]
    fn test_user_messages() {
        let err = TextLensError::FileTooLarge {
            size_bytes: 6 * 1024 * 1024,
            max_bytes: 5_242_880,
        };
        assert!(err.user_message().contains("5 MB"));

        let err = TextLensError::EmptyContent;
        assert!(err.user_message().contains("enter some text"));

        let err = TextLensError::Unauthorized {
            message: "bad token".to_string(),
        };
        assert!(err.user_message().contains("API key"));
    }
}
