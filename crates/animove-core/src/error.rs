//! Error types module
//!
//! All relay failures are unified under `AppError`. The API crate turns an
//! `AppError` into an HTTP response using the `ErrorMetadata` the error carries,
//! so handlers never pick status codes by hand.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for upstream problems outside our control
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "UPSTREAM_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether the same request may succeed if retried later
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    /// The object store rejected or failed an upload.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The synthesis API could not be reached or timed out.
    #[error("Upstream request failed: {0}")]
    Upstream(String),

    /// The synthesis API answered but reported a failure or omitted expected fields.
    /// `code` is the API's own error code, when it sent one.
    #[error("Upstream rejected request: {message}")]
    UpstreamRejected {
        message: String,
        code: Option<String>,
    },

    #[error("Not configured: {0}")]
    NotConfigured(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::InvalidInput(_) => (
            400,
            "INVALID_INPUT",
            false,
            Some("Check request parameters and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::NotFound(_) => (
            404,
            "NOT_FOUND",
            false,
            Some("Verify the file name exists"),
            false,
            LogLevel::Debug,
        ),
        AppError::PayloadTooLarge(_) => (
            413,
            "PAYLOAD_TOO_LARGE",
            false,
            Some("Reduce file size and upload again"),
            false,
            LogLevel::Debug,
        ),
        AppError::Storage(_) => (
            502,
            "STORAGE_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::Upstream(_) => (
            502,
            "UPSTREAM_ERROR",
            true,
            Some("Retry after a short delay"),
            false,
            LogLevel::Warn,
        ),
        AppError::UpstreamRejected { .. } => (
            502,
            "UPSTREAM_REJECTED",
            false,
            Some("Check the submitted URLs and parameters"),
            false,
            LogLevel::Warn,
        ),
        AppError::NotConfigured(_) => (
            503,
            "NOT_CONFIGURED",
            false,
            Some("Set the missing configuration and restart the service"),
            false,
            LogLevel::Warn,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::NotFound(_) => "NotFound",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::Storage(_) => "Storage",
            AppError::Upstream(_) => "Upstream",
            AppError::UpstreamRejected { .. } => "UpstreamRejected",
            AppError::NotConfigured(_) => "NotConfigured",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Error code reported by the synthesis API.
    pub fn upstream_code(&self) -> Option<&str> {
        match self {
            AppError::UpstreamRejected { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::PayloadTooLarge(ref msg) => msg.clone(),
            AppError::Storage(_) => "Failed to upload file to object storage".to_string(),
            AppError::Upstream(ref msg) => msg.clone(),
            AppError::UpstreamRejected { ref message, .. } => message.clone(),
            AppError::NotConfigured(ref msg) => msg.clone(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }
}
