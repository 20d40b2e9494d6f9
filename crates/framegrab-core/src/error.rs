//! Error types module
//!
//! All caller-visible failures are unified under [`AppError`]. Each variant
//! self-describes its HTTP presentation through [`ErrorMetadata`], so the API
//! layer only has to render what the error says about itself.

use std::io;

/// Level at which the API layer logs an error before rendering it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Caller mistakes
    Debug,
    /// Degraded but expected, e.g. missing configuration
    Warn,
    Error,
}

/// How an error presents itself over HTTP.
pub trait ErrorMetadata {
    fn http_status_code(&self) -> u16;

    /// Stable code such as `EXTERNAL_TOOL_ERROR`
    fn error_code(&self) -> &'static str;

    /// Whether the client may reasonably try the same request again
    fn is_recoverable(&self) -> bool;

    /// Generic, human-readable description of the failed step
    fn detail(&self) -> Option<&'static str>;

    /// Message returned in the `error` field
    fn client_message(&self) -> String;

    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("{tool} failed: {message}")]
    ExternalTool { tool: String, message: String },

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("Media store error: {0}")]
    Storage(String),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

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

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, detail, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (u16, &'static str, bool, Option<&'static str>, LogLevel) {
    match err {
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", false, None, LogLevel::Debug),
        AppError::BadRequest(_) => (400, "BAD_REQUEST", false, None, LogLevel::Debug),
        AppError::PayloadTooLarge(_) => (413, "PAYLOAD_TOO_LARGE", false, None, LogLevel::Debug),
        AppError::ExternalTool { .. } => (
            500,
            "EXTERNAL_TOOL_ERROR",
            true,
            Some("Failed to extract frame from video"),
            LogLevel::Error,
        ),
        AppError::ImageProcessing(_) => (
            500,
            "IMAGE_PROCESSING_ERROR",
            false,
            Some("Failed to process extracted frame"),
            LogLevel::Error,
        ),
        AppError::Storage(_) => (
            500,
            "STORAGE_ERROR",
            true,
            Some("Failed to upload frame to media store"),
            LogLevel::Error,
        ),
        AppError::Spreadsheet(_) => (
            500,
            "SPREADSHEET_ERROR",
            true,
            Some("Failed to record selection in spreadsheet"),
            LogLevel::Error,
        ),
        AppError::NotConfigured(_) => (
            500,
            "NOT_CONFIGURED",
            false,
            Some("Service is missing required configuration"),
            LogLevel::Warn,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Internal server error"),
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Variant name, used as a log field
    pub fn error_type(&self) -> &str {
        match self {
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::BadRequest(_) => "BadRequest",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::ExternalTool { .. } => "ExternalTool",
            AppError::ImageProcessing(_) => "ImageProcessing",
            AppError::Storage(_) => "Storage",
            AppError::Spreadsheet(_) => "Spreadsheet",
            AppError::NotConfigured(_) => "NotConfigured",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "Internal",
        }
    }

    pub fn external_tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::ExternalTool {
            tool: tool.into(),
            message: message.into(),
        }
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

    fn detail(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).4
    }

    // Upstream failures carry the raw underlying message to the caller.
    fn client_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg)
            | AppError::BadRequest(msg)
            | AppError::PayloadTooLarge(msg)
            | AppError::ImageProcessing(msg)
            | AppError::Storage(msg)
            | AppError::Spreadsheet(msg)
            | AppError::NotConfigured(msg)
            | AppError::Internal(msg) => msg.clone(),
            AppError::ExternalTool { tool, message } => format!("{} failed: {}", tool, message),
            AppError::InternalWithSource { message, .. } => message.clone(),
        }
    }
}
