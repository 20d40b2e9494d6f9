//! External tool errors

use framegrab_core::AppError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Failed to execute {tool}: {source}")]
    Spawn {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}: {stderr}")]
    Failed {
        tool: &'static str,
        status: String,
        stderr: String,
    },

    #[error("{tool} output exceeded {limit} bytes")]
    OutputTooLarge { tool: &'static str, limit: usize },

    #[error("{tool} produced no output at {}", path.display())]
    MissingOutput { tool: &'static str, path: PathBuf },

    #[error("{tool} returned unusable output: {message}")]
    InvalidOutput { tool: &'static str, message: String },

    #[error("IO error while running {tool}: {source}")]
    Io {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl ToolError {
    pub fn tool(&self) -> &'static str {
        match self {
            ToolError::Spawn { tool, .. }
            | ToolError::Failed { tool, .. }
            | ToolError::OutputTooLarge { tool, .. }
            | ToolError::MissingOutput { tool, .. }
            | ToolError::InvalidOutput { tool, .. }
            | ToolError::Io { tool, .. } => tool,
        }
    }
}

impl From<ToolError> for AppError {
    fn from(err: ToolError) -> Self {
        AppError::ExternalTool {
            tool: err.tool().to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framegrab_core::ErrorMetadata;

    #[test]
    fn test_conversion_keeps_stderr() {
        let err = ToolError::Failed {
            tool: "ffmpeg",
            status: "exit status: 1".to_string(),
            stderr: "Invalid duration specification for ss: -5".to_string(),
        };
        let app: AppError = err.into();
        assert_eq!(app.http_status_code(), 500);
        assert_eq!(app.error_code(), "EXTERNAL_TOOL_ERROR");
        assert!(app.client_message().contains("Invalid duration specification"));
    }
}
