//! Structured error output for `--json` mode.
//!
//! Provides machine-parseable error information with:
//! - Error codes for categorization
//! - Hints for self-correction
//! - Context for debugging

use crate::error::RedirectMapError;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Machine-readable error codes.
///
/// These codes are stable and can be used for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // === Store Errors (exit code 2) ===
    /// Store directory not found
    NotInitialized,
    /// Store directory already exists
    AlreadyInitialized,
    /// Writing the map failed
    PersistenceFailed,

    // === Validation Errors (exit code 4) ===
    /// Field validation failed
    ValidationFailed,
    /// Target escapes the store root
    PathTraversal,

    // === Config Errors (exit code 7) ===
    /// Configuration error
    ConfigError,

    // === I/O Errors (exit code 8) ===
    /// File I/O error
    IoError,
    /// JSON serialization error
    JsonError,
    /// YAML parsing error
    YamlError,

    // === Internal Errors (exit code 1) ===
    /// Unexpected internal error
    InternalError,
}

impl ErrorCode {
    /// Classify a `RedirectMapError`.
    #[must_use]
    pub const fn from_error(err: &RedirectMapError) -> Self {
        match err {
            RedirectMapError::NotInitialized => Self::NotInitialized,
            RedirectMapError::AlreadyInitialized { .. } => Self::AlreadyInitialized,
            RedirectMapError::Persistence { .. } => Self::PersistenceFailed,
            RedirectMapError::Validation { .. } => Self::ValidationFailed,
            RedirectMapError::PathTraversal { .. } => Self::PathTraversal,
            RedirectMapError::Config(_) => Self::ConfigError,
            RedirectMapError::Io(_) => Self::IoError,
            RedirectMapError::Json(_) => Self::JsonError,
            RedirectMapError::Yaml(_) => Self::YamlError,
            RedirectMapError::Other(_) => Self::InternalError,
        }
    }

    /// Get the string representation for JSON output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::AlreadyInitialized => "ALREADY_INITIALIZED",
            Self::PersistenceFailed => "PERSISTENCE_FAILED",
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::PathTraversal => "PATH_TRAVERSAL",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::YamlError => "YAML_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Whether fixing the input and re-running can succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ValidationFailed | Self::PathTraversal)
    }

    /// Get the exit code for this error category.
    ///
    /// - 1: Internal/unknown errors
    /// - 2: Store errors
    /// - 4: Validation errors
    /// - 7: Config errors
    /// - 8: I/O errors
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::NotInitialized | Self::AlreadyInitialized | Self::PersistenceFailed => 2,
            Self::ValidationFailed | Self::PathTraversal => 4,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError | Self::YamlError => 8,
            Self::InternalError => 1,
        }
    }
}

/// Structured error for JSON or human output.
#[derive(Debug, Clone, Serialize)]
pub struct StructuredError {
    /// Machine-readable error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional hint for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whether the operation can be retried
    pub retryable: bool,
    /// Additional context data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl StructuredError {
    /// Create a new structured error from a `RedirectMapError`.
    #[must_use]
    pub fn from_error(err: &RedirectMapError) -> Self {
        let code = ErrorCode::from_error(err);
        let context = match err {
            RedirectMapError::AlreadyInitialized { path } => {
                Some(json!({"path": path.display().to_string()}))
            }
            RedirectMapError::PathTraversal { target, .. }
            | RedirectMapError::Persistence { target, .. } => Some(json!({"target": target})),
            RedirectMapError::Validation { field, .. } => Some(json!({"field": field})),
            _ => None,
        };

        Self {
            code,
            message: err.to_string(),
            hint: err.suggestion().map(str::to_string),
            retryable: code.is_retryable(),
            context,
        }
    }

    /// Convert to JSON value for output.
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "error": {
                "code": self.code.as_str(),
                "message": self.message,
                "hint": self.hint,
                "retryable": self.retryable,
                "context": self.context,
            }
        })
    }

    /// Format for human-readable output.
    #[must_use]
    pub fn to_human(&self, color: bool) -> String {
        let mut output = String::new();

        if color {
            output.push_str("\x1b[31mError:\x1b[0m ");
        } else {
            output.push_str("Error: ");
        }

        output.push_str(&self.message);

        if let Some(hint) = &self.hint {
            output.push('\n');
            if color {
                output.push_str("\x1b[33mHint:\x1b[0m ");
            } else {
                output.push_str("Hint: ");
            }
            output.push_str(hint);
        }

        output
    }
}
