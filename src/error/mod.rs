//! Error types and handling for `redirect_maps`.
//!
//! # Design
//!
//! - Uses `thiserror` for derive-based error types
//! - Supports `anyhow` integration for ad-hoc context
//! - Provides recovery hints for user-facing errors
//! - Provides structured JSON output for `--json` mode
//!
//! Malformed map lines and source collisions are not errors: they are
//! recorded on the affected [`Entry`](crate::model::Entry) and processing
//! continues. Only I/O, configuration and persistence failures surface here.

mod structured;

pub use structured::{ErrorCode, StructuredError};

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for `redirect_maps` operations.
#[derive(Error, Debug)]
pub enum RedirectMapError {
    // === Store Errors ===
    /// No `.redirect-maps` directory could be found.
    #[error("Redirect map store not initialized: run 'rmap init' first")]
    NotInitialized,

    /// Store directory already exists.
    #[error("Already initialized at '{path}'")]
    AlreadyInitialized { path: PathBuf },

    /// Target identifier escapes the store root.
    #[error("Invalid target '{target}': {reason}")]
    PathTraversal { target: String, reason: String },

    /// Persisting the rendered map failed.
    #[error("Failed to persist redirect map '{target}': {reason}")]
    Persistence { target: String, reason: String },

    // === Validation Errors ===
    /// Field validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    // === Configuration Errors ===
    /// Configuration file error.
    #[error("Configuration error: {0}")]
    Config(String),

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Wrapped anyhow error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RedirectMapError {
    /// Can the user fix this without code changes?
    #[must_use]
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NotInitialized
                | Self::AlreadyInitialized { .. }
                | Self::PathTraversal { .. }
                | Self::Validation { .. }
                | Self::Config(_)
        )
    }

    /// Human-friendly suggestion for fixing this error.
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run: rmap init (or pass --dir)"),
            Self::AlreadyInitialized { .. } => Some("Use --force to reinitialize"),
            Self::PathTraversal { .. } => {
                Some("Use a relative target such as 'site/en' without '..'")
            }
            Self::Persistence { .. } => Some("Check permissions on the store directory"),
            _ => None,
        }
    }

    /// Get the exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        ErrorCode::from_error(self).exit_code()
    }

    /// Create a validation error for a specific field.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a persistence error for a target.
    pub fn persistence(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Persistence {
            target: target.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias using `RedirectMapError`.
pub type Result<T> = std::result::Result<T, RedirectMapError>;
