//! Command implementations.

pub mod check;
pub mod init;
pub mod show;
pub mod upload;

use crate::error::{RedirectMapError, Result};
use std::fs;
use std::path::Path;

/// Read a map file as UTF-8 text.
pub(crate) fn read_map_file(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(RedirectMapError::validation(
            "file",
            format!("file not found: {}", path.display()),
        ));
    }
    fs::read_to_string(path)
        .map_err(|e| RedirectMapError::validation("file", format!("cannot read file: {e}")))
}

/// Print a serializable value as pretty JSON.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
