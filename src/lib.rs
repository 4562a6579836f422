//! Redirect map reconciliation.
//!
//! Parses line-oriented redirect maps (`<source> <target>` per line),
//! merges an uploaded map into a previously stored one with the upload
//! taking precedence per case-insensitive source, and persists the
//! surviving lines through a [`store::MapStore`].

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod redirect;
pub mod store;
pub mod upload;

pub use error::{ErrorCode, RedirectMapError, Result, StructuredError};
pub use model::{Entry, Origin};
pub use redirect::{Reconciliation, reconcile};
pub use upload::{UploadOutcome, upload_redirect_map};
