use super::{print_json, read_map_file};
use crate::cli::UploadArgs;
use crate::config::{self, CliOverrides};
use crate::error::{RedirectMapError, Result};
use crate::store::FsMapStore;
use crate::upload::{UploadOutcome, upload_redirect_map};
use chrono::Utc;
use std::path::Path;

/// Execute the upload command.
///
/// # Errors
///
/// Returns an error if the store cannot be found, the upload file is
/// rejected or unreadable, or the merged map cannot be written.
pub fn execute(args: &UploadArgs, overrides: &CliOverrides, quiet: bool) -> Result<()> {
    let store_dir = config::resolve_store_dir(overrides)?;
    let layer = config::load_config(&store_dir, overrides)?;
    let map_file_name = config::map_file_name_from_layer(&layer)?;

    if !args.any_name {
        check_upload_name(&args.file, &map_file_name)?;
    }

    let incoming = read_map_file(&args.file)?;
    let store = FsMapStore::with_map_file_name(&store_dir, &map_file_name);
    let actor = config::resolve_actor(&layer);

    let outcome = upload_redirect_map(&store, &args.target, &incoming, &actor, Utc::now())?;

    if config::json_from_layer(&layer) {
        print_json(&outcome)
    } else {
        if !quiet {
            print_summary(&outcome);
        }
        Ok(())
    }
}

/// Uploaded files must carry the map file name unless explicitly waived.
fn check_upload_name(path: &Path, map_file_name: &str) -> Result<()> {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    if name == map_file_name {
        return Ok(());
    }
    Err(RedirectMapError::validation(
        "file",
        format!(
            "expected a file named '{map_file_name}', got '{name}' \
             (use --any-name to skip this check)"
        ),
    ))
}

fn print_summary(outcome: &UploadOutcome) {
    for line in summary_lines(outcome) {
        println!("{line}");
    }
}

/// Human summary. Ids restart at zero for each side of the merge, so
/// diagnostics are labelled with the side they came from.
fn summary_lines(outcome: &UploadOutcome) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Updated redirect map '{}': {} line(s) written",
            outcome.target, outcome.valid_count
        ),
        format!(
            "  existing: {}, uploaded: {}, replaced: {}, skipped: {}",
            outcome.existing_count,
            outcome.incoming_count,
            outcome.superseded_count,
            outcome.invalid_count
        ),
    ];
    lines.extend(
        outcome
            .rejected_existing()
            .map(|entry| format!("  stored line {}: {}", entry.id + 1, entry.status)),
    );
    lines.extend(
        outcome
            .rejected_uploaded()
            .map(|entry| format!("  uploaded line {}: {}", entry.id + 1, entry.status)),
    );
    lines
}
