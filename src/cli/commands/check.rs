use super::{print_json, read_map_file};
use crate::cli::CheckArgs;
use crate::error::Result;
use crate::model::Entry;
use crate::redirect::{duplicate_sources, parse_entries};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    file: String,
    valid: usize,
    invalid: usize,
    entries: &'a [Entry],
    duplicates: Vec<Vec<u64>>,
}

/// Execute the check command.
///
/// Malformed lines are reported, not treated as failures.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn execute(args: &CheckArgs, json: bool) -> Result<()> {
    let text = read_map_file(&args.file)?;
    let entries = parse_entries(&text, 0);
    let duplicates = duplicate_sources(&entries);
    let valid = entries.iter().filter(|e| e.valid).count();

    let report = CheckReport {
        file: args.file.display().to_string(),
        valid,
        invalid: entries.len() - valid,
        entries: &entries,
        duplicates,
    };

    if json {
        return print_json(&report);
    }

    println!(
        "{}: {} valid, {} invalid",
        report.file, report.valid, report.invalid
    );
    for entry in entries.iter().filter(|e| !e.valid) {
        println!("  line {}: {}", entry.id + 1, entry.status);
    }
    for ids in &report.duplicates {
        let lines: Vec<String> = ids.iter().map(|id| (id + 1).to_string()).collect();
        println!(
            "  warning: source repeated on lines {}; all are kept",
            lines.join(", ")
        );
    }
    Ok(())
}
