use super::print_json;
use crate::config::{self, CliOverrides};
use crate::error::Result;
use crate::store::{FsMapStore, MapStore};
use serde_json::json;

/// Execute the show command.
///
/// # Errors
///
/// Returns an error if the store cannot be found or the map cannot be read.
pub fn execute(target: &str, overrides: &CliOverrides) -> Result<()> {
    let store_dir = config::resolve_store_dir(overrides)?;
    let layer = config::load_config(&store_dir, overrides)?;
    let map_file_name = config::map_file_name_from_layer(&layer)?;
    let store = FsMapStore::with_map_file_name(&store_dir, &map_file_name);

    let text = store.read_existing_text(target)?;
    let metadata = store.read_metadata(target)?;

    if config::json_from_layer(&layer) {
        return print_json(&json!({
            "target": target,
            "text": text,
            "metadata": metadata,
        }));
    }

    let Some(text) = text else {
        println!("No redirect map stored for '{target}'");
        return Ok(());
    };

    if let Some(meta) = metadata {
        println!(
            "# Last modified {} by {}",
            meta.modified_at.to_rfc3339(),
            meta.modified_by
        );
    }
    println!("{text}");
    Ok(())
}
