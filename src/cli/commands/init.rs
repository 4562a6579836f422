use crate::config::{CONFIG_FILE_NAME, STORE_DIR_NAME};
use crate::error::{RedirectMapError, Result};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_TEMPLATE: &str = r"# Redirect map store configuration
# actor: site-admin
# map_file_name: redirectmap.txt
";

/// Execute the init command.
///
/// Creates `store_dir` (default `./.redirect-maps`) with a config template.
///
/// # Errors
///
/// Returns an error if the store is already initialized (without `force`)
/// or the directory cannot be created.
pub fn execute(force: bool, store_dir: Option<&Path>, quiet: bool) -> Result<PathBuf> {
    let store_dir = store_dir.map_or_else(|| PathBuf::from(STORE_DIR_NAME), Path::to_path_buf);
    let config_path = store_dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        return Err(RedirectMapError::AlreadyInitialized { path: store_dir });
    }

    fs::create_dir_all(&store_dir)?;
    fs::write(&config_path, CONFIG_TEMPLATE)?;
    tracing::debug!(path = %store_dir.display(), "Store initialized");

    if !quiet {
        println!("Initialized redirect map store in {}", store_dir.display());
    }
    Ok(store_dir)
}
