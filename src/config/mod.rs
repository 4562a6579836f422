//! Configuration management for `redirect_maps`.
//!
//! Configuration sources and precedence (highest wins):
//! 1. CLI overrides
//! 2. Environment variables (`RMAP_*`)
//! 3. Project config (`.redirect-maps/config.yaml`)
//! 4. Defaults
//!
//! The store directory itself is resolved before any layer is loaded:
//! `--dir`, then `RMAP_DIR`, then a walk up from the working directory.

use crate::error::{RedirectMapError, Result};
use crate::store::DEFAULT_MAP_FILE_NAME;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the store directory discovered from the working directory.
pub const STORE_DIR_NAME: &str = ".redirect-maps";
/// Project config file inside the store directory.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

const ENV_PREFIX: &str = "RMAP_";
const ENV_DIR: &str = "RMAP_DIR";

/// A flat key/value configuration layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLayer {
    pub values: HashMap<String, String>,
}

impl ConfigLayer {
    /// Merge another layer on top of this one (higher precedence wins).
    pub fn merge_from(&mut self, other: &Self) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// Merge multiple layers in precedence order (lowest to highest).
    #[must_use]
    pub fn merge_layers(layers: &[Self]) -> Self {
        let mut merged = Self::default();
        for layer in layers {
            merged.merge_from(layer);
        }
        merged
    }

    /// Build a layer from a YAML file path. Missing files return empty config.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn from_yaml(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let value: serde_yaml::Value = serde_yaml::from_str(&contents)?;
        Ok(layer_from_yaml_value(&value))
    }

    /// Build a layer from `RMAP_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_vars(env::vars())
    }

    /// Build a layer from an explicit set of environment variables.
    #[must_use]
    pub fn from_env_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut layer = Self::default();
        for (key, value) in vars {
            if key == ENV_DIR {
                continue;
            }
            if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
                layer.insert(stripped, value);
            }
        }
        layer
    }

    /// Look up a key, accepting `_`/`-` spellings and any case.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&normalize_key(key)).map(String::as_str)
    }

    fn insert(&mut self, key: &str, value: String) {
        self.values.insert(normalize_key(key), value);
    }
}

/// Overrides from global CLI flags.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub dir: Option<PathBuf>,
    pub actor: Option<String>,
    pub json: Option<bool>,
}

impl CliOverrides {
    #[must_use]
    pub fn as_layer(&self) -> ConfigLayer {
        let mut layer = ConfigLayer::default();

        if let Some(actor) = &self.actor {
            layer.insert("actor", actor.clone());
        }
        if let Some(json) = self.json {
            layer.insert("json", json.to_string());
        }

        layer
    }
}

/// Built-in defaults.
#[must_use]
pub fn default_config_layer() -> ConfigLayer {
    let mut layer = ConfigLayer::default();
    layer.insert("map-file-name", DEFAULT_MAP_FILE_NAME.to_string());
    layer
}

/// Load project config (`<store_dir>/config.yaml`).
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_project_config(store_dir: &Path) -> Result<ConfigLayer> {
    ConfigLayer::from_yaml(&store_dir.join(CONFIG_FILE_NAME))
}

/// Load and merge all configuration layers.
///
/// # Errors
///
/// Returns an error if the project config cannot be read or parsed.
pub fn load_config(store_dir: &Path, cli: &CliOverrides) -> Result<ConfigLayer> {
    let layer = ConfigLayer::merge_layers(&[
        default_config_layer(),
        load_project_config(store_dir)?,
        ConfigLayer::from_env(),
        cli.as_layer(),
    ]);
    tracing::debug!(store_dir = %store_dir.display(), keys = layer.values.len(), "Config loaded");
    Ok(layer)
}

/// Discover the active store directory.
///
/// Honors `RMAP_DIR` when set, otherwise walks up from `start` (or CWD).
///
/// # Errors
///
/// Returns `NotInitialized` if no store directory is found, or an I/O
/// error if the CWD cannot be read.
pub fn discover_store_dir(start: Option<&Path>) -> Result<PathBuf> {
    let env_dir = env::var(ENV_DIR)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from);
    discover_store_dir_with_env(start, env_dir.as_deref())
}

fn discover_store_dir_with_env(start: Option<&Path>, env_override: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = env_override {
        if path.is_dir() {
            return Ok(path.to_path_buf());
        }
    }

    let mut current = match start {
        Some(path) => path.to_path_buf(),
        None => env::current_dir()?,
    };

    loop {
        let candidate = current.join(STORE_DIR_NAME);
        if candidate.is_dir() {
            return Ok(candidate);
        }

        if !current.pop() {
            break;
        }
    }

    Err(RedirectMapError::NotInitialized)
}

/// Resolve the store directory from CLI overrides, falling back to discovery.
///
/// # Errors
///
/// Returns `NotInitialized` if an explicit directory does not exist or none
/// can be discovered.
pub fn resolve_store_dir(cli: &CliOverrides) -> Result<PathBuf> {
    match &cli.dir {
        Some(dir) if dir.is_dir() => Ok(dir.clone()),
        Some(_) => Err(RedirectMapError::NotInitialized),
        None => discover_store_dir(None),
    }
}

/// Resolve actor with fallback to USER and a safe default.
#[must_use]
pub fn resolve_actor(layer: &ConfigLayer) -> String {
    layer
        .get("actor")
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .or_else(|| {
            std::env::var("USER")
                .ok()
                .map(|value| value.trim().to_string())
        })
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Resolve the persisted map file name.
///
/// # Errors
///
/// Returns a config error if the name is empty or contains a path separator.
pub fn map_file_name_from_layer(layer: &ConfigLayer) -> Result<String> {
    let name = layer
        .get("map-file-name")
        .map_or(DEFAULT_MAP_FILE_NAME, str::trim);

    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(RedirectMapError::Config(format!(
            "map-file-name must be a plain file name, got '{name}'"
        )));
    }
    Ok(name.to_string())
}

/// Whether JSON output was requested.
#[must_use]
pub fn json_from_layer(layer: &ConfigLayer) -> bool {
    layer.get("json").and_then(parse_bool).unwrap_or(false)
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace('_', "-")
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

fn layer_from_yaml_value(value: &serde_yaml::Value) -> ConfigLayer {
    let mut layer = ConfigLayer::default();
    let mut flat = HashMap::new();
    flatten_yaml(value, "", &mut flat);

    for (key, value) in flat {
        layer.insert(&key, value);
    }

    layer
}

fn flatten_yaml(value: &serde_yaml::Value, prefix: &str, out: &mut HashMap<String, String>) {
    match value {
        serde_yaml::Value::Mapping(map) => {
            for (key, value) in map {
                let Some(key_str) = key.as_str() else {
                    continue;
                };
                let next_prefix = if prefix.is_empty() {
                    key_str.to_string()
                } else {
                    format!("{prefix}.{key_str}")
                };
                flatten_yaml(value, &next_prefix, out);
            }
        }
        serde_yaml::Value::String(s) => {
            out.insert(prefix.to_string(), s.clone());
        }
        serde_yaml::Value::Bool(b) => {
            out.insert(prefix.to_string(), b.to_string());
        }
        serde_yaml::Value::Number(n) => {
            out.insert(prefix.to_string(), n.to_string());
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn normalize_key_handles_various_formats() {
        assert_eq!(normalize_key("MAP_FILE_NAME"), "map-file-name");
        assert_eq!(normalize_key("map-file-name"), "map-file-name");
        assert_eq!(normalize_key("  Map_File_Name  "), "map-file-name");
    }

    #[test]
    fn defaults_use_standard_map_file_name() {
        let layer = default_config_layer();
        assert_eq!(map_file_name_from_layer(&layer).unwrap(), "redirectmap.txt");
    }

    #[test]
    fn yaml_layer_is_loaded() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "actor: site-admin\nmap_file_name: rewrites.map\n",
        )
        .unwrap();

        let layer = load_project_config(temp.path()).unwrap();
        assert_eq!(layer.get("actor"), Some("site-admin"));
        assert_eq!(map_file_name_from_layer(&layer).unwrap(), "rewrites.map");
    }

    #[test]
    fn missing_yaml_is_empty() {
        let temp = TempDir::new().unwrap();
        assert_eq!(
            load_project_config(temp.path()).unwrap(),
            ConfigLayer::default()
        );
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), "actor: [unclosed\n").unwrap();
        assert!(matches!(
            load_project_config(temp.path()),
            Err(RedirectMapError::Yaml(_))
        ));
    }

    #[test]
    fn env_layer_strips_prefix_and_skips_dir() {
        let layer = ConfigLayer::from_env_vars(vec![
            ("RMAP_ACTOR".to_string(), "env-actor".to_string()),
            ("RMAP_DIR".to_string(), "/tmp/x".to_string()),
            ("OTHER".to_string(), "ignored".to_string()),
        ]);
        assert_eq!(layer.get("actor"), Some("env-actor"));
        assert_eq!(layer.values.len(), 1);
    }

    #[test]
    fn cli_overrides_win() {
        let mut project = ConfigLayer::default();
        project.insert("actor", "project".to_string());
        let env_layer = ConfigLayer::from_env_vars(vec![(
            "RMAP_ACTOR".to_string(),
            "env".to_string(),
        )]);
        let cli = CliOverrides {
            actor: Some("cli".to_string()),
            ..Default::default()
        };

        let merged =
            ConfigLayer::merge_layers(&[default_config_layer(), project, env_layer]);
        assert_eq!(resolve_actor(&merged), "env");

        let merged = ConfigLayer::merge_layers(&[merged, cli.as_layer()]);
        assert_eq!(resolve_actor(&merged), "cli");
    }

    #[test]
    fn blank_actor_falls_back() {
        let mut layer = ConfigLayer::default();
        layer.insert("actor", "   ".to_string());
        assert!(!resolve_actor(&layer).trim().is_empty());
    }

    #[test]
    fn map_file_name_rejects_paths() {
        let mut layer = ConfigLayer::default();
        layer.insert("map-file-name", "../evil.txt".to_string());
        assert!(matches!(
            map_file_name_from_layer(&layer),
            Err(RedirectMapError::Config(_))
        ));
    }

    #[test]
    fn json_flag_parses() {
        let cli = CliOverrides {
            json: Some(true),
            ..Default::default()
        };
        assert!(json_from_layer(&cli.as_layer()));
        assert!(!json_from_layer(&ConfigLayer::default()));
    }

    #[test]
    fn discover_walks_up() {
        let temp = TempDir::new().unwrap();
        let store_dir = temp.path().join(STORE_DIR_NAME);
        fs::create_dir(&store_dir).unwrap();
        let nested = temp.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();

        let found = discover_store_dir_with_env(Some(&nested), None).unwrap();
        assert_eq!(found, store_dir);
    }

    #[test]
    fn discover_prefers_env_override() {
        let temp = TempDir::new().unwrap();
        let explicit = temp.path().join("maps");
        fs::create_dir(&explicit).unwrap();

        let found = discover_store_dir_with_env(Some(temp.path()), Some(&explicit)).unwrap();
        assert_eq!(found, explicit);
    }

    #[test]
    fn resolve_store_dir_rejects_missing_explicit_dir() {
        let temp = TempDir::new().unwrap();
        let cli = CliOverrides {
            dir: Some(temp.path().join("missing")),
            ..Default::default()
        };
        assert!(matches!(
            resolve_store_dir(&cli),
            Err(RedirectMapError::NotInitialized)
        ));
    }
}
