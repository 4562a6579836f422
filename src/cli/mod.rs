//! CLI definitions and entry point.

use crate::config::{self, CliOverrides, ConfigLayer};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// Merge uploaded redirect maps into persisted ones
#[derive(Parser, Debug)]
#[command(name = "rmap", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Store directory (auto-discover .redirect-maps/ if not set)
    #[arg(long, global = true, env = "RMAP_DIR")]
    pub dir: Option<PathBuf>,

    /// Actor recorded as the last modifier
    #[arg(long, global = true)]
    pub actor: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Config overrides from global flags. An absent `--json` leaves the
    /// key unset so `RMAP_JSON` or `config.yaml` still apply.
    #[must_use]
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            dir: self.dir.clone(),
            actor: self.actor.clone(),
            json: self.json.then_some(true),
        }
    }

    /// JSON mode for paths that run without a store (`check`, error output).
    #[must_use]
    pub fn json_mode(&self, env: &ConfigLayer) -> bool {
        self.json || config::json_from_layer(env)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a redirect map store
    Init {
        /// Overwrite an existing config.yaml
        #[arg(long)]
        force: bool,
    },

    /// Merge an uploaded map file into the stored map for a target
    Upload(UploadArgs),

    /// Parse a map file and report malformed lines without storing anything
    Check(CheckArgs),

    /// Print the stored map for a target
    Show {
        /// Target identifier (e.g. "site/en")
        target: String,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct UploadArgs {
    /// Target identifier (e.g. "site/en")
    pub target: String,

    /// Map file to upload
    pub file: PathBuf,

    /// Accept a file whose name differs from the configured map file name
    #[arg(long)]
    pub any_name: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct CheckArgs {
    /// Map file to check
    pub file: PathBuf,
}
