use clap::Parser;
use redirect_maps::cli::commands;
use redirect_maps::cli::{Cli, Commands};
use redirect_maps::config::ConfigLayer;
use redirect_maps::logging::init_logging;
use redirect_maps::{RedirectMapError, StructuredError};
use std::io::{self, IsTerminal};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.quiet, cli.log_file.as_deref()) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let overrides = cli.overrides();
    let json_mode = cli.json_mode(&ConfigLayer::from_env());

    let result = match &cli.command {
        Commands::Init { force } => {
            commands::init::execute(*force, cli.dir.as_deref(), cli.quiet).map(|_| ())
        }
        Commands::Upload(args) => commands::upload::execute(args, &overrides, cli.quiet),
        Commands::Check(args) => commands::check::execute(args, json_mode),
        Commands::Show { target } => commands::show::execute(target, &overrides),
    };

    if let Err(e) = result {
        handle_error(&e, json_mode);
    }
}

/// Handle errors with structured output support.
///
/// When --json is set, outputs structured JSON to stderr. Otherwise,
/// outputs a human-readable error with color if stderr is a terminal.
fn handle_error(err: &RedirectMapError, json_mode: bool) -> ! {
    let structured = StructuredError::from_error(err);
    let exit_code = structured.code.exit_code();

    if json_mode {
        let json = structured.to_json();
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string())
        );
    } else {
        let use_color = io::stderr().is_terminal();
        eprintln!("{}", structured.to_human(use_color));
    }

    std::process::exit(exit_code);
}
