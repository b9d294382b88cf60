//! dexstrip - remove classes from a DEX file via its companion JAR

mod commands;

use std::process::ExitCode;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use commands::Output;
use dexstrip::cli::{Cli, Commands, ConfigCommands};
use dexstrip::Config;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let out = Output::new(cli.quiet, cli.verbose);

    match cli.command.unwrap_or(Commands::Strip) {
        Commands::Strip => {
            let config = Config::load(cli.config.as_deref())?;
            commands::strip::handle(&config, out)
        }
        Commands::Plan => {
            let config = Config::load(cli.config.as_deref())?;
            commands::plan::handle(&config, out)
        }
        Commands::Config(ConfigCommands::Show) => {
            let config = Config::load(cli.config.as_deref())?;
            commands::config::handle_show(&config)
        }
        Commands::Config(ConfigCommands::Path) => {
            commands::config::handle_path(cli.config.as_deref())
        }
        Commands::Config(ConfigCommands::Edit) => {
            commands::config::handle_edit(cli.config.as_deref())
        }
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "dexstrip",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}

/// Log to stderr; `RUST_LOG` overrides the level picked from the flags.
fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("dexstrip={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
