//! Command line definitions.
//!
//! Kept in the library so `xtask` can render the man page from the same
//! definitions the binary parses.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[cfg(not(feature = "release"))]
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_SHA"),
    ", built ",
    env!("DEXSTRIP_BUILD_DATE"),
    ")"
);

#[cfg(feature = "release")]
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (built ",
    env!("DEXSTRIP_BUILD_DATE"),
    ")"
);

/// Remove classes from a DEX file by rebuilding it from its companion JAR.
#[derive(Parser, Debug)]
#[command(
    name = "dexstrip",
    version,
    long_version = LONG_VERSION,
    about = "Remove selected classes from a DEX file",
    long_about = "Remove selected classes from a DEX file.\n\n\
        Unpacks the companion JAR, deletes the configured classes, repacks it \
        and runs d8 (or dx) from the Android SDK to rebuild the DEX file, which \
        then replaces the original. Without a subcommand, `strip` is run."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Use this config file instead of the default location.
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Show more detail (kept classes, debug logs with -vv).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Remove the configured classes and replace the DEX file
    Strip,

    /// Show which classes would be removed, without changing anything
    Plan,

    /// Inspect the configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,

    /// Print the config file location in effect
    Path,

    /// Open the config file in $EDITOR, creating it if needed
    Edit,
}
