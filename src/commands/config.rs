//! Config subcommands handler

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use dexstrip::Config;

/// Show the effective configuration as TOML.
#[cfg(not(tarpaulin_include))]
pub fn handle_show(config: &Config) -> Result<()> {
    let toml_str = config.to_toml()?;
    print!("{}", toml_str);
    Ok(())
}

/// Print which config file is in effect.
#[cfg(not(tarpaulin_include))]
pub fn handle_path(flag: Option<&Path>) -> Result<()> {
    let config_path = Config::resolve_path(flag)?;
    println!("{}", config_path.display());
    Ok(())
}

/// Open configuration file in the default editor.
///
/// Opens the same file `show` reads. Uses $EDITOR environment variable
/// (defaults to 'vi').
#[cfg(not(tarpaulin_include))]
pub fn handle_edit(flag: Option<&Path>) -> Result<()> {
    let config_path = Config::resolve_path(flag)?;

    // Ensure config exists
    if !config_path.exists() {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&config_path, Config::default().to_toml()?)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
    }

    // Get editor from environment
    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
    println!("Opening {} with {}", config_path.display(), editor);

    let status = std::process::Command::new(&editor)
        .arg(&config_path)
        .status()
        .map_err(|e| anyhow::anyhow!("Failed to open editor: {}", e))?;
    if !status.success() {
        anyhow::bail!("Editor {} exited with {}", editor, status);
    }

    Ok(())
}
