//! Configuration file handling.
//!
//! The config is a small TOML file. Every section has defaults, so an
//! empty or missing file yields the stock setup used to strip the
//! launcher DEX.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dex::{Inputs, RemovalSet};
use crate::error::{Result, StripError};

/// Environment variable naming a config file to use instead of the default.
pub const CONFIG_ENV_VAR: &str = "DEXSTRIP_CONFIG";

/// Classes removed when the config does not say otherwise.
pub const DEFAULT_CLASSES: &[&str] = &[
    "com/mojang/minecraftpe/MainActivity",
    "com/mojang/minecraftpe/FilePickerManagerHandler",
    "com/mojang/minecraftpe/store/ExtraLicenseResponseData",
    "com/mojang/minecraftpe/store/Product",
    "com/mojang/minecraftpe/store/Purchase",
    "com/mojang/minecraftpe/store/Store",
    "com/mojang/minecraftpe/store/StoreListener",
];

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub inputs: InputsConfig,
    pub toolchain: ToolchainConfig,
    pub remove: RemoveConfig,
}

/// Paths of the artifacts, relative to the working directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputsConfig {
    pub dex: PathBuf,
    pub archive: PathBuf,
}

impl Default for InputsConfig {
    fn default() -> Self {
        Self {
            dex: PathBuf::from("build/libs/launcher.dex"),
            archive: PathBuf::from("build/libs/LeviLauncherDex-1.0.jar"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Android SDK root, checked before the environment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sdk_root: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoveConfig {
    /// Slash-separated class names, without `.class`.
    pub classes: Vec<String>,
}

impl Default for RemoveConfig {
    fn default() -> Self {
        Self {
            classes: DEFAULT_CLASSES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Config {
    /// Default config file location.
    pub fn config_path() -> Result<PathBuf> {
        let base = dirs::config_dir().ok_or_else(|| {
            StripError::Config("could not determine the user config directory".to_string())
        })?;
        Ok(base.join("dexstrip").join("config.toml"))
    }

    /// The file a run reads: `flag`, then `$DEXSTRIP_CONFIG`, then the
    /// default location.
    pub fn resolve_path(flag: Option<&Path>) -> Result<PathBuf> {
        match Self::explicit_path(flag) {
            Some(path) => Ok(path),
            None => Self::config_path(),
        }
    }

    fn explicit_path(flag: Option<&Path>) -> Option<PathBuf> {
        flag.map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from))
    }

    /// Load configuration.
    ///
    /// An explicit path (flag, then environment) must exist. The default
    /// location is optional and falls back to built-in defaults.
    pub fn load(flag: Option<&Path>) -> Result<Self> {
        if let Some(path) = Self::explicit_path(flag) {
            return Self::load_from(&path);
        }

        match Self::config_path() {
            Ok(path) if path.exists() => Self::load_from(&path),
            _ => {
                tracing::debug!("no config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Read and parse a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            StripError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::parse(&content)
            .map_err(|e| StripError::Config(format!("{}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse TOML content.
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| StripError::Config(e.to_string()))
    }

    pub fn inputs(&self) -> Inputs {
        Inputs {
            dex: self.inputs.dex.clone(),
            archive: self.inputs.archive.clone(),
        }
    }

    /// Build the immutable removal set for a run.
    pub fn removal_set(&self) -> Result<RemovalSet> {
        RemovalSet::new(self.remove.classes.iter().cloned())
    }
}
