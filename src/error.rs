//! Error taxonomy for the strip pipeline.

use std::path::PathBuf;

/// Errors that abort a strip run.
///
/// Every variant maps to exit code 1 at the binary level. The original
/// DEX file is only modified after the last of these checkpoints.
#[derive(Debug, thiserror::Error)]
pub enum StripError {
    #[error("{what} not found: {path}. Please build the project first.")]
    MissingInput { what: &'static str, path: PathBuf },

    #[error("Android SDK not found. Please set the ANDROID_HOME environment variable.")]
    SdkNotFound,

    #[error("Android build-tools not found under {sdk}")]
    BuildToolsNotFound { sdk: PathBuf },

    #[error("Failed to extract {archive}: {message}")]
    Extraction { archive: PathBuf, message: String },

    #[error("Failed to create archive {archive}: {message}")]
    Pack { archive: PathBuf, message: String },

    #[error("Neither d8 nor dx found in {build_tools}")]
    ToolNotFound { build_tools: PathBuf },

    #[error("Conversion with {tool} failed: {message}")]
    Conversion { tool: &'static str, message: String },

    #[error("Cannot replace {target}: {message}")]
    Swap { target: PathBuf, message: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Workspace error: {0}")]
    Workspace(#[from] std::io::Error),
}

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, StripError>;
