//! Android toolchain discovery.
//!
//! Resolves an SDK root and the build-tools directory holding the DEX
//! compilers. All platform-specific probing lives here so the pipeline
//! only ever sees a resolved path.
//!
//! - [`sdk`] - SDK root candidates and wildcard probing
//! - [`build_tools`] - build-tools version selection

pub mod build_tools;
pub mod sdk;

pub use build_tools::find_build_tools;
pub use sdk::{Candidate, SdkLocator};

use std::path::PathBuf;

/// Resolves the root directory of an installed Android SDK.
pub trait ToolchainLocator {
    /// Return the first usable SDK root, or `None` if nothing was found.
    fn locate(&self) -> Option<PathBuf>;
}

/// Locator that always answers with a fixed path (or nothing).
///
/// Used when the SDK root is already known, e.g. in tests.
#[derive(Debug, Clone, Default)]
pub struct FixedLocator(pub Option<PathBuf>);

impl ToolchainLocator for FixedLocator {
    fn locate(&self) -> Option<PathBuf> {
        self.0.clone()
    }
}
