//! SDK root discovery from configuration, environment and default paths.

use std::path::{Component, Path, PathBuf};

use super::ToolchainLocator;

/// Environment variables consulted, in order.
pub const SDK_ENV_VARS: &[&str] = &["ANDROID_HOME", "ANDROID_SDK_ROOT"];

/// Default install locations relative to the home directory.
const HOME_RELATIVE_DEFAULTS: &[&str] = &[
    "AppData/Local/Android/Sdk", // Windows
    "Android/Sdk",               // Linux
    "Library/Android/sdk",       // macOS
];

/// Git Bash style path on Windows, with the user name unknown.
const WILDCARD_DEFAULT: &str = "/c/Users/*/AppData/Local/Android/Sdk";

/// A place where an SDK might be installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// A concrete directory.
    Path(PathBuf),
    /// A path with exactly one `*` inside a single component.
    Pattern(String),
}

impl Candidate {
    /// Resolve to an existing directory, if any.
    pub fn resolve(&self) -> Option<PathBuf> {
        match self {
            Candidate::Path(path) => path.is_dir().then(|| path.clone()),
            Candidate::Pattern(pattern) => expand_wildcard(pattern)
                .into_iter()
                .find(|path| path.is_dir()),
        }
    }
}

/// Probes SDK candidates in priority order.
#[derive(Debug, Clone, Default)]
pub struct SdkLocator {
    candidates: Vec<Candidate>,
}

impl SdkLocator {
    /// Create a locator over an explicit candidate list.
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    /// Build the standard search order.
    ///
    /// `configured` (from the config file) wins over the environment, which
    /// wins over the default install locations.
    pub fn from_environment(configured: Option<&Path>) -> Self {
        let mut candidates = Vec::new();

        if let Some(path) = configured {
            candidates.push(Candidate::Path(path.to_path_buf()));
        }

        for var in SDK_ENV_VARS {
            if let Some(value) = std::env::var_os(var).filter(|v| !v.is_empty()) {
                candidates.push(Candidate::Path(PathBuf::from(value)));
            }
        }

        if let Some(home) = dirs::home_dir() {
            for rel in HOME_RELATIVE_DEFAULTS {
                candidates.push(Candidate::Path(home.join(rel)));
            }
        }
        candidates.push(Candidate::Pattern(WILDCARD_DEFAULT.to_string()));

        Self { candidates }
    }

    /// The candidates in probe order.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }
}

impl ToolchainLocator for SdkLocator {
    fn locate(&self) -> Option<PathBuf> {
        for candidate in &self.candidates {
            if let Some(found) = candidate.resolve() {
                tracing::debug!(sdk = %found.display(), "found Android SDK");
                return Some(found);
            }
            tracing::trace!(?candidate, "no SDK here");
        }
        None
    }
}

/// Expand a path containing one `*` wildcard component.
///
/// Returns matches in sorted order. Patterns without a wildcard yield the
/// path itself; patterns with more than one wildcard component yield
/// nothing.
pub fn expand_wildcard(pattern: &str) -> Vec<PathBuf> {
    let path = Path::new(pattern);
    let components: Vec<Component> = path.components().collect();

    let wild: Vec<usize> = components
        .iter()
        .enumerate()
        .filter(|(_, c)| c.as_os_str().to_string_lossy().contains('*'))
        .map(|(i, _)| i)
        .collect();

    let idx = match wild.as_slice() {
        [] => return vec![path.to_path_buf()],
        [idx] => *idx,
        _ => return Vec::new(),
    };

    let base: PathBuf = components[..idx].iter().collect();
    let rest: PathBuf = components[idx + 1..].iter().collect();
    let segment = components[idx].as_os_str().to_string_lossy().to_string();

    let Ok(entries) = std::fs::read_dir(&base) else {
        return Vec::new();
    };

    let mut matches: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| segment_matches(&segment, &entry.file_name().to_string_lossy()))
        .map(|entry| {
            let matched = base.join(entry.file_name());
            if rest.as_os_str().is_empty() {
                matched
            } else {
                matched.join(&rest)
            }
        })
        .collect();
    matches.sort();
    matches
}

/// Match a single path segment against a pattern with one `*`.
fn segment_matches(pattern: &str, name: &str) -> bool {
    match pattern.split_once('*') {
        Some((prefix, suffix)) => {
            !suffix.contains('*')
                && name.len() >= prefix.len() + suffix.len()
                && name.starts_with(prefix)
                && name.ends_with(suffix)
        }
        None => pattern == name,
    }
}
