//! Class filter: decides which archive entries survive.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::{Result, StripError};

/// Suffix identifying compiled class entries.
pub const CLASS_SUFFIX: &str = ".class";

/// Outcome of classifying one archive entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Keep,
    Drop,
}

/// Fully-qualified class names to remove, e.g. `com/example/Foo`.
///
/// Membership is exact string equality; there are no patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalSet {
    names: BTreeSet<String>,
}

impl RemovalSet {
    /// Build a removal set, rejecting blank names.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = BTreeSet::new();
        for name in names {
            let name = name.into();
            if name.trim().is_empty() {
                return Err(StripError::Config(
                    "class names to remove must not be blank".to_string(),
                ));
            }
            set.insert(name);
        }
        Ok(Self { names: set })
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.names.contains(qualified_name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

/// One class file found in the extracted tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassEntry {
    /// Path relative to the extraction root.
    pub path: PathBuf,
    /// Slash-separated name without the `.class` suffix.
    pub qualified_name: String,
    pub decision: Decision,
}

impl ClassEntry {
    /// Classify `entry_path`, or `None` if it is not a class file.
    pub fn classify(entry_path: &Path, removal: &RemovalSet) -> Option<Self> {
        let qualified_name = qualified_name(entry_path)?;
        let decision = if removal.contains(&qualified_name) {
            Decision::Drop
        } else {
            Decision::Keep
        };
        Some(Self {
            path: entry_path.to_path_buf(),
            qualified_name,
            decision,
        })
    }
}

/// Derive the qualified class name for an entry path.
///
/// Returns `None` for entries that are not class files.
pub fn qualified_name(entry_path: &Path) -> Option<String> {
    let normalized = entry_path.to_string_lossy().replace('\\', "/");
    normalized
        .strip_suffix(CLASS_SUFFIX)
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
}

/// Classify one relative entry path against the removal set.
pub fn decide(entry_path: &Path, removal: &RemovalSet) -> Decision {
    ClassEntry::classify(entry_path, removal)
        .map(|entry| entry.decision)
        .unwrap_or(Decision::Keep)
}
