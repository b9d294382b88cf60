//! Pipeline orchestration: extract, filter, pack, convert, swap.
//!
//! The run is strictly linear. Any failing step aborts the rest and the
//! error is returned as-is. The scratch workspace is a [`TempDir`], so it
//! is removed on every way out of [`Pipeline::run`], unwinding included.
//! The target DEX file is only touched by the final rename.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::archive;
use super::convert::{select_compiler, Compiler, FormatConverter};
use super::filter::{ClassEntry, Decision, RemovalSet};
use crate::error::{Result, StripError};
use crate::runner::CommandRunner;
use crate::toolchain::{find_build_tools, ToolchainLocator};

/// Input artifacts of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inputs {
    /// DEX file that gets replaced.
    pub dex: PathBuf,
    /// Companion JAR the DEX file is rebuilt from.
    pub archive: PathBuf,
}

/// Steps of a run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    LocateToolchain,
    Extract,
    Filter,
    Pack,
    Convert,
    Swap,
    Done,
}

/// Progress notifications emitted while the pipeline runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    Stage(Stage),
    SdkFound(PathBuf),
    BuildToolsFound(PathBuf),
    WorkspaceCreated(PathBuf),
    Extracted { files: usize },
    Removing(String),
    Keeping(String),
    Packed { files: usize },
    Converting(Compiler),
    Replaced { target: PathBuf, size: u64 },
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripReport {
    /// Classes removed from the archive, sorted.
    pub removed: Vec<String>,
    /// Number of class entries kept.
    pub kept: usize,
    /// Non-class entries carried over unchanged.
    pub resources: usize,
    /// Configured names that were not present in the archive.
    pub missing: Vec<String>,
    pub compiler: Compiler,
    pub target: PathBuf,
    /// Size of the replaced DEX file in bytes.
    pub size: u64,
}

/// Classification of an archive without modifying anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanReport {
    /// Every class entry with its decision, sorted by name.
    pub classes: Vec<ClassEntry>,
    pub resources: usize,
    pub missing: Vec<String>,
}

impl PlanReport {
    pub fn dropped(&self) -> impl Iterator<Item = &ClassEntry> {
        self.classes.iter().filter(|c| c.decision == Decision::Drop)
    }
}

/// Removes classes from a DEX file by rebuilding it from its JAR.
pub struct Pipeline<'a> {
    inputs: Inputs,
    removal: RemovalSet,
    locator: &'a dyn ToolchainLocator,
    runner: &'a dyn CommandRunner,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        inputs: Inputs,
        removal: RemovalSet,
        locator: &'a dyn ToolchainLocator,
        runner: &'a dyn CommandRunner,
    ) -> Self {
        Self {
            inputs,
            removal,
            locator,
            runner,
        }
    }

    /// Run every step and replace the DEX file on success.
    pub fn run(&self, observer: &mut dyn FnMut(&PipelineEvent)) -> Result<StripReport> {
        let mut stage = Stage::Init;
        let result = self.run_stages(&mut stage, observer);
        if let Err(e) = &result {
            tracing::debug!(?stage, error = %e, "pipeline aborted");
        }
        result
    }

    fn run_stages(
        &self,
        stage: &mut Stage,
        observer: &mut dyn FnMut(&PipelineEvent),
    ) -> Result<StripReport> {
        enter(stage, Stage::Init, observer);
        require_file(&self.inputs.dex, "DEX file")?;
        require_file(&self.inputs.archive, "JAR file")?;
        let workspace = create_workspace()?;
        observer(&PipelineEvent::WorkspaceCreated(workspace.path().to_path_buf()));

        enter(stage, Stage::LocateToolchain, observer);
        let sdk = self.locator.locate().ok_or(StripError::SdkNotFound)?;
        observer(&PipelineEvent::SdkFound(sdk.clone()));
        let build_tools = find_build_tools(&sdk)?;
        observer(&PipelineEvent::BuildToolsFound(build_tools.clone()));

        enter(stage, Stage::Extract, observer);
        let tree = workspace.path().join("extracted");
        let files = archive::extract(&self.inputs.archive, &tree)?;
        observer(&PipelineEvent::Extracted { files: files.len() });

        enter(stage, Stage::Filter, observer);
        let split = classify(&files, &self.removal);
        for entry in &split.classes {
            match entry.decision {
                Decision::Drop => {
                    observer(&PipelineEvent::Removing(entry.qualified_name.clone()));
                    fs::remove_file(tree.join(&entry.path))?;
                }
                Decision::Keep => {
                    observer(&PipelineEvent::Keeping(entry.qualified_name.clone()));
                }
            }
        }
        let missing = missing_names(&split.classes, &self.removal);
        for name in &missing {
            tracing::warn!(class = %name, "class listed for removal is not in the archive");
        }

        enter(stage, Stage::Pack, observer);
        let rebuilt = workspace.path().join("modified.jar");
        let packed = archive::pack(&tree, &rebuilt)?;
        observer(&PipelineEvent::Packed { files: packed });

        enter(stage, Stage::Convert, observer);
        let (compiler, tool) = select_compiler(&build_tools)?;
        let staged = StagedOutput::for_target(&self.inputs.dex);
        staged.clear().map_err(|e| StripError::Conversion {
            tool: compiler.name(),
            message: format!(
                "cannot remove stale output {}: {}",
                staged.path().display(),
                e
            ),
        })?;
        observer(&PipelineEvent::Converting(compiler));
        let converter = FormatConverter::new(self.runner, workspace.path().join("d8-out"));
        converter.convert(&rebuilt, staged.path(), compiler, &tool)?;

        enter(stage, Stage::Swap, observer);
        let size = swap(staged.path(), &self.inputs.dex)?;
        observer(&PipelineEvent::Replaced {
            target: self.inputs.dex.clone(),
            size,
        });

        enter(stage, Stage::Done, observer);
        let removed = split
            .classes
            .iter()
            .filter(|c| c.decision == Decision::Drop)
            .map(|c| c.qualified_name.clone())
            .collect();
        let kept = split
            .classes
            .iter()
            .filter(|c| c.decision == Decision::Keep)
            .count();

        Ok(StripReport {
            removed,
            kept,
            resources: split.resources,
            missing,
            compiler,
            target: self.inputs.dex.clone(),
            size,
        })
    }
}

/// Extract and classify the archive without touching anything else.
///
/// Needs neither the DEX file nor the toolchain.
pub fn plan(inputs: &Inputs, removal: &RemovalSet) -> Result<PlanReport> {
    require_file(&inputs.archive, "JAR file")?;
    let workspace = create_workspace()?;
    let files = archive::extract(&inputs.archive, workspace.path())?;
    let split = classify(&files, removal);
    let missing = missing_names(&split.classes, removal);
    Ok(PlanReport {
        classes: split.classes,
        resources: split.resources,
        missing,
    })
}

fn enter(stage: &mut Stage, next: Stage, observer: &mut dyn FnMut(&PipelineEvent)) {
    *stage = next;
    observer(&PipelineEvent::Stage(next));
}

struct Classified {
    classes: Vec<ClassEntry>,
    resources: usize,
}

fn classify(files: &[PathBuf], removal: &RemovalSet) -> Classified {
    let mut classes = Vec::new();
    let mut resources = 0;
    for path in files {
        match ClassEntry::classify(path, removal) {
            Some(entry) => classes.push(entry),
            None => resources += 1,
        }
    }
    classes.sort_by(|a, b| a.qualified_name.cmp(&b.qualified_name));
    Classified { classes, resources }
}

fn missing_names(classes: &[ClassEntry], removal: &RemovalSet) -> Vec<String> {
    removal
        .iter()
        .filter(|name| !classes.iter().any(|c| c.qualified_name == *name))
        .map(str::to_string)
        .collect()
}

fn require_file(path: &Path, what: &'static str) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(StripError::MissingInput {
            what,
            path: path.to_path_buf(),
        })
    }
}

fn create_workspace() -> Result<TempDir> {
    let dir = tempfile::Builder::new().prefix("dexstrip-").tempdir()?;
    tracing::debug!(workspace = %dir.path().display(), "created workspace");
    Ok(dir)
}

/// Replace `target` with `staged` by rename.
fn swap(staged: &Path, target: &Path) -> Result<u64> {
    let fail = |message: String| StripError::Swap {
        target: target.to_path_buf(),
        message,
    };
    if !staged.is_file() {
        return Err(fail(format!("{} was not created", staged.display())));
    }
    fs::rename(staged, target).map_err(|e| fail(e.to_string()))?;
    let size = fs::metadata(target).map_err(|e| fail(e.to_string()))?.len();
    Ok(size)
}

/// Converter output placed next to the target so the swap is a rename on
/// one filesystem. Removed on drop if it is still there.
struct StagedOutput(PathBuf);

impl StagedOutput {
    /// `dir/launcher.dex` stages at `dir/launcher_modified.dex`.
    fn for_target(target: &Path) -> Self {
        let stem = target
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let name = match target.extension() {
            Some(ext) => format!("{}_modified.{}", stem, ext.to_string_lossy()),
            None => format!("{}_modified", stem),
        };
        Self(target.with_file_name(name))
    }

    fn path(&self) -> &Path {
        &self.0
    }

    /// Remove a leftover from an earlier interrupted run.
    fn clear(&self) -> io::Result<()> {
        match fs::symlink_metadata(&self.0) {
            Ok(_) => {
                tracing::debug!(path = %self.0.display(), "removing stale staged output");
                fs::remove_file(&self.0)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

impl Drop for StagedOutput {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.0);
    }
}
