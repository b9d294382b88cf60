//! JAR to DEX conversion through the SDK compilers.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, StripError};
use crate::runner::{tool_exists, CommandRunner, Invocation};

/// File name d8 always writes into its output directory.
pub const D8_OUTPUT_NAME: &str = "classes.dex";

/// Which DEX compiler performed the conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compiler {
    /// The current compiler, preferred when present.
    D8,
    /// The legacy compiler.
    Dx,
}

impl Compiler {
    /// Tool name for display/logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::D8 => "d8",
            Self::Dx => "dx",
        }
    }

    /// File name of the launcher inside build-tools.
    pub fn file_name(&self) -> String {
        if cfg!(windows) {
            format!("{}.bat", self.name())
        } else {
            self.name().to_string()
        }
    }
}

/// Pick d8 if present in `build_tools`, else dx.
pub fn select_compiler(build_tools: &Path) -> Result<(Compiler, PathBuf)> {
    [Compiler::D8, Compiler::Dx]
        .into_iter()
        .map(|compiler| (compiler, build_tools.join(compiler.file_name())))
        .find(|(_, path)| tool_exists(path))
        .ok_or_else(|| StripError::ToolNotFound {
            build_tools: build_tools.to_path_buf(),
        })
}

/// Runs the selected compiler and leaves its result at the requested path.
pub struct FormatConverter<'a> {
    runner: &'a dyn CommandRunner,
    scratch: PathBuf,
}

impl<'a> FormatConverter<'a> {
    /// `scratch` is a private directory where d8 may write its output.
    pub fn new(runner: &'a dyn CommandRunner, scratch: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            scratch: scratch.into(),
        }
    }

    /// Convert `archive` into a DEX file at `output` with `compiler`,
    /// found at `tool` (see [`select_compiler`]).
    ///
    /// Both paths are made absolute before invoking the tool. Success
    /// requires a zero exit status and a non-empty file at `output`.
    pub fn convert(
        &self,
        archive: &Path,
        output: &Path,
        compiler: Compiler,
        tool: &Path,
    ) -> Result<()> {
        let fail = |message: String| StripError::Conversion {
            tool: compiler.name(),
            message,
        };

        let archive = absolutize(archive).map_err(|e| fail(e.to_string()))?;
        let output = absolutize(output).map_err(|e| fail(e.to_string()))?;
        let scratch = absolutize(&self.scratch).map_err(|e| fail(e.to_string()))?;

        let invocation = match compiler {
            Compiler::D8 => {
                fs::create_dir_all(&scratch).map_err(|e| fail(e.to_string()))?;
                Invocation::new(tool)
                    .arg("--output")
                    .arg(scratch.as_os_str())
                    .arg(archive.as_os_str())
            }
            Compiler::Dx => {
                let mut out_flag = std::ffi::OsString::from("--output=");
                out_flag.push(output.as_os_str());
                Invocation::new(tool)
                    .arg("--dex")
                    .arg(out_flag)
                    .arg(archive.as_os_str())
            }
        };

        tracing::info!(tool = compiler.name(), command = %invocation.display(), "converting");
        let result = self
            .runner
            .run(&invocation)
            .map_err(|e| fail(format!("could not start {}: {}", tool.display(), e)))?;
        if !result.success() {
            return Err(fail(result.failure_message()));
        }

        if compiler == Compiler::D8 {
            let produced = scratch.join(D8_OUTPUT_NAME);
            if !produced.is_file() {
                return Err(fail(format!(
                    "expected {} was not produced",
                    produced.display()
                )));
            }
            move_file(&produced, &output).map_err(|e| fail(e.to_string()))?;
        }

        match fs::metadata(&output) {
            Ok(meta) if meta.is_file() && meta.len() > 0 => Ok(()),
            Ok(_) => Err(fail(format!("{} is empty", output.display()))),
            Err(_) => Err(fail(format!("{} was not produced", output.display()))),
        }
    }
}

/// Rename, or copy and delete when crossing filesystems.
fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    fs::copy(from, to)?;
    fs::remove_file(from)
}

fn absolutize(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
