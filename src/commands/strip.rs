//! Strip command handler

use anyhow::{Context, Result};
use humansize::{format_size, DECIMAL};

use dexstrip::dex::{Pipeline, PipelineEvent, Stage, StripReport};
use dexstrip::runner::SystemRunner;
use dexstrip::toolchain::SdkLocator;
use dexstrip::Config;

use super::Output;

/// Run the full pipeline and replace the DEX file.
#[cfg(not(tarpaulin_include))]
pub fn handle(config: &Config, out: Output) -> Result<()> {
    let removal = config.removal_set()?;
    let inputs = config.inputs();
    let locator = SdkLocator::from_environment(config.toolchain.sdk_root.as_deref());
    let runner = SystemRunner::new();

    out.line(&format!(
        "DEX Modifier - Removing specified classes from {}",
        inputs.dex.display()
    ));
    out.line(&"=".repeat(60));

    let pipeline = Pipeline::new(inputs, removal, &locator, &runner);
    let report = pipeline
        .run(&mut |event: &PipelineEvent| print_event(event, out))
        .context("Failed to modify DEX file")?;

    print_summary(&report, out);
    Ok(())
}

/// Print one progress line for a pipeline event.
fn print_event(event: &PipelineEvent, out: Output) {
    match event {
        PipelineEvent::Stage(Stage::Extract) => out.line("Extracting classes from JAR..."),
        PipelineEvent::Stage(Stage::Pack) => out.line("Creating modified JAR..."),
        PipelineEvent::Stage(Stage::Convert) => out.line("Converting JAR to DEX..."),
        PipelineEvent::Stage(_) => {}
        PipelineEvent::SdkFound(path) => {
            out.line(&format!("Using Android SDK: {}", path.display()))
        }
        PipelineEvent::BuildToolsFound(path) => {
            out.line(&format!("Using build-tools: {}", path.display()))
        }
        PipelineEvent::WorkspaceCreated(path) => {
            out.line(&format!("Working in temporary directory: {}", path.display()))
        }
        PipelineEvent::Extracted { files } => out.detail(&format!("Extracted {} files", files)),
        PipelineEvent::Removing(name) => out.line(&format!("Removing class: {}", name)),
        PipelineEvent::Keeping(name) => out.detail(&format!("Keeping class: {}", name)),
        PipelineEvent::Packed { files } => out.detail(&format!("Packed {} files", files)),
        PipelineEvent::Converting(compiler) => {
            out.line(&format!("Using {} tool...", compiler.name()))
        }
        PipelineEvent::Replaced { .. } => {}
    }
}

fn print_summary(report: &StripReport, out: Output) {
    out.line("");
    out.line(&format!("✅ Successfully modified {}", report.target.display()));
    out.line("Removed classes:");
    for name in &report.removed {
        out.line(&format!("  - {}", name));
    }
    if !report.missing.is_empty() {
        out.line("Not found in JAR:");
        for name in &report.missing {
            out.line(&format!("  - {}", name));
        }
    }
    out.line("");
    out.line(&format!(
        "Modified DEX file size: {} ({} bytes)",
        format_size(report.size, DECIMAL),
        report.size
    ));
}
