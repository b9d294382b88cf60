//! Plan command handler

use anyhow::{Context, Result};

use dexstrip::dex::{plan, Decision};
use dexstrip::Config;

use super::Output;

/// List every class in the JAR with its keep/drop decision.
#[cfg(not(tarpaulin_include))]
pub fn handle(config: &Config, out: Output) -> Result<()> {
    let removal = config.removal_set()?;
    let inputs = config.inputs();
    let report = plan(&inputs, &removal)
        .with_context(|| format!("Failed to inspect {}", inputs.archive.display()))?;

    for class in &report.classes {
        match class.decision {
            Decision::Drop => out.line(&format!("remove  {}", class.qualified_name)),
            Decision::Keep => out.detail(&format!("keep    {}", class.qualified_name)),
        }
    }

    let dropped = report.dropped().count();
    out.line("");
    out.line(&format!(
        "{} of {} classes would be removed ({} other entries kept)",
        dropped,
        report.classes.len(),
        report.resources
    ));
    for name in &report.missing {
        out.line(&format!("Not found in JAR: {}", name));
    }
    Ok(())
}
