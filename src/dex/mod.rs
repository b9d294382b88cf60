//! Class removal for DEX files.
//!
//! The pipeline rebuilds a DEX file from its companion JAR with selected
//! classes left out:
//!
//! - [`filter`] - removal set and per-entry keep/drop decisions
//! - [`archive`] - JAR extraction and deterministic repacking
//! - [`convert`] - d8/dx invocation through a [`CommandRunner`](crate::runner::CommandRunner)
//! - [`pipeline`] - orchestration, scratch workspace and the final swap

pub mod archive;
pub mod convert;
pub mod filter;
pub mod pipeline;

pub use convert::{Compiler, FormatConverter};
pub use filter::{ClassEntry, Decision, RemovalSet};
pub use pipeline::{plan, Inputs, Pipeline, PipelineEvent, PlanReport, Stage, StripReport};
