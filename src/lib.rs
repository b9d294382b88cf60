//! dexstrip - remove classes from a DEX file by rebuilding it from its JAR.
//!
//! The library holds the whole pipeline; the binary only parses flags,
//! loads the config and prints progress.
//!
//! # Usage
//!
//! ```no_run
//! use dexstrip::dex::{Inputs, Pipeline, RemovalSet};
//! use dexstrip::runner::SystemRunner;
//! use dexstrip::toolchain::SdkLocator;
//!
//! let inputs = Inputs {
//!     dex: "build/libs/app.dex".into(),
//!     archive: "build/libs/app.jar".into(),
//! };
//! let removal = RemovalSet::new(["com/example/Debug"]).unwrap();
//! let locator = SdkLocator::from_environment(None);
//! let runner = SystemRunner::new();
//!
//! let report = Pipeline::new(inputs, removal, &locator, &runner)
//!     .run(&mut |event: &dexstrip::dex::PipelineEvent| println!("{:?}", event))
//!     .unwrap();
//! println!("removed {} classes", report.removed.len());
//! ```

pub mod cli;
pub mod config;
pub mod dex;
pub mod error;
pub mod runner;
pub mod toolchain;

pub use config::Config;
pub use dex::{Pipeline, RemovalSet, StripReport};
pub use error::{Result, StripError};
