//! Subcommand handlers

pub mod config;
pub mod plan;
pub mod strip;

/// Where progress lines go and how much of it is shown.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    quiet: bool,
    verbose: bool,
}

impl Output {
    pub fn new(quiet: bool, verbose: u8) -> Self {
        Self {
            quiet,
            verbose: verbose > 0,
        }
    }

    /// Normal progress line.
    pub fn line(&self, text: &str) {
        if !self.quiet {
            println!("{}", text);
        }
    }

    /// Only shown with --verbose.
    pub fn detail(&self, text: &str) {
        if self.verbose {
            println!("{}", text);
        }
    }
}
