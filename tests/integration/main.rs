//! Integration tests for dexstrip

mod cli_test;
mod helpers;
