#![warn(missing_docs)]
//! Convert Claude Code skill and agent trees to the Codex layout.
//!
//! Skills are copied as-is (flattening grouping directories), agent headers
//! are rewritten so the comma-separated `tools` field becomes an
//! `allowed-tools` list, and documentation is copied alongside.

/// Agent header conversion.
mod agent;
/// Command-line interface wiring and dispatch.
mod cli;
/// Command implementations.
mod commands;
/// Configuration loading and resolution.
mod config;
/// Common diagnostics and warning aggregation.
mod diagnostics;
/// Unified diff rendering helpers.
mod diff;
/// Error handling for the crate.
mod error;
/// Frontmatter splitting and header parsing.
mod frontmatter;
/// Color palette and styling for CLI output.
mod palette;
/// Path expansion and normalization utilities.
mod paths;
/// Conversion plans and outcome counts.
mod plan;
/// Test fixtures for source and target trees.
#[cfg(test)]
mod testutil;
/// Source tree discovery.
mod walk;

pub use crate::{
    agent::{Transcoded, parse_tools, render, transcode},
    error::{Error, Result},
    frontmatter::{Header, parse_document, parse_header},
    plan::{Counts, Summary},
};

/// Run the CLI, returning a structured error on failure.
pub fn run() -> Result<()> {
    cli::run()
}
