//! CLI argument parsing for chlog.
//!
//! Uses clap derive macros for declarative argument definitions. This
//! module defines the command structure; actual implementations are in
//! the `commands` module.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// chlog: review gate for hand-written per-directory ChangeLog files.
///
/// Parses `git format-patch` output, cross-references the ChangeLog
/// entries in the commit message against the files the diff actually
/// touches, and reports formatting violations with stable messages.
#[derive(Parser, Debug)]
#[command(name = "chlog")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for chlog.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate ChangeLog entries in one or more patch files.
    ///
    /// Exits 0 when every patch is clean and 2 when any violation was
    /// found; the violations themselves go to stdout.
    Check(CheckArgs),

    /// Print the ChangeLog text a patch would generate, per directory.
    ///
    /// Refuses patches that do not pass `check` first.
    Print(PrintArgs),
}

/// Arguments for the `check` command.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Patch files produced by `git format-patch`.
    #[arg(required = true)]
    pub patches: Vec<PathBuf>,

    /// Enforce the commit-hygiene rules used on release branches
    /// (ChangeLog/DATESTAMP updates must not mix with normal changes).
    #[arg(long)]
    pub strict: bool,

    /// Report format.
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Output format for `check` reports.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Arguments for the `print` command.
#[derive(Parser, Debug)]
pub struct PrintArgs {
    /// Patch file produced by `git format-patch`.
    pub patch: PathBuf,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn check_accepts_multiple_patches_and_flags() {
        let cli = Cli::try_parse_from([
            "chlog", "check", "--strict", "--format", "json", "a.patch", "b.patch",
        ])
        .unwrap();
        match cli.command {
            Command::Check(args) => {
                assert!(args.strict);
                assert_eq!(args.format, OutputFormat::Json);
                assert_eq!(args.patches.len(), 2);
            }
            _ => panic!("expected check command"),
        }
    }

    #[test]
    fn check_requires_a_patch() {
        assert!(Cli::try_parse_from(["chlog", "check"]).is_err());
    }
}
