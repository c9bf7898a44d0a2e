//! CLI module for the veristat harness
//!
//! ## Commands
//!
//! - `verify <fixtures>` - Run the analyzer once and check an expectation file
//! - `show <fixtures>` - Run the analyzer and print the parsed findings
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use crate::invocation::Language;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Exact-match verification harness for the sast static analyzer
#[derive(Parser, Debug)]
#[command(name = "veristat")]
#[command(version = VERSION)]
#[command(about = "Exact-match verification harness for the sast static analyzer", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the analyzer once and verify an expectation file against it
    Verify {
        /// Fixture source files to analyze
        #[arg(value_name = "FIXTURE", required = true)]
        targets: Vec<PathBuf>,
        /// Fixture language
        #[arg(short, long, value_enum)]
        lang: LangArg,
        /// Expectation file: a JSON array of {kind, file, units}
        #[arg(short, long, value_name = "SPEC")]
        expect: PathBuf,
        /// Analyzer executable (default: $VERISTAT_ANALYZER, then `sast`)
        #[arg(long, value_name = "PATH")]
        analyzer: Option<PathBuf>,
        /// Run syntactic linters only
        #[arg(long)]
        linters_only: bool,
        /// Keep the scratch workspace for debugging
        #[arg(long)]
        keep_workspace: bool,
        /// Verbose output (command line and full findings)
        #[arg(short, long)]
        verbose: bool,
    },

    /// Run the analyzer and print the parsed findings
    Show {
        /// Fixture source files to analyze
        #[arg(value_name = "FIXTURE", required = true)]
        targets: Vec<PathBuf>,
        /// Fixture language
        #[arg(short, long, value_enum)]
        lang: LangArg,
        /// Analyzer executable (default: $VERISTAT_ANALYZER, then `sast`)
        #[arg(long, value_name = "PATH")]
        analyzer: Option<PathBuf>,
        /// Run syntactic linters only
        #[arg(long)]
        linters_only: bool,
    },
}

/// Languages accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LangArg {
    C,
    Cpp,
    Objc,
    Objcpp,
    Java,
}

impl From<LangArg> for Language {
    fn from(lang: LangArg) -> Self {
        match lang {
            LangArg::C => Language::C,
            LangArg::Cpp => Language::Cpp,
            LangArg::Objc => Language::ObjC,
            LangArg::Objcpp => Language::ObjCpp,
            LangArg::Java => Language::Java,
        }
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Verify {
            targets,
            lang,
            expect,
            analyzer,
            linters_only,
            keep_workspace,
            verbose,
        } => commands::verify(
            targets,
            lang.into(),
            &expect,
            analyzer,
            linters_only,
            keep_workspace,
            verbose,
        ),
        Command::Show {
            targets,
            lang,
            analyzer,
            linters_only,
        } => commands::show(targets, lang.into(), analyzer, linters_only),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_verify() {
        let cli = Cli::try_parse_from([
            "veristat",
            "verify",
            "fixtures/npe.c",
            "--lang",
            "c",
            "--expect",
            "expected.json",
        ])
        .unwrap();
        if let Command::Verify {
            targets,
            lang,
            expect,
            ..
        } = cli.command
        {
            assert_eq!(targets, [PathBuf::from("fixtures/npe.c")]);
            assert_eq!(lang, LangArg::C);
            assert_eq!(expect, PathBuf::from("expected.json"));
        } else {
            panic!("Expected Verify command");
        }
    }

    #[test]
    fn test_cli_parse_verify_flags() {
        let cli = Cli::try_parse_from([
            "veristat",
            "verify",
            "vc.m",
            "--lang",
            "objc",
            "--expect",
            "expected.json",
            "--linters-only",
            "--keep-workspace",
            "-v",
        ])
        .unwrap();
        if let Command::Verify {
            linters_only,
            keep_workspace,
            verbose,
            ..
        } = cli.command
        {
            assert!(linters_only);
            assert!(keep_workspace);
            assert!(verbose);
        } else {
            panic!("Expected Verify command");
        }
    }

    #[test]
    fn test_cli_parse_show() {
        let cli = Cli::try_parse_from([
            "veristat",
            "show",
            "a.cpp",
            "b.cpp",
            "--lang",
            "cpp",
            "--analyzer",
            "/opt/sast/bin/sast",
        ])
        .unwrap();
        if let Command::Show {
            targets, analyzer, ..
        } = cli.command
        {
            assert_eq!(targets.len(), 2);
            assert_eq!(analyzer, Some(PathBuf::from("/opt/sast/bin/sast")));
        } else {
            panic!("Expected Show command");
        }
    }

    #[test]
    fn test_cli_requires_fixture() {
        assert!(
            Cli::try_parse_from(["veristat", "verify", "--lang", "c", "--expect", "e.json"])
                .is_err()
        );
    }

    #[test]
    fn test_lang_arg_maps_to_language() {
        assert_eq!(Language::from(LangArg::Objcpp), Language::ObjCpp);
        assert_eq!(Language::from(LangArg::Java), Language::Java);
    }
}
