//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::case::FixtureCase;
use crate::error::HarnessError;
use crate::invocation::{AnalysisMode, Language};
use crate::matcher::ExpectedSpec;
use crate::workspace::Workspace;

use super::{CliError, CliResult, ExitCode};

/// Environment variable naming the analyzer executable.
pub const ANALYZER_ENV: &str = "VERISTAT_ANALYZER";

/// Default analyzer executable, looked up on PATH.
pub const DEFAULT_ANALYZER: &str = "sast";

/// Resolve the analyzer executable: explicit flag, then environment, then
/// the default PATH lookup.
fn resolve_analyzer(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| env::var_os(ANALYZER_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ANALYZER))
}

/// Load an expectation file: a JSON array of `{kind, file, units}` specs.
fn load_expectations(path: &Path) -> CliResult<Vec<ExpectedSpec>> {
    let raw = fs::read_to_string(path).map_err(|e| {
        CliError::failure(format!(
            "Error reading expectation file {}: {}",
            path.display(),
            e
        ))
    })?;
    serde_json::from_str(&raw).map_err(|e| {
        CliError::failure(format!(
            "Invalid expectation file {}: {}",
            path.display(),
            e
        ))
    })
}

/// Render a harness error through miette so launch and report problems come
/// out with their help text attached.
fn render_harness_error(err: HarnessError) -> CliError {
    CliError::failure(format!("{:?}", miette::Report::new(err)))
}

fn selected_mode(linters_only: bool) -> AnalysisMode {
    if linters_only {
        AnalysisMode::LintersOnly
    } else {
        AnalysisMode::Full
    }
}

// ============================================================================
// verify
// ============================================================================

/// Run the analyzer once over the fixtures and evaluate every expectation.
pub fn verify(
    targets: Vec<PathBuf>,
    language: Language,
    expect: &Path,
    analyzer: Option<PathBuf>,
    linters_only: bool,
    keep_workspace: bool,
    verbose: bool,
) -> CliResult<ExitCode> {
    let start_time = Instant::now();

    let specs = load_expectations(expect)?;
    if specs.is_empty() {
        return Err(CliError::failure(format!(
            "Expectation file {} contains no assertions",
            expect.display()
        )));
    }

    let workspace = Workspace::new()
        .map_err(|e| CliError::failure(format!("Error creating workspace: {}", e)))?;
    let program = resolve_analyzer(analyzer);
    let mode = selected_mode(linters_only);

    let case = match FixtureCase::run(&program, language, mode, workspace.root(), targets) {
        Ok(case) => case,
        Err(e) => {
            if keep_workspace {
                eprintln!("workspace kept at {}", workspace.keep().display());
            }
            return Err(render_harness_error(e));
        }
    };

    if verbose {
        eprintln!("$ {}", case.invocation().command_line());
        for issue in case.report().issues() {
            eprintln!("  reported: {} {} {}", issue.kind, issue.file, issue.procedure);
        }
    }

    println!("\x1b[1m=================== verification session starts ===================\x1b[0m");
    println!("collected {} assertion(s)", specs.len());
    println!();

    let mut failures = Vec::new();
    for spec in &specs {
        match case.check(spec) {
            Ok(()) => {
                println!("{} @ {} \x1b[32mPASSED\x1b[0m", spec.kind, spec.file);
            }
            Err(mismatch) => {
                println!("{} @ {} \x1b[31mFAILED\x1b[0m", spec.kind, spec.file);
                failures.push(mismatch);
            }
        }
    }

    if !failures.is_empty() {
        println!();
        println!("\x1b[1;31m=================== FAILURES ===================\x1b[0m");
        for mismatch in &failures {
            println!();
            println!(
                "\x1b[1m___________ {} @ {} ___________\x1b[0m",
                mismatch.kind, mismatch.file
            );
            println!();
            for line in mismatch.to_string().lines() {
                println!("    {}", line);
            }
        }
    }

    let passed = specs.len() - failures.len();
    let failed = failures.len();
    let total_time = start_time.elapsed();

    println!();
    let summary_color = if failed > 0 { "\x1b[1;31m" } else { "\x1b[1;32m" };
    let mut parts = Vec::new();
    if passed > 0 {
        parts.push(format!("{} passed", passed));
    }
    if failed > 0 {
        parts.push(format!("{} failed", failed));
    }
    println!(
        "{}=================== {} in {:.2}s ===================\x1b[0m",
        summary_color,
        parts.join(", "),
        total_time.as_secs_f64()
    );

    if keep_workspace {
        println!("workspace kept at {}", workspace.keep().display());
    }

    if failed > 0 {
        // Assertions failed - return error with empty message (details already printed)
        Err(CliError::new("", ExitCode::FAILURE))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

// ============================================================================
// show
// ============================================================================

/// Run the analyzer and print the parsed findings (debug aid).
pub fn show(
    targets: Vec<PathBuf>,
    language: Language,
    analyzer: Option<PathBuf>,
    linters_only: bool,
) -> CliResult<ExitCode> {
    let workspace = Workspace::new()
        .map_err(|e| CliError::failure(format!("Error creating workspace: {}", e)))?;
    let program = resolve_analyzer(analyzer);
    let mode = selected_mode(linters_only);

    let case = FixtureCase::run(&program, language, mode, workspace.root(), targets)
        .map_err(render_harness_error)?;

    let report = case.report();
    if report.is_empty() {
        println!("no findings");
        return Ok(ExitCode::SUCCESS);
    }

    for issue in report.issues() {
        let line = issue.line.map(|l| format!(":{}", l)).unwrap_or_default();
        println!("{}  {}{}  {}", issue.kind, issue.file, line, issue.procedure);
        if let Some(message) = &issue.message {
            println!("    {}", message);
        }
    }
    println!();
    println!("{} finding(s)", report.len());

    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn explicit_analyzer_flag_wins() {
        let resolved = resolve_analyzer(Some(PathBuf::from("/opt/sast/bin/sast")));
        assert_eq!(resolved, PathBuf::from("/opt/sast/bin/sast"));
    }

    #[test]
    fn missing_expectation_file_is_a_cli_error() {
        let err = load_expectations(Path::new("does/not/exist.json")).unwrap_err();
        assert!(err.message.contains("does/not/exist.json"));
        assert_eq!(err.exit_code, ExitCode::FAILURE);
    }

    #[test]
    fn selected_mode_maps_the_flag() {
        assert_eq!(selected_mode(false), AnalysisMode::Full);
        assert_eq!(selected_mode(true), AnalysisMode::LintersOnly);
    }
}
