//! Harness error taxonomy
//!
//! Every failure class the harness can hit has its own variant, and none of
//! them is caught-and-ignored: construction errors surface immediately,
//! environment errors surface as infrastructure failures (never retried,
//! since retrying a flaky analyzer would mask real regressions), and
//! assertion failures carry the full mismatch detail to the reporting
//! boundary.

use std::io;

use miette::Diagnostic;
use thiserror::Error;

use crate::invocation::{AnalysisMode, Language};
use crate::matcher::Mismatch;

/// Errors produced while building, running, or verifying an analyzer run.
#[derive(Debug, Error, Diagnostic)]
pub enum HarnessError {
    /// The requested language/mode combination is not supported.
    #[error("unsupported combination: {language} with {mode}")]
    #[diagnostic(help("linters run through the clang frontends only; analyze {language} fixtures in full mode"))]
    InvalidLanguageMode {
        language: Language,
        mode: AnalysisMode,
    },

    /// No target source files were supplied to the command builder.
    #[error("no target source files supplied")]
    #[diagnostic(help("pass at least one fixture path to analyze"))]
    MissingTarget,

    /// An expected-unit set contained the same unit twice.
    #[error("duplicate unit `{unit}` in expectation for {kind} in {file}")]
    #[diagnostic(help("expected units must be unique; remove the duplicate entry from the expectation"))]
    DuplicateUnit {
        kind: String,
        file: String,
        unit: String,
    },

    /// The analyzer executable could not be started.
    #[error("failed to launch analyzer `{program}`")]
    #[diagnostic(help("check that the analyzer exists and is executable (see --analyzer / VERISTAT_ANALYZER)"))]
    ProcessLaunch {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The calling thread was interrupted while waiting for the analyzer.
    ///
    /// Suite-level timeouts abort hung invocations by delivering an
    /// interrupt; it must reach the caller instead of being swallowed.
    #[error("interrupted while waiting for analyzer `{program}`")]
    ProcessInterrupted { program: String },

    /// The analyzer exited with a failure status.
    ///
    /// Finding issues is not a process failure; a non-zero status means the
    /// run itself did not complete.
    #[error("analyzer `{program}` exited abnormally ({status})\n{stderr}")]
    AnalyzerFailure {
        program: String,
        status: String,
        stderr: String,
    },

    /// The captured report could not be parsed into the result model.
    ///
    /// Never degraded to a partial report: a truncated result set is
    /// indistinguishable from a tampered oracle.
    #[error("malformed analyzer report: {0}")]
    #[diagnostic(help("the report must be a JSON array of findings, each with `kind`, `file`, and `procedure`"))]
    MalformedOutput(String),

    /// An exact-match assertion failed.
    ///
    /// The expected, primary failure mode of a working harness.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Mismatch(#[from] Mismatch),
}
