//! Analyzer process execution
//!
//! Runs a built [`Invocation`] as a subprocess and turns its results into a
//! [`Report`]. The call is synchronous and blocks until the analyzer exits;
//! timeout policy is layered on by the caller (a suite-level interrupt
//! surfaces as [`HarnessError::ProcessInterrupted`]).

use std::fs;
use std::io;
use std::process::Command;

use crate::error::HarnessError;
use crate::invocation::Invocation;
use crate::report::{self, Report};

/// Run the analyzer described by `invocation` and parse its findings report.
///
/// The process runs with the invocation's workspace root as its working
/// directory, so concurrent runs with distinct workspaces cannot interfere.
/// Analyzer-internal artifacts are left under the workspace; cleanup belongs
/// to the workspace's own scoped lifecycle.
///
/// ## Errors
/// - [`HarnessError::ProcessLaunch`] if the executable cannot be started.
/// - [`HarnessError::ProcessInterrupted`] if the wait is interrupted.
/// - [`HarnessError::AnalyzerFailure`] if the analyzer exits with a failure
///   status (finding issues is not a failure; the report carries those).
/// - [`HarnessError::MalformedOutput`] if the report is absent or cannot be
///   parsed.
#[tracing::instrument(
    skip_all,
    fields(
        program = %invocation.program.display(),
        language = %invocation.language,
        targets = invocation.targets.len(),
    )
)]
pub fn run(invocation: &Invocation) -> Result<Report, HarnessError> {
    let output = Command::new(&invocation.program)
        .args(invocation.args())
        .current_dir(&invocation.workspace_root)
        .output()
        .map_err(|e| classify_wait_error(invocation, e))?;

    if !output.status.success() {
        return Err(HarnessError::AnalyzerFailure {
            program: invocation.program.display().to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    let report_path = invocation.report_path();
    let raw = fs::read_to_string(&report_path).map_err(|e| {
        HarnessError::MalformedOutput(format!(
            "cannot read findings report {}: {}",
            report_path.display(),
            e
        ))
    })?;

    let report = report::parse(&raw)?;
    tracing::debug!(findings = report.len(), "analyzer run complete");
    Ok(report)
}

/// An interrupted wait is a distinct condition from a failed launch:
/// suite-level timeouts deliver interrupts and must see them as such.
fn classify_wait_error(invocation: &Invocation, err: io::Error) -> HarnessError {
    let program = invocation.program.display().to_string();
    if err.kind() == io::ErrorKind::Interrupted {
        HarnessError::ProcessInterrupted { program }
    } else {
        HarnessError::ProcessLaunch {
            program,
            source: err,
        }
    }
}
