//! Fixture case orchestration
//!
//! One analyzer run, many assertions: the shared setup builds the
//! invocation and runs the analyzer exactly once, then every assertion
//! reads the cached report. Nothing survives the case; a fresh fixture
//! gets a fresh run.

use std::path::{Path, PathBuf};

use crate::error::HarnessError;
use crate::invocation::{AnalysisMode, Invocation, Language};
use crate::matcher::{self, ExpectedSpec, Mismatch};
use crate::report::Report;
use crate::runner;

/// One verified fixture: a cached analyzer report plus exact-match
/// assertions over it.
#[derive(Debug)]
pub struct FixtureCase {
    invocation: Invocation,
    report: Report,
}

impl FixtureCase {
    /// Shared setup: build the invocation, run the analyzer, cache the
    /// report.
    ///
    /// ## Errors
    /// Propagates construction errors from [`Invocation::build`] and
    /// execution errors from [`runner::run`] untouched.
    pub fn run(
        program: impl Into<PathBuf>,
        language: Language,
        mode: AnalysisMode,
        workspace_root: impl AsRef<Path>,
        targets: Vec<PathBuf>,
    ) -> Result<Self, HarnessError> {
        let invocation = Invocation::build(
            program,
            language,
            mode,
            workspace_root.as_ref().to_path_buf(),
            targets,
        )?;
        let report = runner::run(&invocation)?;
        Ok(Self { invocation, report })
    }

    pub fn invocation(&self) -> &Invocation {
        &self.invocation
    }

    /// The cached report from the single analyzer run.
    pub fn report(&self) -> &Report {
        &self.report
    }

    /// Assert the report contains exactly `units` for `kind` in `file`.
    ///
    /// An empty `units` slice asserts the kind/file pair produced no
    /// findings.
    pub fn assert_exactly(
        &self,
        kind: &str,
        file: &str,
        units: &[&str],
    ) -> Result<(), HarnessError> {
        let spec = ExpectedSpec::new(kind, file, units.iter().copied())?;
        self.check(&spec).map_err(HarnessError::from)
    }

    /// Evaluate a deserialized expectation against the cached report.
    pub fn check(&self, spec: &ExpectedSpec) -> Result<(), Mismatch> {
        matcher::check(&self.report, spec)
    }
}
