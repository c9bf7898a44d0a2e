//! Parsed analyzer findings
//!
//! The result model for one analyzer run: an ordered collection of
//! [`IssueRecord`]s parsed from the analyzer's `report.json`. Records are
//! never mutated after capture; matching operates over filtered views.

use serde::Deserialize;

use crate::error::HarnessError;

/// A single finding reported by the analyzer.
///
/// `kind`, `file`, and `procedure` identify the finding for matching.
/// `line` and `message` are carried for human-facing output only and never
/// participate in comparisons; fixture edits shift line numbers trivially.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssueRecord {
    /// Categorical tag for the class of finding, e.g. `NULL_DEREFERENCE`.
    pub kind: String,
    /// Source file the finding was reported in.
    pub file: String,
    /// Function/method/procedure the finding is located in.
    pub procedure: String,
    #[serde(default)]
    pub line: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// An ordered, read-only collection of findings from one analyzer run.
///
/// Order has no semantic weight for matching but preserves the analyzer's
/// emission order so diagnostics stay deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    issues: Vec<IssueRecord>,
}

impl Report {
    /// All findings in emission order.
    pub fn issues(&self) -> &[IssueRecord] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Findings of one kind in one file, in emission order.
    pub fn issues_for<'a>(
        &'a self,
        kind: &'a str,
        file: &'a str,
    ) -> impl Iterator<Item = &'a IssueRecord> {
        self.issues
            .iter()
            .filter(move |issue| issue.kind == kind && issue.file == file)
    }
}

impl From<Vec<IssueRecord>> for Report {
    fn from(issues: Vec<IssueRecord>) -> Self {
        Self { issues }
    }
}

/// Parse raw `report.json` content into a [`Report`].
///
/// Parsing is strict: the input must be a JSON array of findings, and any
/// record missing `kind`, `file`, or `procedure` fails the whole parse. A
/// record is never dropped silently: an under-reported oracle would let
/// tests pass that should fail.
///
/// ## Errors
/// Returns [`HarnessError::MalformedOutput`] describing the first offending
/// record or syntax error.
#[tracing::instrument(skip_all, fields(raw_len = raw.len()))]
pub fn parse(raw: &str) -> Result<Report, HarnessError> {
    let issues: Vec<IssueRecord> =
        serde_json::from_str(raw).map_err(|e| HarnessError::MalformedOutput(e.to_string()))?;
    Ok(Report { issues })
}

// ============================================================================
// Tests
// ============================================================================
