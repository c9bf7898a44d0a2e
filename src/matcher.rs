//! The exact-match oracle
//!
//! Verifies that a report's findings for one (kind, file) pair cover exactly
//! an expected set of code units, no fewer, no extra. Matching projects the
//! filtered findings to a set of distinct procedure names, so ordering and
//! duplicate reports never flip an assertion, and a failure always carries
//! the explicit missing/unexpected sets.

use std::collections::BTreeSet;
use std::fmt;

use miette::Diagnostic;
use serde::Deserialize;

use crate::error::HarnessError;
use crate::report::Report;

/// Ground truth for one assertion: the analyzer must report exactly these
/// units for `kind` in `file`.
///
/// `units` is kept duplicate-free by construction; duplicates in an
/// expectation are a specification error, not a matcher concern.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawExpectedSpec")]
pub struct ExpectedSpec {
    pub kind: String,
    pub file: String,
    units: BTreeSet<String>,
}

/// On-disk shape of an expectation, before uniqueness validation.
#[derive(Deserialize)]
struct RawExpectedSpec {
    kind: String,
    file: String,
    units: Vec<String>,
}

impl TryFrom<RawExpectedSpec> for ExpectedSpec {
    type Error = HarnessError;

    fn try_from(raw: RawExpectedSpec) -> Result<Self, Self::Error> {
        ExpectedSpec::new(raw.kind, raw.file, raw.units)
    }
}

impl ExpectedSpec {
    /// Create an expectation, rejecting duplicate units.
    ///
    /// ## Errors
    /// Returns [`HarnessError::DuplicateUnit`] naming the first duplicate.
    pub fn new(
        kind: impl Into<String>,
        file: impl Into<String>,
        units: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, HarnessError> {
        let kind = kind.into();
        let file = file.into();
        let mut set = BTreeSet::new();
        for unit in units {
            let unit = unit.into();
            if !set.insert(unit.clone()) {
                return Err(HarnessError::DuplicateUnit { kind, file, unit });
            }
        }
        Ok(Self {
            kind,
            file,
            units: set,
        })
    }

    /// The expected unit set. Empty means "this kind/file must produce no
    /// findings".
    pub fn units(&self) -> &BTreeSet<String> {
        &self.units
    }
}

/// An exact-match assertion failure.
///
/// Carries the expected and actual unit sets plus both differences; the
/// rendering enumerates every entry, since this is the primary debugging aid
/// when a verification fails.
#[derive(Debug, Clone, PartialEq, Eq, Diagnostic)]
#[diagnostic(help(
    "`missing` units were expected but not reported; `unexpected` units were reported but not expected"
))]
pub struct Mismatch {
    pub kind: String,
    pub file: String,
    pub expected: BTreeSet<String>,
    pub actual: BTreeSet<String>,
    pub missing: BTreeSet<String>,
    pub unexpected: BTreeSet<String>,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "findings for {} in {} do not match the expected set",
            self.kind, self.file
        )?;
        writeln!(f, "  expected:   {}", render_set(&self.expected))?;
        writeln!(f, "  actual:     {}", render_set(&self.actual))?;
        writeln!(f, "  missing:    {}", render_set(&self.missing))?;
        write!(f, "  unexpected: {}", render_set(&self.unexpected))
    }
}

impl std::error::Error for Mismatch {}

fn render_set(set: &BTreeSet<String>) -> String {
    if set.is_empty() {
        return "{}".to_string();
    }
    let entries: Vec<String> = set.iter().map(|u| format!("\"{}\"", u)).collect();
    format!("{{{}}}", entries.join(", "))
}

/// Assert that the report's findings of `kind` in `file` are exactly
/// `expected`: set equality over distinct unit names.
///
/// Duplicate findings for the same unit collapse to one, and emission order
/// is ignored. An empty `expected` set asserts that the kind/file pair
/// produces no findings at all.
pub fn contains_exactly(
    report: &Report,
    kind: &str,
    file: &str,
    expected: &BTreeSet<String>,
) -> Result<(), Mismatch> {
    let actual: BTreeSet<String> = report
        .issues_for(kind, file)
        .map(|issue| issue.procedure.clone())
        .collect();

    let missing: BTreeSet<String> = expected.difference(&actual).cloned().collect();
    let unexpected: BTreeSet<String> = actual.difference(expected).cloned().collect();

    if missing.is_empty() && unexpected.is_empty() {
        return Ok(());
    }

    Err(Mismatch {
        kind: kind.to_string(),
        file: file.to_string(),
        expected: expected.clone(),
        actual,
        missing,
        unexpected,
    })
}

/// Evaluate one [`ExpectedSpec`] against a report.
pub fn check(report: &Report, spec: &ExpectedSpec) -> Result<(), Mismatch> {
    contains_exactly(report, &spec.kind, &spec.file, &spec.units)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::report::IssueRecord;

    fn issue(kind: &str, file: &str, procedure: &str) -> IssueRecord {
        IssueRecord {
            kind: kind.to_string(),
            file: file.to_string(),
            procedure: procedure.to_string(),
            line: None,
            message: None,
        }
    }

    fn units(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn duplicate_findings_collapse_to_one() {
        let report = Report::from(vec![
            issue("NULL_DEREFERENCE", "a.c", "deref"),
            issue("NULL_DEREFERENCE", "a.c", "deref"),
        ]);
        contains_exactly(&report, "NULL_DEREFERENCE", "a.c", &units(&["deref"])).unwrap();
    }

    #[test]
    fn other_kinds_and_files_are_invisible() {
        let report = Report::from(vec![
            issue("NULL_DEREFERENCE", "a.c", "deref"),
            issue("MEMORY_LEAK", "a.c", "leaky"),
            issue("NULL_DEREFERENCE", "b.c", "elsewhere"),
        ]);
        contains_exactly(&report, "NULL_DEREFERENCE", "a.c", &units(&["deref"])).unwrap();
    }

    #[test]
    fn empty_expectation_passes_on_no_findings() {
        let report = Report::from(vec![issue("MEMORY_LEAK", "a.c", "leaky")]);
        contains_exactly(&report, "REGISTERED_OBSERVER", "a.c", &units(&[])).unwrap();
    }

    #[test]
    fn empty_report_fails_nonempty_expectation_with_all_missing() {
        let report = Report::default();
        let err = contains_exactly(&report, "NULL_DEREFERENCE", "a.c", &units(&["p", "q"]))
            .unwrap_err();
        assert_eq!(err.missing, units(&["p", "q"]));
        assert!(err.unexpected.is_empty());
        assert!(err.actual.is_empty());
    }

    #[test]
    fn expected_spec_rejects_duplicates() {
        let err = ExpectedSpec::new("K", "f.c", ["a", "b", "a"]).unwrap_err();
        match err {
            HarnessError::DuplicateUnit { unit, .. } => assert_eq!(unit, "a"),
            other => panic!("expected DuplicateUnit, got {:?}", other),
        }
    }

    #[test]
    fn expectation_file_with_duplicates_fails_to_deserialize() {
        let raw = r#"{"kind": "K", "file": "f.c", "units": ["a", "a"]}"#;
        let result: Result<ExpectedSpec, _> = serde_json::from_str(raw);
        assert!(result.is_err());
    }

    #[test]
    fn expectation_file_round_trips() {
        let raw = r#"{"kind": "NULL_DEREFERENCE", "file": "f.c", "units": ["b", "a"]}"#;
        let spec: ExpectedSpec = serde_json::from_str(raw).unwrap();
        assert_eq!(spec.kind, "NULL_DEREFERENCE");
        assert_eq!(spec.units(), &units(&["a", "b"]));
    }

    #[test]
    fn mismatch_rendering_enumerates_every_set() {
        let report = Report::from(vec![issue("K", "f.c", "kept")]);
        let err = contains_exactly(&report, "K", "f.c", &units(&["kept", "gone"])).unwrap_err();
        let rendered = err.to_string();
        assert!(rendered.contains("expected:   {\"gone\", \"kept\"}"));
        assert!(rendered.contains("actual:     {\"kept\"}"));
        assert!(rendered.contains("missing:    {\"gone\"}"));
        assert!(rendered.contains("unexpected: {}"));
    }
}
