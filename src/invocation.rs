//! Analyzer invocation construction
//!
//! Builds the command line for one analyzer run: per-language frontend
//! dispatch, analysis-mode flags, and the results-directory layout. Building
//! an [`Invocation`] is pure: it never touches the filesystem and never
//! spawns a process, so two builds from identical inputs are always equal.

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

use crate::error::HarnessError;

/// Directory under the workspace root where the analyzer writes its results.
pub const RESULTS_DIR: &str = "analysis-out";

/// Findings report file the analyzer emits inside [`RESULTS_DIR`].
pub const REPORT_FILE: &str = "report.json";

/// Supported fixture languages, one per analyzer frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    C,
    Cpp,
    ObjC,
    ObjCpp,
    Java,
}

impl Language {
    /// Frontend command the analyzer drives for this language.
    fn frontend_args(self) -> &'static [&'static str] {
        match self {
            Language::C => &["clang", "-c"],
            Language::Cpp => &["clang++", "-std=c++14", "-c"],
            Language::ObjC => &["clang", "-x", "objective-c", "-fobjc-arc", "-c"],
            Language::ObjCpp => &["clang++", "-x", "objective-c++", "-fobjc-arc", "-c"],
            Language::Java => &["javac"],
        }
    }

    /// Whether the syntactic linters can run on this language's frontend.
    fn supports_linters(self) -> bool {
        !matches!(self, Language::Java)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Language::C => "C",
            Language::Cpp => "C++",
            Language::ObjC => "Objective-C",
            Language::ObjCpp => "Objective-C++",
            Language::Java => "Java",
        };
        write!(f, "{}", name)
    }
}

/// What the analyzer is asked to do with the fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnalysisMode {
    /// Full interprocedural analysis.
    #[default]
    Full,
    /// Syntactic linters only; clang-frontend languages only.
    LintersOnly,
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisMode::Full => write!(f, "full analysis"),
            AnalysisMode::LintersOnly => write!(f, "linters-only"),
        }
    }
}

/// A fully-constructed analyzer invocation for one fixture.
///
/// Built once per fixture (the shared setup step) and consumed by
/// [`crate::runner::run`]. Not reused across differing fixtures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Analyzer executable to run.
    pub program: PathBuf,
    pub language: Language,
    pub mode: AnalysisMode,
    /// Isolated scratch directory the analyzer runs in.
    pub workspace_root: PathBuf,
    /// Fixture source files handed to the frontend, in the order given.
    pub targets: Vec<PathBuf>,
    args: Vec<OsString>,
}

impl Invocation {
    /// Build the analyzer command for `language`/`mode` over `targets`.
    ///
    /// The produced command has the shape
    /// `<program> --results-dir <dir> --no-progress [--linters-only] --
    /// <frontend command> <targets...>`.
    ///
    /// ## Errors
    /// - [`HarnessError::MissingTarget`] when `targets` is empty.
    /// - [`HarnessError::InvalidLanguageMode`] when the mode is not
    ///   supported on the language's frontend (linters on Java).
    pub fn build(
        program: impl Into<PathBuf>,
        language: Language,
        mode: AnalysisMode,
        workspace_root: impl Into<PathBuf>,
        targets: Vec<PathBuf>,
    ) -> Result<Self, HarnessError> {
        if targets.is_empty() {
            return Err(HarnessError::MissingTarget);
        }
        if mode == AnalysisMode::LintersOnly && !language.supports_linters() {
            return Err(HarnessError::InvalidLanguageMode { language, mode });
        }

        let mut args: Vec<OsString> = vec![
            "--results-dir".into(),
            RESULTS_DIR.into(),
            "--no-progress".into(),
        ];
        if mode == AnalysisMode::LintersOnly {
            args.push("--linters-only".into());
        }
        args.push("--".into());
        args.extend(language.frontend_args().iter().map(|a| OsString::from(*a)));
        args.extend(targets.iter().map(|t| t.as_os_str().to_os_string()));

        Ok(Self {
            program: program.into(),
            language,
            mode,
            workspace_root: workspace_root.into(),
            targets,
            args,
        })
    }

    /// Arguments passed to the analyzer, in order.
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Well-known location of the findings report after a run.
    pub fn report_path(&self) -> PathBuf {
        self.workspace_root.join(RESULTS_DIR).join(REPORT_FILE)
    }

    /// Human-readable rendering of the full command, for logs and verbose
    /// output.
    pub fn command_line(&self) -> String {
        let mut parts = vec![self.program.to_string_lossy().into_owned()];
        parts.extend(self.args.iter().map(|a| a.to_string_lossy().into_owned()));
        parts.join(" ")
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn targets(paths: &[&str]) -> Vec<PathBuf> {
        paths.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn build_is_deterministic() {
        let a = Invocation::build(
            "sast",
            Language::C,
            AnalysisMode::Full,
            "/tmp/ws",
            targets(&["fixtures/npe.c"]),
        )
        .unwrap();
        let b = Invocation::build(
            "sast",
            Language::C,
            AnalysisMode::Full,
            "/tmp/ws",
            targets(&["fixtures/npe.c"]),
        )
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn build_rejects_empty_targets() {
        let err = Invocation::build("sast", Language::C, AnalysisMode::Full, "/tmp/ws", vec![])
            .unwrap_err();
        assert!(matches!(err, HarnessError::MissingTarget));
    }

    #[test]
    fn build_rejects_linters_on_java() {
        let err = Invocation::build(
            "sast",
            Language::Java,
            AnalysisMode::LintersOnly,
            "/tmp/ws",
            targets(&["Fixture.java"]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            HarnessError::InvalidLanguageMode {
                language: Language::Java,
                mode: AnalysisMode::LintersOnly,
            }
        ));
    }

    #[test]
    fn linters_mode_builds_for_objc() {
        let inv = Invocation::build(
            "sast",
            Language::ObjC,
            AnalysisMode::LintersOnly,
            "/tmp/ws",
            targets(&["ViewController2.m"]),
        )
        .unwrap();
        assert!(inv.args().iter().any(|a| a == "--linters-only"));
    }

    #[test]
    fn frontend_command_follows_the_separator() {
        let inv = Invocation::build(
            "sast",
            Language::Cpp,
            AnalysisMode::Full,
            "/tmp/ws",
            targets(&["fixtures/skip.cpp"]),
        )
        .unwrap();
        let args = inv.args();
        let sep = args.iter().position(|a| a == "--").unwrap();
        assert_eq!(args[sep + 1], "clang++");
        assert_eq!(args.last().unwrap(), "fixtures/skip.cpp");
    }

    #[test]
    fn targets_keep_their_order() {
        let inv = Invocation::build(
            "sast",
            Language::C,
            AnalysisMode::Full,
            "/tmp/ws",
            targets(&["b.c", "a.c"]),
        )
        .unwrap();
        let tail: Vec<_> = inv.args().iter().rev().take(2).collect();
        assert_eq!(tail, [&OsString::from("a.c"), &OsString::from("b.c")]);
    }

    #[test]
    fn report_path_is_under_the_workspace() {
        let inv = Invocation::build(
            "sast",
            Language::C,
            AnalysisMode::Full,
            "/tmp/ws",
            targets(&["x.c"]),
        )
        .unwrap();
        assert_eq!(
            inv.report_path(),
            PathBuf::from("/tmp/ws/analysis-out/report.json")
        );
    }
}
