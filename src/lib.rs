#![forbid(unsafe_code)]
//! Exact-match verification harness for the sast static analyzer
//!
//! veristat points the analyzer at fixture source files, runs it as an
//! external process inside a scoped workspace, parses the findings report,
//! and asserts that the reported (kind, file, procedure) set exactly
//! matches an expected set: no fewer, no extra.
//!
//! ## Pipeline
//!
//! [`invocation::Invocation::build`] → [`runner::run`] → [`report::Report`]
//! → [`matcher::contains_exactly`], orchestrated once per fixture by
//! [`case::FixtureCase`]. Data flows strictly forward; each stage only
//! consumes what the previous one produced.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod case;
pub mod cli;
pub mod error;
pub mod invocation;
pub mod matcher;
pub mod report;
pub mod runner;
pub mod workspace;

pub use case::FixtureCase;
pub use error::HarnessError;
pub use invocation::{AnalysisMode, Invocation, Language};
pub use matcher::{ExpectedSpec, Mismatch, check, contains_exactly};
pub use report::{IssueRecord, Report};
pub use runner::run;
pub use workspace::Workspace;
