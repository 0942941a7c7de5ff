//! Report rendering and exit codes for the CLI.
//!
//! Plain text for humans and CI logs, JSON for tooling. Rendering never
//! reorders violations; the analyzer already returns them stable-sorted.

use crate::types::{Severity, Violation};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Process exit status derived from the analysis outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    ViolationsFound,
    Fatal,
}

impl ExitCode {
    /// Only `error`-severity violations fail the run.
    pub fn from_violations(violations: &[Violation]) -> Self {
        if violations.iter().any(|v| v.severity == Severity::Error) {
            Self::ViolationsFound
        } else {
            Self::Success
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::ViolationsFound | Self::Fatal => 1,
        }
    }
}

#[derive(Debug, Serialize)]
struct Summary {
    files_analyzed: usize,
    errors: usize,
    warnings: usize,
    infos: usize,
}

impl Summary {
    fn new(violations: &[Violation], files_analyzed: usize) -> Self {
        let count = |severity| {
            violations
                .iter()
                .filter(|v| v.severity == severity)
                .count()
        };
        Self {
            files_analyzed,
            errors: count(Severity::Error),
            warnings: count(Severity::Warning),
            infos: count(Severity::Info),
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    violations: &'a [Violation],
    summary: Summary,
}

pub fn render_text(violations: &[Violation], files_analyzed: usize) -> String {
    let mut out = String::new();
    for violation in violations {
        out.push_str(&format!(
            "{}: [{}] {}: {}\n",
            violation.severity, violation.rule_name, violation.file, violation.message
        ));
    }

    if violations.is_empty() {
        out.push_str(&format!(
            "No violations found ({files_analyzed} files analyzed).\n"
        ));
    } else {
        let summary = Summary::new(violations, files_analyzed);
        out.push_str(&format!(
            "\n{} violations ({} errors, {} warnings, {} info) across {} files.\n",
            violations.len(),
            summary.errors,
            summary.warnings,
            summary.infos,
            files_analyzed
        ));
    }
    out
}

pub fn render_json(violations: &[Violation], files_analyzed: usize) -> String {
    let report = JsonReport {
        violations,
        summary: Summary::new(violations, files_analyzed),
    };
    serde_json::to_string_pretty(&report).expect("violation serialization is infallible")
}
