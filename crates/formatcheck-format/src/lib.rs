//! Report types and output renderers for formatcheck.

use std::path::{Path, PathBuf};

use formatcheck_config::SeverityLevel;
use formatcheck_core::{apply_findings, ChangeResult, Finding, FindingKind};
use serde::Serialize;

pub mod diff;
mod location;

pub use diff::build_unified_diff;
pub use location::LineIndex;

/// Output formats supported by `check`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CheckFormat {
    Plain,
    Json,
    Diff,
}

/// Finding together with the position of its span start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportedFinding {
    pub line: usize,
    pub column: usize,
    pub finding: Finding,
}

impl ReportedFinding {
    /// Human-readable summary of the edit.
    pub fn describe(&self) -> String {
        let finding = &self.finding;
        let removed = finding.span.len();
        match finding.kind() {
            FindingKind::Insertion => format!("insert {:?}", finding.replacement_text),
            FindingKind::Deletion => format!("delete {removed} character(s)"),
            FindingKind::Replacement => format!(
                "replace {removed} character(s) with {:?}",
                finding.replacement_text
            ),
        }
    }
}

/// Findings for a single document.
#[derive(Clone, Debug)]
pub struct DocumentReport {
    pub path: PathBuf,
    pub language: String,
    pub findings: Vec<ReportedFinding>,
    /// Unified diff of the document with every finding applied.
    pub diff: Option<String>,
}

impl DocumentReport {
    /// Locate `findings` in `original` and precompute the fixed-up diff.
    pub fn from_findings(
        path: impl Into<PathBuf>,
        language: impl Into<String>,
        original: &str,
        findings: Vec<Finding>,
    ) -> ChangeResult<Self> {
        let path = path.into();
        let diff = if findings.is_empty() {
            None
        } else {
            let fixed = apply_findings(original, &findings)?;
            build_unified_diff(original, &fixed, &display_path(&path))
        };

        let index = LineIndex::new(original);
        let findings = findings
            .into_iter()
            .map(|finding| {
                let (line, column) = index.locate(finding.span.start());
                ReportedFinding {
                    line,
                    column,
                    finding,
                }
            })
            .collect();

        Ok(DocumentReport {
            path,
            language: language.into(),
            findings,
            diff,
        })
    }

    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Aggregated result of a `check` run.
#[derive(Clone, Debug)]
pub struct CheckReport {
    pub files_scanned: usize,
    pub severity: SeverityLevel,
    pub documents: Vec<DocumentReport>,
}

impl CheckReport {
    pub fn finding_count(&self) -> usize {
        self.documents.iter().map(|doc| doc.findings.len()).sum()
    }

    pub fn files_with_findings(&self) -> usize {
        self.documents.iter().filter(|doc| !doc.is_clean()).count()
    }

    /// Exit code implied by the findings: 1 only for error-severity findings.
    pub fn exit_code(&self) -> i32 {
        match (self.finding_count(), self.severity) {
            (0, _) | (_, SeverityLevel::Warning) => 0,
            (_, SeverityLevel::Error) => 1,
        }
    }
}

/// Render `report` in the requested format.
pub fn render(report: &CheckReport, format: CheckFormat) -> serde_json::Result<String> {
    match format {
        CheckFormat::Plain => Ok(render_plain(report)),
        CheckFormat::Json => render_json(report),
        CheckFormat::Diff => Ok(render_diff(report)),
    }
}

pub fn render_plain(report: &CheckReport) -> String {
    let mut output = String::new();
    for document in &report.documents {
        let path = display_path(&document.path);
        for reported in &document.findings {
            output.push_str(&format!(
                "{}:{}:{}: {}\n",
                path,
                reported.line,
                reported.column,
                reported.describe()
            ));
        }
    }

    let count = report.finding_count();
    if count == 0 {
        output.push_str(&format!(
            "no formatting issues ({} file(s) scanned)\n",
            report.files_scanned
        ));
    } else {
        output.push_str(&format!(
            "{} {}(s) in {} file(s) ({} file(s) scanned)\n",
            count,
            report.severity,
            report.files_with_findings(),
            report.files_scanned
        ));
    }
    output
}

#[derive(Serialize)]
struct JsonReport<'a> {
    files_scanned: usize,
    finding_count: usize,
    severity: String,
    findings: Vec<JsonFinding<'a>>,
}

#[derive(Serialize)]
struct JsonFinding<'a> {
    path: String,
    language: &'a str,
    line: usize,
    column: usize,
    start: usize,
    end: usize,
    replacement_text: &'a str,
}

pub fn render_json(report: &CheckReport) -> serde_json::Result<String> {
    let findings = report
        .documents
        .iter()
        .flat_map(|document| {
            let path = display_path(&document.path);
            document.findings.iter().map(move |reported| JsonFinding {
                path: path.clone(),
                language: &document.language,
                line: reported.line,
                column: reported.column,
                start: reported.finding.span.start(),
                end: reported.finding.span.end(),
                replacement_text: &reported.finding.replacement_text,
            })
        })
        .collect();

    let payload = JsonReport {
        files_scanned: report.files_scanned,
        finding_count: report.finding_count(),
        severity: report.severity.to_string(),
        findings,
    };
    serde_json::to_string_pretty(&payload)
}

/// Concatenated unified diffs; empty when every document is clean.
pub fn render_diff(report: &CheckReport) -> String {
    report
        .documents
        .iter()
        .filter_map(|document| document.diff.as_deref())
        .collect()
}

fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
