use std::fs;
use std::path::{Path, PathBuf};

use formatcheck_core::{TextChange, TextSpan};
use formatcheck_format::CheckFormat;
use formatcheck_ops::{
    Analyzer, CheckOptions, Document, Formatter, OperationError, Operations, ScanOptions,
    WhitespaceFormatter,
};
use formatcheck_options::{
    ConventionSnapshot, FixedConventions, NoConventions, OptionValue, ResolvedOptionSet,
};
use formatcheck_test_support::Fixture;
use pretty_assertions::assert_eq;
use serde_json::Value;

const EDITORCONFIG_ROOT: (&str, &str) = (".editorconfig", "root = true\n");

fn check(fixture: &Fixture, format: CheckFormat) -> formatcheck_ops::CheckOutcome {
    check_with(fixture, ScanOptions::default(), format)
}

fn check_with(
    fixture: &Fixture,
    scan: ScanOptions,
    format: CheckFormat,
) -> formatcheck_ops::CheckOutcome {
    Operations::new(fixture.config())
        .check(CheckOptions { scan, format })
        .expect("check succeeds")
}

fn spans(outcome: &formatcheck_ops::CheckOutcome) -> Vec<(PathBuf, usize, usize, String)> {
    outcome
        .report
        .documents
        .iter()
        .flat_map(|doc| {
            doc.findings.iter().map(|reported| {
                (
                    doc.path.clone(),
                    reported.finding.span.start(),
                    reported.finding.span.end(),
                    reported.finding.replacement_text.clone(),
                )
            })
        })
        .collect()
}

#[test]
fn clean_project_exits_zero() {
    let fixture = Fixture::with_files(&[
        EDITORCONFIG_ROOT,
        ("src/lib.rs", "pub fn a() {\n    b();\n}\n"),
        ("README.md", "# Title\n"),
    ]);

    let outcome = check(&fixture, CheckFormat::Plain);

    assert_eq!(outcome.exit_code, 0);
    assert_eq!(outcome.report.files_scanned, 2);
    assert_eq!(outcome.rendered, "no formatting issues (2 file(s) scanned)\n");
}

#[test]
fn reports_minimized_findings() {
    let fixture = Fixture::with_files(&[
        EDITORCONFIG_ROOT,
        ("src/lib.rs", "fn a() {}   \n\tb();\r\n"),
    ]);

    let outcome = check(&fixture, CheckFormat::Plain);

    assert_eq!(outcome.exit_code, 1);
    assert_eq!(
        spans(&outcome),
        vec![
            (PathBuf::from("src/lib.rs"), 9, 12, String::new()),
            (PathBuf::from("src/lib.rs"), 13, 14, "    ".to_string()),
            (PathBuf::from("src/lib.rs"), 18, 19, String::new()),
        ]
    );
    assert_eq!(
        outcome.rendered,
        "src/lib.rs:1:10: delete 3 character(s)\n\
         src/lib.rs:2:1: replace 1 character(s) with \"    \"\n\
         src/lib.rs:2:6: delete 1 character(s)\n\
         3 error(s) in 1 file(s) (1 file(s) scanned)\n"
    );
}

#[test]
fn editorconfig_overrides_apply_per_file() {
    let fixture = Fixture::with_files(&[
        (
            ".editorconfig",
            "root = true\n\n[*.rs]\nindent_style = tab\nindent_size = 4\n",
        ),
        ("src/lib.rs", "    x();\n"),
        ("tool.py", "    x()\n"),
    ]);

    let outcome = check(&fixture, CheckFormat::Plain);

    assert_eq!(
        spans(&outcome),
        vec![(PathBuf::from("src/lib.rs"), 0, 4, "\t".to_string())]
    );
}

#[test]
fn editorconfig_can_be_disabled() {
    let fixture = Fixture::with_files(&[
        (".editorconfig", "root = true\n\n[*]\nindent_style = tab\n"),
        (".formatcheck.toml", "[conventions]\neditorconfig = false\n"),
        ("src/lib.rs", "    x();\n"),
    ]);

    let outcome = check(&fixture, CheckFormat::Plain);
    assert!(outcome.report.documents.iter().all(|doc| doc.is_clean()));
}

#[test]
fn per_language_config_options() {
    let fixture = Fixture::with_files(&[
        EDITORCONFIG_ROOT,
        (
            ".formatcheck.toml",
            "[options.python]\nend_of_line = \"crlf\"\n",
        ),
        ("a.py", "x = 1\n"),
        ("b.rs", "x();\n"),
    ]);

    let outcome = check(&fixture, CheckFormat::Plain);

    assert_eq!(
        spans(&outcome),
        vec![(PathBuf::from("a.py"), 5, 5, "\r".to_string())]
    );
}

#[test]
fn warning_severity_keeps_exit_code_zero() {
    let fixture = Fixture::with_files(&[
        EDITORCONFIG_ROOT,
        (".formatcheck.toml", "[report]\nseverity = \"warning\"\n"),
        ("a.rs", "x();  \n"),
    ]);

    let outcome = check(&fixture, CheckFormat::Plain);

    assert_eq!(outcome.exit_code, 0);
    assert_eq!(outcome.report.finding_count(), 1);
    assert!(outcome.rendered.contains("1 warning(s) in 1 file(s)"));
}

#[test]
fn gitignore_and_exclude_patterns_are_honoured() {
    let fixture = Fixture::with_files(&[
        EDITORCONFIG_ROOT,
        (".gitignore", "ignored.rs\n"),
        (".formatcheck.toml", "[project]\nexclude = [\"vendor/**\"]\n"),
        ("ignored.rs", "x();  \n"),
        ("vendor/dep.rs", "x();  \n"),
        ("kept.rs", "x();\n"),
    ]);

    let outcome = check(&fixture, CheckFormat::Plain);
    let paths: Vec<_> = outcome
        .report
        .documents
        .iter()
        .map(|doc| doc.path.clone())
        .collect();
    assert_eq!(paths, vec![PathBuf::from("kept.rs")]);

    let outcome = check_with(
        &fixture,
        ScanOptions {
            paths: Vec::new(),
            respect_ignore: false,
        },
        CheckFormat::Plain,
    );
    assert!(outcome
        .report
        .documents
        .iter()
        .any(|doc| doc.path == Path::new("ignored.rs") && !doc.is_clean()));
    assert!(outcome
        .report
        .documents
        .iter()
        .all(|doc| !doc.path.starts_with("vendor")));
}

#[test]
fn explicit_paths_limit_the_scan() {
    let fixture = Fixture::with_files(&[
        EDITORCONFIG_ROOT,
        ("a/one.rs", "x();  \n"),
        ("b/two.rs", "x();  \n"),
    ]);

    let outcome = check_with(
        &fixture,
        ScanOptions {
            paths: vec![PathBuf::from("b")],
            respect_ignore: true,
        },
        CheckFormat::Plain,
    );

    assert_eq!(outcome.report.files_scanned, 1);
    assert_eq!(outcome.report.documents[0].path, PathBuf::from("b/two.rs"));
}

#[test]
fn missing_path_is_invalid_input() {
    let fixture = Fixture::with_files(&[EDITORCONFIG_ROOT]);
    let err = Operations::new(fixture.config())
        .check(CheckOptions {
            scan: ScanOptions {
                paths: vec![PathBuf::from("nope")],
                respect_ignore: true,
            },
            format: CheckFormat::Plain,
        })
        .expect_err("missing path");
    assert!(matches!(err, OperationError::InvalidInput(_)));
}

#[test]
fn json_and_diff_formats() {
    let fixture = Fixture::with_files(&[EDITORCONFIG_ROOT, ("a.rs", "x();  \ny();")]);

    let outcome = check(&fixture, CheckFormat::Json);
    let value: Value = serde_json::from_str(&outcome.rendered).expect("valid json");
    assert_eq!(value["finding_count"], 2);
    assert_eq!(value["findings"][0]["path"], "a.rs");
    assert_eq!(value["findings"][0]["start"], 4);
    assert_eq!(value["findings"][0]["end"], 6);
    assert_eq!(value["findings"][1]["replacement_text"], "\n");

    let outcome = check(&fixture, CheckFormat::Diff);
    assert!(outcome.rendered.contains("--- a/a.rs"));
    assert!(outcome.rendered.contains("+x();\n"));
    assert_eq!(fixture.read("a.rs"), "x();  \ny();");
}

#[test]
fn non_utf8_files_are_skipped() {
    let fixture = Fixture::with_files(&[EDITORCONFIG_ROOT, ("a.rs", "x();\n")]);
    fs::write(fixture.path("blob.bin"), [0xff, 0xfe, 0x00]).expect("write binary");

    let outcome = check(&fixture, CheckFormat::Plain);
    assert_eq!(outcome.report.files_scanned, 1);
}

#[test]
fn options_for_reports_effective_values() {
    let fixture = Fixture::with_files(&[
        (
            ".editorconfig",
            "root = true\n\n[*.py]\nindent_size = 2\nindent_style = nonsense\n",
        ),
        ("tool.py", "x = 1\n"),
    ]);

    let ops = Operations::new(fixture.config());
    let resolved = ops.options_for(Path::new("tool.py")).expect("options");

    assert_eq!(resolved.language, "python");
    let effective = resolved.effective();
    assert_eq!(effective["indent_size"], OptionValue::Int(2));
    assert_eq!(effective["indent_style"], OptionValue::Enum("space"));
    assert_eq!(effective["smart_indent"], OptionValue::Enum("smart"));
}

struct OutOfBounds;

impl Formatter for OutOfBounds {
    fn format(
        &self,
        text: &str,
        _language: &str,
        _options: &ResolvedOptionSet,
    ) -> Vec<TextChange> {
        vec![TextChange::new(TextSpan::from_len(0, text.len() + 1), "")]
    }
}

#[test]
fn invalid_formatter_edits_surface_as_errors() {
    let fixture = Fixture::with_files(&[("a.rs", "x();\n")]);
    let config = fixture.config();
    let analyzer = Analyzer::new(
        Box::new(OutOfBounds),
        Box::new(NoConventions),
        config.options.baseline(),
    );

    let err = Operations::with_analyzer(config, analyzer)
        .check(CheckOptions {
            scan: ScanOptions::default(),
            format: CheckFormat::Plain,
        })
        .expect_err("invalid edit");
    match err {
        OperationError::Change { path, .. } => assert_eq!(path, PathBuf::from("a.rs")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn analyzer_skips_conventions_for_unsaved_documents() {
    let analyzer = Analyzer::new(
        Box::new(WhitespaceFormatter),
        Box::new(NoConventions),
        formatcheck_options::default_options(),
    );
    let document = Document::new("scratch.rs", "/nonexistent/scratch.rs", "rust", "a \n");

    let report = analyzer.analyze(&document).expect("analyze");
    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.findings[0].finding.span, TextSpan::new(1, 2).unwrap());
}

#[test]
fn analyzer_applies_provider_conventions_to_files_on_disk() {
    let fixture = Fixture::with_files(&[("src/lib.rs", "    x();\n")]);
    let conventions: ConventionSnapshot = [("indent_style", "tab"), ("indent_size", "4")]
        .into_iter()
        .collect();
    let analyzer = Analyzer::new(
        Box::new(WhitespaceFormatter),
        Box::new(FixedConventions(conventions)),
        formatcheck_options::default_options(),
    );
    let document = Document::new(
        "src/lib.rs",
        fixture.path("src/lib.rs"),
        "rust",
        fixture.read("src/lib.rs"),
    );

    let report = analyzer.analyze(&document).expect("analyze");
    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.findings[0].finding.span, TextSpan::new(0, 4).unwrap());
    assert_eq!(report.findings[0].finding.replacement_text, "\t");
}
