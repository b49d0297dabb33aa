//! High-level operations shared by formatcheck front-ends.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use formatcheck_config::Config;
use formatcheck_core::ChangeError;
use formatcheck_format::{render, CheckFormat, CheckReport, DocumentReport};
use formatcheck_options::{OptionValue, ResolvedOptionSet, FORMATTING_OPTIONS};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{info, warn};

mod analyze;
mod formatter;
mod scan;
mod whitespace;

pub use analyze::Analyzer;
pub use formatter::{Document, Formatter};
pub use scan::ScanOptions;
pub use whitespace::WhitespaceFormatter;

use scan::{absolutize, collect_targets, Target};

/// Errors raised by formatcheck operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("I/O error on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to walk files: {0}")]
    Walk(#[from] ignore::Error),
    #[error("formatter produced an invalid edit for {path}: {source}")]
    Change { path: PathBuf, source: ChangeError },
    #[error("failed to render report: {0}")]
    Render(#[from] serde_json::Error),
    #[error("{0}")]
    InvalidInput(String),
}

/// Options for [`Operations::check`].
#[derive(Clone, Debug)]
pub struct CheckOptions {
    pub scan: ScanOptions,
    pub format: CheckFormat,
}

/// Result of a `check` run.
#[derive(Debug)]
pub struct CheckOutcome {
    pub report: CheckReport,
    pub rendered: String,
    pub exit_code: i32,
}

/// Effective options for a single file.
#[derive(Clone, Debug)]
pub struct FileOptions {
    pub path: PathBuf,
    pub language: String,
    pub options: ResolvedOptionSet,
}

impl FileOptions {
    /// Value of every built-in option as seen by this file, keyed by name.
    pub fn effective(&self) -> BTreeMap<&'static str, OptionValue> {
        FORMATTING_OPTIONS
            .iter()
            .filter_map(|descriptor| {
                self.options
                    .get(descriptor, &self.language)
                    .map(|value| (descriptor.name, value.clone()))
            })
            .collect()
    }
}

/// Operation layer wiring configuration to the analysis pipeline.
pub struct Operations {
    config: Config,
    analyzer: Analyzer,
}

impl Operations {
    pub fn new(config: Config) -> Self {
        let analyzer = Analyzer::from_config(&config);
        Self { config, analyzer }
    }

    /// Use a custom analyzer, e.g. one backed by a different formatter.
    pub fn with_analyzer(config: Config, analyzer: Analyzer) -> Self {
        Self { config, analyzer }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check every selected file and render the findings.
    pub fn check(&self, options: CheckOptions) -> Result<CheckOutcome, OperationError> {
        let targets = collect_targets(&self.config, &options.scan)?;

        let mut documents = targets
            .par_iter()
            .map(|target| self.check_target(target))
            .try_fold(Vec::new, |mut acc, next| {
                acc.extend(next?);
                Ok::<_, OperationError>(acc)
            })
            .try_reduce(Vec::new, |mut acc, mut next| {
                acc.append(&mut next);
                Ok(acc)
            })?;
        documents.sort_by(|a, b| a.path.cmp(&b.path));

        let report = CheckReport {
            files_scanned: documents.len(),
            severity: self.config.report.severity,
            documents,
        };
        let exit_code = report.exit_code();
        info!(
            files = report.files_scanned,
            findings = report.finding_count(),
            "check complete"
        );

        let rendered = render(&report, options.format)?;
        Ok(CheckOutcome {
            report,
            rendered,
            exit_code,
        })
    }

    /// Resolve the options that apply to `path`.
    pub fn options_for(&self, path: &Path) -> Result<FileOptions, OperationError> {
        let absolute = absolutize(path, &self.config.sources.working_directory);
        if absolute.is_dir() {
            return Err(OperationError::InvalidInput(format!(
                "{} is a directory",
                absolute.display()
            )));
        }

        let relative = absolute
            .strip_prefix(&self.config.project.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf());
        let language = self.config.languages.language_for(&relative).to_string();
        let options = self.analyzer.options_for(&absolute, &language);

        Ok(FileOptions {
            path: relative,
            language,
            options,
        })
    }

    fn check_target(&self, target: &Target) -> Result<Option<DocumentReport>, OperationError> {
        let text = match fs::read_to_string(&target.absolute) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                warn!(path = %target.relative.display(), "skipping non-UTF-8 file");
                return Ok(None);
            }
            Err(source) => {
                return Err(OperationError::Io {
                    path: target.absolute.clone(),
                    source,
                })
            }
        };

        let language = self.config.languages.language_for(&target.relative);
        let document = Document::new(
            target.relative.clone(),
            target.absolute.clone(),
            language,
            text,
        );
        self.analyzer.analyze(&document).map(Some)
    }
}
