use std::path::Path;

use formatcheck_config::{Config, EditorConfigProvider};
use formatcheck_core::{minimize_changes, ChangeError};
use formatcheck_format::DocumentReport;
use formatcheck_options::{
    ConventionProvider, ConventionSnapshot, NoConventions, OptionResolver, ResolvedOptionSet,
    FORMATTING_OPTIONS,
};
use tracing::{debug, warn};

use crate::formatter::{Document, Formatter};
use crate::whitespace::WhitespaceFormatter;
use crate::OperationError;

/// Per-document pipeline: conventions, option resolution, formatting and
/// minimization.
pub struct Analyzer {
    formatter: Box<dyn Formatter>,
    conventions: Box<dyn ConventionProvider>,
    resolver: OptionResolver<'static>,
    baseline: ResolvedOptionSet,
}

impl Analyzer {
    pub fn new(
        formatter: Box<dyn Formatter>,
        conventions: Box<dyn ConventionProvider>,
        baseline: ResolvedOptionSet,
    ) -> Self {
        Analyzer {
            formatter,
            conventions,
            resolver: OptionResolver::new(FORMATTING_OPTIONS),
            baseline,
        }
    }

    /// Whitespace formatter with `.editorconfig` lookup when enabled.
    pub fn from_config(config: &Config) -> Self {
        let conventions: Box<dyn ConventionProvider> = if config.conventions.editorconfig {
            Box::new(EditorConfigProvider::new())
        } else {
            Box::new(NoConventions)
        };
        Analyzer::new(
            Box::new(WhitespaceFormatter),
            conventions,
            config.options.baseline(),
        )
    }

    pub fn baseline(&self) -> &ResolvedOptionSet {
        &self.baseline
    }

    /// Options in effect for a document at `absolute_path` in `language`.
    pub fn options_for(&self, absolute_path: &Path, language: &str) -> ResolvedOptionSet {
        let conventions = self.conventions_for(absolute_path);
        self.resolver.resolve(&conventions, language, &self.baseline)
    }

    pub fn analyze(&self, document: &Document) -> Result<DocumentReport, OperationError> {
        debug!(
            path = %document.path.display(),
            language = %document.language,
            "analyzing document"
        );

        let options = self.options_for(&document.absolute_path, &document.language);
        let changes = self
            .formatter
            .format(&document.text, &document.language, &options);
        let to_error = |source: ChangeError| OperationError::Change {
            path: document.path.clone(),
            source,
        };

        let findings = minimize_changes(&document.text, changes).map_err(to_error)?;
        debug!(
            path = %document.path.display(),
            findings = findings.len(),
            "document analyzed"
        );
        DocumentReport::from_findings(
            document.path.clone(),
            document.language.clone(),
            &document.text,
            findings,
        )
        .map_err(to_error)
    }

    fn conventions_for(&self, absolute_path: &Path) -> ConventionSnapshot {
        if !absolute_path.is_file() {
            return ConventionSnapshot::new();
        }
        match self.conventions.load(absolute_path) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(path = %absolute_path.display(), error = %err, "ignoring conventions");
                ConventionSnapshot::new()
            }
        }
    }
}
