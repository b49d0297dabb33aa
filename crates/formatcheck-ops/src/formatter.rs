use std::path::PathBuf;

use formatcheck_core::TextChange;
use formatcheck_options::ResolvedOptionSet;

/// Source of coarse formatting edits for a document.
///
/// Implementations must return changes whose spans lie within `text`, fall
/// on character boundaries, do not overlap and are sorted by start offset.
/// Changes may be larger than necessary; the checker minimizes them.
pub trait Formatter: Send + Sync {
    fn format(&self, text: &str, language: &str, options: &ResolvedOptionSet) -> Vec<TextChange>;
}

/// Document submitted for analysis.
#[derive(Clone, Debug)]
pub struct Document {
    /// Path shown in reports, usually relative to the project root.
    pub path: PathBuf,
    /// Location on disk used for convention lookup.
    pub absolute_path: PathBuf,
    pub language: String,
    pub text: String,
}

impl Document {
    pub fn new(
        path: impl Into<PathBuf>,
        absolute_path: impl Into<PathBuf>,
        language: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Document {
            path: path.into(),
            absolute_path: absolute_path.into(),
            language: language.into(),
            text: text.into(),
        }
    }
}
