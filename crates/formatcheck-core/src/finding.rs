use crate::span::{TextChange, TextSpan};

/// Minimized edit reported for a document.
///
/// A finding is never a no-op: either the span or the replacement is
/// non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub span: TextSpan,
    pub replacement_text: String,
}

/// Shape of a finding, used when describing it to a reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindingKind {
    Insertion,
    Deletion,
    Replacement,
}

impl Finding {
    pub(crate) fn from_change(change: TextChange) -> Self {
        let (span, replacement_text) = change.into_parts();
        Self {
            span,
            replacement_text,
        }
    }

    pub fn kind(&self) -> FindingKind {
        match (self.span.is_empty(), self.replacement_text.is_empty()) {
            (true, _) => FindingKind::Insertion,
            (false, true) => FindingKind::Deletion,
            (false, false) => FindingKind::Replacement,
        }
    }

    /// View the finding as a change so it can be minimized or applied again.
    pub fn to_change(&self) -> TextChange {
        TextChange::new(self.span, self.replacement_text.clone())
    }
}
