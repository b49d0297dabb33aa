//! Shrinks formatter edits to the span that actually differs.
//!
//! Formatters report sufficient edits, not minimal ones: a tidy-up of
//! `"foo   "` arrives as "replace `foo   ` with `foo`". The minimizer
//! compares the replacement against the original text and rewrites such
//! edits into pure deletions at one edge of the old span. Only one edge is
//! ever trimmed; an edit whose old and new text differ in the interior is
//! reported as-is.

use crate::error::ChangeResult;
use crate::finding::Finding;
use crate::span::{TextChange, TextSpan};

/// Minimize every change against `original`, preserving input order and
/// dropping changes that do nothing.
///
/// Changes are expected in the order a formatter produces them
/// (ascending, non-overlapping); they are not re-sorted. A change whose span
/// falls outside `original` aborts the whole pass.
pub fn minimize_changes<I>(original: &str, changes: I) -> ChangeResult<Vec<Finding>>
where
    I: IntoIterator<Item = TextChange>,
{
    let mut findings = Vec::new();
    for change in changes {
        if let Some(finding) = minimize_change(original, change)? {
            findings.push(finding);
        }
    }
    Ok(findings)
}

/// Minimize a single change. Returns `None` when the change is a no-op,
/// either as given or after trimming.
pub fn minimize_change(original: &str, change: TextChange) -> ChangeResult<Option<Finding>> {
    change.span().slice(original)?;

    if change.is_noop() {
        return Ok(None);
    }

    let change = trim_leading(original, &change)
        .or_else(|| trim_trailing(original, &change))
        .unwrap_or(change);

    if change.is_noop() {
        return Ok(None);
    }
    Ok(Some(Finding::from_change(change)))
}

/// The tail of the old span already reads `new_text`: delete the head.
fn trim_leading(original: &str, change: &TextChange) -> Option<TextChange> {
    let span = change.span();
    let new_text = change.new_text();
    let offset = span.len().checked_sub(new_text.len())?;

    let kept = TextSpan::from_len(span.start() + offset, new_text.len());
    if original.get(kept.range())? != new_text {
        return None;
    }
    Some(TextChange::delete(TextSpan::from_len(span.start(), offset)))
}

/// The head of the old span already reads `new_text`: delete the tail.
fn trim_trailing(original: &str, change: &TextChange) -> Option<TextChange> {
    let span = change.span();
    let new_text = change.new_text();
    if new_text.len() >= span.len() {
        return None;
    }

    let kept = TextSpan::from_len(span.start(), new_text.len());
    if original.get(kept.range())? != new_text {
        return None;
    }
    let removed = TextSpan::new(kept.end(), span.end()).ok()?;
    Some(TextChange::delete(removed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(start: usize, end: usize, text: &str) -> TextChange {
        TextChange::new(TextSpan::new(start, end).unwrap(), text)
    }

    #[test]
    fn identical_replacement_is_dropped() {
        let result = minimize_change("  x", change(0, 2, "  ")).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn deletion_passes_through() {
        let finding = minimize_change("abc  ", change(3, 5, "")).unwrap().unwrap();
        assert_eq!(finding.span, TextSpan::new(3, 5).unwrap());
        assert!(finding.replacement_text.is_empty());
    }

    #[test]
    fn leading_trim_wins_over_trailing_trim() {
        // "aa" -> "a" matches at both edges; the head is deleted.
        let finding = minimize_change("aa", change(0, 2, "a")).unwrap().unwrap();
        assert_eq!(finding.span, TextSpan::new(0, 1).unwrap());
    }

    #[test]
    fn multibyte_tail_is_trimmed_on_char_boundaries() {
        let finding = minimize_change("\u{3000}é", change(0, 5, "é"))
            .unwrap()
            .unwrap();
        assert_eq!(finding.span, TextSpan::new(0, 3).unwrap());
    }
}
