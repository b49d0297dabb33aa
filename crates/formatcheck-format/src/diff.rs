use similar::TextDiff;

/// Unified diff between `original` and `modified`, or `None` when they match.
pub fn build_unified_diff(original: &str, modified: &str, path: &str) -> Option<String> {
    if original == modified {
        return None;
    }

    let header_old = format!("a/{path}");
    let header_new = format!("b/{path}");
    let diff = TextDiff::from_lines(original, modified);
    let rendered = diff
        .unified_diff()
        .missing_newline_hint(true)
        .header(&header_old, &header_new)
        .to_string();
    Some(rendered)
}
