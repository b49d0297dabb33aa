use formatcheck_core::{
    minimize_changes, ChangeError, Finding, FindingKind, TextChange, TextSpan,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn span(start: usize, end: usize) -> TextSpan {
    TextSpan::new(start, end).expect("valid span")
}

fn change(start: usize, end: usize, text: &str) -> TextChange {
    TextChange::new(span(start, end), text)
}

fn finding(start: usize, end: usize, text: &str) -> Finding {
    Finding {
        span: span(start, end),
        replacement_text: text.to_string(),
    }
}

#[test]
fn shrinking_indentation_deletes_leading_spaces() {
    let findings = minimize_changes("    if (x)", vec![change(0, 4, "  ")]).unwrap();
    assert_eq!(findings, vec![finding(0, 2, "")]);
    assert_eq!(findings[0].kind(), FindingKind::Deletion);
}

#[test]
fn dropping_a_suffix_deletes_the_tail() {
    let findings = minimize_changes("abcXXX", vec![change(0, 6, "abc")]).unwrap();
    assert_eq!(findings, vec![finding(3, 6, "")]);
}

#[test]
fn growth_is_reported_unchanged() {
    let findings = minimize_changes("foo", vec![change(0, 3, "barbaz")]).unwrap();
    assert_eq!(findings, vec![finding(0, 3, "barbaz")]);
    assert_eq!(findings[0].kind(), FindingKind::Replacement);
}

#[test]
fn same_length_substitution_is_reported_unchanged() {
    let findings = minimize_changes("\tx", vec![change(0, 1, " ")]).unwrap();
    assert_eq!(findings, vec![finding(0, 1, " ")]);
}

#[test]
fn insertion_is_reported_unchanged() {
    let findings = minimize_changes("x", vec![change(1, 1, "\n")]).unwrap();
    assert_eq!(findings, vec![finding(1, 1, "\n")]);
    assert_eq!(findings[0].kind(), FindingKind::Insertion);
}

#[test]
fn interior_difference_is_not_trimmed_at_both_edges() {
    // Both edges match ("a...c") but only single-edge trimming is performed.
    let findings = minimize_changes("abbc", vec![change(0, 4, "abc")]).unwrap();
    assert_eq!(findings, vec![finding(0, 4, "abc")]);
}

#[test]
fn noops_are_dropped_and_order_is_kept() {
    let text = "a   b  c";
    let findings = minimize_changes(
        text,
        vec![
            change(1, 4, " "),
            change(4, 4, ""),
            change(5, 6, " "),
            change(6, 7, ""),
        ],
    )
    .unwrap();
    assert_eq!(findings, vec![finding(1, 3, ""), finding(6, 7, "")]);
}

#[test]
fn span_past_end_fails_fast() {
    let err = minimize_changes("abc", vec![change(1, 10, "")]).unwrap_err();
    assert_eq!(
        err,
        ChangeError::OutOfBounds {
            span: span(1, 10),
            text_len: 3,
        }
    );
}

#[test]
fn noop_past_end_still_fails() {
    let err = minimize_changes("abc", vec![change(7, 7, "")]).unwrap_err();
    assert!(matches!(err, ChangeError::OutOfBounds { .. }));
}

fn arbitrary_case() -> impl Strategy<Value = (String, usize, usize, String)> {
    "[ ab\\t\\n]{0,24}".prop_flat_map(|text| {
        let len = text.len();
        (Just(text), 0..=len, 0..=len, "[ ab\\t]{0,8}").prop_map(|(text, a, b, new_text)| {
            let (start, end) = if a <= b { (a, b) } else { (b, a) };
            (text, start, end, new_text)
        })
    })
}

proptest! {
    #[test]
    fn minimization_is_a_fixed_point((text, start, end, new_text) in arbitrary_case()) {
        let first = minimize_changes(&text, vec![change(start, end, &new_text)]).unwrap();
        let second = minimize_changes(&text, first.iter().map(Finding::to_change)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn minimized_edit_produces_the_same_text((text, start, end, new_text) in arbitrary_case()) {
        let raw = change(start, end, &new_text);
        let expected = format!("{}{}{}", &text[..start], new_text, &text[end..]);
        let findings = minimize_changes(&text, vec![raw]).unwrap();
        let applied = formatcheck_core::apply_findings(&text, &findings).unwrap();
        prop_assert_eq!(applied, expected);
    }
}
