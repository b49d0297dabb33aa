use crate::error::{ChangeError, ChangeResult};
use crate::finding::Finding;

/// Produce the text that results from applying `findings` to `original`.
///
/// Findings must be ascending and non-overlapping, which is what the
/// minimizer emits for well-formed formatter output. Nothing is written to
/// disk; callers use the result for previews such as diffs.
pub fn apply_findings(original: &str, findings: &[Finding]) -> ChangeResult<String> {
    let mut output = String::with_capacity(original.len());
    let mut cursor = 0usize;

    for finding in findings {
        let span = finding.span;
        if span.start() < cursor {
            return Err(ChangeError::Unordered {
                span,
                previous_end: cursor,
            });
        }
        span.slice(original)?;
        output.push_str(&original[cursor..span.start()]);
        output.push_str(&finding.replacement_text);
        cursor = span.end();
    }

    output.push_str(&original[cursor..]);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::TextSpan;

    fn finding(start: usize, end: usize, text: &str) -> Finding {
        Finding {
            span: TextSpan::new(start, end).unwrap(),
            replacement_text: text.to_string(),
        }
    }

    #[test]
    fn applies_in_order() {
        let text = "a  b\t\n";
        let result =
            apply_findings(text, &[finding(1, 2, ""), finding(4, 5, ""), finding(6, 6, "c")])
                .unwrap();
        assert_eq!(result, "a b\nc");
    }

    #[test]
    fn rejects_overlap() {
        let err = apply_findings("abcdef", &[finding(0, 3, ""), finding(2, 4, "")]).unwrap_err();
        assert!(matches!(err, ChangeError::Unordered { previous_end: 3, .. }));
    }
}
