//! Reference whitespace formatter.
//!
//! Produces deliberately coarse edits (whole indentation runs, whole line
//! terminators, the last word of a line together with its trailing blanks)
//! and leaves narrowing them down to the minimizer.

use formatcheck_core::{TextChange, TextSpan};
use formatcheck_options::catalog::{
    END_OF_LINE, INDENT_SIZE, INDENT_STYLE, INSERT_FINAL_NEWLINE, TAB_WIDTH,
    TRIM_TRAILING_WHITESPACE,
};
use formatcheck_options::ResolvedOptionSet;

use crate::formatter::Formatter;

/// Widest indentation, in columns, the formatter will rewrite. Larger
/// widths from conventions are treated like unusable ones.
const MAX_INDENT_WIDTH: usize = u16::MAX as usize;

/// Whitespace conventions formatter: indentation, trailing blanks, line
/// endings and the final newline.
#[derive(Clone, Copy, Debug, Default)]
pub struct WhitespaceFormatter;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum IndentStyle {
    Space,
    Tab,
}

#[derive(Clone, Copy, Debug)]
struct Settings {
    indent_style: IndentStyle,
    indent_size: Option<usize>,
    tab_width: Option<usize>,
    line_ending: &'static str,
    insert_final_newline: bool,
    trim_trailing_whitespace: bool,
}

impl Settings {
    fn resolve(options: &ResolvedOptionSet, language: &str) -> Self {
        let positive = |value: Option<i64>| {
            value
                .and_then(|value| usize::try_from(value).ok())
                .filter(|value| (1..=MAX_INDENT_WIDTH).contains(value))
        };

        let indent_style = match options.get_literal(&INDENT_STYLE, language) {
            Some("tab") => IndentStyle::Tab,
            _ => IndentStyle::Space,
        };
        let line_ending = match options.get_literal(&END_OF_LINE, language) {
            Some("crlf") => "\r\n",
            Some("cr") => "\r",
            _ => "\n",
        };

        Settings {
            indent_style,
            indent_size: positive(options.get_int(&INDENT_SIZE, language)),
            tab_width: positive(options.get_int(&TAB_WIDTH, language)),
            line_ending,
            insert_final_newline: options
                .get_bool(&INSERT_FINAL_NEWLINE, language)
                .unwrap_or(true),
            trim_trailing_whitespace: options
                .get_bool(&TRIM_TRAILING_WHITESPACE, language)
                .unwrap_or(true),
        }
    }
}

impl Formatter for WhitespaceFormatter {
    fn format(&self, text: &str, language: &str, options: &ResolvedOptionSet) -> Vec<TextChange> {
        let settings = Settings::resolve(options, language);
        let mut changes = Vec::new();
        let mut last_terminated = true;

        for line in Lines::new(text) {
            let content = &text[line.start..line.content_end];
            let indent_len = content.len() - content.trim_start_matches(is_blank).len();

            if indent_len == content.len() {
                if settings.trim_trailing_whitespace && indent_len > 0 {
                    changes.push(TextChange::delete(TextSpan::from_len(line.start, indent_len)));
                }
            } else {
                if let Some(indent) = rewrite_indent(&content[..indent_len], &settings) {
                    changes.push(TextChange::new(
                        TextSpan::from_len(line.start, indent_len),
                        indent,
                    ));
                }
                if settings.trim_trailing_whitespace {
                    if let Some(change) = trim_trailing(content, line.start) {
                        changes.push(change);
                    }
                }
            }

            let terminator = &text[line.content_end..line.end];
            if !terminator.is_empty() && terminator != settings.line_ending {
                changes.push(TextChange::new(
                    TextSpan::from_len(line.content_end, terminator.len()),
                    settings.line_ending,
                ));
            }
            last_terminated = !terminator.is_empty();
        }

        if settings.insert_final_newline && !text.is_empty() && !last_terminated {
            changes.push(TextChange::insert(text.len(), settings.line_ending));
        }

        changes
    }
}

fn is_blank(ch: char) -> bool {
    ch == ' ' || ch == '\t'
}

/// Replacement for a leading whitespace run, or `None` when it already
/// follows the configured style.
fn rewrite_indent(indent: &str, settings: &Settings) -> Option<String> {
    if indent.is_empty() {
        return None;
    }

    let tab_width = settings.tab_width?;
    let width = indent
        .chars()
        .try_fold(0usize, |width, ch| match ch {
            '\t' => (width / tab_width).checked_add(1)?.checked_mul(tab_width),
            _ => width.checked_add(1),
        })
        .filter(|width| *width <= MAX_INDENT_WIDTH)?;

    let desired = match settings.indent_style {
        IndentStyle::Space => " ".repeat(width),
        IndentStyle::Tab => {
            let indent_size = settings.indent_size?;
            let mut desired = "\t".repeat(width / indent_size);
            desired.push_str(&" ".repeat(width % indent_size));
            desired
        }
    };

    (desired != indent).then_some(desired)
}

/// Coarse trailing-blank removal: the last word and its trailing blanks
/// become the word alone.
fn trim_trailing(content: &str, line_start: usize) -> Option<TextChange> {
    let trimmed = content.trim_end_matches(is_blank);
    if trimmed.len() == content.len() {
        return None;
    }

    let word_start = trimmed
        .rfind(is_blank)
        .map(|idx| idx + 1)
        .unwrap_or(0);
    let word = &trimmed[word_start..];
    Some(TextChange::new(
        TextSpan::from_len(line_start + word_start, content.len() - word_start),
        word,
    ))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Line {
    start: usize,
    content_end: usize,
    end: usize,
}

/// Lines of a text, each with its terminator (`\r\n`, `\n` or a lone `\r`).
struct Lines<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Lines {
            bytes: text.as_bytes(),
            position: 0,
        }
    }
}

impl Iterator for Lines<'_> {
    type Item = Line;

    fn next(&mut self) -> Option<Line> {
        if self.position >= self.bytes.len() {
            return None;
        }

        let start = self.position;
        let rest = &self.bytes[start..];
        let line = match rest.iter().position(|b| *b == b'\n' || *b == b'\r') {
            Some(idx) => {
                let content_end = start + idx;
                let terminator_len = match &rest[idx..] {
                    [b'\r', b'\n', ..] => 2,
                    _ => 1,
                };
                Line {
                    start,
                    content_end,
                    end: content_end + terminator_len,
                }
            }
            None => Line {
                start,
                content_end: self.bytes.len(),
                end: self.bytes.len(),
            },
        };
        self.position = line.end;
        Some(line)
    }
}
