use std::fmt;
use std::ops::Range;

use crate::error::{ChangeError, ChangeResult};

/// Half-open byte range `[start, end)` over a document's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextSpan {
    start: usize,
    end: usize,
}

impl TextSpan {
    /// Build a span, rejecting reversed bounds.
    pub fn new(start: usize, end: usize) -> ChangeResult<Self> {
        if start > end {
            return Err(ChangeError::ReversedSpan { start, end });
        }
        Ok(Self { start, end })
    }

    /// Span of `len` bytes beginning at `start`.
    pub fn from_len(start: usize, len: usize) -> Self {
        Self {
            start,
            end: start + len,
        }
    }

    /// Zero-length span at `offset`, used for insertions.
    pub fn empty(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Borrow the covered slice of `text`.
    ///
    /// Fails when the span runs past the end of `text` or splits a UTF-8
    /// sequence; the caller is never handed a clamped slice.
    pub fn slice<'a>(&self, text: &'a str) -> ChangeResult<&'a str> {
        if self.end > text.len() {
            return Err(ChangeError::OutOfBounds {
                span: *self,
                text_len: text.len(),
            });
        }
        for offset in [self.start, self.end] {
            if !text.is_char_boundary(offset) {
                return Err(ChangeError::NotCharBoundary { offset });
            }
        }
        Ok(&text[self.range()])
    }
}

impl fmt::Display for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{})", self.start, self.end)
    }
}

impl TryFrom<Range<usize>> for TextSpan {
    type Error = ChangeError;

    fn try_from(range: Range<usize>) -> Result<Self, Self::Error> {
        TextSpan::new(range.start, range.end)
    }
}

/// Replace the text covered by `span` with `new_text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChange {
    span: TextSpan,
    new_text: String,
}

impl TextChange {
    pub fn new(span: TextSpan, new_text: impl Into<String>) -> Self {
        Self {
            span,
            new_text: new_text.into(),
        }
    }

    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::new(TextSpan::empty(offset), text)
    }

    pub fn delete(span: TextSpan) -> Self {
        Self::new(span, String::new())
    }

    pub fn span(&self) -> TextSpan {
        self.span
    }

    pub fn new_text(&self) -> &str {
        &self.new_text
    }

    /// True when applying the change cannot alter any text.
    pub fn is_noop(&self) -> bool {
        self.span.is_empty() && self.new_text.is_empty()
    }

    pub fn into_parts(self) -> (TextSpan, String) {
        (self.span, self.new_text)
    }
}
