use thiserror::Error;

use crate::span::TextSpan;

/// Contract violations in edits handed to the core by a formatter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChangeError {
    #[error("span start {start} is after its end {end}")]
    ReversedSpan { start: usize, end: usize },

    #[error("span {span} exceeds text length {text_len}")]
    OutOfBounds { span: TextSpan, text_len: usize },

    #[error("offset {offset} does not fall on a character boundary")]
    NotCharBoundary { offset: usize },

    #[error("change at {span} overlaps or precedes the change ending at {previous_end}")]
    Unordered { span: TextSpan, previous_end: usize },
}

pub type ChangeResult<T> = Result<T, ChangeError>;
