/// Byte offset to line/column translation for one document.
///
/// Lines and columns are 1-based; columns count characters, not bytes.
/// Only `\n` starts a new line.
#[derive(Clone, Debug)]
pub struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(idx, _)| idx + 1))
            .collect();
        Self { text, line_starts }
    }

    /// Position of `offset`; offsets past the end clamp to the end of text.
    pub fn locate(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.text.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(next) => next - 1,
        };
        let start = self.line_starts[line];
        let column = self
            .text
            .get(start..offset)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(offset - start);
        (line + 1, column + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locates_offsets_across_lines() {
        let index = LineIndex::new("ab\ncd\n\nz");
        assert_eq!(index.locate(0), (1, 1));
        assert_eq!(index.locate(2), (1, 3));
        assert_eq!(index.locate(3), (2, 1));
        assert_eq!(index.locate(7), (4, 1));
        assert_eq!(index.locate(8), (4, 2));
        assert_eq!(index.locate(99), (4, 2));
    }

    #[test]
    fn columns_count_characters() {
        let index = LineIndex::new("héllo  \n");
        assert_eq!(index.locate(6), (1, 6));
    }
}
