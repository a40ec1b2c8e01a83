//! Byte-offset to source-line lookup.
//!
//! [`LineIndex`] is built once per loaded document and answers "which line
//! does this byte belong to" with a binary search. [`SourceDocument`] pairs
//! the raw bytes with their index and serves verbatim line excerpts to the
//! comment and citation code.

use crate::error::ParseError;
use crate::types::SourceRange;

/// Sorted byte offsets of every line start. Entry 0 is always offset 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(bytes: &[u8]) -> Self {
        let mut starts = vec![0];
        starts.extend(
            bytes
                .iter()
                .enumerate()
                .filter(|(_, b)| **b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { starts }
    }

    /// Returns the 1-indexed line containing `offset`.
    ///
    /// Equal to the number of line starts `<= offset`. Offsets past the end
    /// land on the last line; a trailing newline opens an (empty) final line.
    pub fn line_at(&self, offset: usize) -> usize {
        self.starts.partition_point(|&s| s <= offset).max(1)
    }

    /// Number of line starts, counting the empty line after a trailing
    /// newline.
    pub fn len(&self) -> usize {
        self.starts.len()
    }

    /// Always false: even an empty buffer has line 1.
    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }
}

/// The raw bytes of a loaded document together with their [`LineIndex`].
///
/// Immutable after construction.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    bytes: Vec<u8>,
    index: LineIndex,
    lines: Vec<String>,
}

impl SourceDocument {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        let index = LineIndex::new(&bytes);
        let lines = String::from_utf8_lossy(&bytes)
            .split('\n')
            .map(str::to_owned)
            .collect();
        Self { bytes, index, lines }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The document as text, or the offset of the first invalid byte.
    pub fn text(&self) -> Result<&str, ParseError> {
        std::str::from_utf8(&self.bytes).map_err(|e| ParseError::InvalidUtf8 {
            offset: e.valid_up_to(),
        })
    }

    /// 1-indexed line number containing byte `offset`.
    pub fn line_at(&self, offset: usize) -> usize {
        self.index.line_at(offset)
    }

    /// Number of source lines. A trailing newline counts as opening one more
    /// (empty) line, matching a plain split on `'\n'`.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Text of the 1-indexed `line`, without its newline.
    pub fn line(&self, line: usize) -> Option<&str> {
        line.checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .map(String::as_str)
    }

    /// Verbatim text of the lines in `range`, joined with `'\n'`.
    ///
    /// The range is clamped to the document. A range lying entirely past the
    /// end yields an empty string.
    pub fn excerpt(&self, range: SourceRange) -> String {
        self.excerpt_lines(range).join("\n")
    }

    /// The lines of `range` after clamping to the document.
    pub fn excerpt_lines(&self, range: SourceRange) -> Vec<&str> {
        let end = range.end.min(self.line_count());
        (range.start.max(1)..=end).filter_map(|n| self.line(n)).collect()
    }
}
