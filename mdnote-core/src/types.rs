use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// An inclusive, 1-indexed span of source lines.
///
/// Every rendered line and every comment points at one of these. A
/// well-formed range satisfies `1 <= start <= end`; single-line ranges have
/// `start == end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRange {
    #[serde(rename = "source_start")]
    pub start: usize,
    #[serde(rename = "source_end")]
    pub end: usize,
}

impl SourceRange {
    /// The fallback range used when nothing better can be derived.
    pub const FIRST_LINE: SourceRange = SourceRange { start: 1, end: 1 };

    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A range covering exactly one source line.
    pub fn line(n: usize) -> Self {
        Self { start: n, end: n }
    }

    pub fn is_well_formed(&self) -> bool {
        self.start >= 1 && self.start <= self.end
    }

    pub fn contains(&self, line: usize) -> bool {
        self.start <= line && line <= self.end
    }

    /// True when the two ranges share at least one line.
    pub fn overlaps(&self, other: &SourceRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Smallest range covering both `self` and `other`.
    pub fn union(self, other: SourceRange) -> SourceRange {
        SourceRange {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl std::fmt::Display for SourceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.start == self.end {
            write!(f, "L{}", self.start)
        } else {
            write!(f, "L{}-{}", self.start, self.end)
        }
    }
}

/// A single comment anchored to a source-line range.
///
/// Comments are immutable once created; the only lifecycle event after
/// creation is deletion by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String, // UUID v4 text
    #[serde(flatten)]
    pub range: SourceRange,
    /// Verbatim source lines at the time the comment was made.
    pub selected_text: String,
    #[serde(rename = "comment")]
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Creates a comment with a fresh UUID and the current timestamp.
    pub fn new(range: SourceRange, selected_text: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            range,
            selected_text: selected_text.into(),
            body: body.into(),
            created_at: Utc::now(),
        }
    }
}

/// All annotations recorded against one document.
///
/// `comments` is kept in insertion order. Anything that displays comments
/// goes through [`AnnotationFile::sorted_comments`], which orders by
/// `range.start` without touching the stored vector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationFile {
    /// Absolute path of the annotated document.
    pub file: PathBuf,
    /// Hex SHA-256 of the document when this record was first created.
    pub file_hash: String,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl AnnotationFile {
    pub fn new(file: impl Into<PathBuf>, file_hash: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            file_hash: file_hash.into(),
            comments: Vec::new(),
        }
    }

    pub fn add(&mut self, comment: Comment) {
        self.comments.push(comment);
    }

    /// Removes the comment with the given id. Returns `false` when no such
    /// comment exists.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.comments.len();
        self.comments.retain(|c| c.id != id);
        self.comments.len() != before
    }

    /// Comments ordered by starting line, ties kept in insertion order.
    pub fn sorted_comments(&self) -> Vec<&Comment> {
        let mut sorted: Vec<&Comment> = self.comments.iter().collect();
        sorted.sort_by_key(|c| c.range.start);
        sorted
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    /// True when the document's current hash differs from the recorded one.
    pub fn is_stale(&self, current_hash: &str) -> bool {
        self.file_hash != current_hash
    }
}
