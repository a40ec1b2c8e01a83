//! Markdown export of a document's comments, each with the source lines it
//! refers to quoted verbatim.

use std::fmt::Write;

use crate::line_index::SourceDocument;
use crate::types::{AnnotationFile, Comment};

/// Formats every comment in `file` as a citation document.
///
/// Returns an empty string when there are no comments. Comments appear in
/// source order; excerpts are clamped to the document's current length, so
/// a comment on lines that no longer exist quotes nothing.
pub fn format(file: &AnnotationFile, source: &SourceDocument) -> String {
    if file.is_empty() {
        return String::new();
    }

    let name = file
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.file.display().to_string());

    let mut out = String::new();
    let _ = writeln!(out, "## Comments on {name}\n");

    let sorted = file.sorted_comments();
    for (i, comment) in sorted.iter().enumerate() {
        entry(&mut out, comment, source);
        if i + 1 < sorted.len() {
            out.push_str("\n---\n\n");
        } else {
            out.push('\n');
        }
    }
    out
}

fn entry(out: &mut String, comment: &Comment, source: &SourceDocument) {
    let r = comment.range;
    if r.start == r.end {
        let _ = writeln!(out, "### Line {}:", r.start);
    } else {
        let _ = writeln!(out, "### Lines {}-{}:", r.start, r.end);
    }
    for line in source.excerpt_lines(r) {
        let _ = writeln!(out, "> {line}");
    }
    out.push('\n');
    let _ = writeln!(out, "**Comment:** {}", comment.body);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceRange;

    fn annotated(ranges: &[(usize, usize, &str)]) -> AnnotationFile {
        let mut file = AnnotationFile::new("/docs/guide.md", "h");
        for &(s, e, body) in ranges {
            file.add(Comment::new(SourceRange::new(s, e), "", body));
        }
        file
    }

    #[test]
    fn no_comments_is_empty() {
        let source = SourceDocument::new("x\n");
        assert_eq!(format(&annotated(&[]), &source), "");
    }

    #[test]
    fn single_entry_layout() {
        let source = SourceDocument::new("first\nsecond\nthird\n");
        let out = format(&annotated(&[(2, 3, "tighten this")]), &source);
        assert_eq!(
            out,
            "## Comments on guide.md\n\n\
             ### Lines 2-3:\n\
             > second\n\
             > third\n\
             \n\
             **Comment:** tighten this\n\
             \n"
        );
    }

    #[test]
    fn entries_sorted_and_divided() {
        let source = SourceDocument::new("l1\nl2\nl3\nl4\nl5\n");
        let out = format(&annotated(&[(4, 5, "later"), (1, 2, "earlier")]), &source);
        let early = out.find("> l1").unwrap();
        let late = out.find("> l4").unwrap();
        assert!(early < late);
        assert_eq!(out.matches("---").count(), 1);
        assert!(out.ends_with("**Comment:** later\n\n"));
    }

    #[test]
    fn single_line_heading_and_clamp() {
        let source = SourceDocument::new("only");
        let out = format(&annotated(&[(1, 1, "a"), (3, 9, "gone")]), &source);
        assert!(out.contains("### Line 1:\n> only\n"));
        assert!(out.contains("### Lines 3-9:\n\n**Comment:** gone"));
    }
}
