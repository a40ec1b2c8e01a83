//! Document tree consumed by the renderer.
//!
//! A closed set of block and inline variants. Leaf blocks keep the byte span
//! they were parsed from; container blocks (lists, quotes, unknown kinds)
//! keep none, and their line range is derived from their children.

use std::ops::Range;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading {
        level: u8,
        span: Range<usize>,
        content: Vec<Inline>,
    },
    /// A paragraph, or the implicit text run of a tight list item or a
    /// table cell.
    Paragraph {
        span: Range<usize>,
        content: Vec<Inline>,
    },
    CodeBlock {
        language: Option<String>,
        span: Range<usize>,
        lines: Vec<LiteralLine>,
    },
    List {
        /// `Some(n)` for ordered lists starting at `n`.
        start: Option<u64>,
        items: Vec<ListItem>,
    },
    BlockQuote {
        children: Vec<Block>,
    },
    ThematicBreak {
        span: Range<usize>,
    },
    HtmlBlock {
        span: Range<usize>,
        lines: Vec<LiteralLine>,
    },
    /// Anything else the parser produces (tables, footnote definitions).
    Other {
        children: Vec<Block>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListItem {
    pub blocks: Vec<Block>,
}

/// One line of a code or HTML block, with the byte offset where it starts in
/// the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralLine {
    pub text: String,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    SoftBreak,
    HardBreak,
    Code(String),
    Emphasis(Vec<Inline>),
    Strong(Vec<Inline>),
    Strikethrough(Vec<Inline>),
    Link { dest: String, children: Vec<Inline> },
    Image { dest: String, alt: Vec<Inline> },
    AutoLink(String),
    Html(String),
    /// Unrecognized inline kinds; only their text is rendered.
    Other(Vec<Inline>),
}
