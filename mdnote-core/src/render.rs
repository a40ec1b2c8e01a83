//! Turns a [`Document`] into styled, width-wrapped terminal lines.
//!
//! Every emitted [`RenderedLine`] carries the [`SourceRange`] it came from.
//! Wrapped paragraph lines share their block's range, while code and raw
//! HTML lines map to exactly one source line each. That difference is what
//! lets a selection over code become a per-line comment.
//!
//! Rendering is infallible: once a tree exists, any width produces a
//! document. The whole document is rebuilt on every width change.

use std::ops::Range;

use crate::ast::{Block, Document, Inline, ListItem};
use crate::line_index::SourceDocument;
use crate::style::{Role, StyleTable, RESET};
use crate::types::SourceRange;
use crate::wrap::{carry_styles, visible_width, wrap};

/// Quote children are laid out this many columns narrower than the quote.
const QUOTE_INSET: usize = 4;
/// Upper bound on the width of a thematic break.
const RULE_MAX_WIDTH: usize = 40;

/// One line of rendered output and the source lines it derives from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    /// Styled text, possibly containing SGR escape sequences.
    pub text: String,
    pub range: SourceRange,
}

/// Ordered rendered lines. Line `i`'s mapping is `lines()[i].range`, so the
/// line and mapping tables can never disagree in length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedDocument {
    lines: Vec<RenderedLine>,
}

impl RenderedDocument {
    pub fn lines(&self) -> &[RenderedLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Source range of rendered line `i`.
    pub fn mapping(&self, i: usize) -> Option<SourceRange> {
        self.lines.get(i).map(|l| l.range)
    }

    pub fn mappings(&self) -> impl Iterator<Item = SourceRange> + '_ {
        self.lines.iter().map(|l| l.range)
    }

    /// Source lines covered by rendered lines `lo..=hi`.
    ///
    /// Takes the minimum start and maximum end over every well-formed
    /// mapping in the window (clipped to the document). A window that lies
    /// entirely out of bounds yields line 1.
    pub fn source_range(&self, lo: usize, hi: usize) -> SourceRange {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        if lo >= self.lines.len() {
            return SourceRange::FIRST_LINE;
        }
        let hi = hi.min(self.lines.len() - 1);
        self.lines[lo..=hi]
            .iter()
            .map(|l| l.range)
            .filter(SourceRange::is_well_formed)
            .reduce(SourceRange::union)
            .unwrap_or(SourceRange::FIRST_LINE)
    }

    /// First rendered line whose mapping starts inside `target`.
    pub fn first_line_in(&self, target: SourceRange) -> Option<usize> {
        self.lines.iter().position(|l| target.contains(l.range.start))
    }
}

impl FromIterator<RenderedLine> for RenderedDocument {
    fn from_iter<T: IntoIterator<Item = RenderedLine>>(iter: T) -> Self {
        Self {
            lines: iter.into_iter().collect(),
        }
    }
}

/// Renders `doc` at `width` columns with the default ANSI styles.
pub fn render(doc: &Document, source: &SourceDocument, width: usize) -> RenderedDocument {
    Renderer::new(source, width).render(doc)
}

/// Single-use layout pass over a document tree.
pub struct Renderer<'a> {
    source: &'a SourceDocument,
    width: usize,
    styles: StyleTable,
    lines: Vec<RenderedLine>,
}

impl<'a> Renderer<'a> {
    pub fn new(source: &'a SourceDocument, width: usize) -> Self {
        Self {
            source,
            width,
            styles: StyleTable::default(),
            lines: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_styles(mut self, styles: StyleTable) -> Self {
        self.styles = styles;
        self
    }

    pub fn render(self, doc: &Document) -> RenderedDocument {
        let width = self.width;
        let rendered = self.render_blocks(&doc.blocks);
        tracing::debug!(width, lines = rendered.len(), "rendered document");
        rendered
    }

    fn render_blocks(mut self, blocks: &[Block]) -> RenderedDocument {
        for block in blocks {
            self.block(block, 0);
        }
        RenderedDocument { lines: self.lines }
    }

    /// A fresh renderer over the same source, at another width.
    fn nested(&self, width: usize) -> Renderer<'a> {
        Renderer {
            source: self.source,
            width,
            styles: self.styles,
            lines: Vec::new(),
        }
    }

    fn push(&mut self, text: String, range: SourceRange) {
        debug_assert!(range.is_well_formed(), "bad range {range:?}");
        self.lines.push(RenderedLine { text, range });
    }

    fn blank(&mut self, range: SourceRange) {
        self.push(String::new(), range);
    }

    fn block(&mut self, block: &Block, depth: usize) {
        match block {
            Block::Heading { level, span, content } => self.heading(*level, span, content),
            Block::Paragraph { span, content } => self.paragraph(span, content, depth),
            Block::CodeBlock {
                language,
                span,
                lines,
            } => {
                let range = self.span_range(span);
                if let Some(lang) = language.as_deref().filter(|l| !l.is_empty()) {
                    let header = self.styles.paint(Role::CodeLanguage, &format!(" {lang} "));
                    self.push(header, SourceRange::line(range.start));
                }
                for line in lines {
                    let text = self.styles.paint(Role::CodeBlock, &format!(" {} ", line.text));
                    self.push(text, SourceRange::line(self.source.line_at(line.offset)));
                }
                self.blank(SourceRange::line(range.end));
            }
            Block::List { start, items } => self.list(*start, items, depth),
            Block::BlockQuote { children } => {
                let inner = self
                    .nested(self.width.saturating_sub(QUOTE_INSET))
                    .render_blocks(children);
                let marker = self.styles.paint(Role::QuoteMarker, "│ ");
                for line in inner.lines {
                    self.push(format!("{marker}{}", line.text), line.range);
                }
            }
            Block::ThematicBreak { span } => {
                let range = self.span_range(span);
                let rule = "─".repeat(self.width.min(RULE_MAX_WIDTH));
                let text = self.styles.paint(Role::Rule, &rule);
                self.push(text, range);
                self.blank(range);
            }
            Block::HtmlBlock { span, lines } => {
                let range = self.span_range(span);
                for line in lines {
                    let text = self.styles.paint(Role::Html, &line.text);
                    self.push(text, SourceRange::line(self.source.line_at(line.offset)));
                }
                self.blank(SourceRange::line(range.end));
            }
            Block::Other { children } => {
                for child in children {
                    self.block(child, depth);
                }
            }
        }
    }

    fn heading(&mut self, level: u8, span: &Range<usize>, content: &[Inline]) {
        let range = self.span_range(span);
        let mut w = InlineWriter::new(&self.styles);
        w.open(Role::heading(level));
        w.text(&"#".repeat(usize::from(level)));
        w.text(" ");
        w.inlines(content);
        w.close();
        for line in carry_styles(wrap(&w.finish(), self.width)) {
            self.push(line, range);
        }
        self.blank(range);
    }

    fn paragraph(&mut self, span: &Range<usize>, content: &[Inline], depth: usize) {
        let range = self.span_range(span);
        let text = self.inline_text(content);
        for line in carry_styles(wrap(&text, self.width.saturating_sub(depth * 2))) {
            self.push(line, range);
        }
        self.blank(range);
    }

    fn list(&mut self, start: Option<u64>, items: &[ListItem], depth: usize) {
        let indent = "  ".repeat(depth);
        let mut number = start.unwrap_or(1);

        for item in items {
            let marker = match start {
                Some(_) => {
                    let m = format!("{number}. ");
                    number += 1;
                    m
                }
                None => "  • ".to_string(),
            };
            let hang = " ".repeat(visible_width(&marker));
            let text_width = self.width.saturating_sub(indent.len() + hang.len());
            let painted = self.styles.paint(Role::ListMarker, &marker);
            let mut first = true;
            let lead = |first: &mut bool| -> String {
                if std::mem::replace(first, false) {
                    format!("{indent}{painted}")
                } else {
                    format!("{indent}{hang}")
                }
            };

            for block in &item.blocks {
                match block {
                    Block::List { start, items } => {
                        // An item that opens with a sublist still shows its marker,
                        // on a line of its own.
                        if first {
                            let range = self.block_range(block).unwrap_or(SourceRange::FIRST_LINE);
                            self.push(lead(&mut first), range);
                        }
                        self.list(*start, items, depth + 1);
                    }
                    Block::Paragraph { span, content } => {
                        let range = self.span_range(span);
                        let text = self.inline_text(content);
                        for line in carry_styles(wrap(&text, text_width)) {
                            let text = format!("{}{line}", lead(&mut first));
                            self.push(text, range);
                        }
                    }
                    other => {
                        let nested = self.nested(text_width).render_blocks(std::slice::from_ref(other));
                        for line in nested.lines {
                            let text = format!("{}{}", lead(&mut first), line.text);
                            self.push(text, line.range);
                        }
                    }
                }
            }
        }

        let range = self
            .union_of(items.iter().flat_map(|i| &i.blocks))
            .unwrap_or(SourceRange::FIRST_LINE);
        self.blank(range);
    }

    /// The block's own span if it has one, else the union of its
    /// children's ranges. `None` when nothing below it has a span.
    fn block_range(&self, block: &Block) -> Option<SourceRange> {
        match block {
            Block::Heading { span, .. }
            | Block::Paragraph { span, .. }
            | Block::CodeBlock { span, .. }
            | Block::ThematicBreak { span }
            | Block::HtmlBlock { span, .. } => Some(self.span_range(span)),
            Block::List { items, .. } => self.union_of(items.iter().flat_map(|i| &i.blocks)),
            Block::BlockQuote { children } | Block::Other { children } => self.union_of(children),
        }
    }

    fn union_of<'b>(&self, blocks: impl IntoIterator<Item = &'b Block>) -> Option<SourceRange> {
        blocks
            .into_iter()
            .filter_map(|b| self.block_range(b))
            .reduce(SourceRange::union)
    }

    /// Lines touched by a byte span. The end is the line holding the span's
    /// last byte, so a span ending in a newline stays on that line.
    fn span_range(&self, span: &Range<usize>) -> SourceRange {
        let start = self.source.line_at(span.start);
        let last = span.end.saturating_sub(1).max(span.start);
        SourceRange::new(start, self.source.line_at(last).max(start))
    }

    fn inline_text(&self, content: &[Inline]) -> String {
        let mut w = InlineWriter::new(&self.styles);
        w.inlines(content);
        w.finish()
    }
}

/// Flattens inline nodes into one styled string.
///
/// Keeps a stack of open styles: closing a nested style resets and then
/// re-opens everything still enclosing it, so `**bold _both_ bold**` stays
/// bold after the italic part ends.
struct InlineWriter<'t> {
    styles: &'t StyleTable,
    out: String,
    active: Vec<Option<String>>,
}

impl<'t> InlineWriter<'t> {
    fn new(styles: &'t StyleTable) -> Self {
        Self {
            styles,
            out: String::new(),
            active: Vec::new(),
        }
    }

    fn open(&mut self, role: Role) {
        let seq = self.styles.open(role);
        if let Some(s) = &seq {
            self.out.push_str(s);
        }
        self.active.push(seq);
    }

    fn close(&mut self) {
        if let Some(Some(_)) = self.active.pop() {
            self.out.push_str(RESET);
            for seq in self.active.iter().flatten() {
                self.out.push_str(seq);
            }
        }
    }

    fn text(&mut self, s: &str) {
        self.out.push_str(s);
    }

    fn styled(&mut self, role: Role, f: impl FnOnce(&mut Self)) {
        self.open(role);
        f(self);
        self.close();
    }

    fn inlines(&mut self, items: &[Inline]) {
        for item in items {
            self.inline(item);
        }
    }

    fn inline(&mut self, item: &Inline) {
        match item {
            Inline::Text(t) | Inline::Html(t) => self.text(t),
            Inline::SoftBreak => self.text(" "),
            Inline::HardBreak => self.text("\n"),
            Inline::Code(code) => self.styled(Role::InlineCode, |w| w.text(&format!("`{code}`"))),
            Inline::Strong(c) => self.styled(Role::Strong, |w| w.inlines(c)),
            Inline::Emphasis(c) => self.styled(Role::Emphasis, |w| w.inlines(c)),
            Inline::Strikethrough(c) => self.styled(Role::Strikethrough, |w| w.inlines(c)),
            Inline::Link { dest, children } => {
                self.styled(Role::Link, |w| w.inlines(children));
                self.styled(Role::LinkDestination, |w| w.text(&format!(" ({dest})")));
            }
            Inline::Image { alt, .. } => self.styled(Role::Image, |w| {
                w.text("[img: ");
                w.inlines(alt);
                w.text("]");
            }),
            Inline::AutoLink(url) => self.styled(Role::Link, |w| w.text(url)),
            Inline::Other(children) => self.inlines(children),
        }
    }

    fn finish(self) -> String {
        self.out
    }
}
