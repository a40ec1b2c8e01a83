//! Builds a [`Document`] from markdown source with `pulldown-cmark`.
//!
//! The parser's flat event stream (with byte ranges) is folded into the
//! closed tree in [`crate::ast`]. Inline events that appear directly inside a
//! container (tight list items, table cells) are gathered into an implicit
//! paragraph whose span covers exactly those events.

use std::iter::Peekable;
use std::ops::Range;
use std::vec::IntoIter;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, LinkType, Options, Parser, Tag};

use crate::ast::{Block, Document, Inline, ListItem, LiteralLine};
use crate::error::ParseError;
use crate::line_index::SourceDocument;

/// Parses the document's markdown.
///
/// # Errors
///
/// Returns [`ParseError::InvalidUtf8`] if the bytes are not UTF-8. Any UTF-8
/// input produces a tree.
pub fn parse(source: &SourceDocument) -> Result<Document, ParseError> {
    let text = source.text()?;
    Ok(parse_str(text))
}

/// Parses markdown text that is already known to be valid.
pub fn parse_str(text: &str) -> Document {
    let options = Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TABLES
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES;
    let events: Vec<_> = Parser::new_ext(text, options).into_offset_iter().collect();
    let mut builder = TreeBuilder {
        events: events.into_iter().peekable(),
        text,
    };
    let blocks = builder.blocks();
    tracing::debug!(blocks = blocks.len(), bytes = text.len(), "parsed document");
    Document { blocks }
}

struct TreeBuilder<'a> {
    events: Peekable<IntoIter<(Event<'a>, Range<usize>)>>,
    text: &'a str,
}

impl<'a> TreeBuilder<'a> {
    /// Consumes block-level events up to (and including) the next unmatched
    /// end tag, or to the end of input.
    fn blocks(&mut self) -> Vec<Block> {
        let mut out = Vec::new();
        loop {
            if self.events.peek().is_some_and(|(ev, _)| is_inline(ev)) {
                out.push(self.implicit_paragraph());
                continue;
            }
            let Some((event, range)) = self.events.next() else {
                break;
            };
            match event {
                Event::End(_) => break,
                Event::Start(tag) => out.push(self.block(tag, range)),
                Event::Rule => out.push(Block::ThematicBreak { span: range }),
                Event::Html(html) => out.push(Block::HtmlBlock {
                    lines: literal_lines(self.text, &html, range.start),
                    span: range,
                }),
                _ => {}
            }
        }
        out
    }

    fn block(&mut self, tag: Tag<'a>, span: Range<usize>) -> Block {
        match tag {
            Tag::Paragraph => Block::Paragraph {
                content: self.inlines(),
                span,
            },
            Tag::Heading { level, .. } => Block::Heading {
                level: heading_level(level),
                content: self.inlines(),
                span,
            },
            Tag::BlockQuote(_) => Block::BlockQuote {
                children: self.blocks(),
            },
            Tag::CodeBlock(kind) => {
                let language = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(str::to_owned),
                    CodeBlockKind::Indented => None,
                };
                Block::CodeBlock {
                    language,
                    lines: self.literal_block(),
                    span,
                }
            }
            Tag::HtmlBlock => Block::HtmlBlock {
                lines: self.literal_block(),
                span,
            },
            Tag::List(start) => Block::List {
                start,
                items: self.list_items(),
            },
            _ => Block::Other {
                children: self.blocks(),
            },
        }
    }

    fn list_items(&mut self) -> Vec<ListItem> {
        let mut items = Vec::new();
        while let Some((event, _)) = self.events.next() {
            match event {
                Event::Start(Tag::Item) => items.push(ListItem {
                    blocks: self.blocks(),
                }),
                Event::End(_) => break,
                _ => {}
            }
        }
        items
    }

    /// Collects the text of a code or HTML block, one entry per source line.
    fn literal_block(&mut self) -> Vec<LiteralLine> {
        let mut lines = Vec::new();
        while let Some((event, range)) = self.events.next() {
            match event {
                Event::Text(t) | Event::Html(t) => {
                    lines.extend(literal_lines(self.text, &t, range.start));
                }
                Event::End(_) => break,
                _ => {}
            }
        }
        lines
    }

    fn implicit_paragraph(&mut self) -> Block {
        let mut content = Vec::new();
        let mut span: Option<Range<usize>> = None;
        while self.events.peek().is_some_and(|(ev, _)| is_inline(ev)) {
            let Some((event, range)) = self.events.next() else {
                break;
            };
            span = Some(match span {
                Some(s) => s.start.min(range.start)..s.end.max(range.end),
                None => range,
            });
            content.push(self.inline(event));
        }
        Block::Paragraph {
            span: span.unwrap_or(0..0),
            content,
        }
    }

    /// Consumes inline events up to the enclosing end tag.
    fn inlines(&mut self) -> Vec<Inline> {
        let mut out = Vec::new();
        while let Some((event, _)) = self.events.next() {
            if matches!(event, Event::End(_)) {
                break;
            }
            out.push(self.inline(event));
        }
        out
    }

    fn inline(&mut self, event: Event<'a>) -> Inline {
        match event {
            Event::Text(t) => Inline::Text(t.into_string()),
            Event::Code(t) => Inline::Code(t.into_string()),
            Event::InlineHtml(t) | Event::Html(t) => Inline::Html(t.into_string()),
            Event::SoftBreak => Inline::SoftBreak,
            Event::HardBreak => Inline::HardBreak,
            Event::FootnoteReference(label) => Inline::Other(vec![Inline::Text(format!("[^{label}]"))]),
            Event::TaskListMarker(done) => {
                let mark = if done { "[x] " } else { "[ ] " };
                Inline::Other(vec![Inline::Text(mark.to_string())])
            }
            Event::Start(tag) => match tag {
                Tag::Emphasis => Inline::Emphasis(self.inlines()),
                Tag::Strong => Inline::Strong(self.inlines()),
                Tag::Strikethrough => Inline::Strikethrough(self.inlines()),
                Tag::Link {
                    link_type: LinkType::Autolink | LinkType::Email,
                    dest_url,
                    ..
                } => {
                    // The children repeat the destination.
                    self.inlines();
                    Inline::AutoLink(dest_url.into_string())
                }
                Tag::Link { dest_url, .. } => Inline::Link {
                    dest: dest_url.into_string(),
                    children: self.inlines(),
                },
                Tag::Image { dest_url, .. } => Inline::Image {
                    dest: dest_url.into_string(),
                    alt: self.inlines(),
                },
                _ => Inline::Other(self.inlines()),
            },
            Event::InlineMath(t) | Event::DisplayMath(t) => Inline::Other(vec![Inline::Text(t.into_string())]),
            _ => Inline::Other(Vec::new()),
        }
    }
}

fn is_inline(event: &Event<'_>) -> bool {
    match event {
        Event::Text(_)
        | Event::Code(_)
        | Event::InlineHtml(_)
        | Event::SoftBreak
        | Event::HardBreak
        | Event::FootnoteReference(_)
        | Event::TaskListMarker(_)
        | Event::InlineMath(_)
        | Event::DisplayMath(_) => true,
        Event::Start(tag) => matches!(
            tag,
            Tag::Emphasis
                | Tag::Strong
                | Tag::Strikethrough
                | Tag::Link { .. }
                | Tag::Image { .. }
        ),
        _ => false,
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Splits one text event of a literal block into lines and locates each
/// line's start in the source.
///
/// The first line starts at the event's own offset; each further line starts
/// just past the next newline in the source. This holds even when the
/// parser stripped indentation or quote markers from the event text.
fn literal_lines(source: &str, text: &str, start: usize) -> Vec<LiteralLine> {
    let mut offset = start;
    let mut out = Vec::new();
    for (i, piece) in text.split_inclusive('\n').enumerate() {
        if i > 0 {
            offset = source
                .get(offset..)
                .and_then(|rest| rest.find('\n'))
                .map_or(offset, |p| offset + p + 1);
        }
        out.push(LiteralLine {
            text: piece.trim_end_matches(['\n', '\r']).to_string(),
            offset,
        });
    }
    out
}
