//! End-to-end checks of the rendered line map: parse real markdown, render
//! it, and hold the mapping table to its invariants.

use mdnote_core::citation;
use mdnote_core::parse::parse;
use mdnote_core::style::StyleTable;
use mdnote_core::{render, AnnotationFile, Comment, Renderer, SourceDocument, SourceRange};

const KITCHEN_SINK: &str = "\
# Heading one

Intro paragraph with *emphasis*, **strong**, `code`, a [link](https://example.com)
and ![an image](img.png) spread over two lines.

## Lists

1. first
2. second with a much longer body that will certainly need to wrap at a narrow width
   - nested bullet
   - another

- loose item

  with a second paragraph

> quoted text
> > nested quote

```rust
fn main() {
    println!(\"hi\");
}
```

    indented code

<div>
raw html
</div>

---

| a | b |
|---|---|
| 1 | 2 |

Final line.[^1]

[^1]: A footnote.
";

fn rendered(text: &str, width: usize) -> mdnote_core::RenderedDocument {
    let source = SourceDocument::new(text);
    let ast = parse(&source).unwrap();
    render(&ast, &source, width)
}

#[test]
fn every_mapping_is_well_formed_at_any_width() {
    let line_count = SourceDocument::new(KITCHEN_SINK).line_count();
    for width in [0, 1, 10, 24, 80, 200] {
        let doc = rendered(KITCHEN_SINK, width);
        assert!(!doc.is_empty());
        assert_eq!(doc.mappings().count(), doc.len(), "one mapping per line");
        for (i, range) in doc.mappings().enumerate() {
            assert!(range.is_well_formed(), "width {width}, line {i}: {range:?}");
            assert!(range.end <= line_count, "width {width}, line {i}: {range:?}");
        }
    }
}

#[test]
fn unknown_blocks_keep_their_text() {
    let doc = rendered("| alpha | beta |\n|---|---|\n| one | two |\n", 80);
    let all: String = doc.lines().iter().map(|l| l.text.as_str()).collect::<Vec<_>>().join("\n");
    for cell in ["alpha", "beta", "one", "two"] {
        assert!(all.contains(cell), "table cell {cell:?} dropped:\n{all}");
    }

    let doc = rendered(KITCHEN_SINK, 80);
    assert!(
        doc.lines().iter().any(|l| l.text.contains("A footnote.")),
        "footnote definition dropped"
    );
}

#[test]
fn heading_maps_to_line_one() {
    let doc = rendered("# Hello World\n\nSome text here.\n", 80);
    let first = &doc.lines()[0];
    assert!(first.text.contains("Hello World"), "got {:?}", first.text);
    assert_eq!(first.range.start, 1);
}

#[test]
fn fenced_code_maps_each_line() {
    let text = "intro\n\n```\nalpha\nbeta\ngamma\ndelta\n```\n";
    let doc = rendered(text, 80);
    let code: Vec<_> = doc
        .lines()
        .iter()
        .filter(|l| ["alpha", "beta", "gamma", "delta"].iter().any(|w| l.text.contains(w)))
        .collect();
    assert_eq!(code.len(), 4, "one rendered line per literal line");
    let starts: Vec<usize> = code.iter().map(|l| l.range.start).collect();
    assert_eq!(starts, vec![4, 5, 6, 7]);
    assert!(code.iter().all(|l| l.range.start == l.range.end));
}

#[test]
fn code_inside_quote_keeps_line_numbers() {
    let text = "> ```\n> one\n> two\n> ```\n";
    let doc = rendered(text, 80);
    let one = doc.lines().iter().find(|l| l.text.contains("one")).unwrap();
    let two = doc.lines().iter().find(|l| l.text.contains("two")).unwrap();
    assert_eq!(one.range, SourceRange::line(2));
    assert_eq!(two.range, SourceRange::line(3));
}

#[test]
fn wrapped_lines_fit_width() {
    let source = SourceDocument::new(KITCHEN_SINK);
    let doc = Renderer::new(&source, 30)
        .with_styles(StyleTable::plain())
        .render(&parse(&source).unwrap());
    for line in doc.lines() {
        let width = mdnote_core::wrap::visible_width(&line.text);
        let is_literal = line.text.starts_with(' ') && line.range.start == line.range.end;
        assert!(
            width <= 30 || is_literal,
            "line too wide: {:?}",
            line.text
        );
    }
}

#[test]
fn selection_round_trips_to_citation() {
    let text = "l1\nl2\n\nl4\nl5\n";
    let source = SourceDocument::new(text);
    let mut file = AnnotationFile::new("/tmp/x.md", "h");
    file.add(Comment::new(SourceRange::new(4, 5), source.excerpt(SourceRange::new(4, 5)), "second"));
    file.add(Comment::new(SourceRange::new(1, 2), source.excerpt(SourceRange::new(1, 2)), "first"));

    let out = citation::format(&file, &source);
    let first = out.find("> l1\n> l2").expect("first excerpt");
    let second = out.find("> l4\n> l5").expect("second excerpt");
    assert!(first < second, "citation must follow source order:\n{out}");
}

#[test]
fn non_utf8_is_a_parse_error() {
    let source = SourceDocument::new(vec![b'#', b' ', 0xc3, 0x28]);
    assert!(parse(&source).is_err());
}
