//! Properties of the line map and the wrapping helpers over generated input.

use mdnote_core::parse::parse;
use mdnote_core::wrap::{visible_width, wrap};
use mdnote_core::{render, SourceDocument};
use proptest::prelude::*;

/// Pieces that exercise every block kind when glued together in any order.
const FRAGMENTS: &[&str] = &[
    "# ", "### ", "- ", "* ", "1. ", "12. ", "> ", "> > ", "```\n", "```rust\n", "    ",
    "\n", "\n\n", "word ", "longerwordthanmostwidths ", "**bold** ", "*em* ", "~~gone~~ ",
    "`code` ", "[link](http://x) ", "![alt](p.png) ", "<http://auto> ", "---\n",
    "| a | b |\n|---|---|\n| 1 | 2 |\n", "<div>\n", "</div>\n", "[^1]\n\n[^1]: note\n",
    "- [x] task\n", "\\\n", "é ", "漢字 ", "\t", "  ", "\r\n",
];

fn markdownish() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::collection::vec(prop::sample::select(FRAGMENTS), 0..60).prop_map(|parts| parts.concat()),
        "\\PC{0,300}",
    ]
}

fn sgr() -> impl Strategy<Value = String> {
    "[0-9;]{0,8}".prop_map(|params| format!("\x1b[{params}m"))
}

proptest! {
    #[test]
    fn every_rendered_line_maps_into_the_source(text in markdownish(), width in 0usize..120) {
        let source = SourceDocument::new(text.as_str());
        let ast = parse(&source).unwrap();
        let doc = render(&ast, &source, width);
        let line_count = source.line_count();

        prop_assert_eq!(doc.mappings().count(), doc.len());
        for (i, range) in doc.mappings().enumerate() {
            prop_assert!(range.start >= 1, "line {}: {:?}", i, range);
            prop_assert!(range.start <= range.end, "line {}: {:?}", i, range);
            prop_assert!(range.end <= line_count, "line {}: {:?} of {}", i, range, line_count);
        }
    }

    #[test]
    fn escapes_take_no_columns(
        word in "[a-zA-Z0-9]{1,12}",
        before in prop::collection::vec(sgr(), 0..5),
        after in prop::collection::vec(sgr(), 0..5),
    ) {
        let styled = format!("{}{word}{}", before.concat(), after.concat());
        prop_assert_eq!(visible_width(&styled), word.len());
    }

    #[test]
    fn wrap_respects_width_except_for_lone_long_words(
        words in prop::collection::vec("[a-z]{1,15}", 0..40),
        width in 1usize..60,
    ) {
        let text = words.join(" ");
        let lines = wrap(&text, width);
        prop_assert!(!lines.is_empty());
        for line in &lines {
            prop_assert!(
                visible_width(line) <= width || !line.contains(' '),
                "{:?} is wider than {}", line, width
            );
        }
        let rejoined: Vec<&str> = lines.iter().flat_map(|l| l.split_whitespace()).collect();
        prop_assert_eq!(rejoined, words.iter().map(String::as_str).collect::<Vec<_>>());
    }
}
