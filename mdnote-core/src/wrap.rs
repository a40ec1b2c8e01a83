//! ANSI-aware text measurement and greedy word wrapping.

use unicode_width::UnicodeWidthChar;

/// Width used when a caller asks for a wrap width of zero.
pub const MIN_WRAP_WIDTH: usize = 40;

const ESC: char = '\x1b';
const SGR_RESET: &str = "\x1b[0m";

/// Number of terminal columns `s` occupies.
///
/// Escape sequences (ESC, parameter bytes, one terminating ASCII letter)
/// take no space. Wide East Asian characters and emoji count as two columns;
/// control characters count as zero.
pub fn visible_width(s: &str) -> usize {
    let mut width = 0;
    let mut in_escape = false;
    for c in s.chars() {
        if in_escape {
            if c.is_ascii_alphabetic() {
                in_escape = false;
            }
            continue;
        }
        if c == ESC {
            in_escape = true;
            continue;
        }
        width += c.width().unwrap_or(0);
    }
    width
}

/// Greedily wraps `text` to `width` visible columns.
///
/// Explicit newlines always break. Within a paragraph, words are packed
/// left to right and separated by one space; a word wider than `width` sits
/// alone on its own line rather than being split. An empty paragraph yields
/// one empty line.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = if width == 0 { MIN_WRAP_WIDTH } else { width };
    let mut out = Vec::new();

    for paragraph in text.split('\n') {
        let mut words = paragraph.split_whitespace();
        let Some(first) = words.next() else {
            out.push(String::new());
            continue;
        };

        let mut line = first.to_string();
        let mut line_width = visible_width(first);
        for word in words {
            let word_width = visible_width(word);
            if line_width + 1 + word_width <= width {
                line.push(' ');
                line.push_str(word);
                line_width += 1 + word_width;
            } else {
                out.push(std::mem::replace(&mut line, word.to_string()));
                line_width = word_width;
            }
        }
        out.push(line);
    }
    out
}

/// Makes every line of a wrapped, styled block self-contained.
///
/// Styles opened on one line and still active at its end are closed with a
/// reset and re-opened at the start of the next line, so a line can be
/// drawn on its own (scrolled into view, highlighted) with the right
/// attributes.
pub fn carry_styles(lines: Vec<String>) -> Vec<String> {
    let mut active: Vec<String> = Vec::new();
    lines
        .into_iter()
        .map(|line| {
            let mut out = active.concat();
            track_sgr(&line, &mut active);
            out.push_str(&line);
            if !active.is_empty() {
                out.push_str(SGR_RESET);
            }
            out
        })
        .collect()
}

/// Updates `active` with every SGR sequence found in `line`. A reset clears
/// the list.
fn track_sgr(line: &str, active: &mut Vec<String>) {
    let mut rest = line;
    while let Some(pos) = rest.find(ESC) {
        let seq = &rest[pos..];
        let end = seq
            .char_indices()
            .skip(1)
            .find(|(_, c)| c.is_ascii_alphabetic())
            .map(|(i, c)| i + c.len_utf8());
        let Some(end) = end else { break };
        let sgr = &seq[..end];
        if sgr.ends_with('m') {
            if sgr == SGR_RESET || sgr == "\x1b[m" {
                active.clear();
            } else {
                active.push(sgr.to_string());
            }
        }
        rest = &seq[end..];
    }
}
