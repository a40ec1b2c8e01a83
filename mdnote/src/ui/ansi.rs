//! Conversion of SGR-styled rendered lines into ratatui spans.
//!
//! The core renderer emits plain strings with `ESC [ ... m` sequences so the
//! same output works for any terminal consumer. Drawing them through ratatui
//! needs real `Style`s; this module interprets the subset of SGR the
//! renderer produces (attributes, 16/256/RGB colors, resets) and drops any
//! other escape sequence.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Parses one rendered line into a styled `Line`.
pub fn to_line(text: &str) -> Line<'static> {
    let mut spans = Vec::new();
    let mut style = Style::default();
    let mut run = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\x1b' {
            run.push(c);
            continue;
        }
        if chars.peek() != Some(&'[') {
            continue;
        }
        chars.next();
        let mut params = String::new();
        let mut terminator = None;
        for p in chars.by_ref() {
            if p.is_ascii_alphabetic() {
                terminator = Some(p);
                break;
            }
            params.push(p);
        }
        if terminator != Some('m') {
            continue;
        }
        if !run.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut run), style));
        }
        style = apply_sgr(style, &params);
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, style));
    }
    Line::from(spans)
}

/// Applies the `;`-separated SGR parameters to `style`.
fn apply_sgr(mut style: Style, params: &str) -> Style {
    let codes: Vec<u16> = if params.is_empty() {
        vec![0]
    } else {
        params.split(';').map(|p| p.parse().unwrap_or(0)).collect()
    };

    let mut i = 0;
    while i < codes.len() {
        match codes[i] {
            0 => style = Style::default(),
            1 => style = style.add_modifier(Modifier::BOLD),
            2 => style = style.add_modifier(Modifier::DIM),
            3 => style = style.add_modifier(Modifier::ITALIC),
            4 => style = style.add_modifier(Modifier::UNDERLINED),
            7 => style = style.add_modifier(Modifier::REVERSED),
            9 => style = style.add_modifier(Modifier::CROSSED_OUT),
            22 => style = style.remove_modifier(Modifier::BOLD | Modifier::DIM),
            23 => style = style.remove_modifier(Modifier::ITALIC),
            24 => style = style.remove_modifier(Modifier::UNDERLINED),
            27 => style = style.remove_modifier(Modifier::REVERSED),
            29 => style = style.remove_modifier(Modifier::CROSSED_OUT),
            n @ 30..=37 => style = style.fg(Color::Indexed((n - 30) as u8)),
            39 => style.fg = None,
            n @ 40..=47 => style = style.bg(Color::Indexed((n - 40) as u8)),
            49 => style.bg = None,
            n @ 90..=97 => style = style.fg(Color::Indexed((n - 90 + 8) as u8)),
            n @ 100..=107 => style = style.bg(Color::Indexed((n - 100 + 8) as u8)),
            n @ (38 | 48) => {
                let (color, used) = extended_color(&codes[i + 1..]);
                if let Some(color) = color {
                    style = if n == 38 { style.fg(color) } else { style.bg(color) };
                }
                i += used;
            }
            _ => {}
        }
        i += 1;
    }
    style
}

/// Decodes `5;n` or `2;r;g;b` following a 38/48. Returns the color and how
/// many parameters were consumed.
fn extended_color(rest: &[u16]) -> (Option<Color>, usize) {
    let byte = |i: usize| rest.get(i).map(|v| (*v).min(255) as u8);
    match rest.first() {
        Some(5) => (byte(1).map(Color::Indexed), 2.min(rest.len())),
        Some(2) => match (byte(1), byte(2), byte(3)) {
            (Some(r), Some(g), Some(b)) => (Some(Color::Rgb(r, g, b)), 4),
            _ => (None, rest.len()),
        },
        _ => (None, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_one_span() {
        let line = to_line("hello world");
        assert_eq!(line.spans.len(), 1);
        assert_eq!(line.spans[0].content, "hello world");
        assert_eq!(line.spans[0].style, Style::default());
    }

    #[test]
    fn bold_then_reset() {
        let line = to_line("\x1b[1mbold\x1b[0m rest");
        assert_eq!(line.spans.len(), 2);
        assert_eq!(line.spans[0].content, "bold");
        assert!(line.spans[0].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(line.spans[1].content, " rest");
        assert_eq!(line.spans[1].style, Style::default());
    }

    #[test]
    fn combined_attributes_and_colors() {
        let line = to_line("\x1b[1;36mTitle\x1b[0m");
        let style = line.spans[0].style;
        assert!(style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(style.fg, Some(Color::Indexed(6)));
    }

    #[test]
    fn bright_and_256_colors() {
        let gray = to_line("\x1b[90mx").spans[0].style;
        assert_eq!(gray.fg, Some(Color::Indexed(8)));

        let code = to_line("\x1b[48;5;236;97m code ").spans[0].style;
        assert_eq!(code.bg, Some(Color::Indexed(236)));
        assert_eq!(code.fg, Some(Color::Indexed(15)));
    }

    #[test]
    fn truecolor() {
        let style = to_line("\x1b[38;2;10;20;30mx").spans[0].style;
        assert_eq!(style.fg, Some(Color::Rgb(10, 20, 30)));
    }

    #[test]
    fn non_sgr_sequences_are_dropped() {
        let line = to_line("a\x1b[2Kb");
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "ab");
    }

    #[test]
    fn styles_accumulate_across_sequences() {
        let style = to_line("\x1b[1m\x1b[3mx").spans[0].style;
        assert!(style.add_modifier.contains(Modifier::BOLD | Modifier::ITALIC));
    }
}
