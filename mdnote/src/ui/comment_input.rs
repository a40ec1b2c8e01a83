//! The comment input box shown at the bottom of the document pane while a
//! comment is being written.

use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::Style,
    widgets::{Clear, Paragraph},
};

use mdnote_core::selection::Draft;
use mdnote_core::SourceRange;

use super::layout::{inner_rect, panel_block};
use crate::theme::Theme;

/// Most draft rows the box grows to before it scrolls.
const MAX_ROWS: u16 = 6;

/// Outer height of the input box for `draft`, borders included.
pub fn input_height(draft: &Draft) -> u16 {
    let rows = draft.text().split('\n').count() as u16;
    rows.clamp(1, MAX_ROWS) + 2
}

/// Renders the input box over `area` and places the terminal caret.
///
/// # Arguments
///
/// * `frame` — current render frame
/// * `area` — where the box goes (including borders)
/// * `range` — source lines the comment will attach to
/// * `draft` — text typed so far
/// * `theme` — active color theme
pub fn render_comment_input(
    frame: &mut Frame,
    area: Rect,
    range: SourceRange,
    draft: &Draft,
    theme: &Theme,
) {
    let title = if range.start == range.end {
        format!(" Comment on line {} ", range.start)
    } else {
        format!(" Comment on lines {}-{} ", range.start, range.end)
    };
    let block = panel_block(title, true, theme);
    let inner = inner_rect(area);

    let (row, col) = draft.caret();
    let visible = inner.height as usize;
    let scroll = (row + 1).saturating_sub(visible);

    frame.render_widget(Clear, area);
    frame.render_widget(block, area);
    frame.render_widget(
        Paragraph::new(draft.text().to_owned())
            .style(Style::default().fg(theme.comment_text))
            .scroll((scroll as u16, 0)),
        inner,
    );

    let x = inner.x.saturating_add(col as u16).min(inner.right().saturating_sub(1));
    if visible > 0 {
        let y = inner.y + (row - scroll) as u16;
        frame.set_cursor_position(Position::new(x, y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdnote_core::selection::DraftEdit;

    #[test]
    fn height_grows_with_lines_then_caps() {
        let mut draft = Draft::default();
        assert_eq!(input_height(&draft), 3);
        draft.apply(DraftEdit::Insert('a'));
        draft.apply(DraftEdit::Newline);
        draft.apply(DraftEdit::Insert('b'));
        assert_eq!(input_height(&draft), 4);
        for _ in 0..20 {
            draft.apply(DraftEdit::Newline);
        }
        assert_eq!(input_height(&draft), MAX_ROWS + 2);
    }
}
