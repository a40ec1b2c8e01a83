//! Document pane: the rendered markdown with cursor, selection and a gutter
//! marking lines that already carry a comment.

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use mdnote_core::selection::{Pane, ViewState};
use mdnote_core::{AnnotationFile, RenderedDocument};

use super::ansi;
use super::layout::{inner_rect, panel_block};
use crate::theme::Theme;

/// Gutter glyph for a line whose source range has a comment.
const COMMENT_MARK: &str = "▌ ";
const NO_MARK: &str = "  ";

/// Renders the document pane into `area`.
///
/// Only the visible rows are converted to spans; the rest of the document
/// is never touched.
///
/// # Arguments
///
/// * `frame` — current render frame
/// * `area` — the document `Rect` (including borders)
/// * `title` — file name shown in the top border
/// * `doc` — the rendered document with its line map
/// * `annotations` — comments used for the gutter markers
/// * `view` — cursor, selection and scroll state
/// * `theme` — active color theme
pub fn render_document(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    doc: &RenderedDocument,
    annotations: &AnnotationFile,
    view: &ViewState,
    theme: &Theme,
) {
    let is_focused = view.focus == Pane::Document;
    let block = panel_block(format!(" {title} "), is_focused, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    let rows = inner.height as usize;
    // The pane is shorter than `page_height` while the comment box is open;
    // keep the cursor on screen anyway.
    let scroll = view.scroll.max((view.cursor + 1).saturating_sub(rows));
    let lines: Vec<Line<'static>> = doc
        .lines()
        .iter()
        .enumerate()
        .skip(scroll)
        .take(rows)
        .map(|(i, rendered)| {
            let commented = annotations
                .comments
                .iter()
                .any(|c| c.range.overlaps(&rendered.range));
            let mark = if commented {
                Span::styled(COMMENT_MARK, Style::default().fg(theme.comment_range))
            } else {
                Span::raw(NO_MARK)
            };

            let mut line = ansi::to_line(&rendered.text);
            line.spans.insert(0, mark);

            if view.is_selected(i) {
                line.style(Style::default().bg(theme.selection_bg))
            } else if i == view.cursor && is_focused {
                line.style(Style::default().bg(theme.cursor_bg))
            } else {
                line
            }
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}
