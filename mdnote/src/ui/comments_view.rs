//! Comments pane: every comment in source order, each as a line-range
//! header followed by the first lines of its body.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_width::UnicodeWidthChar;

use mdnote_core::selection::{Pane, ViewState};
use mdnote_core::AnnotationFile;

use super::layout::{inner_rect, panel_block};
use crate::theme::Theme;

/// Body lines shown per comment before the rest is elided.
const MAX_BODY_LINES: usize = 3;

/// Renders the comments pane into `area`.
///
/// The list scrolls just far enough to keep the focused comment on screen.
///
/// # Arguments
///
/// * `frame` — current render frame
/// * `area` — the comments `Rect` (including borders)
/// * `annotations` — the comments to list
/// * `view` — focus and list cursor
/// * `theme` — active color theme
pub fn render_comments(
    frame: &mut Frame,
    area: Rect,
    annotations: &AnnotationFile,
    view: &ViewState,
    theme: &Theme,
) {
    let is_focused = view.focus == Pane::Comments;
    let title = format!(" Comments ({}) ", annotations.len());
    let block = panel_block(title, is_focused, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    if annotations.is_empty() {
        let hint = Line::styled(
            "No comments yet. Select lines and press c.",
            Style::default().fg(theme.muted),
        );
        frame.render_widget(Paragraph::new(hint), inner);
        return;
    }

    let width = inner.width as usize;
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut focused_rows = 0..0;

    for (i, comment) in annotations.sorted_comments().into_iter().enumerate() {
        let first = lines.len();
        let focused = is_focused && i == view.comment_cursor;
        let bg = if focused {
            Style::default().bg(theme.comment_focus_bg)
        } else {
            Style::default()
        };

        lines.push(
            Line::from(Span::styled(
                comment.range.to_string(),
                Style::default()
                    .fg(theme.comment_range)
                    .add_modifier(Modifier::BOLD),
            ))
            .style(bg),
        );

        let body: Vec<&str> = comment.body.lines().collect();
        for (n, text) in body.iter().take(MAX_BODY_LINES).enumerate() {
            let elided = n + 1 == MAX_BODY_LINES && body.len() > MAX_BODY_LINES;
            let shown = truncate(text, width.saturating_sub(2), elided);
            lines.push(
                Line::from(Span::styled(
                    format!("  {shown}"),
                    Style::default().fg(theme.comment_text),
                ))
                .style(bg),
            );
        }
        lines.push(Line::raw(""));

        if i == view.comment_cursor {
            focused_rows = first..lines.len();
        }
    }

    let height = inner.height as usize;
    let scroll = focused_rows.end.saturating_sub(height).min(focused_rows.start);
    frame.render_widget(
        Paragraph::new(lines).scroll((scroll as u16, 0)),
        inner,
    );
}

/// Cuts `text` to `width` display columns, ending in `…` when anything was
/// dropped or `force_ellipsis` is set.
fn truncate(text: &str, width: usize, force_ellipsis: bool) -> String {
    let mut out = String::new();
    let mut used = 0;
    let budget = width.saturating_sub(1);
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            let rest: usize = text[out.len()..].chars().map(|c| c.width().unwrap_or(0)).sum();
            if used + rest <= width && !force_ellipsis {
                return text.to_string();
            }
            out.push('…');
            return out;
        }
        used += w;
        out.push(c);
    }
    if force_ellipsis {
        out.push('…');
    }
    out
}
