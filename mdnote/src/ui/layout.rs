//! Two-pane layout engine for mdnote.
//!
//! This module is pure layout arithmetic: no mutable application state lives
//! here. [`compute_layout`] runs on every frame, and the app calls it once
//! more outside the draw closure to learn how wide the document pane is
//! before rendering markdown into it.
//!
//! # Pane geometry
//!
//! The document pane takes 65% of the width and the comments list the rest.
//! `Spacing::Overlap(1)` combined with `Block::merge_borders(MergeStrategy::Fuzzy)`
//! makes the two borders share a single column.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect, Spacing},
    style::{Modifier, Style},
    symbols::merge::MergeStrategy,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
};

use mdnote_core::selection::{Mode, Pane, ViewState};

use crate::theme::Theme;

/// Share of the width given to the document pane.
const DOCUMENT_PCT: u16 = 65;

/// Narrowest width the markdown is rendered at.
const MIN_RENDER_WIDTH: usize = 20;

/// Returns `[document, comments, status_bar]` for a terminal of size `area`.
///
/// The returned rects are valid only for the frame they were computed for.
///
/// # Arguments
///
/// * `area` — the full terminal area (`frame.area()` inside a draw)
pub fn compute_layout(area: Rect) -> [Rect; 3] {
    let [main_area, status_bar] =
        area.layout(&Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]));

    let [document, comments] = main_area.layout(
        &Layout::horizontal([
            Constraint::Percentage(DOCUMENT_PCT),
            Constraint::Percentage(100 - DOCUMENT_PCT),
        ])
        .spacing(Spacing::Overlap(1)),
    );

    [document, comments, status_bar]
}

/// Width the markdown should be rendered at for a terminal of size `area`.
///
/// The inner width of the document pane minus a two-column gutter, never
/// narrower than [`MIN_RENDER_WIDTH`].
pub fn render_width(area: Rect) -> usize {
    let [document, _, _] = compute_layout(area);
    let inner = inner_rect(document).width as usize;
    inner.saturating_sub(2).max(MIN_RENDER_WIDTH)
}

/// Rows of document visible in a terminal of size `area`.
pub fn page_height(area: Rect) -> usize {
    let [document, _, _] = compute_layout(area);
    inner_rect(document).height as usize
}

/// Returns the inner `Rect` of a panel after removing the 1-cell border on each side.
///
/// # Arguments
///
/// * `area` — the outer `Rect` of the panel (including borders)
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Builds a bordered `Block` for a panel.
///
/// Applies `BorderType::Thick` when the panel is focused and
/// `BorderType::Plain` otherwise. `MergeStrategy::Fuzzy` is required because
/// `Exact` produces incorrect junctions when mixing `Thick` and `Plain` borders.
///
/// # Arguments
///
/// * `title` — panel title shown in the top border
/// * `is_focused` — `true` when this panel has keyboard focus
/// * `theme` — active color theme (supplies `border_active` / `border_inactive`)
pub fn panel_block<'a>(title: impl Into<Line<'a>>, is_focused: bool, theme: &Theme) -> Block<'a> {
    let border_style = if is_focused {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let border_type = if is_focused { BorderType::Thick } else { BorderType::Plain };

    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(border_style)
        .merge_borders(MergeStrategy::Fuzzy)
}

/// Renders the 1-row status bar at the bottom of the terminal.
///
/// Always shows a mode indicator. The rest of the row is the current status
/// message when there is one, otherwise the key hints for the mode.
///
/// # Arguments
///
/// * `frame` — current render frame
/// * `area` — the 1-row `Rect` returned by `compute_layout` (index 2)
/// * `view` — read-only view state supplying mode, focus and status
/// * `theme` — active color theme (supplies status bar and mode indicator colors)
pub fn render_status_bar(frame: &mut Frame, area: Rect, view: &ViewState, theme: &Theme) {
    let (mode_text, mode_fg) = match view.mode {
        Mode::Normal => (" NORMAL ", theme.status_mode_normal),
        Mode::Selecting => (" SELECT ", theme.status_mode_normal),
        Mode::Commenting => (" COMMENT ", theme.status_mode_insert),
        Mode::Preview => (" PREVIEW ", theme.status_mode_normal),
    };

    let mut spans = vec![
        Span::styled(mode_text, Style::default().fg(mode_fg).add_modifier(Modifier::BOLD)),
        Span::raw(" "),
    ];

    match &view.status {
        Some(status) => spans.push(Span::styled(
            status.text.clone(),
            Style::default().fg(theme.severity(status.severity)),
        )),
        None => {
            for (i, (key, what)) in hints(view).iter().enumerate() {
                if i > 0 {
                    spans.push(Span::raw("  "));
                }
                spans.push(Span::styled(*key, Style::default().fg(theme.status_key)));
                spans.push(Span::raw(format!(" {what}")));
            }
        }
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg)),
        area,
    );
}

/// Key hints for the current mode and focus, as `(key, description)` pairs.
fn hints(view: &ViewState) -> &'static [(&'static str, &'static str)] {
    match (view.mode, view.focus) {
        (Mode::Commenting, _) => &[("Enter", "save"), ("Alt-Enter", "newline"), ("Esc", "cancel")],
        (Mode::Preview, _) => &[("↑↓", "scroll"), ("c", "copy"), ("Esc", "back"), ("q", "quit")],
        (_, Pane::Comments) => &[
            ("↑↓", "comments"),
            ("d", "delete"),
            ("Tab", "document"),
            ("Enter", "preview"),
            ("q", "quit"),
        ],
        (_, Pane::Document) => &[
            ("↑↓", "move"),
            ("⇧↑↓", "select"),
            ("c", "comment"),
            ("Tab", "comments"),
            ("Enter", "preview"),
            ("q", "quit"),
        ],
    }
}
