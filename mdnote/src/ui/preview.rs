//! Full-screen citation preview.

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    widgets::{Clear, Paragraph},
};

use mdnote_core::selection::Preview;

use super::layout::{inner_rect, panel_block};
use crate::theme::Theme;

/// Renders the citation text over `area`, scrolled to `preview.scroll`.
///
/// The content is shown raw (it is markdown meant for pasting elsewhere).
pub fn render_preview(frame: &mut Frame, area: Rect, preview: &Preview, theme: &Theme) {
    let block = panel_block(" Citation preview (c to copy) ", true, theme);
    let inner = inner_rect(area);

    frame.render_widget(Clear, area);
    frame.render_widget(block, area);
    frame.render_widget(
        Paragraph::new(preview.content.clone())
            .style(Style::default().bg(theme.background))
            .scroll((preview.scroll as u16, 0)),
        inner,
    );
}
