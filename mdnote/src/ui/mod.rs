//! UI rendering module for mdnote.
//!
//! This is the module root for `ui/`. It exposes [`render`] as the single
//! entry point called by the event loop's `terminal.draw()` closure.
//!
//! All layout arithmetic lives in `layout.rs`. Each pane has its own module;
//! `ansi.rs` turns the renderer's SGR output into ratatui spans and
//! `keybindings.rs` decodes input into reducer actions.

pub mod ansi;
pub mod comment_input;
pub mod comments_view;
pub mod document_view;
pub mod keybindings;
pub mod layout;
pub mod preview;

use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};

use mdnote_core::selection::Mode;

use crate::app::App;
use crate::theme::Theme;
use layout::{compute_layout, render_status_bar};

/// Renders one complete frame: document pane, comments pane (or the full
/// screen preview), the comment input when open, and the status bar.
///
/// Called exactly once per handled event inside `terminal.draw()`. This is
/// the only location where `terminal.draw()` renders anything.
///
/// # Arguments
///
/// * `frame` — current render frame provided by `terminal.draw()`
/// * `app` — the loaded document and its controller
/// * `theme` — active color theme
pub fn render(frame: &mut Frame, app: &App, theme: &Theme) {
    let [document, comments, status_bar] = compute_layout(frame.area());
    let view = app.view();

    if view.mode == Mode::Preview {
        preview::render_preview(frame, document.union(comments), &view.preview, theme);
    } else {
        let [doc_area, input_area] = if view.mode == Mode::Commenting {
            let height = comment_input::input_height(&view.draft);
            document.layout(&Layout::vertical([
                Constraint::Fill(1),
                Constraint::Length(height),
            ]))
        } else {
            [document, ratatui::layout::Rect::default()]
        };

        document_view::render_document(
            frame,
            doc_area,
            app.title(),
            app.doc(),
            app.annotations(),
            view,
            theme,
        );
        comments_view::render_comments(frame, comments, app.annotations(), view, theme);

        if view.mode == Mode::Commenting {
            comment_input::render_comment_input(
                frame,
                input_area,
                app.selected_range(),
                &view.draft,
                theme,
            );
        }
    }

    render_status_bar(frame, status_bar, view, theme);
}
