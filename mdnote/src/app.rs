//! Central application state for mdnote.
//!
//! [`App`] owns one loaded markdown file: its source bytes, the parsed AST,
//! the current rendering, the selection [`Controller`] and the store the
//! comments persist to. No ratatui drawing lives here. The UI reads `App`
//! and the event loop feeds it actions through [`App::dispatch`], which runs
//! the reducer and then carries out the effects that need no terminal.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use ratatui::layout::Rect;

use mdnote_core::ast::Document;
use mdnote_core::selection::{Status, ViewState};
use mdnote_core::store::hash_bytes;
use mdnote_core::{
    parse::parse, render, Action, AnnotationFile, AnnotationStore, Controller, Effect, Env,
    RenderedDocument, SourceDocument, SourceRange,
};

use crate::clipboard;
use crate::ui::layout;

pub struct App {
    /// Absolute path of the open document.
    path: PathBuf,
    /// File name shown in the document pane border.
    title: String,
    source: SourceDocument,
    ast: Document,
    doc: RenderedDocument,
    controller: Controller,
    store: AnnotationStore,
    /// Width `doc` was rendered at; 0 before the first [`App::fit`].
    render_width: usize,
}

impl App {
    /// Reads, parses and loads the comments for the document at `path`.
    ///
    /// The first rendering happens on the first [`App::fit`], once the
    /// terminal size is known. When the file changed since its comments were
    /// recorded, the status bar starts with a warning.
    ///
    /// # Errors
    ///
    /// Fails when the document cannot be read or is not UTF-8, or when its
    /// annotation record exists but cannot be read or parsed.
    pub fn load(path: &Path, store: AnnotationStore) -> anyhow::Result<Self> {
        let path = std::path::absolute(path)
            .with_context(|| format!("failed to resolve {}", path.display()))?;
        let bytes =
            std::fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
        let source = SourceDocument::new(bytes);
        let ast = parse(&source).with_context(|| format!("failed to parse {}", path.display()))?;
        let annotations = store
            .load(&path)
            .with_context(|| format!("failed to load comments for {}", path.display()))?;

        let stale = annotations.is_stale(&hash_bytes(source.bytes()));
        tracing::info!(
            path = %path.display(),
            comments = annotations.len(),
            stale,
            "loaded document"
        );

        let mut controller = Controller::new(annotations);
        if stale {
            controller.view.status = Some(Status::warning(
                "⚠ File changed since comments were added; line numbers may be off",
            ));
        }

        let title = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            path,
            title,
            source,
            ast,
            doc: RenderedDocument::default(),
            controller,
            store,
            render_width: 0,
        })
    }

    /// Adapts to a terminal of size `area`.
    ///
    /// Re-renders the markdown when the document pane width changed, then
    /// tells the controller the new page height so cursor and scroll fit.
    pub fn fit(&mut self, area: Rect) {
        let width = layout::render_width(area);
        if width != self.render_width {
            self.doc = render(&self.ast, &self.source, width);
            self.render_width = width;
            tracing::debug!(width, lines = self.doc.len(), "rendered document");
        }
        let page_height = layout::page_height(area);
        self.dispatch(Action::Resize { page_height });
    }

    /// Runs `action` through the controller and carries out its effects.
    ///
    /// `Persist` and `CopyToClipboard` are handled here; their failures end
    /// up in the status bar, never as an error. Effects that need the
    /// terminal (`Quit`, `FocusTextInput`) are returned to the caller.
    pub fn dispatch(&mut self, action: Action) -> Vec<Effect> {
        let env = Env {
            doc: &self.doc,
            source: &self.source,
        };
        let (controller, effects) = std::mem::take(&mut self.controller).reduce(action, &env);
        self.controller = controller;

        let mut rest = Vec::new();
        for effect in effects {
            match effect {
                Effect::Persist => self.persist(),
                Effect::CopyToClipboard(text) => self.copy(&text),
                other => rest.push(other),
            }
        }
        rest
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.controller.annotations) {
            tracing::error!(path = %self.path.display(), error = %e, "failed to save comments");
            self.controller.view.status = Some(Status::error(format!("✗ Failed to save: {e}")));
        }
    }

    fn copy(&mut self, text: &str) {
        self.controller.view.status = Some(match clipboard::copy(text) {
            Ok(()) => Status::info("✓ Copied to clipboard"),
            Err(e) => {
                tracing::warn!(error = %e, "clipboard copy failed");
                Status::error(format!("✗ Failed to copy: {e}"))
            }
        });
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn doc(&self) -> &RenderedDocument {
        &self.doc
    }

    pub fn view(&self) -> &ViewState {
        &self.controller.view
    }

    pub fn annotations(&self) -> &AnnotationFile {
        &self.controller.annotations
    }

    /// Source lines the pending comment would attach to.
    pub fn selected_range(&self) -> SourceRange {
        self.controller.selected_source_range(&self.doc)
    }
}
