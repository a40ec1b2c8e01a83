//! Cursor, selection and comment lifecycle as an explicit reducer.
//!
//! [`Controller::reduce`] takes the current state and one [`Action`] and
//! returns the next state plus a list of [`Effect`]s. The reducer itself
//! never touches the terminal, the clipboard or the disk; the caller runs
//! the effects afterwards. That keeps every transition testable with
//! nothing but a rendered document.

use crate::citation;
use crate::line_index::SourceDocument;
use crate::render::RenderedDocument;
use crate::types::{AnnotationFile, Comment, SourceRange};
use crate::wrap::visible_width;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Which keys mean what right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    /// A selection anchor is set and the cursor extends it.
    Selecting,
    /// The comment input is open.
    Commenting,
    /// The citation preview covers the screen.
    Preview,
}

/// Which of the two panes receives navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pane {
    #[default]
    Document,
    Comments,
}

impl Pane {
    pub fn toggle(self) -> Self {
        match self {
            Pane::Document => Pane::Comments,
            Pane::Comments => Pane::Document,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A one-line message for the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub severity: Severity,
    pub text: String,
}

impl Status {
    pub fn info(text: impl Into<String>) -> Self {
        Self { severity: Severity::Info, text: text.into() }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self { severity: Severity::Warning, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { severity: Severity::Error, text: text.into() }
    }
}

/// Editable comment text with a byte-offset caret.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    text: String,
    cursor: usize,
}

impl Draft {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Caret position as (row, display column) within the draft.
    pub fn caret(&self) -> (usize, usize) {
        let before = &self.text[..self.cursor];
        let row = before.matches('\n').count();
        let col = before.rsplit('\n').next().map_or(0, visible_width);
        (row, col)
    }

    pub fn apply(&mut self, edit: DraftEdit) {
        match edit {
            DraftEdit::Insert(c) => {
                self.text.insert(self.cursor, c);
                self.cursor += c.len_utf8();
            }
            DraftEdit::Newline => self.apply(DraftEdit::Insert('\n')),
            DraftEdit::Backspace => {
                if let Some(prev) = self.text[..self.cursor].chars().next_back() {
                    self.cursor -= prev.len_utf8();
                    self.text.remove(self.cursor);
                }
            }
            DraftEdit::Left => {
                if let Some(prev) = self.text[..self.cursor].chars().next_back() {
                    self.cursor -= prev.len_utf8();
                }
            }
            DraftEdit::Right => {
                if let Some(next) = self.text[self.cursor..].chars().next() {
                    self.cursor += next.len_utf8();
                }
            }
        }
    }
}

/// Read-only citation text shown in preview mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preview {
    pub content: String,
    pub scroll: usize,
}

impl Preview {
    pub fn line_count(&self) -> usize {
        self.content.split('\n').count()
    }
}

/// Everything the panes need to draw, other than the documents themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    /// Index into the rendered lines.
    pub cursor: usize,
    /// First rendered line shown in the document pane.
    pub scroll: usize,
    /// Where a selection started, if one is active.
    pub anchor: Option<usize>,
    pub mode: Mode,
    pub focus: Pane,
    /// Index into the sorted comment list.
    pub comment_cursor: usize,
    pub draft: Draft,
    pub preview: Preview,
    pub status: Option<Status>,
    /// Rows visible in the document pane; also the page size.
    pub page_height: usize,
}

impl ViewState {
    /// Selected rendered lines as an ordered `(lo, hi)` pair. Without an
    /// anchor, just the cursor line.
    pub fn selection_range(&self) -> (usize, usize) {
        match self.anchor {
            Some(anchor) => (anchor.min(self.cursor), anchor.max(self.cursor)),
            None => (self.cursor, self.cursor),
        }
    }

    pub fn is_selected(&self, line: usize) -> bool {
        let (lo, hi) = self.selection_range();
        self.anchor.is_some() && lo <= line && line <= hi
    }

    fn page(&self) -> usize {
        self.page_height.max(1)
    }

    fn ensure_cursor_visible(&mut self) {
        if self.page_height == 0 {
            return;
        }
        if self.cursor < self.scroll {
            self.scroll = self.cursor;
        }
        if self.cursor >= self.scroll + self.page_height {
            self.scroll = self.cursor + 1 - self.page_height;
        }
    }
}

// ---------------------------------------------------------------------------
// Actions and effects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    LineUp,
    LineDown,
    PageUp,
    PageDown,
    Home,
    End,
}

impl Motion {
    /// Applies the motion to `pos` within `0..=max`.
    fn apply(self, pos: usize, max: usize, page: usize) -> usize {
        match self {
            Motion::LineUp => pos.saturating_sub(1),
            Motion::LineDown => (pos + 1).min(max),
            Motion::PageUp => pos.saturating_sub(page),
            Motion::PageDown => (pos + page).min(max),
            Motion::Home => 0,
            Motion::End => max,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftEdit {
    Insert(char),
    Newline,
    Backspace,
    Left,
    Right,
}

/// Input to the reducer, already decoded from raw key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Plain movement. Drops any selection.
    Move(Motion),
    /// Movement that starts or extends a selection.
    Extend(Motion),
    Escape,
    BeginComment,
    ToggleFocus,
    OpenPreview,
    Copy,
    DeleteComment,
    Edit(DraftEdit),
    Submit,
    Quit,
    /// The document pane now shows `page_height` rows. Sent after every
    /// re-render as well, so cursor and scroll fit the new line count.
    Resize { page_height: usize },
}

/// Side effects the caller must carry out after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Quit,
    /// Write the annotation file to the store.
    Persist,
    CopyToClipboard(String),
    /// The comment input just opened and wants the text caret.
    FocusTextInput,
}

/// Read-only context a transition may consult.
#[derive(Debug, Clone, Copy)]
pub struct Env<'a> {
    pub doc: &'a RenderedDocument,
    pub source: &'a SourceDocument,
}

// ---------------------------------------------------------------------------
// Reducer
// ---------------------------------------------------------------------------

/// UI state plus the annotation file it edits.
#[derive(Debug, Clone, Default)]
pub struct Controller {
    pub view: ViewState,
    pub annotations: AnnotationFile,
}

impl Controller {
    pub fn new(annotations: AnnotationFile) -> Self {
        Self {
            view: ViewState::default(),
            annotations,
        }
    }

    /// Applies one action and returns the new state with its effects.
    pub fn reduce(mut self, action: Action, env: &Env<'_>) -> (Self, Vec<Effect>) {
        let mut effects = Vec::new();
        match action {
            Action::Quit => effects.push(Effect::Quit),
            Action::Resize { page_height } => {
                self.view.page_height = page_height;
                self.clamp_to(env.doc.len());
            }
            _ => match self.view.mode {
                Mode::Normal | Mode::Selecting => self.browse(action, env, &mut effects),
                Mode::Commenting => self.commenting(action, env, &mut effects),
                Mode::Preview => self.previewing(action, &mut effects),
            },
        }
        (self, effects)
    }

    /// Comment under the comments-pane cursor, in display order.
    pub fn focused_comment(&self) -> Option<&Comment> {
        self.annotations
            .sorted_comments()
            .get(self.view.comment_cursor)
            .copied()
    }

    /// Source lines the current selection (or cursor line) covers.
    pub fn selected_source_range(&self, doc: &RenderedDocument) -> SourceRange {
        let (lo, hi) = self.view.selection_range();
        doc.source_range(lo, hi)
    }

    /// Fits cursor, anchor and scroll positions to a document of `len`
    /// rendered lines.
    pub fn clamp_to(&mut self, len: usize) {
        let max = len.saturating_sub(1);
        let v = &mut self.view;
        v.cursor = v.cursor.min(max);
        v.anchor = v.anchor.map(|a| a.min(max));
        v.scroll = v.scroll.min(max);
        v.ensure_cursor_visible();
        v.comment_cursor = v.comment_cursor.min(self.annotations.len().saturating_sub(1));
        let preview_max = v.preview.line_count().saturating_sub(v.page());
        v.preview.scroll = v.preview.scroll.min(preview_max);
    }

    // ── Normal / Selecting ───────────────────────────────────────────

    fn browse(&mut self, action: Action, env: &Env<'_>, effects: &mut Vec<Effect>) {
        let max_line = env.doc.len().saturating_sub(1);
        match (action, self.view.focus) {
            (Action::Move(motion), Pane::Document) => {
                let v = &mut self.view;
                v.anchor = None;
                v.mode = Mode::Normal;
                v.cursor = motion.apply(v.cursor, max_line, v.page());
                v.ensure_cursor_visible();
            }
            (Action::Extend(motion), Pane::Document) => {
                let v = &mut self.view;
                if v.anchor.is_none() {
                    v.anchor = Some(v.cursor);
                    v.mode = Mode::Selecting;
                }
                v.cursor = motion.apply(v.cursor, max_line, v.page());
                v.ensure_cursor_visible();
            }
            (Action::Move(motion), Pane::Comments) => {
                let max = self.annotations.len().saturating_sub(1);
                let next = motion.apply(self.view.comment_cursor, max, self.view.page());
                if next != self.view.comment_cursor {
                    self.view.comment_cursor = next;
                    self.scroll_to_focused_comment(env.doc);
                }
            }
            (Action::Escape, _) => {
                self.view.anchor = None;
                self.view.mode = Mode::Normal;
                self.view.status = None;
            }
            (Action::BeginComment, Pane::Document) => {
                let v = &mut self.view;
                v.anchor.get_or_insert(v.cursor);
                v.draft.clear();
                v.mode = Mode::Commenting;
                effects.push(Effect::FocusTextInput);
            }
            (Action::ToggleFocus, _) => {
                self.view.focus = self.view.focus.toggle();
                if self.view.focus == Pane::Comments && !self.annotations.is_empty() {
                    self.view.comment_cursor = self.view.comment_cursor.min(self.annotations.len() - 1);
                    self.scroll_to_focused_comment(env.doc);
                }
            }
            (Action::OpenPreview, _) if !self.annotations.is_empty() => {
                self.view.preview = Preview {
                    content: citation::format(&self.annotations, env.source),
                    scroll: 0,
                };
                self.view.mode = Mode::Preview;
            }
            (Action::DeleteComment, Pane::Comments) => {
                let Some(id) = self.focused_comment().map(|c| c.id.clone()) else {
                    return;
                };
                if self.annotations.remove(&id) {
                    tracing::info!(%id, "deleted comment");
                    self.view.comment_cursor = self
                        .view
                        .comment_cursor
                        .min(self.annotations.len().saturating_sub(1));
                    effects.push(Effect::Persist);
                }
            }
            _ => {}
        }
    }

    /// Moves the document cursor to the first rendered line that falls in
    /// the focused comment's range.
    fn scroll_to_focused_comment(&mut self, doc: &RenderedDocument) {
        let Some(target) = self.focused_comment().map(|c| c.range) else {
            return;
        };
        if let Some(line) = doc.first_line_in(target) {
            self.view.cursor = line;
            self.view.ensure_cursor_visible();
        }
    }

    // ── Commenting ───────────────────────────────────────────────────

    fn commenting(&mut self, action: Action, env: &Env<'_>, effects: &mut Vec<Effect>) {
        match action {
            Action::Edit(edit) => self.view.draft.apply(edit),
            Action::Escape => self.leave_commenting(),
            Action::Submit if self.view.draft.is_blank() => self.leave_commenting(),
            Action::Submit => {
                let range = self.selected_source_range(env.doc);
                let body = self.view.draft.text().trim_end().to_string();
                let comment = Comment::new(range, env.source.excerpt(range), body);
                tracing::info!(id = %comment.id, %range, "added comment");
                self.annotations.add(comment);
                self.view.status = Some(Status::info(format!("Comment added on {range}")));
                self.leave_commenting();
                effects.push(Effect::Persist);
            }
            _ => {}
        }
    }

    fn leave_commenting(&mut self) {
        self.view.draft.clear();
        self.view.anchor = None;
        self.view.mode = Mode::Normal;
    }

    // ── Preview ──────────────────────────────────────────────────────

    fn previewing(&mut self, action: Action, effects: &mut Vec<Effect>) {
        let v = &mut self.view;
        match action {
            Action::Move(motion) => {
                let max = v.preview.line_count().saturating_sub(v.page());
                v.preview.scroll = motion.apply(v.preview.scroll, max, v.page());
            }
            Action::Copy => {
                effects.push(Effect::CopyToClipboard(v.preview.content.clone()));
                v.mode = Mode::Normal;
            }
            Action::Escape => {
                v.mode = Mode::Normal;
                v.status = None;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_str;
    use crate::render::Renderer;
    use crate::style::StyleTable;

    const DOC: &str = "# Title\n\nFirst paragraph.\n\n```\ncode one\ncode two\n```\n\nLast paragraph.\n";

    struct Fixture {
        source: SourceDocument,
        doc: RenderedDocument,
    }

    impl Fixture {
        fn new(text: &str) -> Self {
            let source = SourceDocument::new(text);
            let doc = Renderer::new(&source, 80)
                .with_styles(StyleTable::plain())
                .render(&parse_str(text));
            Self { source, doc }
        }

        fn env(&self) -> Env<'_> {
            Env {
                doc: &self.doc,
                source: &self.source,
            }
        }

        fn run(&self, mut c: Controller, actions: &[Action]) -> (Controller, Vec<Effect>) {
            let mut all = Vec::new();
            for &a in actions {
                let (next, effects) = c.reduce(a, &self.env());
                c = next;
                all.extend(effects);
            }
            (c, all)
        }
    }

    fn fresh() -> Controller {
        let mut c = Controller::new(AnnotationFile::new("/tmp/doc.md", "hash"));
        c.view.page_height = 5;
        c
    }

    fn typed(s: &str) -> Vec<Action> {
        s.chars().map(|c| Action::Edit(DraftEdit::Insert(c))).collect()
    }

    #[test]
    fn selection_range_normalizes() {
        let mut v = ViewState {
            anchor: Some(8),
            cursor: 2,
            ..Default::default()
        };
        assert_eq!(v.selection_range(), (2, 8));
        v.anchor = Some(3);
        v.cursor = 7;
        assert_eq!(v.selection_range(), (3, 7));
        v.anchor = None;
        v.cursor = 5;
        assert_eq!(v.selection_range(), (5, 5));
    }

    #[test]
    fn extend_sets_anchor_and_move_clears_it() {
        let f = Fixture::new(DOC);
        let (c, _) = f.run(fresh(), &[Action::Extend(Motion::LineDown), Action::Extend(Motion::LineDown)]);
        assert_eq!(c.view.mode, Mode::Selecting);
        assert_eq!(c.view.anchor, Some(0));
        assert_eq!(c.view.selection_range(), (0, 2));

        let (c, _) = f.run(c, &[Action::Move(Motion::LineDown)]);
        assert_eq!(c.view.mode, Mode::Normal);
        assert_eq!(c.view.anchor, None);
        assert_eq!(c.view.cursor, 3);
    }

    #[test]
    fn cursor_stays_in_bounds_and_visible() {
        let f = Fixture::new(DOC);
        let (c, _) = f.run(fresh(), &[Action::Move(Motion::End)]);
        assert_eq!(c.view.cursor, f.doc.len() - 1);
        assert!(c.view.scroll <= c.view.cursor);
        assert!(c.view.cursor < c.view.scroll + c.view.page_height);

        let (c, _) = f.run(c, &[Action::Move(Motion::LineDown), Action::Move(Motion::PageUp)]);
        assert_eq!(c.view.cursor, f.doc.len() - 1 - 5);
        let (c, _) = f.run(c, &[Action::Move(Motion::Home), Action::Move(Motion::LineUp)]);
        assert_eq!(c.view.cursor, 0);
        assert_eq!(c.view.scroll, 0);
    }

    #[test]
    fn comment_on_cursor_line_without_selection() {
        let f = Fixture::new(DOC);
        let mut actions = vec![Action::Move(Motion::LineDown), Action::Move(Motion::LineDown), Action::BeginComment];
        actions.extend(typed("needs work"));
        actions.push(Action::Submit);
        let (c, effects) = f.run(fresh(), &actions);

        assert_eq!(effects, vec![Effect::FocusTextInput, Effect::Persist]);
        assert_eq!(c.view.mode, Mode::Normal);
        assert_eq!(c.view.anchor, None);
        let comment = &c.annotations.comments[0];
        assert_eq!(comment.range, SourceRange::line(3));
        assert_eq!(comment.selected_text, "First paragraph.");
        assert_eq!(comment.body, "needs work");
    }

    #[test]
    fn selection_over_code_spans_its_lines() {
        let f = Fixture::new(DOC);
        let code_one = f.doc.lines().iter().position(|l| l.text.contains("code one")).unwrap();
        let mut c = fresh();
        c.view.cursor = code_one;
        let mut actions = vec![Action::Extend(Motion::LineDown), Action::BeginComment];
        actions.extend(typed("x"));
        actions.push(Action::Submit);
        let (c, _) = f.run(c, &actions);
        let comment = &c.annotations.comments[0];
        assert_eq!(comment.range, SourceRange::new(6, 7));
        assert_eq!(comment.selected_text, "code one\ncode two");
    }

    #[test]
    fn newline_key_does_not_submit() {
        let f = Fixture::new(DOC);
        let mut actions = vec![Action::BeginComment];
        actions.extend(typed("a"));
        actions.push(Action::Edit(DraftEdit::Newline));
        actions.extend(typed("b"));
        let (c, effects) = f.run(fresh(), &actions);
        assert_eq!(c.view.mode, Mode::Commenting);
        assert_eq!(c.view.draft.text(), "a\nb");
        assert_eq!(c.view.draft.caret(), (1, 1));
        assert_eq!(effects, vec![Effect::FocusTextInput]);

        let (c, _) = f.run(c, &[Action::Submit]);
        assert_eq!(c.annotations.comments[0].body, "a\nb");
    }

    #[test]
    fn blank_submit_is_silent_cancel() {
        let f = Fixture::new(DOC);
        let mut actions = vec![Action::Extend(Motion::LineDown), Action::BeginComment];
        actions.extend(typed("  "));
        actions.push(Action::Submit);
        let (c, effects) = f.run(fresh(), &actions);
        assert_eq!(effects, vec![Effect::FocusTextInput]);
        assert!(c.annotations.is_empty());
        assert_eq!(c.view.mode, Mode::Normal);
        assert_eq!(c.view.anchor, None);
    }

    #[test]
    fn escape_discards_draft() {
        let f = Fixture::new(DOC);
        let mut actions = vec![Action::BeginComment];
        actions.extend(typed("draft"));
        actions.push(Action::Escape);
        let (c, effects) = f.run(fresh(), &actions);
        assert!(!effects.contains(&Effect::Persist));
        assert_eq!(c.view.mode, Mode::Normal);
        assert_eq!(c.view.draft.text(), "");
        assert!(c.annotations.is_empty());
    }

    #[test]
    fn draft_editing_handles_multibyte() {
        let mut d = Draft::default();
        for ch in "aé日".chars() {
            d.apply(DraftEdit::Insert(ch));
        }
        d.apply(DraftEdit::Left);
        d.apply(DraftEdit::Backspace);
        assert_eq!(d.text(), "a日");
        assert_eq!(d.caret(), (0, 1));
        d.apply(DraftEdit::Right);
        d.apply(DraftEdit::Right);
        assert_eq!(d.caret(), (0, 3));
    }

    fn with_comments(f: &Fixture) -> Controller {
        let mut c = fresh();
        // Last paragraph (line 10), then title (line 1): storage order differs from display order.
        c.annotations.add(Comment::new(SourceRange::line(10), "Last paragraph.", "late"));
        c.annotations.add(Comment::new(SourceRange::line(1), "# Title", "early"));
        let (c, _) = f.run(c, &[]);
        c
    }

    #[test]
    fn toggle_focus_scrolls_to_first_comment() {
        let f = Fixture::new(DOC);
        let mut c = with_comments(&f);
        c.view.cursor = 6;
        let (c, _) = f.run(c, &[Action::ToggleFocus]);
        assert_eq!(c.view.focus, Pane::Comments);
        assert_eq!(c.view.cursor, 0);

        let (c, _) = f.run(c, &[Action::Move(Motion::LineDown)]);
        assert_eq!(c.view.comment_cursor, 1);
        let target = f.doc.mapping(c.view.cursor).unwrap();
        assert_eq!(target.start, 10);
    }

    #[test]
    fn delete_removes_focused_comment_and_clamps() {
        let f = Fixture::new(DOC);
        let c = with_comments(&f);
        let (c, effects) = f.run(
            c,
            &[Action::ToggleFocus, Action::Move(Motion::End), Action::DeleteComment],
        );
        assert_eq!(effects, vec![Effect::Persist]);
        assert_eq!(c.annotations.len(), 1);
        assert_eq!(c.annotations.comments[0].body, "early");
        assert_eq!(c.view.comment_cursor, 0);

        let (c, effects) = f.run(c, &[Action::DeleteComment, Action::DeleteComment]);
        assert_eq!(effects, vec![Effect::Persist]);
        assert!(c.annotations.is_empty());
    }

    #[test]
    fn preview_requires_comments() {
        let f = Fixture::new(DOC);
        let (c, _) = f.run(fresh(), &[Action::OpenPreview]);
        assert_eq!(c.view.mode, Mode::Normal);

        let (c, _) = f.run(with_comments(&f), &[Action::OpenPreview]);
        assert_eq!(c.view.mode, Mode::Preview);
        assert!(c.view.preview.content.starts_with("## Comments on doc.md"));
    }

    #[test]
    fn preview_copy_emits_content_and_leaves() {
        let f = Fixture::new(DOC);
        let (c, effects) = f.run(with_comments(&f), &[Action::OpenPreview, Action::Copy]);
        assert_eq!(c.view.mode, Mode::Normal);
        match effects.as_slice() {
            [Effect::CopyToClipboard(text)] => assert_eq!(text, &c.view.preview.content),
            other => panic!("unexpected effects {other:?}"),
        }
    }

    #[test]
    fn preview_scroll_is_clamped() {
        let f = Fixture::new(DOC);
        let (c, _) = f.run(
            with_comments(&f),
            &[Action::OpenPreview, Action::Move(Motion::End), Action::Move(Motion::LineDown)],
        );
        let max = c.view.preview.line_count().saturating_sub(5);
        assert_eq!(c.view.preview.scroll, max);
    }

    #[test]
    fn quit_is_honored_everywhere() {
        let f = Fixture::new(DOC);
        for setup in [vec![], vec![Action::BeginComment]] {
            let mut actions = setup;
            actions.push(Action::Quit);
            let (_, effects) = f.run(fresh(), &actions);
            assert_eq!(effects.last(), Some(&Effect::Quit));
        }
    }

    #[test]
    fn resize_clamps_cursor() {
        let f = Fixture::new(DOC);
        let mut c = fresh();
        c.view.cursor = 500;
        c.view.anchor = Some(400);
        let (c, _) = f.run(c, &[Action::Resize { page_height: 3 }]);
        assert_eq!(c.view.cursor, f.doc.len() - 1);
        assert_eq!(c.view.anchor, Some(f.doc.len() - 1));
        assert_eq!(c.view.scroll, f.doc.len() - 3);
    }
}
