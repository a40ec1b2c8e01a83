//! Keybinding dispatcher for mdnote.
//!
//! Translates raw crossterm `KeyEvent`s into reducer [`Action`]s. The
//! dispatcher branches first on the current [`Mode`] so that Commenting and
//! Preview have isolated handler functions; Normal and Selecting share one.
//! Nothing here mutates state: the event loop feeds the returned action to
//! `Controller::reduce`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use mdnote_core::selection::{Action, DraftEdit, Mode, Motion, ViewState};

/// Maps a key event to the action it means in the current mode.
///
/// Returns `None` for keys with no binding. Ctrl-C quits from every mode.
///
/// # Arguments
///
/// * `key`  — the raw crossterm key event (code + modifiers)
/// * `view` — read-only view state supplying the current mode
pub fn map_key(key: KeyEvent, view: &ViewState) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }
    match view.mode {
        Mode::Normal | Mode::Selecting => map_browse(key),
        Mode::Commenting => map_commenting(key),
        Mode::Preview => map_preview(key),
    }
}

/// Maps a mouse wheel event to a cursor movement.
///
/// In Commenting mode the wheel is ignored so the selection stays put.
pub fn map_mouse(mouse: MouseEvent, view: &ViewState) -> Option<Action> {
    if view.mode == Mode::Commenting {
        return None;
    }
    match mouse.kind {
        MouseEventKind::ScrollUp => Some(Action::Move(Motion::LineUp)),
        MouseEventKind::ScrollDown => Some(Action::Move(Motion::LineDown)),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Normal / Selecting mode
// ---------------------------------------------------------------------------

/// Handles a key event while browsing the document or comment list.
///
/// Shift+arrows and `J`/`K` extend the selection; the plain forms move and
/// drop it.
///
/// # Arguments
///
/// * `key` — the raw crossterm key event
fn map_browse(key: KeyEvent) -> Option<Action> {
    // Terminals report `G` as Shift+G; only non-character keys extend on Shift.
    let shift = key.modifiers.contains(KeyModifiers::SHIFT) && !matches!(key.code, KeyCode::Char(_));

    if let Some(motion) = motion_for(key.code) {
        return Some(if shift {
            Action::Extend(motion)
        } else {
            Action::Move(motion)
        });
    }

    let action = match key.code {
        KeyCode::Char('J') => Action::Extend(Motion::LineDown),
        KeyCode::Char('K') => Action::Extend(Motion::LineUp),
        KeyCode::Char('c') | KeyCode::Char('C') => Action::BeginComment,
        KeyCode::Tab | KeyCode::BackTab => Action::ToggleFocus,
        KeyCode::Enter => Action::OpenPreview,
        KeyCode::Char('d') | KeyCode::Delete => Action::DeleteComment,
        KeyCode::Esc => Action::Escape,
        KeyCode::Char('q') => Action::Quit,
        _ => return None,
    };
    Some(action)
}

/// Motion bound to `code`, ignoring modifiers.
fn motion_for(code: KeyCode) -> Option<Motion> {
    let motion = match code {
        KeyCode::Up | KeyCode::Char('k') => Motion::LineUp,
        KeyCode::Down | KeyCode::Char('j') => Motion::LineDown,
        KeyCode::PageUp => Motion::PageUp,
        KeyCode::PageDown => Motion::PageDown,
        KeyCode::Home | KeyCode::Char('g') => Motion::Home,
        KeyCode::End | KeyCode::Char('G') => Motion::End,
        _ => return None,
    };
    Some(motion)
}

// ---------------------------------------------------------------------------
// Commenting mode
// ---------------------------------------------------------------------------

/// Handles a key event while the comment input is open.
///
/// `Enter` submits; `Alt-Enter` and `Ctrl-J` insert a newline since many
/// terminals cannot report `Shift-Enter`. Printable characters (including
/// `q`) are typed into the draft.
///
/// # Arguments
///
/// * `key` — the raw crossterm key event
fn map_commenting(key: KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    let action = match key.code {
        KeyCode::Enter if alt || key.modifiers.contains(KeyModifiers::SHIFT) => {
            Action::Edit(DraftEdit::Newline)
        }
        KeyCode::Char('j') if ctrl => Action::Edit(DraftEdit::Newline),
        KeyCode::Enter => Action::Submit,
        KeyCode::Esc => Action::Escape,
        KeyCode::Backspace => Action::Edit(DraftEdit::Backspace),
        KeyCode::Left => Action::Edit(DraftEdit::Left),
        KeyCode::Right => Action::Edit(DraftEdit::Right),
        KeyCode::Char(c) if !ctrl && !alt => Action::Edit(DraftEdit::Insert(c)),
        _ => return None,
    };
    Some(action)
}

// ---------------------------------------------------------------------------
// Preview mode
// ---------------------------------------------------------------------------

/// Handles a key event while the citation preview is shown.
///
/// # Arguments
///
/// * `key` — the raw crossterm key event
fn map_preview(key: KeyEvent) -> Option<Action> {
    if let Some(motion) = motion_for(key.code) {
        return Some(Action::Move(motion));
    }
    let action = match key.code {
        KeyCode::Char('c') | KeyCode::Char('y') => Action::Copy,
        KeyCode::Esc => Action::Escape,
        KeyCode::Char('q') => Action::Quit,
        _ => return None,
    };
    Some(action)
}
