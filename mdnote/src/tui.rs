//! Terminal lifecycle management for mdnote.
//!
//! The viewer draws to stderr rather than stdout. Stdout stays free for
//! output that is meant to be piped, such as `mdnote comments`, and a
//! redirected stdout (`mdnote notes.md > log`) does not swallow the UI.

use std::io::{self, BufWriter, Stderr};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crossterm::cursor::SetCursorStyle;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::execute;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

/// CrosstermBackend over a buffered stderr writer.
pub type Tui = Terminal<CrosstermBackend<BufWriter<Stderr>>>;

/// The terminal while the viewer owns it.
///
/// Opening switches to raw mode, the alternate screen and mouse capture
/// (for wheel scrolling). [`TerminalSession::close`] undoes all of it;
/// ratatui 0.30 does not restore anything on `Drop`, so the event loop calls
/// `close` at its single exit and the panic hook calls [`restore`].
pub struct TerminalSession {
    pub terminal: Tui,
    /// Whether the caret is currently the blinking text bar.
    text_caret: bool,
}

impl TerminalSession {
    /// Takes over the terminal.
    ///
    /// # Errors
    ///
    /// Returns `Err` if raw mode cannot be enabled or the setup escapes
    /// cannot be written.
    pub fn open() -> io::Result<Self> {
        let mut out = BufWriter::new(io::stderr());
        terminal::enable_raw_mode()?;
        execute!(out, EnterAlternateScreen, EnableMouseCapture)?;
        Ok(Self {
            terminal: Terminal::new(CrosstermBackend::new(out))?,
            text_caret: false,
        })
    }

    /// Shows the blinking bar while a comment is being typed and the user's
    /// own caret otherwise. Writes nothing when the shape already matches.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the escape sequence cannot be written.
    pub fn set_text_caret(&mut self, editing: bool) -> io::Result<()> {
        if self.text_caret == editing {
            return Ok(());
        }
        let shape = if editing {
            SetCursorStyle::BlinkingBar
        } else {
            SetCursorStyle::DefaultUserShape
        };
        execute!(self.terminal.backend_mut(), shape)?;
        self.text_caret = editing;
        Ok(())
    }

    /// Hands the terminal back to the shell.
    ///
    /// # Errors
    ///
    /// Returns `Err` if raw mode cannot be left or the escapes cannot be
    /// written.
    pub fn close(self) -> io::Result<()> {
        restore()
    }
}

/// Leaves raw mode and the alternate screen, resets the caret.
///
/// Idempotent, so it is safe from both the normal exit and the panic hook.
///
/// # Errors
///
/// Returns `Err` if `disable_raw_mode` or `execute!` fails.
pub fn restore() -> io::Result<()> {
    terminal::disable_raw_mode()?;
    execute!(
        io::stderr(),
        SetCursorStyle::DefaultUserShape,
        LeaveAlternateScreen,
        DisableMouseCapture
    )
}

/// Chains a panic hook that calls [`restore`] before the previous hook
/// prints the message.
///
/// Must be installed **before** [`TerminalSession::open`] so it runs first.
pub fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore();
        previous(info);
    }));
}

/// Returns a flag that flips to `true` once SIGTERM arrives.
///
/// The event loop polls it on its heartbeat.
///
/// # Errors
///
/// Returns `Err` if the OS refuses to register the handler.
pub fn sigterm_flag() -> io::Result<Arc<AtomicBool>> {
    let flag = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&flag))?;
    Ok(flag)
}
