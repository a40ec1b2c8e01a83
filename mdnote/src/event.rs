//! Input bus for mdnote.
//!
//! Terminal input is normalised into [`InputEvent`] and sent over a tokio
//! unbounded MPSC channel. The main loop receives from the channel, handles
//! one event completely and redraws before taking the next.

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
use futures::StreamExt;
use tokio::sync::mpsc::{self, UnboundedReceiver};

/// Everything the viewer reacts to.
#[derive(Debug)]
#[non_exhaustive]
pub enum InputEvent {
    /// A key press. Release and repeat events are dropped at the source;
    /// Windows reports both press and release for every keystroke.
    Key(KeyEvent),
    /// A mouse wheel tick. Clicks and motion are dropped at the source.
    Wheel(MouseEvent),
    /// The terminal is now (columns, rows).
    Resize(u16, u16),
    /// The terminal input stream ended or failed.
    Closed,
}

/// Spawns the task that reads crossterm input and returns the receiving end.
///
/// The task stops when the receiver is dropped. A read error is logged and
/// reported as [`InputEvent::Closed`] so the main loop restores the terminal
/// instead of waiting forever.
pub fn spawn_input_task() -> UnboundedReceiver<InputEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut stream = EventStream::new();
        while let Some(read) = stream.next().await {
            let event = match read {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => InputEvent::Key(key),
                Ok(Event::Mouse(mouse)) if is_wheel(&mouse) => InputEvent::Wheel(mouse),
                Ok(Event::Resize(cols, rows)) => InputEvent::Resize(cols, rows),
                Ok(_) => continue,
                Err(e) => {
                    tracing::error!(error = %e, "terminal input failed");
                    let _ = tx.send(InputEvent::Closed);
                    return;
                }
            };
            if tx.send(event).is_err() {
                return;
            }
        }
        let _ = tx.send(InputEvent::Closed);
    });
    rx
}

fn is_wheel(mouse: &MouseEvent) -> bool {
    matches!(mouse.kind, MouseEventKind::ScrollUp | MouseEventKind::ScrollDown)
}
