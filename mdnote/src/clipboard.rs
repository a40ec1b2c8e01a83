//! Out-of-process clipboard access.
//!
//! No clipboard crate is linked; the first system helper that accepts the
//! text on stdin wins. Failure is reported to the caller, which shows it in
//! the status bar.

use std::io::Write;
use std::process::{Child, Command, Stdio};

/// Helper programs tried in order, with their arguments.
const HELPERS: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("clip.exe", &[]),
];

#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("no clipboard helper found (tried pbcopy, wl-copy, xclip, xsel, clip.exe)")]
    NoHelper,

    #[error("{program} exited with {status}")]
    Failed {
        program: &'static str,
        status: std::process::ExitStatus,
    },

    #[error("failed to write to {program}: {source}")]
    Io {
        program: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Copies `text` to the system clipboard.
///
/// A helper that is not installed is skipped. A helper that starts but fails
/// stops the search and its error is returned.
///
/// # Errors
///
/// [`ClipboardError::NoHelper`] when none of the helpers can be spawned.
pub fn copy(text: &str) -> Result<(), ClipboardError> {
    for &(program, args) in HELPERS {
        let mut child = match Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                tracing::trace!(program, error = %e, "clipboard helper unavailable");
                continue;
            }
        };

        feed(&mut child, program, text)?;
        tracing::debug!(program, bytes = text.len(), "copied to clipboard");
        return Ok(());
    }
    Err(ClipboardError::NoHelper)
}

/// Writes `text` to the helper's stdin, closes it and waits for the exit.
///
/// The child is always reaped: a failed write kills it first.
fn feed(child: &mut Child, program: &'static str, text: &str) -> Result<(), ClipboardError> {
    if let Some(mut stdin) = child.stdin.take() {
        if let Err(source) = stdin.write_all(text.as_bytes()) {
            drop(stdin);
            let _ = child.kill();
            let _ = child.wait();
            return Err(ClipboardError::Io { program, source });
        }
    }
    let status = child
        .wait()
        .map_err(|source| ClipboardError::Io { program, source })?;
    if !status.success() {
        return Err(ClipboardError::Failed { program, status });
    }
    Ok(())
}
