//! mdnote: read a markdown file in the terminal and comment on its lines.
//!
//! Entry point for the `mdnote` binary. Wires together argument parsing
//! (`cli`), the config file (`config`), logging (`logging`), the terminal
//! lifecycle (`tui`), the event bus (`event`), the panes (`ui`) and the
//! annotation engine in `mdnote-core`.
//!
//! # Startup sequence (order matters)
//!
//! 1. Parse arguments and load config. Read-only, safe before terminal init.
//! 2. Initialise logging. `comments` logs to stderr; the viewer owns the
//!    terminal, so it logs to a file.
//! 3. Load the document and its comments. Failures here print a normal
//!    error because the terminal is still untouched.
//! 4. `install_panic_hook()`, installed first so it is the innermost hook.
//! 5. `sigterm_flag()` returns `Arc<AtomicBool>` polled in the event loop.
//! 6. `TerminalSession::open()` enters the alternate screen and raw mode.
//! 7. `spawn_input_task()` starts forwarding terminal input.
//!
//! # Safety
//!
//! `TerminalSession::close()` runs after the event loop exits (quit action,
//! SIGTERM, or closed input). Inside the loop, draw errors break out with
//! the error kept aside, so `close()` is always reached first. The
//! panic hook covers unexpected panics.

mod app;
mod cli;
mod clipboard;
mod config;
mod event;
mod logging;
mod theme;
mod tui;
mod ui;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::Ordering;

use anyhow::Context as _;
use clap::Parser as _;
use ratatui::layout::Rect;

use mdnote_core::selection::Mode;
use mdnote_core::store::{self, AnnotationStore};
use mdnote_core::{citation, Effect, SourceDocument};

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::logging::LogConfig;

/// File name of the viewer's log inside the store directory.
const DEFAULT_LOG_NAME: &str = "mdnote.log";

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("mdnote: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref());
    let store_root = cli
        .store_dir
        .clone()
        .or_else(|| config.store_dir.clone())
        .unwrap_or_else(store::default_root);
    let store = AnnotationStore::new(store_root);
    let log = LogConfig::from_verbosity(cli.verbose);

    match cli.command {
        Some(Command::Comments { file }) => {
            logging::init_logging(&log.with_log_file(cli.log_file))
                .context("failed to initialise logging")?;
            print_comments(&file, &store)
        }
        None => {
            let log_file = cli
                .log_file
                .or(config.log_file.clone())
                .unwrap_or_else(|| store.root().join(DEFAULT_LOG_NAME));
            logging::init_logging(&log.with_log_file(Some(log_file.clone())))
                .with_context(|| format!("failed to open log file {}", log_file.display()))?;

            let file = cli.file.context("no file given")?;
            let theme = theme::Theme::from_name(config.theme.as_deref().unwrap_or("dark"));
            let app = app::App::load(&file, store)?;

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("failed to start runtime")?;
            runtime
                .block_on(run_viewer(app, theme))
                .context("terminal error")
        }
    }
}

/// Prints the citation document for `file` to stdout.
///
/// With no comments, says so on stderr and succeeds.
fn print_comments(file: &Path, store: &AnnotationStore) -> anyhow::Result<()> {
    let path: PathBuf = std::path::absolute(file)
        .with_context(|| format!("failed to resolve {}", file.display()))?;
    let bytes =
        std::fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
    let source = SourceDocument::new(bytes);
    let annotations = store
        .load(&path)
        .with_context(|| format!("failed to load comments for {}", path.display()))?;

    if annotations.is_empty() {
        eprintln!("No comments found for this file.");
        return Ok(());
    }
    if annotations.is_stale(&store::hash_bytes(source.bytes())) {
        tracing::warn!(
            path = %path.display(),
            "file changed since comments were added; line numbers may be off"
        );
    }
    print!("{}", citation::format(&annotations, &source));
    Ok(())
}

/// Runs the interactive viewer until the user quits or SIGTERM arrives.
async fn run_viewer(mut app: app::App, theme: theme::Theme) -> std::io::Result<()> {
    // Panic hook first: the innermost hook restores the terminal.
    tui::install_panic_hook();
    let sigterm = tui::sigterm_flag()?;
    let mut session = tui::TerminalSession::open()?;
    let mut input = event::spawn_input_task();

    let size = session.terminal.size()?;
    app.fit(Rect::new(0, 0, size.width, size.height));

    let mut outcome = draw(&mut session, &app, &theme);

    // Event loop: exits only via `break`, never via `?`.
    // This guarantees `close()` is always reached after the loop.
    'event_loop: while outcome.is_ok() {
        tokio::select! {
            // Heartbeat: SIGTERM is checked at least every 50ms even when no
            // input arrives.
            _ = tokio::time::sleep(std::time::Duration::from_millis(50)) => {
                if sigterm.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
            next = input.recv() => {
                let action = match next {
                    Some(event::InputEvent::Key(key)) => ui::keybindings::map_key(key, app.view()),
                    Some(event::InputEvent::Wheel(mouse)) => ui::keybindings::map_mouse(mouse, app.view()),
                    Some(event::InputEvent::Resize(cols, rows)) => {
                        app.fit(Rect::new(0, 0, cols, rows));
                        None
                    }
                    Some(event::InputEvent::Closed) | None => break 'event_loop,
                };

                let effects = action.map(|a| app.dispatch(a)).unwrap_or_default();
                let mut quit = false;
                for effect in effects {
                    match effect {
                        Effect::Quit => quit = true,
                        Effect::FocusTextInput => outcome = session.set_text_caret(true),
                        other => tracing::debug!(?other, "unhandled effect"),
                    }
                }
                if outcome.is_ok() && app.view().mode != Mode::Commenting {
                    outcome = session.set_text_caret(false);
                }
                if quit || sigterm.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
                if outcome.is_ok() {
                    outcome = draw(&mut session, &app, &theme);
                }
            }
        }
    }

    // Single exit point: hand the terminal back, then report any draw error
    // that ended the loop.
    session.close()?;
    outcome
}

fn draw(session: &mut tui::TerminalSession, app: &app::App, theme: &theme::Theme) -> std::io::Result<()> {
    session
        .terminal
        .draw(|frame| ui::render(frame, app, theme))
        .map(drop)
}
