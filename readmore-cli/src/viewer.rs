//! Interactive viewer for the Readmore CLI.
//!
//! Shows one collapsible text widget in a terminal UI using `ratatui` and
//! `crossterm`. Links, hashtags, mentions and the toggle affordance can be
//! tapped with the keyboard or the mouse; the box grows and shrinks with an
//! eased transition.
//!
//! # Module layout
//!
//! - `app`: [`ViewerApp`] struct, state fields, transitions, and helpers
//! - `render`: `render_ui` and layout/draw functions
//! - `input`: `handle_key_event`, `handle_mouse_event` and key bindings

mod app;
mod input;
mod render;

use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use readmore_core::ReadMore;

use app::ViewerApp;
use input::{KeyAction, handle_key_event, handle_mouse_event};
use render::render_ui;

/// Redraw period while a transition is running.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Columns taken by the text box border (left and right).
const BORDER_COLUMNS: u16 = 2;

/// Guard that restores terminal state on drop.
///
/// Enables raw mode, mouse capture and the alternate screen on creation
/// and undoes them on drop, so the terminal is restored even on panic.
struct TerminalGuard;

impl TerminalGuard {
    /// Create a new terminal guard, enabling raw mode and alternate screen.
    fn new() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
    }
}

/// Entry point for the interactive viewer.
///
/// Runs until the user quits with `q`, `Esc` or `Ctrl+C`.
pub async fn run_viewer(widget: ReadMore) -> Result<()> {
    let mut app = ViewerApp::new(widget);

    // Set up terminal
    let guard = TerminalGuard::new()?;
    let mut terminal = ratatui::init();

    // Set up event stream and the animation clock
    let mut event_reader = EventStream::new();
    let mut ticker = tokio::time::interval(FRAME_INTERVAL);

    tracing::info!("viewer started");

    loop {
        let size = terminal.size().context("Failed to read terminal size")?;
        app.resize(size.width.saturating_sub(BORDER_COLUMNS));

        let now = Instant::now();
        terminal
            .draw(|frame| render_ui(frame, &mut app, now))
            .context("Failed to draw UI")?;

        tokio::select! {
            // Terminal events
            event = event_reader.next() => {
                match event {
                    Some(Ok(Event::Key(key))) => {
                        if handle_key_event(&mut app, key, Instant::now()) == KeyAction::Exit {
                            break;
                        }
                    }
                    Some(Ok(Event::Mouse(mouse))) => {
                        handle_mouse_event(&mut app, mouse, Instant::now());
                    }
                    Some(Ok(Event::Resize(width, _))) => {
                        app.resize(width.saturating_sub(BORDER_COLUMNS));
                    }
                    Some(Err(e)) => {
                        app.status_message = Some(format!("Event error: {}", e));
                    }
                    None => break,
                    _ => {}
                }
            }

            // Animation frames (only while a transition runs)
            _ = ticker.tick(), if app.is_animating() => {
                app.tick(Instant::now());
            }
        }
    }

    // Drop terminal guard (restores terminal) before returning
    drop(guard);
    ratatui::restore();

    tracing::info!(expanded = app.widget.is_expanded(), "viewer closed");

    Ok(())
}
