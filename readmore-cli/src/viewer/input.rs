//! Key and mouse handling for the viewer.
//!
//! Defines [`KeyAction`], [`handle_key_event`] and [`handle_mouse_event`]
//! which translate crossterm events into state changes consumed by the
//! `run_viewer` event loop.

use std::time::Instant;

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use super::app::ViewerApp;

/// Result of handling a key event.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum KeyAction {
    /// Continue the event loop.
    Continue,
    /// Exit the viewer.
    Exit,
}

/// Handle a key event and update app state.
pub(super) fn handle_key_event(app: &mut ViewerApp, key: KeyEvent, now: Instant) -> KeyAction {
    // Only handle key press events (not release/repeat)
    if key.kind != KeyEventKind::Press {
        return KeyAction::Continue;
    }

    // Ctrl+C always exits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyAction::Exit;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return KeyAction::Exit,
        KeyCode::Tab => app.focus_next(),
        KeyCode::BackTab => app.focus_prev(),
        KeyCode::Enter | KeyCode::Char(' ') => app.activate(now),
        _ => {}
    }
    KeyAction::Continue
}

/// Handle a mouse event; a left click taps whatever is under the pointer.
pub(super) fn handle_mouse_event(app: &mut ViewerApp, mouse: MouseEvent, now: Instant) {
    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
        app.click(mouse.column, mouse.row, now);
    }
}
