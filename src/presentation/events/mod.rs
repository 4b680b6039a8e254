//! Event handling.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Result of event handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Continue processing.
    Continue,
    /// Exit application.
    Exit,
    /// Drop the current view and mount a fresh one for the same URL.
    Reload,
}

/// Terminal key mapping.
pub struct EventHandler;

impl EventHandler {
    /// Maps a key press to an application action.
    #[must_use]
    pub fn handle_key(key: &KeyEvent) -> EventResult {
        if key.kind != KeyEventKind::Press {
            return EventResult::Continue;
        }
        if Self::is_quit_event(key) {
            return EventResult::Exit;
        }
        if Self::is_reload_event(key) {
            return EventResult::Reload;
        }
        EventResult::Continue
    }

    /// Checks if key is a quit event.
    #[must_use]
    pub fn is_quit_event(key: &KeyEvent) -> bool {
        matches!(
            key,
            KeyEvent {
                code: KeyCode::Char('q'),
                modifiers: KeyModifiers::NONE,
                ..
            } | KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } | KeyEvent {
                code: KeyCode::Esc,
                modifiers: KeyModifiers::NONE,
                ..
            }
        )
    }

    /// Checks if key is a reload event.
    #[must_use]
    pub fn is_reload_event(key: &KeyEvent) -> bool {
        matches!(
            key,
            KeyEvent {
                code: KeyCode::Char('r'),
                modifiers: KeyModifiers::NONE,
                ..
            }
        )
    }
}
