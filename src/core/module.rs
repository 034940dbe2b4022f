//! Module trait for focusable screen components

use crossterm::event::KeyEvent;

use super::{Action, Session};

/// Trait for UI modules that can handle input
pub trait Module {
    /// Handle keyboard input
    /// Returns an Action describing what should happen
    fn handle_key(&mut self, key: KeyEvent, session: &mut Session) -> Action;
}
