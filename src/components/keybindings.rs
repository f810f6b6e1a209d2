//! Keybinding system for state-aware keyboard shortcuts
//!
//! Maps raw crossterm key events to the session's `InputEvent` vocabulary.
//! The mapping depends on the current `SessionState`: `y` only confirms
//! while the confirmation prompt is showing, and any key dismisses the
//! results of a finished run.

use crate::app::InputEvent;
use crate::session_state::SessionState;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// A keybinding definition
#[derive(Debug, Clone)]
pub struct Keybinding {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
    pub event: InputEvent,
    pub display: String,
    pub description: String,
}

impl Keybinding {
    /// Create a new keybinding with no modifiers
    pub fn new(key: KeyCode, event: InputEvent, display: &str, description: &str) -> Self {
        Self {
            key,
            modifiers: KeyModifiers::NONE,
            event,
            display: display.to_string(),
            description: description.to_string(),
        }
    }

    /// Create a keybinding with modifiers
    pub fn with_modifiers(
        key: KeyCode,
        modifiers: KeyModifiers,
        event: InputEvent,
        display: &str,
        description: &str,
    ) -> Self {
        Self {
            key,
            modifiers,
            event,
            display: display.to_string(),
            description: description.to_string(),
        }
    }

    fn matches(&self, key: &KeyEvent) -> bool {
        // Shift is implied by the character itself
        let modifiers = key.modifiers.difference(KeyModifiers::SHIFT);
        self.key == key.code && self.modifiers == modifiers
    }
}

/// State-aware keybinding registry
pub struct KeybindingContext {
    state_bindings: HashMap<SessionState, Vec<Keybinding>>,
    /// Available in every state
    global_bindings: Vec<Keybinding>,
}

impl Default for KeybindingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl KeybindingContext {
    pub fn new() -> Self {
        let mut ctx = Self {
            state_bindings: HashMap::new(),
            global_bindings: Vec::new(),
        };
        ctx.register_defaults();
        ctx
    }

    fn register_defaults(&mut self) {
        // Raw mode swallows SIGINT, so Ctrl+C arrives as a key
        self.global_bindings = vec![
            Keybinding::new(KeyCode::Char('q'), InputEvent::Quit, "Q", "Quit"),
            Keybinding::with_modifiers(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL,
                InputEvent::Quit,
                "Ctrl+C",
                "Quit",
            ),
        ];

        self.state_bindings.insert(
            SessionState::Browsing,
            vec![
                Keybinding::new(KeyCode::Up, InputEvent::Up, "Up", "Move up"),
                Keybinding::new(KeyCode::Down, InputEvent::Down, "Down", "Move down"),
                Keybinding::new(KeyCode::Left, InputEvent::Left, "Left", "Previous category"),
                Keybinding::new(KeyCode::Right, InputEvent::Right, "Right", "Next category"),
                Keybinding::new(KeyCode::Enter, InputEvent::Toggle, "Enter", "Select"),
                Keybinding::new(KeyCode::Char(' '), InputEvent::Toggle, "Space", "Select"),
                Keybinding::new(KeyCode::Char('i'), InputEvent::InstallTrigger, "I", "Install"),
            ],
        );

        self.state_bindings.insert(
            SessionState::ConfirmingInstall,
            vec![
                Keybinding::new(KeyCode::Char('y'), InputEvent::Confirm, "Y", "Confirm"),
                Keybinding::new(KeyCode::Char('n'), InputEvent::Cancel, "N", "Cancel"),
                Keybinding::new(KeyCode::Esc, InputEvent::Cancel, "Esc", "Cancel"),
            ],
        );

        self.state_bindings.insert(
            SessionState::ReviewingResults,
            vec![Keybinding::new(KeyCode::Enter, InputEvent::Confirm, "Enter", "Continue")],
        );
    }

    /// Bindings active in `state`, state-specific first
    pub fn get_bindings(&self, state: SessionState) -> Vec<&Keybinding> {
        let mut bindings: Vec<&Keybinding> = Vec::new();
        if let Some(state_bindings) = self.state_bindings.get(&state) {
            bindings.extend(state_bindings.iter());
        }
        if !state.is_terminal() {
            bindings.extend(self.global_bindings.iter());
        }
        bindings
    }

    /// Translate a key press. While confirming, any unbound key cancels;
    /// while reviewing results, any unbound key continues.
    pub fn resolve(&self, state: SessionState, key: &KeyEvent) -> Option<InputEvent> {
        let bound = self
            .get_bindings(state)
            .into_iter()
            .find(|b| b.matches(key))
            .map(|b| b.event);

        match (bound, state) {
            (None, SessionState::ConfirmingInstall) => Some(InputEvent::Cancel),
            (None, SessionState::ReviewingResults) => Some(InputEvent::Confirm),
            (event, _) => event,
        }
    }
}

/// One-line usage hint for the footer
pub const fn help_line(state: SessionState) -> &'static str {
    match state {
        SessionState::Browsing => {
            "Use arrow keys to navigate, Enter to select, 'i' to install, 'q' to quit"
        }
        SessionState::ConfirmingInstall => "Press 'y' to confirm, 'n' to cancel",
        SessionState::Installing => "Installing, please wait...",
        SessionState::ReviewingResults => "Press any key to continue, 'q' to quit",
        SessionState::Terminated => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_browsing_keys() {
        let ctx = KeybindingContext::new();
        let state = SessionState::Browsing;
        assert_eq!(ctx.resolve(state, &key(KeyCode::Up)), Some(InputEvent::Up));
        assert_eq!(ctx.resolve(state, &key(KeyCode::Right)), Some(InputEvent::Right));
        assert_eq!(ctx.resolve(state, &key(KeyCode::Enter)), Some(InputEvent::Toggle));
        assert_eq!(ctx.resolve(state, &key(KeyCode::Char(' '))), Some(InputEvent::Toggle));
        assert_eq!(
            ctx.resolve(state, &key(KeyCode::Char('i'))),
            Some(InputEvent::InstallTrigger)
        );
        assert_eq!(ctx.resolve(state, &key(KeyCode::Char('q'))), Some(InputEvent::Quit));
    }

    #[test]
    fn test_unbound_key_while_browsing_is_ignored() {
        let ctx = KeybindingContext::new();
        assert_eq!(ctx.resolve(SessionState::Browsing, &key(KeyCode::Char('y'))), None);
        assert_eq!(ctx.resolve(SessionState::Browsing, &key(KeyCode::Esc)), None);
    }

    #[test]
    fn test_confirm_only_while_confirming() {
        let ctx = KeybindingContext::new();
        let state = SessionState::ConfirmingInstall;
        assert_eq!(ctx.resolve(state, &key(KeyCode::Char('y'))), Some(InputEvent::Confirm));
        assert_eq!(ctx.resolve(state, &key(KeyCode::Char('n'))), Some(InputEvent::Cancel));
        assert_eq!(ctx.resolve(state, &key(KeyCode::Esc)), Some(InputEvent::Cancel));
        // Anything else cancels, except quit
        assert_eq!(ctx.resolve(state, &key(KeyCode::Down)), Some(InputEvent::Cancel));
        assert_eq!(ctx.resolve(state, &key(KeyCode::Char('q'))), Some(InputEvent::Quit));
    }

    #[test]
    fn test_any_key_dismisses_results() {
        let ctx = KeybindingContext::new();
        let state = SessionState::ReviewingResults;
        assert_eq!(ctx.resolve(state, &key(KeyCode::Enter)), Some(InputEvent::Confirm));
        assert_eq!(ctx.resolve(state, &key(KeyCode::Char('x'))), Some(InputEvent::Confirm));
        assert_eq!(ctx.resolve(state, &key(KeyCode::Char('q'))), Some(InputEvent::Quit));
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        let ctx = KeybindingContext::new();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        for state in [
            SessionState::Browsing,
            SessionState::ConfirmingInstall,
            SessionState::Installing,
            SessionState::ReviewingResults,
        ] {
            assert_eq!(ctx.resolve(state, &ctrl_c), Some(InputEvent::Quit));
        }
        // Plain 'c' is not bound while browsing
        assert_eq!(ctx.resolve(SessionState::Browsing, &key(KeyCode::Char('c'))), None);
    }

    #[test]
    fn test_terminated_has_no_bindings() {
        let ctx = KeybindingContext::new();
        assert!(ctx.get_bindings(SessionState::Terminated).is_empty());
    }

    #[test]
    fn test_help_lines() {
        assert_eq!(
            help_line(SessionState::Browsing),
            "Use arrow keys to navigate, Enter to select, 'i' to install, 'q' to quit"
        );
        assert_eq!(
            help_line(SessionState::ConfirmingInstall),
            "Press 'y' to confirm, 'n' to cancel"
        );
    }
}
