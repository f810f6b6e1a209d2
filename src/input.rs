//! Keyboard input
//!
//! Reads crossterm events and resolves key presses through the
//! `KeybindingContext` for the current session state. Key releases and
//! repeats (reported on Windows) and unbound keys are skipped. A resize
//! becomes `InputEvent::Redraw`.

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};

use crate::app::{EventSource, InputEvent};
use crate::components::keybindings::KeybindingContext;
use crate::session_state::SessionState;

#[derive(Default)]
pub struct KeyboardEvents {
    bindings: KeybindingContext,
}

impl KeyboardEvents {
    pub fn new(bindings: KeybindingContext) -> Self {
        Self { bindings }
    }

    /// Resolve one terminal event; `None` if it means nothing in `state`
    pub fn translate(&self, state: SessionState, event: &Event) -> Option<InputEvent> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                self.bindings.resolve(state, key)
            }
            Event::Resize(..) => Some(InputEvent::Redraw),
            _ => None,
        }
    }
}

impl EventSource for KeyboardEvents {
    fn next_event(&mut self, state: SessionState) -> Result<Option<InputEvent>> {
        loop {
            let event = event::read().context("Failed to read terminal event")?;
            if let Some(input) = self.translate(state, &event) {
                tracing::trace!(?input, "Key event");
                return Ok(Some(input));
            }
        }
    }
}
