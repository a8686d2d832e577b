//! Focus routing
//!
//! Decides which pane owns keyboard input and which commands are legal in
//! the current pane. Transitions:
//!
//! ```text
//! List --activate-detail--> Detail --deactivate--> List
//! List --enter-edit-------> Input  --escape------> List
//! ```
//!
//! There is no direct path between `Detail` and `Input`.

use crate::handlers::keys::{Command, Keymap, TextEdit};
use ratatui::crossterm::event::KeyEvent;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    List,
    Detail,
    Input,
}

impl Focus {
    pub fn label(&self) -> &'static str {
        match self {
            Focus::List => "LIST",
            Focus::Detail => "VIEW",
            Focus::Input => "EDIT",
        }
    }

    pub fn apply(self, transition: Transition) -> Option<Focus> {
        match (self, transition) {
            (Focus::List, Transition::ActivateDetail) => Some(Focus::Detail),
            (Focus::Detail, Transition::Deactivate) => Some(Focus::List),
            (Focus::List, Transition::EnterEdit) => Some(Focus::Input),
            (Focus::Input, Transition::Escape) => Some(Focus::List),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    ActivateDetail,
    Deactivate,
    EnterEdit,
    Escape,
}

impl Command {
    pub fn transition(&self) -> Option<Transition> {
        match self {
            Command::FocusDetail => Some(Transition::ActivateDetail),
            Command::UnfocusDetail => Some(Transition::Deactivate),
            Command::EnterEdit => Some(Transition::EnterEdit),
            Command::CommitEdit | Command::CancelEdit => Some(Transition::Escape),
            _ => None,
        }
    }
}

/// Outcome of dispatching a command through the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Handled by the focused pane; any focus transition has been applied
    Consumed(Command),
    /// A global command, to be handled by the session regardless of focus
    Bubbled(Command),
    /// Not legal in the current focus
    Rejected,
}

#[derive(Debug, Default)]
pub struct FocusRouter {
    focus: Focus,
}

impl FocusRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_target(&self) -> Focus {
        self.focus
    }

    /// Bindings of the active pane
    pub fn keymap(&self) -> &'static Keymap {
        Keymap::for_focus(self.focus)
    }

    /// Maps a key to a command for the current focus. Global bindings win.
    pub fn resolve(&self, key: &KeyEvent) -> Option<Command> {
        if let Some(command) = Keymap::global().lookup(key) {
            return Some(command);
        }

        let keymap = self.keymap();
        keymap.lookup(key).or_else(|| {
            if keymap.accepts_text {
                TextEdit::from_key(key).map(Command::Edit)
            } else {
                None
            }
        })
    }

    pub fn dispatch(&mut self, command: Command) -> Effect {
        if command.is_global() {
            return Effect::Bubbled(command);
        }

        if !self.keymap().allows(&command) {
            return Effect::Rejected;
        }

        if let Some(transition) = command.transition() {
            match self.focus.apply(transition) {
                Some(next) => {
                    debug!(from = ?self.focus, to = ?next, "focus changed");
                    self.focus = next;
                }
                None => return Effect::Rejected,
            }
        }

        Effect::Consumed(command)
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> Effect {
        match self.resolve(key) {
            Some(command) => self.dispatch(command),
            None => Effect::Rejected,
        }
    }
}
