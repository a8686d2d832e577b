//! Event Handling Module
//!
//! Everything between a raw terminal key event and a logical command.
//!
//! - **`keys`**: logical commands and the immutable per-focus keymaps
//! - **`focus`**: the focus state machine that routes commands to panes

pub mod focus;
pub mod keys;

pub use focus::{Effect, Focus, FocusRouter};
pub use keys::{Command, Keymap, TextEdit};
