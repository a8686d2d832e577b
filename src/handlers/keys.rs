//! Keyboard Bindings Module
//!
//! Translates raw terminal key events into logical [`Command`]s. Each focus
//! has its own immutable [`Keymap`], built once and shared; handlers never
//! enable or disable bindings at runtime.

use crate::handlers::focus::Focus;
use once_cell::sync::Lazy;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Logical commands understood by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    ToggleHelp,
    CursorUp,
    CursorDown,
    CursorTop,
    CursorBottom,
    ToggleSelect,
    DeleteSelected,
    Yank,
    Paste,
    Save,
    EnterEdit,
    FocusDetail,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    UnfocusDetail,
    CommitEdit,
    CancelEdit,
    Edit(TextEdit),
}

impl Command {
    /// Global commands are honoured regardless of focus.
    pub fn is_global(&self) -> bool {
        matches!(self, Command::Quit | Command::ToggleHelp)
    }
}

/// Keystrokes passed through to the text-entry widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEdit {
    Insert(char),
    Newline,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
}

impl TextEdit {
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return None;
        }

        let edit = match key.code {
            KeyCode::Char(c) => TextEdit::Insert(c),
            KeyCode::Tab => TextEdit::Insert('\t'),
            KeyCode::Enter => TextEdit::Newline,
            KeyCode::Backspace => TextEdit::Backspace,
            KeyCode::Delete => TextEdit::Delete,
            KeyCode::Left => TextEdit::Left,
            KeyCode::Right => TextEdit::Right,
            KeyCode::Up => TextEdit::Up,
            KeyCode::Down => TextEdit::Down,
            KeyCode::Home => TextEdit::Home,
            KeyCode::End => TextEdit::End,
            _ => return None,
        };
        Some(edit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub const fn char(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    pub const fn ctrl(c: char) -> Self {
        Self {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::CONTROL,
        }
    }

    /// Shift is ignored because terminals disagree on whether an uppercase
    /// character carries it.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        self.code == key.code
            && self.modifiers.difference(KeyModifiers::SHIFT)
                == key.modifiers.difference(KeyModifiers::SHIFT)
    }
}

#[derive(Debug, Clone)]
pub struct Binding {
    pub keys: Vec<KeyBinding>,
    pub command: Command,
    /// Short key label for hints and help, e.g. `"j/↓"`
    pub label: &'static str,
    pub description: &'static str,
    /// Shown in the bottom shortcut bar
    pub hint: bool,
}

impl Binding {
    fn new(
        keys: &[KeyBinding],
        command: Command,
        label: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            keys: keys.to_vec(),
            command,
            label,
            description,
            hint: false,
        }
    }

    fn hinted(mut self) -> Self {
        self.hint = true;
        self
    }
}

/// Immutable set of bindings active for one focus.
#[derive(Debug)]
pub struct Keymap {
    pub bindings: Vec<Binding>,
    /// Unbound keys fall through to the text-entry widget
    pub accepts_text: bool,
}

impl Keymap {
    pub fn global() -> &'static Keymap {
        &GLOBAL_KEYMAP
    }

    pub fn for_focus(focus: Focus) -> &'static Keymap {
        match focus {
            Focus::List => &LIST_KEYMAP,
            Focus::Detail => &DETAIL_KEYMAP,
            Focus::Input => &INPUT_KEYMAP,
        }
    }

    pub fn lookup(&self, key: &KeyEvent) -> Option<Command> {
        self.bindings
            .iter()
            .find(|binding| binding.keys.iter().any(|k| k.matches(key)))
            .map(|binding| binding.command)
    }

    /// Whether `command` may be issued while this keymap is active.
    pub fn allows(&self, command: &Command) -> bool {
        match command {
            Command::Edit(_) => self.accepts_text,
            _ => self.bindings.iter().any(|binding| binding.command == *command),
        }
    }

    pub fn hints(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter().filter(|binding| binding.hint)
    }
}

static GLOBAL_KEYMAP: Lazy<Keymap> = Lazy::new(|| Keymap {
    bindings: vec![
        Binding::new(&[KeyBinding::ctrl('c')], Command::Quit, "^C", "Save and quit"),
        Binding::new(
            &[KeyBinding::plain(KeyCode::F(1))],
            Command::ToggleHelp,
            "F1",
            "Toggle help",
        ),
    ],
    accepts_text: false,
});

static LIST_KEYMAP: Lazy<Keymap> = Lazy::new(|| Keymap {
    bindings: vec![
        Binding::new(
            &[KeyBinding::char('k'), KeyBinding::plain(KeyCode::Up)],
            Command::CursorUp,
            "k/↑",
            "Move up",
        ),
        Binding::new(
            &[KeyBinding::char('j'), KeyBinding::plain(KeyCode::Down)],
            Command::CursorDown,
            "j/↓",
            "Move down",
        ),
        Binding::new(
            &[KeyBinding::char('g'), KeyBinding::plain(KeyCode::Home)],
            Command::CursorTop,
            "g",
            "First snippet",
        ),
        Binding::new(
            &[KeyBinding::char('G'), KeyBinding::plain(KeyCode::End)],
            Command::CursorBottom,
            "G",
            "Last snippet",
        ),
        Binding::new(
            &[KeyBinding::char(' ')],
            Command::ToggleSelect,
            "␣",
            "Toggle selection",
        )
        .hinted(),
        Binding::new(
            &[KeyBinding::char('d')],
            Command::DeleteSelected,
            "d",
            "Delete selected (or highlighted)",
        )
        .hinted(),
        Binding::new(
            &[KeyBinding::char('y')],
            Command::Yank,
            "y",
            "Copy to clipboard",
        )
        .hinted(),
        Binding::new(
            &[KeyBinding::char('p'), KeyBinding::char('c')],
            Command::Paste,
            "p",
            "Add from clipboard",
        )
        .hinted(),
        Binding::new(
            &[KeyBinding::char('i'), KeyBinding::char('a')],
            Command::EnterEdit,
            "i",
            "Write a new snippet",
        )
        .hinted(),
        Binding::new(
            &[
                KeyBinding::plain(KeyCode::Enter),
                KeyBinding::char('l'),
                KeyBinding::plain(KeyCode::Right),
            ],
            Command::FocusDetail,
            "⏎",
            "Focus detail view",
        )
        .hinted(),
        Binding::new(&[KeyBinding::char('w')], Command::Save, "w", "Save now"),
        Binding::new(&[KeyBinding::char('?')], Command::ToggleHelp, "?", "Help").hinted(),
        Binding::new(&[KeyBinding::char('q')], Command::Quit, "q", "Save and quit").hinted(),
    ],
    accepts_text: false,
});

static DETAIL_KEYMAP: Lazy<Keymap> = Lazy::new(|| Keymap {
    bindings: vec![
        Binding::new(
            &[KeyBinding::char('k'), KeyBinding::plain(KeyCode::Up)],
            Command::ScrollUp,
            "k/↑",
            "Scroll up",
        )
        .hinted(),
        Binding::new(
            &[KeyBinding::char('j'), KeyBinding::plain(KeyCode::Down)],
            Command::ScrollDown,
            "j/↓",
            "Scroll down",
        )
        .hinted(),
        Binding::new(
            &[KeyBinding::plain(KeyCode::PageUp), KeyBinding::ctrl('u')],
            Command::PageUp,
            "PgUp",
            "Page up",
        ),
        Binding::new(
            &[KeyBinding::plain(KeyCode::PageDown), KeyBinding::ctrl('d')],
            Command::PageDown,
            "PgDn",
            "Page down",
        ),
        Binding::new(
            &[
                KeyBinding::plain(KeyCode::Esc),
                KeyBinding::char('h'),
                KeyBinding::plain(KeyCode::Left),
            ],
            Command::UnfocusDetail,
            "Esc",
            "Back to list",
        )
        .hinted(),
        Binding::new(&[KeyBinding::char('?')], Command::ToggleHelp, "?", "Help").hinted(),
        Binding::new(&[KeyBinding::char('q')], Command::Quit, "q", "Save and quit"),
    ],
    accepts_text: false,
});

static INPUT_KEYMAP: Lazy<Keymap> = Lazy::new(|| Keymap {
    bindings: vec![
        Binding::new(
            &[KeyBinding::ctrl('s')],
            Command::CommitEdit,
            "^S",
            "Save as new snippet",
        )
        .hinted(),
        Binding::new(
            &[KeyBinding::plain(KeyCode::Esc)],
            Command::CancelEdit,
            "Esc",
            "Discard",
        )
        .hinted(),
    ],
    accepts_text: true,
});
