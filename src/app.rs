use crate::clipboard::ClipboardBridge;
use crate::handlers::{Command, Effect, Focus, FocusRouter};
use crate::models::{SnippetLanguage, SnippetPersistence, SnippetStore};
use crate::ui;
use crate::ui::highlight::{Highlighter, plain_text};
use crate::ui::input::TextInput;
use crate::ui::layout::Geometry;
use ratatui::Frame;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::text::Text;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Input delivered to the session, one at a time, in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Key(KeyEvent),
    Resize(u16, u16),
}

/// Whether the event loop should keep running after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// The single transient status line. Each new status replaces the last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub severity: Severity,
    pub text: String,
}

/// Rendered content of the detail pane for the snippet under the cursor.
#[derive(Debug, Clone, Default)]
pub struct DetailView {
    pub snippet_id: Option<Uuid>,
    pub text: Text<'static>,
    /// Highlighting failed and the raw content is shown
    pub degraded: bool,
}

/// Derived state that must be recomputed after an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Refresh {
    detail: bool,
    geometry: bool,
}

impl Refresh {
    const NONE: Refresh = Refresh {
        detail: false,
        geometry: false,
    };
    const DETAIL: Refresh = Refresh {
        detail: true,
        geometry: false,
    };
    const GEOMETRY: Refresh = Refresh {
        detail: false,
        geometry: true,
    };

    fn union(self, other: Refresh) -> Refresh {
        Refresh {
            detail: self.detail || other.detail,
            geometry: self.geometry || other.geometry,
        }
    }
}

/// Session controller
///
/// Owns the snippet store, the focus router and the collaborators. Every
/// event is handled in two phases: the command mutates state and reports
/// what it invalidated, then [`App::refresh_view`] recomputes derived view
/// state (detail rendering, geometry). Collaborator failures stop here and
/// become status messages.
pub struct App {
    store: SnippetStore,
    router: FocusRouter,
    persistence: Box<dyn SnippetPersistence>,
    clipboard: Option<Box<dyn ClipboardBridge>>,
    highlighter: Box<dyn Highlighter>,
    default_language: SnippetLanguage,

    terminal_size: (u16, u16),
    geometry: Geometry,
    status: Option<StatusMessage>,
    show_help: bool,
    input: TextInput,
    detail: DetailView,
    detail_scroll: usize,
}

impl App {
    /// Loads the persisted snippets and builds the session. A failed load
    /// is reported once and the session starts empty.
    pub fn new(
        persistence: Box<dyn SnippetPersistence>,
        clipboard: Option<Box<dyn ClipboardBridge>>,
        highlighter: Box<dyn Highlighter>,
        default_language: SnippetLanguage,
        terminal_size: (u16, u16),
    ) -> Self {
        let (store, load_error) = match persistence.load() {
            Ok(snippets) => (SnippetStore::from_snippets(snippets), None),
            Err(err) => {
                error!(error = %err, "failed to load snippets");
                (SnippetStore::new(), Some(err))
            }
        };

        let mut app = Self {
            store,
            router: FocusRouter::new(),
            persistence,
            clipboard,
            highlighter,
            default_language,
            terminal_size,
            geometry: Geometry::default(),
            status: None,
            show_help: false,
            input: TextInput::new(),
            detail: DetailView::default(),
            detail_scroll: 0,
        };

        if app.clipboard.is_none() {
            app.set_status(
                Severity::Warning,
                "Clipboard unavailable: copy and paste are disabled",
            );
        }
        if let Some(err) = load_error {
            app.set_status(
                Severity::Error,
                format!("Could not load snippets ({}); starting empty", err),
            );
        }

        app.refresh_view(Refresh::DETAIL.union(Refresh::GEOMETRY));
        app
    }

    pub fn handle_event(&mut self, event: SessionEvent) -> Control {
        let (control, refresh) = match event {
            SessionEvent::Resize(width, height) => {
                self.terminal_size = (width, height);
                (Control::Continue, Refresh::GEOMETRY)
            }
            SessionEvent::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            SessionEvent::Key(_) => (Control::Continue, Refresh::NONE),
        };

        self.refresh_view(refresh);
        control
    }

    fn handle_key(&mut self, key: KeyEvent) -> (Control, Refresh) {
        if self.show_help {
            if key.code == KeyCode::Esc {
                self.show_help = false;
                return (Control::Continue, Refresh::NONE);
            }
            // The overlay covers the panes; only global commands get through.
            if !self.router.resolve(&key).is_some_and(|command| command.is_global()) {
                return (Control::Continue, Refresh::NONE);
            }
        }

        let focus = self.router.current_target();
        match self.router.handle_key(&key) {
            Effect::Bubbled(command) => self.handle_global(command),
            Effect::Consumed(command) => {
                let mut refresh = match focus {
                    Focus::List => self.handle_list(command),
                    Focus::Detail => self.handle_detail(command),
                    Focus::Input => self.handle_input(command),
                };
                if self.router.current_target() != focus {
                    refresh = refresh.union(Refresh::GEOMETRY);
                }
                (Control::Continue, refresh)
            }
            Effect::Rejected => (Control::Continue, Refresh::NONE),
        }
    }

    fn handle_global(&mut self, command: Command) -> (Control, Refresh) {
        match command {
            Command::Quit => {
                info!("quit requested");
                match self.save() {
                    Ok(()) => self.set_status(
                        Severity::Info,
                        format!("Saved {} snippets", self.store.len()),
                    ),
                    Err(err) => self.set_status(
                        Severity::Error,
                        format!("Save failed, changes were NOT written: {}", err),
                    ),
                }
                (Control::Quit, Refresh::NONE)
            }
            Command::ToggleHelp => {
                self.show_help = !self.show_help;
                (Control::Continue, Refresh::NONE)
            }
            _ => (Control::Continue, Refresh::NONE),
        }
    }

    fn handle_list(&mut self, command: Command) -> Refresh {
        match command {
            Command::CursorUp => self.store.move_cursor(-1),
            Command::CursorDown => self.store.move_cursor(1),
            Command::CursorTop => self.store.move_to_first(),
            Command::CursorBottom => self.store.move_to_last(),
            Command::ToggleSelect => {
                let cursor = self.store.cursor();
                self.store.toggle_select(cursor);
            }
            Command::DeleteSelected => self.delete(),
            Command::Yank => self.yank(),
            Command::Paste => self.paste(),
            Command::Save => {
                match self.save() {
                    Ok(()) => self.set_status(
                        Severity::Info,
                        format!("Saved {} snippets", self.store.len()),
                    ),
                    Err(err) => self.set_status(Severity::Error, format!("Save failed: {}", err)),
                }
                return Refresh::NONE;
            }
            Command::EnterEdit => {
                self.input.clear();
                self.status = None;
                return Refresh::NONE;
            }
            _ => return Refresh::NONE,
        }
        Refresh::DETAIL
    }

    fn handle_detail(&mut self, command: Command) -> Refresh {
        let page = self.geometry.detail_rows().max(1) as isize;
        match command {
            Command::ScrollUp => self.scroll_detail(-1),
            Command::ScrollDown => self.scroll_detail(1),
            Command::PageUp => self.scroll_detail(-page),
            Command::PageDown => self.scroll_detail(page),
            _ => {}
        }
        Refresh::NONE
    }

    fn handle_input(&mut self, command: Command) -> Refresh {
        match command {
            Command::Edit(edit) => {
                self.input.apply(edit);
                Refresh::NONE
            }
            Command::CommitEdit => {
                if self.input.is_blank() {
                    self.input.clear();
                    self.set_status(Severity::Warning, "Empty snippet discarded");
                    return Refresh::NONE;
                }

                let content = self.input.value();
                self.input.clear();
                match self.store.add(content, self.default_language.clone()) {
                    Some(_) => {
                        self.announce_added("editor");
                        Refresh::DETAIL
                    }
                    None => {
                        self.set_status(Severity::Warning, "Empty snippet discarded");
                        Refresh::NONE
                    }
                }
            }
            Command::CancelEdit => {
                self.input.clear();
                self.set_status(Severity::Info, "Edit discarded");
                Refresh::NONE
            }
            _ => Refresh::NONE,
        }
    }

    fn delete(&mut self) {
        let selected = self.store.selected_count();
        if selected > 0 {
            let removed = self.store.delete_selected();
            self.set_status(
                Severity::Info,
                format!("Deleted {} snippet{}", removed, plural(removed)),
            );
            return;
        }

        match self.store.delete_at_cursor() {
            Some(snippet) => {
                self.set_status(Severity::Info, format!("Deleted {}", snippet.title));
            }
            None => self.set_status(Severity::Warning, "Nothing to delete"),
        }
    }

    /// Copies the selected snippets, or the highlighted one when nothing is
    /// selected.
    fn yank(&mut self) {
        let (text, count) = if self.store.selected_count() > 0 {
            let contents: Vec<&str> = self
                .store
                .selected_snippets()
                .map(|snippet| snippet.content.as_str())
                .collect();
            (contents.join("\n\n"), contents.len())
        } else {
            match self.store.current() {
                Some(snippet) => (snippet.content.clone(), 1),
                None => {
                    self.set_status(Severity::Warning, "Nothing to copy");
                    return;
                }
            }
        };

        let Some(clipboard) = self.clipboard.as_mut() else {
            self.set_status(Severity::Warning, "Clipboard unavailable");
            return;
        };

        match clipboard.write(&text) {
            Ok(()) => self.set_status(
                Severity::Info,
                format!("Copied {} snippet{} to clipboard", count, plural(count)),
            ),
            Err(err) => {
                warn!(error = %err, "clipboard write failed");
                self.set_status(Severity::Error, err.to_string());
            }
        }
    }

    fn paste(&mut self) {
        let Some(clipboard) = self.clipboard.as_mut() else {
            self.set_status(Severity::Warning, "Clipboard unavailable");
            return;
        };

        let content = match clipboard.read() {
            Ok(content) => content,
            Err(err) => {
                warn!(error = %err, "clipboard read failed");
                self.set_status(Severity::Error, err.to_string());
                return;
            }
        };

        match self.store.add(content, self.default_language.clone()) {
            Some(_) => self.announce_added("clipboard"),
            None => self.set_status(Severity::Warning, "Clipboard is empty"),
        }
    }

    fn announce_added(&mut self, source: &str) {
        let title = self
            .store
            .snippets()
            .last()
            .map(|snippet| snippet.title.clone())
            .unwrap_or_default();
        self.set_status(Severity::Info, format!("Added {} from {}", title, source));
    }

    fn save(&self) -> crate::error::Result<()> {
        self.persistence.save(self.store.snippets())
    }

    fn scroll_detail(&mut self, delta: isize) {
        let target = if delta.is_negative() {
            self.detail_scroll.saturating_sub(delta.unsigned_abs())
        } else {
            self.detail_scroll.saturating_add(delta.unsigned_abs())
        };
        self.detail_scroll = target.min(self.max_detail_scroll());
    }

    fn max_detail_scroll(&self) -> usize {
        self.detail
            .text
            .lines
            .len()
            .saturating_sub(self.geometry.detail_rows())
    }

    fn set_status(&mut self, severity: Severity, text: impl Into<String>) {
        let text = text.into();
        debug!(?severity, %text, "status");
        self.status = Some(StatusMessage { severity, text });
    }

    /// Second phase of every event: recompute what depends on the state.
    fn refresh_view(&mut self, refresh: Refresh) {
        if refresh.geometry {
            let (width, height) = self.terminal_size;
            self.geometry = Geometry::compute(width, height, self.router.current_target());
        }

        if refresh.detail {
            self.render_detail();
        }

        if refresh.detail || refresh.geometry {
            self.detail_scroll = self.detail_scroll.min(self.max_detail_scroll());
        }
    }

    fn render_detail(&mut self) {
        let Some(snippet) = self.store.current() else {
            self.detail = DetailView::default();
            self.detail_scroll = 0;
            return;
        };

        if self.detail.snippet_id != Some(snippet.id) {
            self.detail_scroll = 0;
        }

        let (text, degraded) = match self.highlighter.render(&snippet.content, &snippet.language)
        {
            Ok(text) => (text, false),
            Err(err) => {
                warn!(error = %err, id = %snippet.id, "highlighting failed, showing raw content");
                (plain_text(&snippet.content), true)
            }
        };

        self.detail = DetailView {
            snippet_id: Some(snippet.id),
            text,
            degraded,
        };
    }

    pub fn render(&self, frame: &mut Frame) {
        ui::draw(frame, self);
    }

    pub fn store(&self) -> &SnippetStore {
        &self.store
    }

    pub fn focus(&self) -> Focus {
        self.router.current_target()
    }

    pub fn router(&self) -> &FocusRouter {
        &self.router
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    pub fn input(&self) -> &TextInput {
        &self.input
    }

    pub fn detail(&self) -> &DetailView {
        &self.detail
    }

    pub fn detail_scroll(&self) -> usize {
        self.detail_scroll
    }

    pub fn clipboard_available(&self) -> bool {
        self.clipboard.is_some()
    }

    pub fn default_language(&self) -> &SnippetLanguage {
        &self.default_language
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::error::{Result, SnipError, StorageError};
    use crate::handlers::TextEdit;
    use crate::models::{Snippet, StorageManager};
    use crate::ui::highlight::PlainHighlighter;
    use ratatui::crossterm::event::KeyModifiers;
    use std::fs;
    use tempfile::TempDir;

    struct FailingHighlighter;

    impl Highlighter for FailingHighlighter {
        fn render(&self, _content: &str, _language: &SnippetLanguage) -> Result<Text<'static>> {
            Err(SnipError::Render("boom".to_string()))
        }
    }

    struct ReadOnlyStorage;

    impl SnippetPersistence for ReadOnlyStorage {
        fn load(&self) -> Result<Vec<Snippet>> {
            Ok(vec![Snippet::new(
                "kept".into(),
                "x".into(),
                SnippetLanguage::Text,
            )])
        }

        fn save(&self, _snippets: &[Snippet]) -> Result<()> {
            Err(StorageError::io(
                "/read-only",
                std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            )
            .into())
        }
    }

    fn app_with(dir: &TempDir, clipboard: Option<MemoryClipboard>) -> App {
        let storage = StorageManager::new(dir.path().join("snippets.json"));
        App::new(
            Box::new(storage),
            clipboard.map(|c| Box::new(c) as Box<dyn ClipboardBridge>),
            Box::new(PlainHighlighter),
            SnippetLanguage::Go,
            (100, 40),
        )
    }

    fn key(app: &mut App, code: KeyCode) -> Control {
        app.handle_event(SessionEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn ctrl(app: &mut App, c: char) -> Control {
        app.handle_event(SessionEvent::Key(KeyEvent::new(
            KeyCode::Char(c),
            KeyModifiers::CONTROL,
        )))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            match c {
                '\n' => key(app, KeyCode::Enter),
                c => key(app, KeyCode::Char(c)),
            };
        }
    }

    fn write_snippet(app: &mut App, text: &str) {
        key(app, KeyCode::Char('i'));
        type_text(app, text);
        ctrl(app, 's');
    }

    fn contents(app: &App) -> Vec<String> {
        app.store()
            .snippets()
            .iter()
            .map(|s| s.content.clone())
            .collect()
    }

    #[test]
    fn test_starts_in_list_with_empty_store() {
        let dir = TempDir::new().unwrap();
        let app = app_with(&dir, Some(MemoryClipboard::default()));

        assert_eq!(app.focus(), Focus::List);
        assert!(app.store().is_empty());
        assert!(app.status().is_none());
        assert_eq!(app.geometry().area.width, 100);
    }

    #[test]
    fn test_write_snippet_through_editor() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(&dir, None);

        key(&mut app, KeyCode::Char('i'));
        assert_eq!(app.focus(), Focus::Input);
        assert!(app.geometry().input.height > 0);

        type_text(&mut app, "func f(){\nq}");
        assert_eq!(app.store().len(), 0);
        ctrl(&mut app, 's');

        assert_eq!(app.focus(), Focus::List);
        assert_eq!(contents(&app), vec!["func f(){\nq}"]);
        assert_eq!(app.store().get(0).unwrap().language, SnippetLanguage::Go);
        assert_eq!(app.geometry().input.height, 0);
        assert_eq!(app.input().value(), "");
    }

    #[test]
    fn test_escape_discards_edit() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(&dir, None);

        key(&mut app, KeyCode::Char('i'));
        type_text(&mut app, "draft");
        key(&mut app, KeyCode::Esc);

        assert_eq!(app.focus(), Focus::List);
        assert!(app.store().is_empty());
        assert_eq!(app.input().value(), "");
    }

    #[test]
    fn test_commit_blank_edit_adds_nothing() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(&dir, None);

        write_snippet(&mut app, "   \n\t");
        assert!(app.store().is_empty());
        assert_eq!(app.status().unwrap().severity, Severity::Warning);
        assert_eq!(app.focus(), Focus::List);
        assert_eq!(app.input().value(), "");
    }

    #[test]
    fn test_paste_adds_from_clipboard() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(&dir, Some(MemoryClipboard::with_text("echo hi")));

        key(&mut app, KeyCode::Char('p'));

        assert_eq!(contents(&app), vec!["echo hi"]);
        assert_eq!(app.store().cursor(), 0);
        assert_eq!(app.detail().snippet_id, Some(app.store().get(0).unwrap().id));
        assert_eq!(app.status().unwrap().severity, Severity::Info);
    }

    #[test]
    fn test_paste_empty_clipboard_is_warning() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(&dir, Some(MemoryClipboard::default()));

        key(&mut app, KeyCode::Char('p'));
        assert!(app.store().is_empty());
        assert_eq!(app.status().unwrap().severity, Severity::Warning);
    }

    #[test]
    fn test_yank_then_paste_duplicates_selection() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(&dir, Some(MemoryClipboard::default()));
        write_snippet(&mut app, "a");
        write_snippet(&mut app, "b");
        write_snippet(&mut app, "c");

        key(&mut app, KeyCode::Char(' '));
        key(&mut app, KeyCode::Char('G'));
        key(&mut app, KeyCode::Char(' '));
        key(&mut app, KeyCode::Char('y'));
        key(&mut app, KeyCode::Char('p'));

        assert_eq!(contents(&app), vec!["a", "b", "c", "a\n\nc"]);
    }

    #[test]
    fn test_yank_without_selection_copies_cursor() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(&dir, Some(MemoryClipboard::default()));
        write_snippet(&mut app, "first");
        write_snippet(&mut app, "second");

        key(&mut app, KeyCode::Char('j'));
        key(&mut app, KeyCode::Char('y'));
        key(&mut app, KeyCode::Char('p'));

        assert_eq!(contents(&app)[2], "second");
    }

    #[test]
    fn test_broken_clipboard_reports_and_keeps_store() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(&dir, Some(MemoryClipboard::broken()));
        write_snippet(&mut app, "a");

        key(&mut app, KeyCode::Char('y'));
        assert_eq!(app.status().unwrap().severity, Severity::Error);
        key(&mut app, KeyCode::Char('p'));
        assert_eq!(app.status().unwrap().severity, Severity::Error);
        assert_eq!(contents(&app), vec!["a"]);
    }

    #[test]
    fn test_missing_clipboard_degrades() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(&dir, None);

        assert!(!app.clipboard_available());
        assert_eq!(app.status().unwrap().severity, Severity::Warning);

        key(&mut app, KeyCode::Char('p'));
        assert!(app.store().is_empty());
        assert_eq!(app.focus(), Focus::List);
    }

    #[test]
    fn test_delete_selected_scenario() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(&dir, None);
        for content in ["A", "B", "C"] {
            write_snippet(&mut app, content);
        }

        key(&mut app, KeyCode::Char(' '));
        key(&mut app, KeyCode::Char('j'));
        key(&mut app, KeyCode::Char('j'));
        key(&mut app, KeyCode::Char(' '));
        key(&mut app, KeyCode::Char('d'));

        assert_eq!(contents(&app), vec!["B"]);
        assert_eq!(app.store().cursor(), 0);
        assert_eq!(app.store().selected_count(), 0);
        assert_eq!(app.detail().snippet_id, Some(app.store().get(0).unwrap().id));
    }

    #[test]
    fn test_delete_without_selection_removes_cursor_item() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(&dir, None);
        write_snippet(&mut app, "A");
        write_snippet(&mut app, "B");

        key(&mut app, KeyCode::Char('j'));
        key(&mut app, KeyCode::Char('d'));
        assert_eq!(contents(&app), vec!["A"]);

        key(&mut app, KeyCode::Char('d'));
        key(&mut app, KeyCode::Char('d'));
        assert!(app.store().is_empty());
        assert!(app.detail().snippet_id.is_none());
        assert_eq!(app.status().unwrap().severity, Severity::Warning);
    }

    #[test]
    fn test_detail_focus_scrolls_and_returns() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(&dir, None);
        let long: Vec<String> = (0..100).map(|n| format!("line {}", n)).collect();
        write_snippet(&mut app, &long.join("\n"));

        key(&mut app, KeyCode::Enter);
        assert_eq!(app.focus(), Focus::Detail);

        key(&mut app, KeyCode::Char('j'));
        key(&mut app, KeyCode::Char('j'));
        assert_eq!(app.detail_scroll(), 2);

        // list commands are not live here
        key(&mut app, KeyCode::Char('d'));
        assert_eq!(app.store().len(), 1);

        key(&mut app, KeyCode::PageDown);
        key(&mut app, KeyCode::PageDown);
        key(&mut app, KeyCode::PageDown);
        let rows = app.geometry().detail_rows();
        assert_eq!(app.detail_scroll(), 100 - rows);

        key(&mut app, KeyCode::Esc);
        assert_eq!(app.focus(), Focus::List);
    }

    #[test]
    fn test_resize_recomputes_geometry_and_clamps_scroll() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(&dir, None);
        let long: Vec<String> = (0..50).map(|n| n.to_string()).collect();
        write_snippet(&mut app, &long.join("\n"));
        key(&mut app, KeyCode::Enter);
        key(&mut app, KeyCode::End);
        key(&mut app, KeyCode::PageDown);

        app.handle_event(SessionEvent::Resize(80, 100));
        assert_eq!(app.geometry().area.width, 80);
        assert_eq!(app.geometry().area.height, 100);
        assert_eq!(app.detail_scroll(), 0);
    }

    #[test]
    fn test_help_toggles_from_any_focus() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(&dir, None);

        key(&mut app, KeyCode::Char('?'));
        assert!(app.show_help());
        key(&mut app, KeyCode::Esc);
        assert!(!app.show_help());

        key(&mut app, KeyCode::Char('i'));
        key(&mut app, KeyCode::F(1));
        assert!(app.show_help());
        assert_eq!(app.focus(), Focus::Input);

        // keys are held back while the overlay is up
        key(&mut app, KeyCode::Char('?'));
        assert_eq!(app.input().value(), "");
        assert!(app.show_help());

        // '?' is text while editing
        key(&mut app, KeyCode::Esc);
        key(&mut app, KeyCode::Char('?'));
        assert_eq!(app.input().value(), "?");
        assert_eq!(app.focus(), Focus::Input);
    }

    #[test]
    fn test_help_overlay_blocks_pane_commands() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(&dir, None);
        write_snippet(&mut app, "keep me");

        key(&mut app, KeyCode::Char('?'));
        key(&mut app, KeyCode::Char('d'));
        key(&mut app, KeyCode::Char('i'));
        assert_eq!(contents(&app), vec!["keep me"]);
        assert_eq!(app.focus(), Focus::List);
        assert!(app.show_help());

        key(&mut app, KeyCode::Char('?'));
        assert!(!app.show_help());
        key(&mut app, KeyCode::Char('d'));
        assert!(app.store().is_empty());
    }

    #[test]
    fn test_quit_from_help_overlay() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(&dir, None);

        key(&mut app, KeyCode::F(1));
        assert_eq!(ctrl(&mut app, 'c'), Control::Quit);
    }

    #[test]
    fn test_quit_saves_and_reloads() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(&dir, None);
        write_snippet(&mut app, "fn a() {}");
        write_snippet(&mut app, "fn b() {}");

        assert_eq!(key(&mut app, KeyCode::Char('q')), Control::Quit);

        let reloaded = app_with(&dir, None);
        assert_eq!(contents(&reloaded), vec!["fn a() {}", "fn b() {}"]);
        assert_eq!(
            reloaded.store().snippets(),
            app.store().snippets()
        );
    }

    #[test]
    fn test_ctrl_c_quits_while_editing() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(&dir, None);
        key(&mut app, KeyCode::Char('i'));
        type_text(&mut app, "q");

        assert_eq!(ctrl(&mut app, 'c'), Control::Quit);
    }

    #[test]
    fn test_quit_with_failing_save_still_quits() {
        let mut app = App::new(
            Box::new(ReadOnlyStorage),
            None,
            Box::new(PlainHighlighter),
            SnippetLanguage::Text,
            (80, 24),
        );

        assert_eq!(key(&mut app, KeyCode::Char('q')), Control::Quit);
        let status = app.status().unwrap();
        assert_eq!(status.severity, Severity::Error);
        assert!(status.text.contains("NOT"));
    }

    #[test]
    fn test_explicit_save_failure_keeps_session() {
        let mut app = App::new(
            Box::new(ReadOnlyStorage),
            None,
            Box::new(PlainHighlighter),
            SnippetLanguage::Text,
            (80, 24),
        );

        assert_eq!(key(&mut app, KeyCode::Char('w')), Control::Continue);
        assert_eq!(app.status().unwrap().severity, Severity::Error);
        assert_eq!(app.store().len(), 1);
    }

    #[test]
    fn test_malformed_file_starts_empty_with_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("snippets.json"), "[{").unwrap();

        let app = app_with(&dir, Some(MemoryClipboard::default()));
        assert!(app.store().is_empty());
        assert_eq!(app.status().unwrap().severity, Severity::Error);
    }

    #[test]
    fn test_render_failure_falls_back_to_raw_content() {
        let dir = TempDir::new().unwrap();
        let storage = StorageManager::new(dir.path().join("snippets.json"));
        let mut app = App::new(
            Box::new(storage),
            None,
            Box::new(FailingHighlighter),
            SnippetLanguage::Text,
            (80, 24),
        );

        write_snippet(&mut app, "raw\ntext");
        assert!(app.detail().degraded);
        assert_eq!(app.detail().text.lines.len(), 2);
    }

    #[test]
    fn test_release_events_are_ignored() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(&dir, None);
        let mut release = KeyEvent::new(KeyCode::Char('i'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;

        app.handle_event(SessionEvent::Key(release));
        assert_eq!(app.focus(), Focus::List);
    }

    #[test]
    fn test_text_edit_rejected_in_list() {
        let mut router = FocusRouter::new();
        assert_eq!(
            router.dispatch(Command::Edit(TextEdit::Insert('x'))),
            Effect::Rejected
        );
    }
}
