//! In-memory snippet collection with cursor and selection.
//!
//! Selection is tracked by snippet id rather than by position, so inserting
//! a snippet never changes which snippets are marked. Deleting clears it.

use crate::error::{Result, SnipError};
use crate::models::{Snippet, SnippetLanguage};
use std::collections::HashSet;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug)]
pub struct SnippetStore {
    items: Vec<Snippet>,
    cursor: usize,
    selected: HashSet<Uuid>,
    next_number: usize,
}

impl SnippetStore {
    pub fn new() -> Self {
        Self::from_snippets(Vec::new())
    }

    /// Builds a store from loaded snippets. Duplicate ids are dropped, keeping
    /// the first occurrence.
    pub fn from_snippets(snippets: Vec<Snippet>) -> Self {
        let mut seen = HashSet::new();
        let items: Vec<Snippet> = snippets
            .into_iter()
            .filter(|snippet| seen.insert(snippet.id))
            .collect();

        let next_number = items
            .iter()
            .filter_map(|snippet| title_number(&snippet.title))
            .max()
            .unwrap_or(0)
            .max(items.len())
            + 1;

        Self {
            next_number,
            items,
            cursor: 0,
            selected: HashSet::new(),
        }
    }

    /// Appends a new snippet and returns its id. Blank content is rejected.
    pub fn add(&mut self, content: impl Into<String>, language: SnippetLanguage) -> Option<Uuid> {
        let content = content.into();
        if content.trim().is_empty() {
            return None;
        }

        let title = format!("Snippet {}", self.next_number);
        self.next_number += 1;

        let snippet = Snippet::new(title, content, language);
        let id = snippet.id;
        debug!(%id, language = snippet.language.tag(), "snippet added");
        self.items.push(snippet);
        Some(id)
    }

    /// Flips the selection of the snippet at `index`. Out of range is a no-op.
    pub fn toggle_select(&mut self, index: usize) {
        let Some(id) = self.items.get(index).map(|snippet| snippet.id) else {
            return;
        };
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    /// Removes every selected snippet in one pass and returns how many went.
    pub fn delete_selected(&mut self) -> usize {
        if self.selected.is_empty() {
            return 0;
        }

        let before = self.items.len();
        let selected = std::mem::take(&mut self.selected);
        self.items.retain(|snippet| !selected.contains(&snippet.id));
        self.clamp_cursor();

        let removed = before - self.items.len();
        debug!(removed, remaining = self.items.len(), "deleted selected snippets");
        removed
    }

    /// Removes the snippet under the cursor. Selection is cleared because
    /// the structure changed under the user.
    pub fn delete_at_cursor(&mut self) -> Option<Snippet> {
        if self.items.is_empty() {
            return None;
        }

        let removed = self.items.remove(self.cursor);
        self.selected.clear();
        self.clamp_cursor();
        debug!(id = %removed.id, "deleted snippet at cursor");
        Some(removed)
    }

    pub fn move_cursor(&mut self, delta: isize) {
        if self.items.is_empty() {
            return;
        }

        let last = self.items.len() - 1;
        let target = if delta.is_negative() {
            self.cursor.saturating_sub(delta.unsigned_abs())
        } else {
            self.cursor.saturating_add(delta.unsigned_abs())
        };
        self.cursor = target.min(last);
    }

    pub fn move_to_first(&mut self) {
        self.cursor = 0;
    }

    pub fn move_to_last(&mut self) {
        self.cursor = self.items.len().saturating_sub(1);
    }

    pub fn get(&self, index: usize) -> Result<&Snippet> {
        self.items.get(index).ok_or(SnipError::IndexOutOfRange {
            index,
            len: self.items.len(),
        })
    }

    /// Snippet under the cursor, if any.
    pub fn current(&self) -> Option<&Snippet> {
        self.items.get(self.cursor)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.items
            .get(index)
            .is_some_and(|snippet| self.selected.contains(&snippet.id))
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Selected snippets in display order.
    pub fn selected_snippets(&self) -> impl Iterator<Item = &Snippet> {
        self.items
            .iter()
            .filter(|snippet| self.selected.contains(&snippet.id))
    }

    pub fn snippets(&self) -> &[Snippet] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.items.len().saturating_sub(1));
    }
}

impl Default for SnippetStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Number of a generated `Snippet N` title.
fn title_number(title: &str) -> Option<usize> {
    title.strip_prefix("Snippet ")?.parse().ok()
}
