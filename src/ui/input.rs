//! Multi-line text entry used to write a snippet by hand.

use crate::handlers::TextEdit;
use unicode_width::UnicodeWidthChar;

pub const TAB_WIDTH: usize = 4;

#[derive(Debug, Clone)]
pub struct TextInput {
    lines: Vec<String>,
    row: usize,
    /// Cursor position in chars within the current line
    col: usize,
}

impl Default for TextInput {
    fn default() -> Self {
        Self {
            lines: vec![String::new()],
            row: 0,
            col: 0,
        }
    }
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, edit: TextEdit) {
        match edit {
            TextEdit::Insert(c) => {
                let offset = self.byte_offset();
                self.lines[self.row].insert(offset, c);
                self.col += 1;
            }
            TextEdit::Newline => {
                let offset = self.byte_offset();
                let rest = self.lines[self.row].split_off(offset);
                self.lines.insert(self.row + 1, rest);
                self.row += 1;
                self.col = 0;
            }
            TextEdit::Backspace => {
                if self.col > 0 {
                    self.col -= 1;
                    let offset = self.byte_offset();
                    self.lines[self.row].remove(offset);
                } else if self.row > 0 {
                    let line = self.lines.remove(self.row);
                    self.row -= 1;
                    self.col = self.line_len(self.row);
                    self.lines[self.row].push_str(&line);
                }
            }
            TextEdit::Delete => {
                if self.col < self.line_len(self.row) {
                    let offset = self.byte_offset();
                    self.lines[self.row].remove(offset);
                } else if self.row + 1 < self.lines.len() {
                    let next = self.lines.remove(self.row + 1);
                    self.lines[self.row].push_str(&next);
                }
            }
            TextEdit::Left => {
                if self.col > 0 {
                    self.col -= 1;
                } else if self.row > 0 {
                    self.row -= 1;
                    self.col = self.line_len(self.row);
                }
            }
            TextEdit::Right => {
                if self.col < self.line_len(self.row) {
                    self.col += 1;
                } else if self.row + 1 < self.lines.len() {
                    self.row += 1;
                    self.col = 0;
                }
            }
            TextEdit::Up => {
                if self.row > 0 {
                    self.row -= 1;
                    self.col = self.col.min(self.line_len(self.row));
                }
            }
            TextEdit::Down => {
                if self.row + 1 < self.lines.len() {
                    self.row += 1;
                    self.col = self.col.min(self.line_len(self.row));
                }
            }
            TextEdit::Home => self.col = 0,
            TextEdit::End => self.col = self.line_len(self.row),
        }
    }

    pub fn value(&self) -> String {
        self.lines.join("\n")
    }

    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|line| line.trim().is_empty())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Cursor as (row, display column), with tabs expanded.
    pub fn cursor(&self) -> (usize, usize) {
        let column = self.lines[self.row]
            .chars()
            .take(self.col)
            .map(display_width)
            .sum();
        (self.row, column)
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines[row].chars().count()
    }

    fn byte_offset(&self) -> usize {
        self.lines[self.row]
            .char_indices()
            .nth(self.col)
            .map(|(offset, _)| offset)
            .unwrap_or(self.lines[self.row].len())
    }
}

fn display_width(c: char) -> usize {
    if c == '\t' {
        TAB_WIDTH
    } else {
        c.width().unwrap_or(0)
    }
}
