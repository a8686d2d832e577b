//! Pane geometry derived from the terminal size.

use crate::handlers::Focus;
use ratatui::layout::{Constraint, Layout, Rect};

const INPUT_PANE_HEIGHT: u16 = 10;
const STATUS_BAR_HEIGHT: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Geometry {
    pub area: Rect,
    pub list: Rect,
    pub detail: Rect,
    /// Zero-sized unless the input pane is open
    pub input: Rect,
    pub status: Rect,
}

impl Geometry {
    pub fn compute(width: u16, height: u16, focus: Focus) -> Self {
        let area = Rect::new(0, 0, width, height);

        let input_height = if focus == Focus::Input {
            INPUT_PANE_HEIGHT.min(height.saturating_sub(STATUS_BAR_HEIGHT) / 2)
        } else {
            0
        };

        let [body, input, status] = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(input_height),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .areas(area);

        let [list, detail] =
            Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
                .areas(body);

        Self {
            area,
            list,
            detail,
            input,
            status,
        }
    }

    /// Rows of content visible inside the bordered detail pane.
    pub fn detail_rows(&self) -> usize {
        self.detail.height.saturating_sub(2) as usize
    }
}
