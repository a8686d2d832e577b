//! User Interface Module
//!
//! Presentation only: everything here reads the session state and draws it.
//! Pane rectangles come from the geometry the session computed on the last
//! resize.

pub mod colors;
pub mod components;
pub mod highlight;
pub mod input;
pub mod layout;
pub mod snippets;

use crate::app::App;
use crate::handlers::Focus;
use ratatui::{Frame, layout::Rect};

pub fn draw(frame: &mut Frame, app: &App) {
    let bounds = frame.area();
    let geometry = app.geometry();
    let fit = |rect: Rect| rect.intersection(bounds);

    snippets::render_list(frame, fit(geometry.list), app);
    snippets::render_detail(frame, fit(geometry.detail), app);
    if app.focus() == Focus::Input {
        snippets::render_input(frame, fit(geometry.input), app);
    }
    components::render_status_bar(frame, fit(geometry.status), app);

    if app.show_help() {
        components::render_help_overlay(frame, bounds, app);
    }
}
