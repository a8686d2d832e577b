//! UI Components Module
//!
//! Reusable pieces drawn on top of or around the panes.
//!
//! - **Status Bar**: focus badge plus either the current status message or
//!   shortcuts for the active keymap
//! - **Help Overlay**: every binding that is live in the current focus

use crate::app::{App, Severity};
use crate::handlers::{Command, Keymap};
use crate::handlers::keys::Binding;
use crate::ui::colors::RosePine;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Clear, Paragraph, Widget},
};

pub fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        format!(" {} ", app.focus().label()),
        Style::default().fg(RosePine::BASE).bg(RosePine::IRIS).bold(),
    )];
    spans.push(Span::raw(" "));

    match app.status() {
        Some(status) => {
            let color = match status.severity {
                Severity::Info => RosePine::FOAM,
                Severity::Warning => RosePine::GOLD,
                Severity::Error => RosePine::LOVE,
            };
            spans.push(Span::styled(status.text.clone(), Style::default().fg(color)));
        }
        None => spans.push(Span::styled(
            shortcut_hints(app),
            Style::default().fg(RosePine::MUTED),
        )),
    }

    Paragraph::new(Line::from(spans))
        .style(Style::default().bg(RosePine::BASE))
        .render(area, frame.buffer_mut());
}

fn shortcut_hints(app: &App) -> String {
    app.router()
        .keymap()
        .hints()
        .filter(|binding| {
            app.clipboard_available() || !matches!(binding.command, Command::Yank | Command::Paste)
        })
        .map(|binding| format!("[{}] {}", binding.label, binding.description))
        .collect::<Vec<_>>()
        .join(" │ ")
}

pub fn render_help_overlay(frame: &mut Frame, area: Rect, app: &App) {
    let active = app.router().keymap();
    let height = (active.bindings.len() + Keymap::global().bindings.len() + 6) as u16;

    let [_, popup_row, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .areas(area);
    let [_, popup_area, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(56.min(area.width)),
        Constraint::Fill(1),
    ])
    .areas(popup_row);

    let mut lines = vec![section_title("Always")];
    lines.extend(Keymap::global().bindings.iter().map(binding_line));
    lines.push(Line::from(""));
    lines.push(section_title(app.focus().label()));
    lines.extend(active.bindings.iter().map(binding_line));
    if active.accepts_text {
        lines.push(Line::from(Span::styled(
            "  other keys edit the text",
            Style::default().fg(RosePine::MUTED),
        )));
    }

    let help = Paragraph::new(lines).block(
        Block::bordered()
            .title(" Help ")
            .title_alignment(Alignment::Center)
            .title_bottom(Line::from(" Esc / F1 to close ").centered())
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(RosePine::IRIS))
            .style(Style::default().bg(RosePine::SURFACE)),
    );

    Clear.render(popup_area, frame.buffer_mut());
    help.render(popup_area, frame.buffer_mut());
}

fn section_title(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!(" {}", title),
        Style::default().fg(RosePine::GOLD).bold(),
    ))
}

fn binding_line(binding: &Binding) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("  {:<8}", binding.label),
            Style::default().fg(RosePine::FOAM),
        ),
        Span::styled(
            binding.description.to_string(),
            Style::default().fg(RosePine::TEXT),
        ),
    ])
}
