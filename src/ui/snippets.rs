use crate::app::App;
use crate::handlers::Focus;
use crate::ui::colors::RosePine;
use crate::ui::input::TAB_WIDTH;
use ratatui::{
    Frame,
    layout::{Alignment, Position, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{
        Block, BorderType, Clear, List, ListItem, ListState, Paragraph, Scrollbar,
        ScrollbarOrientation, ScrollbarState, Widget, Wrap,
    },
};

fn pane_block(title: String, focused: bool) -> Block<'static> {
    let border = if focused {
        RosePine::IRIS
    } else {
        RosePine::HIGHLIGHT_HIGH
    };

    Block::bordered()
        .title(title)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
}

pub fn render_list(frame: &mut Frame, area: Rect, app: &App) {
    let store = app.store();
    let title = if store.selected_count() > 0 {
        format!(" Snippets ({}, {} selected) ", store.len(), store.selected_count())
    } else {
        format!(" Snippets ({}) ", store.len())
    };
    let block = pane_block(title, app.focus() == Focus::List);

    if store.is_empty() {
        let hint = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No snippets yet",
                Style::default().fg(RosePine::LOVE).bold(),
            )),
            Line::from(""),
            Line::from("Press 'p' to add from the clipboard"),
            Line::from("or 'i' to write one"),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(RosePine::SUBTLE))
        .block(block);
        hint.render(area, frame.buffer_mut());
        return;
    }

    let items: Vec<ListItem> = store
        .snippets()
        .iter()
        .enumerate()
        .map(|(index, snippet)| {
            let marker = if store.is_selected(index) { "[x]" } else { "[ ]" };
            let marker_style = if store.is_selected(index) {
                Style::default().fg(RosePine::FOAM).bold()
            } else {
                Style::default().fg(RosePine::MUTED)
            };

            let header = Line::from(vec![
                Span::styled(format!("{} ", marker), marker_style),
                Span::styled(
                    format!("{}. {}", index + 1, snippet.title),
                    Style::default().fg(RosePine::TEXT),
                ),
            ]);
            let meta = Line::from(vec![
                Span::raw("    "),
                Span::styled(
                    snippet.language.display_name().to_string(),
                    Style::default().fg(RosePine::GOLD),
                ),
                Span::styled(
                    format!(" · {}", snippet.created_at.format("%Y-%m-%d %H:%M")),
                    Style::default().fg(RosePine::MUTED),
                ),
            ]);

            ListItem::new(vec![header, meta])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(RosePine::HIGHLIGHT_LOW).bold())
        .highlight_symbol("▶ ");

    let mut list_state = ListState::default();
    list_state.select(Some(store.cursor()));

    frame.render_stateful_widget(list, area, &mut list_state);
}

pub fn render_detail(frame: &mut Frame, area: Rect, app: &App) {
    let title = match app.store().current() {
        Some(snippet) => {
            let degraded = if app.detail().degraded { " [raw]" } else { "" };
            format!(
                " {} · {} · {} lines{} ",
                snippet.title,
                snippet.language.display_name(),
                snippet.line_count(),
                degraded
            )
        }
        None => String::from(" Preview "),
    };
    let block = pane_block(title, app.focus() == Focus::Detail)
        .style(Style::default().bg(RosePine::SURFACE));

    let inner_area = block.inner(area);
    block.render(area, frame.buffer_mut());

    let text = app.detail().text.clone();
    let total_lines = text.lines.len();
    let scroll = app.detail_scroll();

    Paragraph::new(text)
        .style(Style::default().fg(RosePine::TEXT))
        .scroll((scroll.min(u16::MAX as usize) as u16, 0))
        .render(inner_area, frame.buffer_mut());

    if total_lines > inner_area.height as usize {
        let mut scrollbar_state = ScrollbarState::default()
            .content_length(total_lines)
            .position(scroll);

        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .style(Style::default().fg(RosePine::SUBTLE))
            .thumb_style(Style::default().fg(RosePine::HIGHLIGHT_HIGH));

        frame.render_stateful_widget(scrollbar, inner_area, &mut scrollbar_state);
    }
}

pub fn render_input(frame: &mut Frame, area: Rect, app: &App) {
    if area.height == 0 {
        return;
    }

    Clear.render(area, frame.buffer_mut());

    let title = format!(" New {} snippet ", app.default_language().display_name());
    let block = pane_block(title, true).style(Style::default().bg(RosePine::SURFACE));
    let inner_area = block.inner(area);
    block.render(area, frame.buffer_mut());
    if inner_area.height == 0 || inner_area.width == 0 {
        return;
    }

    let (row, column) = app.input().cursor();
    let visible_rows = inner_area.height as usize;
    let top = (row + 1).saturating_sub(visible_rows);

    let lines: Vec<Line> = app
        .input()
        .lines()
        .iter()
        .skip(top)
        .map(|line| Line::raw(line.replace('\t', &" ".repeat(TAB_WIDTH))))
        .collect();

    Paragraph::new(lines)
        .style(Style::default().fg(RosePine::TEXT))
        .render(inner_area, frame.buffer_mut());

    let max_x = inner_area.width.saturating_sub(1) as usize;
    let cursor = Position::new(
        inner_area.x + column.min(max_x) as u16,
        inner_area.y + (row - top) as u16,
    );
    frame.set_cursor_position(cursor);
}
