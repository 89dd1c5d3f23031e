//! UI rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use contacts_core::{Level, RowView};

use super::app::{App, Field, Focus};

/// Main UI rendering function
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_form(frame, app, chunks[0]);
    draw_search(frame, app, chunks[1]);
    draw_list(frame, app, chunks[2]);
    draw_status_bar(frame, app, chunks[3]);

    if app.show_help {
        draw_help_overlay(frame);
    }

    // Confirmation first, notices queue behind it
    if let Some(confirmation) = app.controller.pending_confirmation() {
        draw_confirm(frame, confirmation.message);
    } else if let Some(notice) = app.controller.peek_notice() {
        draw_notice(frame, notice.level, &notice.message);
    }
}

fn border_style(active: bool) -> Style {
    if active {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn label_style(active: bool) -> Style {
    if active {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    }
}

/// Draw the add-contact form
fn draw_form(frame: &mut Frame, app: &App, area: Rect) {
    let is_active = app.focus == Focus::Form;
    let form = app.controller.form();

    let name_active = is_active && app.form_field == Field::Name;
    let phone_active = is_active && app.form_field == Field::Phone;

    let lines = vec![
        Line::from(vec![
            Span::styled("Name:  ", label_style(name_active)),
            Span::raw(form.name.as_str()),
        ]),
        Line::from(vec![
            Span::styled("Phone: ", label_style(phone_active)),
            Span::raw(form.phone.as_str()),
        ]),
    ];

    let block = Block::default()
        .title(" Add Contact ")
        .borders(Borders::ALL)
        .border_style(border_style(is_active));

    frame.render_widget(Paragraph::new(lines).block(block), area);

    if is_active {
        let (row, text) = match app.form_field {
            Field::Name => (0, &form.name),
            Field::Phone => (1, &form.phone),
        };
        let cursor_x = area.x + 1 + 7 + text.chars().count() as u16;
        frame.set_cursor_position((cursor_x, area.y + 1 + row));
    }
}

/// Draw the search box
fn draw_search(frame: &mut Frame, app: &App, area: Rect) {
    let is_active = app.focus == Focus::Search;
    let term = app.controller.search();

    let line = Line::from(vec![
        Span::styled("/", Style::default().fg(Color::Cyan)),
        Span::raw(term),
    ]);

    let block = Block::default()
        .title(" Search ")
        .borders(Borders::ALL)
        .border_style(border_style(is_active));

    frame.render_widget(Paragraph::new(line).block(block), area);

    if is_active {
        let cursor_x = area.x + 2 + term.chars().count() as u16;
        frame.set_cursor_position((cursor_x, area.y + 1));
    }
}

/// Draw the contact list, or its placeholder
fn draw_list(frame: &mut Frame, app: &App, area: Rect) {
    let is_active = app.focus == Focus::List;
    let rows = app.visible_rows();

    let title = format!(" Contacts ({}) ", app.controller.list().len());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style(is_active));

    if rows.is_empty() {
        let message = app.controller.list().placeholder().message().unwrap_or("");
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                message,
                Style::default().add_modifier(Modifier::DIM),
            )),
        ])
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| match row.view() {
            RowView::Display { name, phone } => ListItem::new(vec![
                Line::from(Span::raw(name)),
                Line::from(Span::styled(
                    phone,
                    Style::default().add_modifier(Modifier::DIM),
                )),
            ]),
            RowView::Editing { name, phone } => {
                let editing = app.editing == Some(row.row_id());
                let name_active = editing && app.edit_field == Field::Name;
                let phone_active = editing && app.edit_field == Field::Phone;
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled("Name:  ", label_style(name_active)),
                        Span::raw(name),
                    ]),
                    Line::from(vec![
                        Span::styled("Phone: ", label_style(phone_active)),
                        Span::raw(phone),
                    ]),
                ])
                .style(Style::default().fg(Color::Yellow))
            }
        })
        .collect();

    let highlight_style = if is_active {
        Style::default()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::REVERSED)
    } else {
        Style::default().add_modifier(Modifier::REVERSED)
    };

    let list = List::new(items)
        .block(block)
        .highlight_style(highlight_style);

    let mut state = ListState::default();
    state.select(Some(app.selected));

    frame.render_stateful_widget(list, area, &mut state);
}

/// Draw the status bar at the bottom
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let content = if app.in_flight > 0 {
        "Working...".to_string()
    } else {
        match app.focus {
            Focus::Form => "Tab:next field  Enter:add  Esc:back".to_string(),
            Focus::Search => "Enter:keep  Esc:clear".to_string(),
            Focus::List if app.editing.is_some() => {
                "Tab:next field  Enter:save  Esc:cancel".to_string()
            }
            Focus::List => {
                "a:add  e:edit  d:del  /:search  r:reload  ?:help  q:quit".to_string()
            }
        }
    };

    let paragraph = Paragraph::new(content).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Centered popup area
fn popup_area(frame: &Frame, width: u16, height: u16) -> Rect {
    let area = frame.area();
    let popup_width = width.min(area.width.saturating_sub(4));
    let popup_height = height.min(area.height.saturating_sub(4));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    Rect::new(popup_x, popup_y, popup_width, popup_height)
}

/// Draw a notice the user must dismiss
fn draw_notice(frame: &mut Frame, level: Level, message: &str) {
    let area = popup_area(frame, 50, 7);
    frame.render_widget(Clear, area);

    let (title, color) = match level {
        Level::Success => (" Success ", Color::Green),
        Level::Warning => (" Warning ", Color::Yellow),
        Level::Error => (" Error ", Color::Red),
    };

    let text = vec![
        Line::from(""),
        Line::from(message),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to continue",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color).add_modifier(Modifier::BOLD));

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// Draw the delete confirmation
fn draw_confirm(frame: &mut Frame, message: &str) {
    let area = popup_area(frame, 50, 7);
    frame.render_widget(Clear, area);

    let text = vec![
        Line::from(""),
        Line::from(message),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(": delete   "),
            Span::styled("n", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(": keep"),
        ]),
    ];

    let block = Block::default()
        .title(" Confirm ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// Draw help overlay
fn draw_help_overlay(frame: &mut Frame) {
    let area = popup_area(frame, 50, 22);
    frame.render_widget(Clear, area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from("Navigation:"),
        Line::from("  j/k, ↑/↓    Move up/down"),
        Line::from("  g/G         Jump to first/last contact"),
        Line::from(""),
        Line::from("Contacts:"),
        Line::from("  a, Tab      Add contact"),
        Line::from("  e, Enter    Edit contact"),
        Line::from("  d           Delete contact"),
        Line::from("  r           Reload from server"),
        Line::from("  /           Search"),
        Line::from(""),
        Line::from("Editing:"),
        Line::from("  Tab         Switch field"),
        Line::from("  Enter       Save"),
        Line::from("  Esc         Cancel"),
        Line::from(""),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));

    let paragraph = Paragraph::new(help_text).block(block);
    frame.render_widget(paragraph, area);
}
