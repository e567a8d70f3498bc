use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Row, Table},
    Frame,
};
use taskboard_core::{Stage, ToastKind};
use unicode_width::UnicodeWidthChar;

use crate::tui::app::{App, InputMode};

const MAX_BANNER_LINES: usize = 3;
const MAX_TOAST_LINES: usize = 3;

pub fn draw(f: &mut Frame, app: &mut App) {
    let size = f.area();

    let alert_lines = app.monitor.alerts().len().min(MAX_BANNER_LINES) as u16;
    let toast_lines = app.store.toasts().len().min(MAX_TOAST_LINES) as u16;
    let input_active = !matches!(app.input_mode, InputMode::Normal);

    let mut constraints = vec![Constraint::Length(3)]; // Header
    if alert_lines > 0 {
        constraints.push(Constraint::Length(alert_lines + 2)); // Overdue banner
    }
    constraints.push(Constraint::Min(1)); // Columns
    if toast_lines > 0 {
        constraints.push(Constraint::Length(toast_lines)); // Toasts
    }
    if input_active {
        constraints.push(Constraint::Length(3)); // Input bar
    }
    constraints.push(Constraint::Length(1)); // Footer

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(size);

    let mut idx = 0;

    let header = Paragraph::new("TASKBOARD")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        );
    f.render_widget(header, chunks[idx]);
    idx += 1;

    if alert_lines > 0 {
        draw_overdue_banner(f, app, chunks[idx]);
        idx += 1;
    }

    draw_columns(f, app, chunks[idx]);
    idx += 1;

    if toast_lines > 0 {
        draw_toasts(f, app, chunks[idx]);
        idx += 1;
    }

    if input_active {
        draw_input_bar(f, app, chunks[idx]);
        idx += 1;
    }

    let footer = Paragraph::new(
        "h/l: column | j/k: task | a: add | e: edit | u: due | 1/2/3: move | d: delete | o: dismiss | c: clear toasts | q: quit",
    )
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center);
    f.render_widget(footer, chunks[idx]);
}

fn draw_overdue_banner(f: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = app
        .monitor
        .alerts()
        .iter()
        .take(MAX_BANNER_LINES)
        .filter_map(|id| app.store.find_task(*id))
        .map(|task| {
            let due = task
                .due_date
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();
            Line::from(Span::styled(
                format!("⚠ Task \"{}\" is overdue! Due: {}", task.title, due),
                Style::default().fg(Color::Red),
            ))
        })
        .collect();

    let banner = Paragraph::new(lines).block(
        Block::default()
            .title(" Overdue ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Red)),
    );
    f.render_widget(banner, area);
}

fn draw_columns(f: &mut Frame, app: &mut App, area: Rect) {
    let column_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(34),
            Constraint::Percentage(33),
        ])
        .split(area);

    for (column, stage) in Stage::ALL.iter().enumerate() {
        let chunk = column_chunks[column];
        // Borders, highlight symbol and the due column eat into the width.
        let title_width = chunk.width.saturating_sub(14) as usize;

        let rows: Vec<Row> = app
            .store
            .tasks_in_stage(*stage)
            .iter()
            .map(|task| {
                let overdue = app.monitor.alerts().contains(&task.id);
                let due_str = task
                    .due_date
                    .map(|d| d.format("%m-%d").to_string())
                    .unwrap_or_else(|| "-".to_string());
                let due_style = if overdue {
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                Row::new(vec![
                    Span::styled(
                        truncate_to_width(&task.title, title_width),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(due_str, due_style),
                ])
            })
            .collect();

        let count = rows.len();
        let active = column == app.active_column;
        let border_style = if active {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let table = Table::new(rows, [Constraint::Min(10), Constraint::Length(6)])
            .block(
                Block::default()
                    .title(format!(" {} ({}) ", stage.label(), count))
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(border_style),
            )
            .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, chunk, &mut app.column_states[column]);
    }
}

fn draw_toasts(f: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = app
        .store
        .toasts()
        .iter()
        .rev()
        .take(MAX_TOAST_LINES)
        .map(|toast| {
            let style = match toast.kind {
                ToastKind::Success => Style::default().fg(Color::Green),
                ToastKind::Error => Style::default().fg(Color::Red),
                ToastKind::Info => Style::default().fg(Color::Blue),
                ToastKind::Warning => Style::default().fg(Color::Yellow),
            };
            Line::from(Span::styled(
                format!("{}: {}", toast.title, toast.message),
                style,
            ))
        })
        .collect();

    f.render_widget(Paragraph::new(lines), area);
}

fn draw_input_bar(f: &mut Frame, app: &App, area: Rect) {
    let title = match app.input_mode {
        InputMode::Adding => " Add task (title, then due:... description:...) ",
        InputMode::Editing => " Edit task (new title and/or due:... description:...) ",
        InputMode::SettingDue => " Due date (today, tomorrow, fri, +3d, 2025-06-01) ",
        InputMode::Normal => "",
    };

    let input = Paragraph::new(app.input.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        );
    f.render_widget(input, area);

    // Put the terminal cursor where the next character lands.
    let cursor_x = area.x
        + 1
        + app
            .input
            .chars()
            .take(app.cursor_position)
            .filter_map(UnicodeWidthChar::width)
            .sum::<usize>() as u16;
    f.set_cursor_position((cursor_x.min(area.x + area.width.saturating_sub(2)), area.y + 1));
}

fn truncate_to_width(s: &str, max: usize) -> String {
    let mut width = 0;
    let mut out = String::new();
    for ch in s.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + w > max {
            out.push('…');
            break;
        }
        width += w;
        out.push(ch);
    }
    out
}
