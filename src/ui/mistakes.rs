use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};
use times_drill::{MistakeRecord, Outcome};

use crate::App;

/// Pure presenter for a single mistake row
pub fn present_row(record: &MistakeRecord) -> Row<'static> {
    let (outcome, outcome_color) = match record.outcome {
        Outcome::Wrong => ("wrong", Color::Red),
        Outcome::Timeout => ("timeout", Color::Yellow),
    };
    let given = record
        .user_answer
        .map(|v| v.to_string())
        .unwrap_or_else(|| "-".to_string());
    let status = if record.resolved {
        Cell::from("✔ fixed").style(Style::default().fg(Color::Green))
    } else {
        Cell::from("to retry").style(Style::default().add_modifier(Modifier::DIM))
    };

    Row::new(vec![
        Cell::from(record.timestamp.format("%H:%M:%S").to_string()),
        Cell::from(record.fact.to_string()).style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from(record.correct_answer.to_string()),
        Cell::from(given),
        Cell::from(outcome).style(Style::default().fg(outcome_color)),
        status,
    ])
}

/// Largest scroll offset that still fills the visible rows
pub fn max_scroll(total_rows: usize, visible_rows: usize) -> usize {
    total_rows.saturating_sub(visible_rows)
}

/// Render the mistake log, newest first
pub fn render_mistakes(app: &mut App, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Min(0),    // table
            Constraint::Length(3), // instructions
        ])
        .split(f.area());

    let records = app.trainer.mistakes();
    let pending = records.iter().filter(|r| !r.resolved).count();
    let title = Paragraph::new(format!(
        "Mistakes: {} logged, {} to retry",
        records.len(),
        pending
    ))
    .block(Block::default().borders(Borders::ALL).title("Review"))
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
    .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    if records.is_empty() {
        let empty = Paragraph::new("No mistakes yet. Keep it up!")
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(empty, chunks[1]);
    } else {
        let table_height = chunks[1].height.saturating_sub(3) as usize; // borders + header
        let limit = max_scroll(records.len(), table_height);
        let offset = app.mistakes_state.scroll_offset.min(limit);

        let header = Row::new(vec!["Time", "Question", "Answer", "Given", "Outcome", "Status"])
            .style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        let rows: Vec<Row> = records
            .iter()
            .rev()
            .skip(offset)
            .take(table_height)
            .map(present_row)
            .collect();
        let widths = [
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(9),
            Constraint::Min(8),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL))
            .column_spacing(2);
        f.render_widget(table, chunks[1]);

        app.mistakes_state.scroll_offset = offset;
    }

    let instructions = match &app.notice {
        Some(notice) => notice.clone(),
        None => "(↑/↓) scroll  (home) top  (e)xport CSV  (b)ack  (esc)ape".to_string(),
    };
    let footer = Paragraph::new(instructions)
        .style(Style::default().add_modifier(Modifier::ITALIC))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(footer, chunks[2]);
}
