use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{BarChart, Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use times_drill::TableStat;

use crate::{ui::charting, App};

fn accuracy_color(stat: &TableStat) -> Color {
    if stat.attempts == 0 {
        Color::DarkGray
    } else if stat.accuracy() >= 0.85 {
        Color::Green
    } else if stat.accuracy() >= 0.5 {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// Render per-table accuracy as a bar chart over a correct/attempts grid
pub fn render_table_stats(app: &mut App, f: &mut Frame) {
    let stats = app.trainer.table_stats();
    let attempted: u64 = stats.iter().map(|s| s.attempts).sum();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Min(8),    // chart
            Constraint::Length(6), // grid
            Constraint::Length(2), // instructions
        ])
        .split(f.area());

    let title = Paragraph::new(format!("Progress by table ({attempted} answers)"))
        .block(Block::default().borders(Borders::ALL).title("Stats"))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let bars = charting::accuracy_bars(&stats);
    let data: Vec<(&str, u64)> = bars.iter().map(|(label, v)| (label.as_str(), *v)).collect();
    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Accuracy (%)"),
        )
        .data(data.as_slice())
        .max(100)
        .bar_width(3)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Green))
        .value_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(chart, chunks[1]);

    let header = Row::new(
        std::iter::once(Cell::from("Table"))
            .chain(stats.iter().map(|s| Cell::from(s.table.to_string()))),
    )
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );
    let counts = Row::new(
        std::iter::once(Cell::from("Correct")).chain(
            stats
                .iter()
                .map(|s| Cell::from(format!("{}/{}", s.correct, s.attempts))),
        ),
    );
    let percents = Row::new(std::iter::once(Cell::from("Accuracy")).chain(stats.iter().map(
        |s| Cell::from(charting::format_label(s)).style(Style::default().fg(accuracy_color(s))),
    )));
    let widths: Vec<Constraint> = std::iter::once(Constraint::Length(9))
        .chain(stats.iter().map(|_| Constraint::Min(5)))
        .collect();
    let grid = Table::new(vec![counts, percents], widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL))
        .column_spacing(1);
    f.render_widget(grid, chunks[2]);

    let instructions = Paragraph::new("(b)ack  (esc)ape")
        .style(Style::default().add_modifier(Modifier::ITALIC))
        .alignment(Alignment::Center);
    f.render_widget(instructions, chunks[3]);
}
