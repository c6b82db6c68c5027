pub mod charting;
pub mod mistakes;
pub mod screen;
pub mod table_stats;

use std::time::Instant;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget, Wrap},
    Frame,
};
use times_drill::{fact::MAX_OPERAND, Feedback, FeedbackKind};
use unicode_width::UnicodeWidthStr;

use crate::{App, AppState};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

pub fn draw(app: &mut App, f: &mut Frame) {
    screen::current_screen(app.state).render(app, f);
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn feedback_line(feedback: &Feedback) -> Line<'static> {
    let (label, color) = match feedback.kind {
        FeedbackKind::Bravo => ("✅ Great job!", Color::Green),
        FeedbackKind::Oops => ("❌ Oops!", Color::Red),
        FeedbackKind::TooSlow => ("⏳ Too slow!", Color::Yellow),
    };
    Line::from(vec![
        Span::styled(label, bold().fg(color)),
        Span::raw("  "),
        Span::styled(
            format!("{} = {}", feedback.fact, feedback.correct_answer),
            bold(),
        ),
    ])
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "ON"
    } else {
        "OFF"
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            AppState::Setup => render_setup(self, area, buf),
            AppState::Quiz => render_quiz(self, area, buf),
            AppState::Results => render_results(self, area, buf),
            // dedicated screens draw these through the Frame
            AppState::Mistakes | AppState::TableStats => {}
        }
    }
}

fn render_setup(app: &App, area: Rect, buf: &mut Buffer) {
    let config = app.trainer.config();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(2), // title
            Constraint::Length(3), // table toggles
            Constraint::Length(4), // options
            Constraint::Length(2), // notice
            Constraint::Min(0),
            Constraint::Length(2), // legend
        ])
        .split(area);

    Paragraph::new(Span::styled(
        "🎯 Fun Multiplications!",
        bold().fg(Color::Cyan),
    ))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    let toggles: Vec<Span> = (0..=MAX_OPERAND)
        .flat_map(|table| {
            let selected = config.tables.contains(&table);
            let mut style = if selected {
                bold().fg(Color::Green)
            } else {
                Style::default().add_modifier(Modifier::DIM)
            };
            if table == app.table_cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            let mark = if selected { "■" } else { "□" };
            [Span::styled(format!("{mark}{table}"), style), Span::raw(" ")]
        })
        .collect();
    Paragraph::new(Line::from(toggles))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Times tables (0 to 12)"),
        )
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    let options = vec![
        Line::from(format!(
            "Answer mode: {}",
            if config.keyboard_mode {
                "keyboard"
            } else {
                "multiple choice"
            }
        )),
        Line::from(format!(
            "Per-question timer: {}   Duration: {}s",
            on_off(config.timer_enabled),
            config.timer_seconds
        )),
        Line::from(format!(
            "Mistakes to retry: {}",
            app.trainer.session().mistakes().unresolved_count()
        )),
    ];
    Paragraph::new(options)
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

    render_notice(app, chunks[3], buf);

    Paragraph::new(
        "(←/→) move  (space) toggle  (a)ll  (n)one  (k)eyboard/choices  (t)imer  (+/-) seconds\n(enter) start quiz  (r)etry mistakes  (m)istakes  (p)rogress  (X) reset all  (esc)ape",
    )
    .style(Style::default().add_modifier(Modifier::ITALIC))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .render(chunks[5], buf);
}

fn render_quiz(app: &App, area: Rect, buf: &mut Buffer) {
    let trainer = &app.trainer;
    let Some(progress) = trainer.progress() else {
        return;
    };
    let now = Instant::now();
    let remaining = trainer.remaining_seconds(now);
    let paused = !trainer.session().state().is_awaiting_answer();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // progress text
            Constraint::Length(1), // progress bar
            Constraint::Min(1),    // spacer
            Constraint::Length(1), // question
            Constraint::Length(1), // spacer
            Constraint::Length(1), // timer
            Constraint::Length(3), // answer area
            Constraint::Length(1), // feedback / notice
            Constraint::Min(1),    // spacer
            Constraint::Length(1), // legend
        ])
        .split(area);

    Paragraph::new(Line::from(vec![
        Span::styled(
            format!(
                "Question {}/{}",
                (progress.index + 1).min(progress.total),
                progress.total
            ),
            bold(),
        ),
        Span::raw("  |  "),
        Span::styled(format!("Correct: {}", progress.score_so_far), bold()),
        Span::styled(
            if trainer.session().state().retry_mode {
                "  (retry)"
            } else {
                ""
            },
            Style::default().fg(Color::Magenta),
        ),
    ]))
    .render(chunks[0], buf);

    Gauge::default()
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(charting::ratio(progress.index, progress.total))
        .label("")
        .render(chunks[1], buf);

    if paused {
        if let Some(feedback) = trainer.feedback() {
            Paragraph::new(feedback_line(feedback))
                .alignment(Alignment::Center)
                .render(chunks[3], buf);
        }
        return;
    }

    if let Some(fact) = trainer.current_question() {
        let question = format!("{fact} = ?");
        let pad = (chunks[3].width as usize).saturating_sub(question.width()) / 2;
        Paragraph::new(Span::styled(
            format!("{}{question}", " ".repeat(pad)),
            bold().fg(Color::Cyan),
        ))
        .render(chunks[3], buf);
    }

    if let Some(secs) = remaining {
        let limit = trainer.config().timer_seconds as usize;
        Gauge::default()
            .gauge_style(Style::default().fg(Color::Yellow))
            .ratio(charting::ratio(secs as usize, limit))
            .label(format!("⏳ {secs}s"))
            .render(chunks[5], buf);
    }

    if trainer.config().keyboard_mode {
        Paragraph::new(Span::styled(format!("{}▏", app.input), bold()))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Type your answer"),
            )
            .alignment(Alignment::Center)
            .render(chunks[6], buf);
    } else if let Some((_, options)) = &app.choices {
        let spans: Vec<Span> = options
            .iter()
            .enumerate()
            .flat_map(|(i, value)| {
                [
                    Span::styled(format!("({}) ", i + 1), Style::default().fg(Color::Gray)),
                    Span::styled(format!("{value}"), bold()),
                    Span::raw("    "),
                ]
            })
            .collect();
        Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL).title("Pick one"))
            .alignment(Alignment::Center)
            .render(chunks[6], buf);
    }

    if app.notice.is_some() {
        render_notice(app, chunks[7], buf);
    } else if let Some(feedback) = trainer.feedback() {
        Paragraph::new(feedback_line(feedback))
            .alignment(Alignment::Center)
            .render(chunks[7], buf);
    }

    let legend = if trainer.config().keyboard_mode {
        "(0-9) type  (enter) submit  (backspace) erase  (esc) menu"
    } else {
        "(1-4) choose  (esc) menu"
    };
    Paragraph::new(Span::styled(
        legend,
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[9], buf);
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(summary) = app.trainer.summary() else {
        return;
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1), // finished
            Constraint::Length(1), // badge
            Constraint::Length(1), // results
            Constraint::Length(1), // last feedback
            Constraint::Length(1), // notice
            Constraint::Min(1),
            Constraint::Length(1), // legend
        ])
        .split(area);

    let badge_color = match summary.badge {
        times_drill::Badge::Mastered => Color::Green,
        times_drill::Badge::Almost => Color::Yellow,
        times_drill::Badge::KeepPracticing => Color::Magenta,
    };

    Paragraph::new(Span::styled("Finished! 🎉", bold()))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);
    Paragraph::new(Span::styled(summary.badge.label(), bold().fg(badge_color)))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);
    Paragraph::new(format!(
        "Results: {}/{} ({}%).",
        summary.correct, summary.total, summary.percent
    ))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);
    if let Some(feedback) = app.trainer.feedback() {
        Paragraph::new(feedback_line(feedback))
            .alignment(Alignment::Center)
            .render(chunks[4], buf);
    }
    render_notice(app, chunks[5], buf);

    Paragraph::new(Span::styled(
        "(enter) menu  (n)ew quiz  (r)etry mistakes  (m)istakes  (p)rogress  (esc)ape",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[7], buf);
}

fn render_notice(app: &App, area: Rect, buf: &mut Buffer) {
    if let Some(notice) = &app.notice {
        Paragraph::new(Span::styled(
            notice.clone(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(area, buf);
    }
}
