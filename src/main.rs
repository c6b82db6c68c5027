mod ui;

use anyhow::Context;
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    fs::OpenOptions,
    io::{self, stdin},
    path::{Path, PathBuf},
    sync::Mutex,
    time::{Duration, Instant},
};
use times_drill::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore, MAX_TIMER_SECS, MIN_TIMER_SECS},
    export::export_mistakes_csv,
    fact::MAX_OPERAND,
    runtime::{CrosstermEventSource, DrillEvent, FixedTicker, Runner},
    trainer::MAX_ANSWER_DIGITS,
    Mode, TrainerError, Trainer,
};
use tracing_subscriber::EnvFilter;

const TICK_RATE_MS: u64 = 100;

/// multiplication facts drill trainer with timed questions and mistake retry
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Drill multiplication tables 0 to 12 in the terminal: typed or multiple-choice answers, an optional per-question timer, retry of missed facts, and per-table accuracy."
)]
pub struct Cli {
    /// tables to practice, e.g. 2,3,7 (default: last used, or 0,1,2,3)
    #[clap(short = 't', long, value_delimiter = ',', value_parser = clap::value_parser!(u8).range(0..=12))]
    tables: Option<Vec<u8>>,

    /// pick answers from four choices instead of typing them
    #[clap(short = 'c', long, conflicts_with = "keyboard")]
    multiple_choice: bool,

    /// type answers with the keyboard
    #[clap(short = 'k', long)]
    keyboard: bool,

    /// disable the per-question timer
    #[clap(long, conflicts_with = "seconds")]
    no_timer: bool,

    /// seconds allowed per question (enables the timer)
    #[clap(short = 's', long, value_parser = clap::value_parser!(u32).range(2..=60))]
    seconds: Option<u32>,

    /// milliseconds feedback stays on screen before the next question
    #[clap(long)]
    pause_ms: Option<u64>,

    /// write the mistake log as CSV to this path on exit
    #[clap(long)]
    export_mistakes: Option<PathBuf>,

    /// append diagnostics to this file (filter with RUST_LOG)
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// do not remember these settings for next time
    #[clap(long)]
    no_save: bool,
}

impl Cli {
    /// Layer command-line overrides on top of the stored preferences
    fn apply(&self, mut config: Config) -> Config {
        if let Some(tables) = &self.tables {
            config.tables = tables.iter().copied().collect();
        }
        if self.multiple_choice {
            config.keyboard_mode = false;
        }
        if self.keyboard {
            config.keyboard_mode = true;
        }
        if self.no_timer {
            config.timer_enabled = false;
        }
        if let Some(secs) = self.seconds {
            config.timer_enabled = true;
            config.timer_seconds = secs;
        }
        if let Some(ms) = self.pause_ms {
            config.feedback_pause_ms = ms;
        }
        config
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Setup,
    Quiz,
    Results,
    Mistakes,
    TableStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Default)]
pub struct MistakesState {
    pub scroll_offset: usize,
}

#[derive(Debug)]
pub struct App {
    pub trainer: Trainer,
    pub state: AppState,
    /// Screen to go back to from the mistakes and stats views
    pub return_to: AppState,
    /// Highlighted table on the setup screen
    pub table_cursor: u8,
    pub input: String,
    /// Multiple-choice options and the question index they belong to
    pub choices: Option<(usize, Vec<u32>)>,
    pub notice: Option<String>,
    pub mistakes_state: MistakesState,
    pub export_path: PathBuf,
}

impl App {
    pub fn new(trainer: Trainer, export_path: PathBuf) -> Self {
        Self {
            trainer,
            state: AppState::Setup,
            return_to: AppState::Setup,
            table_cursor: 0,
            input: String::new(),
            choices: None,
            notice: None,
            mistakes_state: MistakesState::default(),
            export_path,
        }
    }

    fn on_tick(&mut self, now: Instant) {
        self.trainer.tick(now);
        self.sync_with_session();
    }

    fn on_key(&mut self, key: KeyEvent, now: Instant) -> Flow {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }
        let flow = match self.state {
            AppState::Setup => self.on_setup_key(key, now),
            AppState::Quiz => self.on_quiz_key(key, now),
            AppState::Results => self.on_results_key(key, now),
            AppState::Mistakes => self.on_mistakes_key(key),
            AppState::TableStats => self.on_table_stats_key(key),
        };
        self.sync_with_session();
        flow
    }

    fn on_setup_key(&mut self, key: KeyEvent, now: Instant) -> Flow {
        let mut config = self.trainer.config().clone();
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Enter => self.start(now, false),
            KeyCode::Char('r') => self.start(now, true),
            KeyCode::Char('m') => self.open(AppState::Mistakes),
            KeyCode::Char('p') => self.open(AppState::TableStats),
            KeyCode::Char('X') => {
                self.trainer.reset_all();
                self.notice = Some("Reset done.".to_string());
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.table_cursor = self.table_cursor.checked_sub(1).unwrap_or(MAX_OPERAND);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.table_cursor = if self.table_cursor >= MAX_OPERAND {
                    0
                } else {
                    self.table_cursor + 1
                };
            }
            KeyCode::Char(' ') => config.toggle_table(self.table_cursor),
            KeyCode::Char('a') => config.tables = (0..=MAX_OPERAND).collect(),
            KeyCode::Char('n') => config.tables.clear(),
            KeyCode::Char('k') => config.keyboard_mode = !config.keyboard_mode,
            KeyCode::Char('t') => config.timer_enabled = !config.timer_enabled,
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => {
                config.timer_seconds = (config.timer_seconds + 1).min(MAX_TIMER_SECS);
            }
            KeyCode::Char('-') | KeyCode::Down => {
                config.timer_seconds = config.timer_seconds.saturating_sub(1).max(MIN_TIMER_SECS);
            }
            _ => {}
        }
        if &config != self.trainer.config() {
            if let Err(e) = self.trainer.configure(config) {
                self.notice = Some(e.to_string());
            }
        }
        Flow::Continue
    }

    fn on_quiz_key(&mut self, key: KeyEvent, now: Instant) -> Flow {
        match key.code {
            KeyCode::Esc => {
                self.trainer.abandon();
                self.state = AppState::Setup;
            }
            KeyCode::Char(c) if self.trainer.config().keyboard_mode && c.is_ascii_digit() => {
                if self.input.len() < MAX_ANSWER_DIGITS {
                    self.input.push(c);
                }
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Enter if self.trainer.config().keyboard_mode => {
                match self.trainer.submit_typed(&self.input, now) {
                    Ok(_) => {
                        self.input.clear();
                        self.notice = None;
                    }
                    Err(TrainerError::InvalidInput(_)) => {
                        self.notice = Some("Type your answer:".to_string());
                    }
                    Err(e) => tracing::debug!(error = %e, "typed answer dropped"),
                }
            }
            KeyCode::Char(c @ '1'..='4') if !self.trainer.config().keyboard_mode => {
                let picked = self.choices.as_ref().and_then(|(_, options)| {
                    let idx = c.to_digit(10).map(|d| d as usize - 1)?;
                    options.get(idx).copied()
                });
                if let Some(value) = picked {
                    match self.trainer.submit_choice(value, now) {
                        Ok(_) => self.notice = None,
                        Err(e) => tracing::debug!(error = %e, value, "choice dropped"),
                    }
                }
            }
            _ => {}
        }
        Flow::Continue
    }

    fn on_results_key(&mut self, key: KeyEvent, now: Instant) -> Flow {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Enter => {
                self.trainer.acknowledge_finish();
                self.state = AppState::Setup;
            }
            KeyCode::Char('n') => self.start(now, false),
            KeyCode::Char('r') => self.start(now, true),
            KeyCode::Char('m') => self.open(AppState::Mistakes),
            KeyCode::Char('p') => self.open(AppState::TableStats),
            _ => {}
        }
        Flow::Continue
    }

    fn on_mistakes_key(&mut self, key: KeyEvent) -> Flow {
        match key.code {
            KeyCode::Esc => return Flow::Quit,
            KeyCode::Char('b') | KeyCode::Backspace => self.state = self.return_to,
            KeyCode::Up => {
                self.mistakes_state.scroll_offset = self.mistakes_state.scroll_offset.saturating_sub(1);
            }
            KeyCode::Down => {
                // clamped against the visible rows while rendering
                self.mistakes_state.scroll_offset += 1;
            }
            KeyCode::Home => self.mistakes_state.scroll_offset = 0,
            KeyCode::Char('e') => self.export(),
            _ => {}
        }
        Flow::Continue
    }

    fn on_table_stats_key(&mut self, key: KeyEvent) -> Flow {
        match key.code {
            KeyCode::Esc => return Flow::Quit,
            KeyCode::Char('b') | KeyCode::Backspace => self.state = self.return_to,
            _ => {}
        }
        Flow::Continue
    }

    fn start(&mut self, now: Instant, retry: bool) {
        // leaving a finished run behind keeps its stats and mistakes
        self.trainer.acknowledge_finish();
        let started = if retry {
            self.trainer.start_retry(now)
        } else {
            self.trainer.start_quiz(now)
        };
        match started {
            Ok(()) => {
                self.state = AppState::Quiz;
                self.input.clear();
                self.choices = None;
                self.notice = None;
            }
            Err(e) if e.is_configuration() => {
                self.state = AppState::Setup;
                self.notice = Some(e.to_string());
            }
            Err(e) => {
                tracing::warn!(error = %e, retry, "quiz did not start");
                self.state = AppState::Setup;
            }
        }
    }

    fn open(&mut self, screen: AppState) {
        if matches!(self.state, AppState::Setup | AppState::Results) {
            self.return_to = self.state;
        }
        self.mistakes_state = MistakesState::default();
        self.notice = None;
        self.state = screen;
    }

    fn export(&mut self) {
        let mistakes = self.trainer.mistakes();
        self.notice = Some(match export_mistakes_csv(mistakes, &self.export_path) {
            Ok(()) => format!("Saved {} mistakes to {}", mistakes.len(), self.export_path.display()),
            Err(e) => format!("Export failed: {e}"),
        });
    }

    /// Follow the engine: show results once it finishes, keep choices per question
    fn sync_with_session(&mut self) {
        if self.state == AppState::Quiz && self.trainer.mode() == Mode::Finished {
            self.state = AppState::Results;
            self.input.clear();
        }

        let awaiting = self.trainer.session().state().is_awaiting_answer();
        if self.state != AppState::Quiz || self.trainer.config().keyboard_mode || !awaiting {
            return;
        }
        let Some(index) = self.trainer.progress().map(|p| p.index) else {
            return;
        };
        let stale = !matches!(&self.choices, Some((i, _)) if *i == index);
        if stale {
            self.choices = self.trainer.choices().map(|options| (index, options));
        }
    }
}

fn init_logging(path: Option<&Path>) -> anyhow::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("times_drill=info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());
    let trainer = Trainer::new(config).context("invalid settings")?;
    tracing::info!(config = ?trainer.config(), "starting");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(trainer, AppDirs::export_path());
    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result?;

    if !cli.no_save {
        if let Err(e) = store.save(app.trainer.config()) {
            tracing::warn!(error = %e, path = %store.path().display(), "could not save settings");
        }
    }

    if let Some(path) = &cli.export_mistakes {
        export_mistakes_csv(app.trainer.mistakes(), path)
            .with_context(|| format!("cannot export mistakes to {}", path.display()))?;
        println!(
            "Saved {} mistakes to {}",
            app.trainer.mistakes().len(),
            path.display()
        );
    }

    Ok(())
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> anyhow::Result<()> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    terminal.draw(|f| ui::draw(app, f))?;
    loop {
        match runner.step() {
            DrillEvent::Tick(now) => app.on_tick(now),
            DrillEvent::Resize => {}
            DrillEvent::Key(key) => {
                if app.on_key(key, Instant::now()) == Flow::Quit {
                    break;
                }
            }
        }
        terminal.draw(|f| ui::draw(app, f))?;
    }

    Ok(())
}
