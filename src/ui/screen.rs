use ratatui::Frame;

use crate::{
    ui::{mistakes::render_mistakes, table_stats::render_table_stats},
    App, AppState,
};

/// A UI Screen boundary: responsible for rendering one app state
pub trait Screen {
    fn render(&self, app: &mut App, f: &mut Frame);
}

/// Table selection and options, drawn by the App widget
pub struct SetupScreen;

impl Screen for SetupScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        f.render_widget(&*app, f.area());
    }
}

pub struct QuizScreen;

impl Screen for QuizScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        f.render_widget(&*app, f.area());
    }
}

pub struct ResultsScreen;

impl Screen for ResultsScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        f.render_widget(&*app, f.area());
    }
}

/// Mistake log review; clamps the scroll offset while drawing
pub struct MistakesScreen;

impl Screen for MistakesScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        render_mistakes(app, f);
    }
}

pub struct TableStatsScreen;

impl Screen for TableStatsScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        render_table_stats(app, f);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: AppState) -> Box<dyn Screen> {
    match state {
        AppState::Setup => Box::new(SetupScreen),
        AppState::Quiz => Box::new(QuizScreen),
        AppState::Results => Box::new(ResultsScreen),
        AppState::Mistakes => Box::new(MistakesScreen),
        AppState::TableStats => Box::new(TableStatsScreen),
    }
}
