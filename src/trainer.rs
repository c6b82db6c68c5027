//! The engine boundary the presentation shell talks to.
//!
//! [`Trainer`] pairs the learner's [`Config`] with a [`QuizSession`] and
//! exposes inbound actions (configure, start, answer, tick, reset) and
//! read-only projections of the current state.

use crate::choices;
use crate::config::Config;
use crate::error::{ConfigError, TrainerError};
use crate::fact::Fact;
use crate::mistakes::MistakeRecord;
use crate::question_pool::QuestionPool;
use crate::quiz::{QuizSession, TickOutcome};
use crate::session::{Feedback, Mode, Progress, Summary};
use crate::stats::TableStat;
use crate::util::ceil_secs;
use std::time::Instant;

/// Longest typed answer accepted, in digits
pub const MAX_ANSWER_DIGITS: usize = 5;

#[derive(Debug, Default)]
pub struct Trainer {
    config: Config,
    session: QuizSession,
}

impl Trainer {
    pub fn new(config: Config) -> Result<Self, TrainerError> {
        config.validate()?;
        Ok(Self {
            config,
            session: QuizSession::new(),
        })
    }

    /// Replaces the preferences used by the next start. A running quiz keeps
    /// the timing it was started with.
    pub fn configure(&mut self, config: Config) -> Result<(), TrainerError> {
        if let Err(e) = config.validate() {
            tracing::warn!(error = %e, "configuration rejected");
            return Err(e.into());
        }
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn start_quiz(&mut self, now: Instant) -> Result<(), TrainerError> {
        let questions = QuestionPool::from_tables(&self.config.tables).inspect_err(warn_rejected)?;
        self.session
            .start(questions, false, self.config.session_config(), now)?;
        Ok(())
    }

    pub fn start_retry(&mut self, now: Instant) -> Result<(), TrainerError> {
        let questions =
            QuestionPool::from_mistakes(self.session.mistakes()).inspect_err(warn_rejected)?;
        self.session
            .start(questions, true, self.config.session_config(), now)?;
        Ok(())
    }

    pub fn submit_answer(&mut self, value: u32, now: Instant) -> Result<Feedback, TrainerError> {
        self.session.submit_answer(value, now)
    }

    /// Same as [`Trainer::submit_answer`]; the value came from a choice button.
    pub fn submit_choice(&mut self, value: u32, now: Instant) -> Result<Feedback, TrainerError> {
        self.submit_answer(value, now)
    }

    /// Parses raw keyboard input before submitting it.
    ///
    /// Rejected input leaves the question in place and records nothing.
    pub fn submit_typed(&mut self, text: &str, now: Instant) -> Result<Feedback, TrainerError> {
        let value = parse_answer(text)?;
        self.submit_answer(value, now)
    }

    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        self.session.tick(now)
    }

    pub fn acknowledge_finish(&mut self) -> bool {
        self.session.acknowledge_finish()
    }

    pub fn abandon(&mut self) -> bool {
        self.session.abandon()
    }

    pub fn reset_all(&mut self) {
        self.session.reset();
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn mode(&self) -> Mode {
        self.session.mode()
    }

    /// The fact on screen. The expected answer stays inside the engine.
    pub fn current_question(&self) -> Option<Fact> {
        self.session.current_question().map(|q| q.fact())
    }

    /// Fresh multiple-choice options for the current question.
    pub fn choices(&self) -> Option<Vec<u32>> {
        self.session
            .current_question()
            .map(choices::multiple_choice)
    }

    pub fn progress(&self) -> Option<Progress> {
        self.session.progress()
    }

    pub fn remaining_seconds(&self, now: Instant) -> Option<u64> {
        self.session.remaining(now).map(ceil_secs)
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.session.feedback()
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.session.summary()
    }

    pub fn table_stats(&self) -> Vec<TableStat> {
        self.session.stats().snapshot()
    }

    pub fn mistakes(&self) -> &[MistakeRecord] {
        self.session.mistakes().all()
    }
}

fn warn_rejected(e: &ConfigError) {
    tracing::warn!(error = %e, "quiz start rejected");
}

pub fn parse_answer(text: &str) -> Result<u32, TrainerError> {
    let trimmed = text.trim();
    let valid = !trimmed.is_empty()
        && trimmed.len() <= MAX_ANSWER_DIGITS
        && trimmed.bytes().all(|b| b.is_ascii_digit());
    if !valid {
        return Err(TrainerError::InvalidInput(text.to_string()));
    }
    trimmed
        .parse()
        .map_err(|_| TrainerError::InvalidInput(text.to_string()))
}
