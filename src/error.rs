//! Error types for the drill engine.
//!
//! Wrong answers and timeouts are not errors: they are ordinary outcomes
//! recorded in the stats and the mistake log. Everything here is a rejected
//! action that leaves the session untouched.

use thiserror::Error;

/// A configuration problem that blocks starting (or reconfiguring) a quiz.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Quiz start was requested with an empty table selection.
    #[error("please select at least one table")]
    NoTablesSelected,

    /// A selected table lies outside `0..=12`.
    #[error("table {0} is outside 0..=12")]
    TableOutOfRange(u8),

    /// Retry was requested but the mistake log is empty.
    #[error("no mistakes recorded yet")]
    NoMistakes,

    /// `start` was handed an empty question set.
    #[error("question set is empty")]
    EmptyQuestionSet,

    /// Per-question timer outside the supported range.
    #[error("timer must be between {min} and {max} seconds, got {0}", min = crate::config::MIN_TIMER_SECS, max = crate::config::MAX_TIMER_SECS)]
    TimerOutOfRange(u32),
}

/// Errors surfaced by the trainer to the presentation shell.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrainerError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// The typed answer was not a non-negative number of at most five digits.
    #[error("invalid answer: {0:?}")]
    InvalidInput(String),

    /// An answer arrived while no question was waiting for one.
    #[error("no question is awaiting an answer")]
    NotAwaitingAnswer,
}

impl TrainerError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, TrainerError::Configuration(_))
    }
}
