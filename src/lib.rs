// Library surface for the drill engine, shared by the TUI binary and the
// headless integration tests. Terminal rendering stays in the binary.
pub mod app_dirs;
pub mod choices;
pub mod config;
pub mod error;
pub mod export;
pub mod fact;
pub mod mistakes;
pub mod question_pool;
pub mod quiz;
pub mod runtime;
pub mod session;
pub mod stats;
pub mod trainer;
pub mod util;

pub use config::Config;
pub use error::{ConfigError, TrainerError};
pub use fact::{Fact, Question, QuestionSet};
pub use mistakes::{ErrorLog, MistakeRecord, Outcome};
pub use question_pool::QuestionPool;
pub use quiz::{QuizSession, TickOutcome};
pub use session::{Badge, Feedback, FeedbackKind, Mode, Progress, SessionConfig, Summary};
pub use stats::{StatsTracker, TableStat};
pub use trainer::Trainer;
