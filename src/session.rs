use crate::fact::{Fact, Question, QuestionSet};
use crate::util::percent;
use serde::Serialize;
use std::time::{Duration, Instant};

/// Timing settings for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionConfig {
    /// Per-question time limit, `None` for untimed runs
    pub timer: Option<Duration>,
    /// How long feedback stays up before the next question, zero to skip
    pub feedback_pause: Duration,
}

impl SessionConfig {
    pub fn untimed() -> Self {
        Self::default()
    }

    pub fn timed(secs: u64) -> Self {
        Self {
            timer: Some(Duration::from_secs(secs)),
            feedback_pause: Duration::ZERO,
        }
    }

    pub fn with_feedback_pause(mut self, pause: Duration) -> Self {
        self.feedback_pause = pause;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    #[default]
    Idle,
    Running,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum FeedbackKind {
    Bravo,
    Oops,
    TooSlow,
}

/// What the learner sees after answering (or failing to answer) a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub fact: Fact,
    pub correct_answer: u32,
    pub user_answer: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Badge {
    Mastered,
    Almost,
    KeepPracticing,
}

impl Badge {
    pub fn for_percent(percent: u32) -> Self {
        match percent {
            100.. => Badge::Mastered,
            85..=99 => Badge::Almost,
            _ => Badge::KeepPracticing,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Badge::Mastered => "Mastered!",
            Badge::Almost => "Almost perfect!",
            Badge::KeepPracticing => "Keep practicing!",
        }
    }
}

/// Final result of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub correct: usize,
    pub percent: u32,
    pub badge: Badge,
}

impl Summary {
    pub fn new(correct: usize, total: usize) -> Self {
        let percent = percent(correct, total);
        Self {
            total,
            correct,
            percent,
            badge: Badge::for_percent(percent),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// Zero-based index of the current question
    pub index: usize,
    pub total: usize,
    pub score_so_far: usize,
}

/// Everything the quiz state machine mutates during a run
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub mode: Mode,
    pub retry_mode: bool,
    pub questions: QuestionSet,
    pub cursor: usize,
    pub score_correct: usize,
    pub config: SessionConfig,
    /// Armed only while a question is waiting for an answer on a timed run
    pub deadline: Option<Instant>,
    /// Set while feedback is on screen between two questions
    pub resume_at: Option<Instant>,
    pub last_feedback: Option<Feedback>,
    pub summary: Option<Summary>,
}

impl SessionState {
    pub fn current_question(&self) -> Option<&Question> {
        match self.mode {
            Mode::Running => self.questions.get(self.cursor),
            _ => None,
        }
    }

    pub fn is_awaiting_answer(&self) -> bool {
        self.mode == Mode::Running && self.resume_at.is_none()
    }

    pub fn progress(&self) -> Progress {
        Progress {
            index: self.cursor,
            total: self.questions.len(),
            score_so_far: self.score_correct,
        }
    }
}
