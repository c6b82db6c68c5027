use crate::error::{ConfigError, TrainerError};
use crate::fact::{Question, QuestionSet};
use crate::mistakes::{ErrorLog, Outcome};
use crate::session::{
    Feedback, FeedbackKind, Mode, Progress, SessionConfig, SessionState, Summary,
};
use crate::stats::StatsTracker;
use std::time::{Duration, Instant};

/// What a clock tick did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing to time: idle, finished, or an untimed question
    Ignored,
    /// The deadline (or the feedback pause) has not been reached yet
    Waiting,
    /// The current question expired and was logged as a timeout
    TimedOut,
    /// The feedback pause ended and the next question is now live
    Resumed,
}

/// The quiz state machine: one run at a time, driven entirely by the caller.
///
/// Time never advances on its own here. Every time-dependent call takes the
/// caller's `now`, and a timeout only happens when [`QuizSession::tick`] is
/// handed a moment at or past the deadline.
#[derive(Debug, Default)]
pub struct QuizSession {
    state: SessionState,
    stats: StatsTracker,
    mistakes: ErrorLog,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins a run over `questions`. A run still in progress is discarded.
    pub fn start(
        &mut self,
        questions: QuestionSet,
        retry_mode: bool,
        config: SessionConfig,
        now: Instant,
    ) -> Result<(), ConfigError> {
        if questions.is_empty() {
            return Err(ConfigError::EmptyQuestionSet);
        }
        if self.state.mode == Mode::Running {
            tracing::debug!(
                cursor = self.state.cursor,
                total = self.state.questions.len(),
                "discarding in-progress run"
            );
        }

        tracing::info!(
            total = questions.len(),
            retry_mode,
            timer_secs = config.timer.map(|t| t.as_secs()),
            "quiz started"
        );

        self.state = SessionState {
            mode: Mode::Running,
            retry_mode,
            questions,
            cursor: 0,
            score_correct: 0,
            config,
            deadline: config.timer.map(|t| now + t),
            resume_at: None,
            last_feedback: None,
            summary: None,
        };
        Ok(())
    }

    pub fn submit_answer(&mut self, value: u32, now: Instant) -> Result<Feedback, TrainerError> {
        if self.state.mode != Mode::Running {
            return Err(TrainerError::NotAwaitingAnswer);
        }
        self.resume_if_due(now);
        let question = match self.awaiting_question() {
            Some(q) => q,
            None => return Err(TrainerError::NotAwaitingAnswer),
        };

        let fact = question.fact();
        let correct = question.is_correct(value);
        self.stats.record(fact.table(), correct);

        let kind = if correct {
            self.state.score_correct += 1;
            if self.state.retry_mode {
                self.mistakes.resolve(fact);
            }
            FeedbackKind::Bravo
        } else {
            self.mistakes
                .append(fact, question.answer(), Some(value), Outcome::Wrong);
            FeedbackKind::Oops
        };
        tracing::debug!(%fact, value, correct, "answer submitted");

        let feedback = Feedback {
            kind,
            fact,
            correct_answer: question.answer(),
            user_answer: Some(value),
        };
        self.state.last_feedback = Some(feedback);
        self.advance(now);
        Ok(feedback)
    }

    /// Feeds the external clock into the session.
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        if self.state.mode != Mode::Running {
            return TickOutcome::Ignored;
        }
        if self.state.resume_at.is_some() {
            return if self.resume_if_due(now) {
                TickOutcome::Resumed
            } else {
                TickOutcome::Waiting
            };
        }

        match self.state.deadline {
            None => TickOutcome::Ignored,
            Some(deadline) if now < deadline => TickOutcome::Waiting,
            Some(_) => {
                self.time_out(now);
                TickOutcome::TimedOut
            }
        }
    }

    /// Leaves the finished screen. Stats and mistakes are kept.
    pub fn acknowledge_finish(&mut self) -> bool {
        if self.state.mode != Mode::Finished {
            return false;
        }
        self.state = SessionState::default();
        true
    }

    /// Drops a run in progress without a summary. Stats and mistakes are kept.
    pub fn abandon(&mut self) -> bool {
        if self.state.mode != Mode::Running {
            return false;
        }
        tracing::info!(cursor = self.state.cursor, "quiz abandoned");
        self.state = SessionState::default();
        true
    }

    /// Full restart: back to idle with empty stats and an empty mistake log.
    pub fn reset(&mut self) {
        tracing::info!("session reset");
        self.state = SessionState::default();
        self.stats.reset();
        self.mistakes.clear();
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn stats(&self) -> &StatsTracker {
        &self.stats
    }

    pub fn mistakes(&self) -> &ErrorLog {
        &self.mistakes
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.state.current_question()
    }

    pub fn progress(&self) -> Option<Progress> {
        match self.state.mode {
            Mode::Idle => None,
            _ => Some(self.state.progress()),
        }
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.state
            .deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.state.last_feedback.as_ref()
    }

    pub fn summary(&self) -> Option<&Summary> {
        match self.state.mode {
            Mode::Finished => self.state.summary.as_ref(),
            _ => None,
        }
    }

    fn awaiting_question(&self) -> Option<Question> {
        if self.state.is_awaiting_answer() {
            self.state.current_question().copied()
        } else {
            None
        }
    }

    fn time_out(&mut self, now: Instant) {
        let Some(question) = self.awaiting_question() else {
            return;
        };
        let fact = question.fact();
        tracing::debug!(%fact, "question timed out");

        self.stats.record(fact.table(), false);
        self.mistakes
            .append(fact, question.answer(), None, Outcome::Timeout);
        self.state.last_feedback = Some(Feedback {
            kind: FeedbackKind::TooSlow,
            fact,
            correct_answer: question.answer(),
            user_answer: None,
        });
        self.advance(now);
    }

    fn advance(&mut self, now: Instant) {
        let state = &mut self.state;
        state.cursor += 1;
        state.deadline = None;

        if state.cursor >= state.questions.len() {
            state.cursor = state.questions.len();
            let summary = Summary::new(state.score_correct, state.questions.len());
            tracing::info!(
                correct = summary.correct,
                total = summary.total,
                percent = summary.percent,
                badge = %summary.badge,
                "quiz finished"
            );
            state.summary = Some(summary);
            state.mode = Mode::Finished;
        } else if state.config.feedback_pause.is_zero() {
            state.deadline = state.config.timer.map(|t| now + t);
        } else {
            state.resume_at = Some(now + state.config.feedback_pause);
        }

        debug_assert!(state.score_correct <= state.cursor);
        debug_assert!(state.cursor <= state.questions.len());
    }

    fn resume_if_due(&mut self, now: Instant) -> bool {
        match self.state.resume_at {
            Some(at) if now >= at => {
                self.state.resume_at = None;
                self.state.deadline = self.state.config.timer.map(|t| now + t);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fact::Fact;

    fn set(facts: &[(u8, u8)]) -> QuestionSet {
        facts
            .iter()
            .map(|&(a, b)| Question::from_fact(Fact::new(a, b)))
            .collect::<Vec<_>>()
            .into()
    }

    fn answer_current(quiz: &mut QuizSession, now: Instant) -> Feedback {
        let answer = quiz.current_question().unwrap().answer();
        quiz.submit_answer(answer, now).unwrap()
    }

    #[test]
    fn new_session_is_idle() {
        let quiz = QuizSession::new();
        assert_eq!(quiz.mode(), Mode::Idle);
        assert!(quiz.current_question().is_none());
        assert!(quiz.progress().is_none());
        assert!(quiz.summary().is_none());
        assert!(quiz.feedback().is_none());
    }

    #[test]
    fn start_rejects_empty_set() {
        let mut quiz = QuizSession::new();
        let err = quiz
            .start(QuestionSet::default(), false, SessionConfig::untimed(), Instant::now())
            .unwrap_err();
        assert_eq!(err, ConfigError::EmptyQuestionSet);
        assert_eq!(quiz.mode(), Mode::Idle);
    }

    #[test]
    fn start_arms_deadline_only_when_timed() {
        let now = Instant::now();
        let mut quiz = QuizSession::new();
        quiz.start(set(&[(2, 3)]), false, SessionConfig::untimed(), now)
            .unwrap();
        assert_eq!(quiz.state().deadline, None);

        quiz.start(set(&[(2, 3)]), false, SessionConfig::timed(5), now)
            .unwrap();
        assert_eq!(quiz.state().deadline, Some(now + Duration::from_secs(5)));
        assert_eq!(quiz.remaining(now), Some(Duration::from_secs(5)));
    }

    #[test]
    fn correct_answer_scores_and_advances() {
        let now = Instant::now();
        let mut quiz = QuizSession::new();
        quiz.start(set(&[(2, 5), (3, 7)]), false, SessionConfig::untimed(), now)
            .unwrap();

        let feedback = quiz.submit_answer(10, now).unwrap();
        assert_eq!(feedback.kind, FeedbackKind::Bravo);
        assert_eq!(feedback.correct_answer, 10);
        assert_eq!(quiz.state().score_correct, 1);
        assert_eq!(quiz.state().cursor, 1);
        assert_eq!(quiz.stats().get(2).unwrap().correct, 1);
        assert!(quiz.mistakes().is_empty());
    }

    #[test]
    fn wrong_answer_logs_mistake() {
        let now = Instant::now();
        let mut quiz = QuizSession::new();
        quiz.start(set(&[(3, 7), (2, 2)]), false, SessionConfig::untimed(), now)
            .unwrap();

        let feedback = quiz.submit_answer(20, now).unwrap();
        assert_eq!(feedback.kind, FeedbackKind::Oops);
        assert_eq!(quiz.state().score_correct, 0);
        assert_eq!(quiz.state().cursor, 1);

        let record = &quiz.mistakes().all()[0];
        assert_eq!(record.fact, Fact::new(3, 7));
        assert_eq!(record.correct_answer, 21);
        assert_eq!(record.user_answer, Some(20));
        assert_eq!(record.outcome, Outcome::Wrong);
        assert!(!record.resolved);

        let three = quiz.stats().get(3).unwrap();
        assert_eq!((three.attempts, three.correct), (1, 0));
    }

    #[test]
    fn finishing_computes_summary_and_clears_deadline() {
        let now = Instant::now();
        let mut quiz = QuizSession::new();
        quiz.start(set(&[(1, 1), (1, 2)]), false, SessionConfig::timed(5), now)
            .unwrap();
        answer_current(&mut quiz, now);
        answer_current(&mut quiz, now);

        assert_eq!(quiz.mode(), Mode::Finished);
        assert_eq!(quiz.state().deadline, None);
        assert!(quiz.current_question().is_none());
        let summary = quiz.summary().unwrap();
        assert_eq!((summary.correct, summary.total, summary.percent), (2, 2, 100));
        assert_eq!(summary.badge, crate::session::Badge::Mastered);

        assert_eq!(
            quiz.submit_answer(1, now),
            Err(TrainerError::NotAwaitingAnswer)
        );
    }

    #[test]
    fn tick_before_deadline_changes_nothing() {
        let now = Instant::now();
        let mut quiz = QuizSession::new();
        quiz.start(set(&[(4, 4), (4, 5)]), false, SessionConfig::timed(5), now)
            .unwrap();

        let outcome = quiz.tick(now + Duration::from_millis(4_999));
        assert_eq!(outcome, TickOutcome::Waiting);
        assert_eq!(quiz.state().cursor, 0);
        assert!(quiz.mistakes().is_empty());
        assert_eq!(quiz.stats().total_attempts(), 0);
    }

    #[test]
    fn tick_at_deadline_times_out_once() {
        let now = Instant::now();
        let mut quiz = QuizSession::new();
        quiz.start(set(&[(4, 4), (4, 5)]), false, SessionConfig::timed(5), now)
            .unwrap();
        let first = *quiz.current_question().unwrap();

        let expiry = now + Duration::from_secs(5);
        assert_eq!(quiz.tick(expiry), TickOutcome::TimedOut);
        assert_eq!(quiz.state().cursor, 1);
        assert_eq!(quiz.state().deadline, Some(expiry + Duration::from_secs(5)));

        let record = &quiz.mistakes().all()[0];
        assert_eq!(record.fact, first.fact());
        assert_eq!(record.user_answer, None);
        assert_eq!(record.outcome, Outcome::Timeout);
        assert_eq!(quiz.feedback().unwrap().kind, FeedbackKind::TooSlow);

        // the re-armed deadline is not yet due
        assert_eq!(quiz.tick(expiry), TickOutcome::Waiting);
        assert_eq!(quiz.state().cursor, 1);
    }

    #[test]
    fn tick_is_ignored_when_untimed_or_idle() {
        let now = Instant::now();
        let mut quiz = QuizSession::new();
        assert_eq!(quiz.tick(now), TickOutcome::Ignored);

        quiz.start(set(&[(4, 4)]), false, SessionConfig::untimed(), now)
            .unwrap();
        assert_eq!(
            quiz.tick(now + Duration::from_secs(3600)),
            TickOutcome::Ignored
        );
        assert_eq!(quiz.state().cursor, 0);
    }

    #[test]
    fn feedback_pause_blocks_answers_and_rearms_on_resume() {
        let now = Instant::now();
        let pause = Duration::from_secs(1);
        let mut quiz = QuizSession::new();
        quiz.start(
            set(&[(2, 2), (2, 3)]),
            false,
            SessionConfig::timed(5).with_feedback_pause(pause),
            now,
        )
        .unwrap();

        answer_current(&mut quiz, now);
        assert_eq!(quiz.state().deadline, None);
        assert!(!quiz.state().is_awaiting_answer());
        assert_eq!(
            quiz.submit_answer(6, now + Duration::from_millis(500)),
            Err(TrainerError::NotAwaitingAnswer)
        );
        assert_eq!(quiz.tick(now + Duration::from_millis(500)), TickOutcome::Waiting);

        let resumed_at = now + pause;
        assert_eq!(quiz.tick(resumed_at), TickOutcome::Resumed);
        assert_eq!(quiz.state().deadline, Some(resumed_at + Duration::from_secs(5)));
        assert!(quiz.state().is_awaiting_answer());
    }

    #[test]
    fn answer_after_pause_resumes_implicitly() {
        let now = Instant::now();
        let mut quiz = QuizSession::new();
        quiz.start(
            set(&[(2, 2), (2, 3)]),
            false,
            SessionConfig::untimed().with_feedback_pause(Duration::from_secs(1)),
            now,
        )
        .unwrap();
        answer_current(&mut quiz, now);

        let later = now + Duration::from_secs(2);
        let answer = quiz.current_question().unwrap().answer();
        assert!(quiz.submit_answer(answer, later).is_ok());
        assert_eq!(quiz.mode(), Mode::Finished);
    }

    #[test]
    fn retry_mode_resolves_matching_mistake() {
        let now = Instant::now();
        let mut quiz = QuizSession::new();
        quiz.start(set(&[(3, 7)]), false, SessionConfig::untimed(), now)
            .unwrap();
        quiz.submit_answer(20, now).unwrap();
        quiz.acknowledge_finish();

        // correct outside retry mode leaves the record alone
        quiz.start(set(&[(3, 7)]), false, SessionConfig::untimed(), now)
            .unwrap();
        quiz.submit_answer(21, now).unwrap();
        assert!(!quiz.mistakes().all()[0].resolved);
        quiz.acknowledge_finish();

        quiz.start(set(&[(3, 7)]), true, SessionConfig::untimed(), now)
            .unwrap();
        quiz.submit_answer(21, now).unwrap();
        assert!(quiz.mistakes().all()[0].resolved);
    }

    #[test]
    fn restart_while_running_discards_progress() {
        let now = Instant::now();
        let mut quiz = QuizSession::new();
        quiz.start(set(&[(5, 5), (5, 6)]), false, SessionConfig::untimed(), now)
            .unwrap();
        answer_current(&mut quiz, now);

        quiz.start(set(&[(6, 6)]), false, SessionConfig::untimed(), now)
            .unwrap();
        assert_eq!(quiz.state().cursor, 0);
        assert_eq!(quiz.state().score_correct, 0);
        assert!(quiz.feedback().is_none());
        assert_eq!(quiz.progress().unwrap().total, 1);
        // stats from the discarded run remain
        assert_eq!(quiz.stats().get(5).unwrap().attempts, 1);
    }

    #[test]
    fn acknowledge_keeps_history_reset_wipes_it() {
        let now = Instant::now();
        let mut quiz = QuizSession::new();
        quiz.start(set(&[(9, 9)]), false, SessionConfig::untimed(), now)
            .unwrap();
        assert!(!quiz.acknowledge_finish());
        quiz.submit_answer(80, now).unwrap();

        assert!(quiz.acknowledge_finish());
        assert_eq!(quiz.mode(), Mode::Idle);
        assert_eq!(quiz.mistakes().len(), 1);
        assert_eq!(quiz.stats().total_attempts(), 1);

        quiz.reset();
        assert_eq!(quiz.mode(), Mode::Idle);
        assert!(quiz.mistakes().is_empty());
        assert_eq!(quiz.stats().total_attempts(), 0);
    }

    #[test]
    fn abandon_only_applies_to_running_sessions() {
        let now = Instant::now();
        let mut quiz = QuizSession::new();
        assert!(!quiz.abandon());
        quiz.start(set(&[(1, 1), (1, 2)]), false, SessionConfig::timed(3), now)
            .unwrap();
        assert!(quiz.abandon());
        assert_eq!(quiz.mode(), Mode::Idle);
        assert_eq!(quiz.state().deadline, None);
    }
}
