use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use assert_matches::assert_matches;
use rand::{rngs::StdRng, Rng, SeedableRng};
use times_drill::{
    Badge, Config, ConfigError, Fact, FeedbackKind, Mode, Outcome, Question, QuestionSet,
    QuizSession, SessionConfig, TickOutcome, Trainer, TrainerError,
};

/// End-to-end quiz flows through the public engine API

fn untimed(tables: &[u8]) -> Config {
    Config {
        tables: tables.iter().copied().collect(),
        keyboard_mode: true,
        timer_enabled: false,
        timer_seconds: 8,
        feedback_pause_ms: 0,
    }
}

fn set_of(facts: &[(u8, u8)]) -> QuestionSet {
    facts
        .iter()
        .map(|&(a, b)| Question::from_fact(Fact::new(a, b)))
        .collect::<Vec<_>>()
        .into()
}

#[test]
fn two_tables_with_one_miss_scores_almost_perfect() {
    let now = Instant::now();
    let mut trainer = Trainer::new(untimed(&[2, 3])).unwrap();
    trainer.start_quiz(now).unwrap();
    assert_eq!(trainer.progress().unwrap().total, 24);

    let mut seen = BTreeSet::new();
    let mut first = true;
    while trainer.mode() == Mode::Running {
        let fact = trainer.current_question().unwrap();
        assert!(fact.a == 2 || fact.a == 3);
        assert!(seen.insert(fact), "{fact} asked twice");
        let value = if first { fact.product() + 1 } else { fact.product() };
        first = false;
        trainer.submit_answer(value, now).unwrap();
    }

    let summary = trainer.summary().unwrap();
    assert_eq!((summary.correct, summary.total, summary.percent), (23, 24, 96));
    assert_eq!(summary.badge, Badge::Almost);
    assert_eq!(summary.badge.label(), "Almost perfect!");

    let attempts: u64 = trainer.table_stats().iter().map(|s| s.attempts).sum();
    assert_eq!(attempts, 24);
    assert_eq!(trainer.mistakes().len(), 1);
}

#[test]
fn wrong_answer_is_logged_with_full_record() {
    let now = Instant::now();
    let mut session = QuizSession::new();
    session
        .start(set_of(&[(3, 7), (4, 4)]), false, SessionConfig::untimed(), now)
        .unwrap();

    let feedback = session.submit_answer(20, now).unwrap();
    assert_eq!(feedback.kind, FeedbackKind::Oops);
    assert_eq!(feedback.correct_answer, 21);

    let record = &session.mistakes().all()[0];
    assert_eq!((record.a(), record.b()), (3, 7));
    assert_eq!(record.correct_answer, 21);
    assert_eq!(record.user_answer, Some(20));
    assert_eq!(record.outcome, Outcome::Wrong);
    assert!(!record.resolved);

    let three = session.stats().get(3).unwrap();
    assert_eq!((three.attempts, three.correct), (1, 0));
}

#[test]
fn timed_question_expires_only_on_tick() {
    let start = Instant::now();
    let mut session = QuizSession::new();
    session
        .start(set_of(&[(5, 5), (6, 6)]), false, SessionConfig::timed(5), start)
        .unwrap();

    assert_eq!(session.tick(start + Duration::from_secs(4)), TickOutcome::Waiting);
    assert_eq!(session.progress().unwrap().index, 0);

    assert_eq!(session.tick(start + Duration::from_secs(5)), TickOutcome::TimedOut);
    let progress = session.progress().unwrap();
    assert_eq!((progress.index, progress.score_so_far), (1, 0));

    let record = &session.mistakes().all()[0];
    assert_eq!(record.fact, Fact::new(5, 5));
    assert_eq!(record.user_answer, None);
    assert_eq!(record.outcome, Outcome::Timeout);
    assert_eq!(session.feedback().unwrap().kind, FeedbackKind::TooSlow);

    // the next question gets a fresh five seconds from the timeout
    let later = start + Duration::from_secs(5);
    assert_eq!(session.remaining(later), Some(Duration::from_secs(5)));
    assert_eq!(session.tick(later + Duration::from_secs(5)), TickOutcome::TimedOut);
    assert_eq!(session.mode(), Mode::Finished);
    assert_eq!(session.summary().unwrap().badge, Badge::KeepPracticing);
}

#[test]
fn feedback_pause_holds_the_next_question() {
    let start = Instant::now();
    let config = SessionConfig::timed(5).with_feedback_pause(Duration::from_secs(1));
    let mut session = QuizSession::new();
    session
        .start(set_of(&[(2, 2), (2, 3)]), false, config, start)
        .unwrap();

    session.submit_answer(4, start).unwrap();
    assert!(!session.state().is_awaiting_answer());
    assert_eq!(session.remaining(start), None);
    assert_matches!(
        session.submit_answer(6, start + Duration::from_millis(500)),
        Err(TrainerError::NotAwaitingAnswer)
    );

    let resumed_at = start + Duration::from_secs(1);
    assert_eq!(session.tick(resumed_at), TickOutcome::Resumed);
    assert_eq!(session.remaining(resumed_at), Some(Duration::from_secs(5)));
    session.submit_answer(6, resumed_at).unwrap();
    assert_eq!(session.summary().unwrap().percent, 100);
}

#[test]
fn retry_round_resolves_fixed_mistakes() {
    let now = Instant::now();
    let mut trainer = Trainer::new(untimed(&[7])).unwrap();
    trainer.start_quiz(now).unwrap();

    let mut missed = BTreeSet::new();
    let mut n = 0;
    while trainer.mode() == Mode::Running {
        let fact = trainer.current_question().unwrap();
        let value = if n % 4 == 0 {
            missed.insert(fact);
            fact.product() + 2
        } else {
            fact.product()
        };
        n += 1;
        trainer.submit_answer(value, now).unwrap();
    }
    assert_eq!(trainer.mistakes().len(), missed.len());
    assert!(trainer.acknowledge_finish());

    trainer.start_retry(now).unwrap();
    assert!(trainer.session().state().retry_mode);
    assert_eq!(trainer.progress().unwrap().total, missed.len());

    while trainer.mode() == Mode::Running {
        let fact = trainer.current_question().unwrap();
        assert!(missed.contains(&fact));
        trainer.submit_answer(fact.product(), now).unwrap();
    }
    assert!(trainer.mistakes().iter().all(|r| r.resolved));
    assert_eq!(trainer.session().mistakes().unresolved_count(), 0);

    // nothing left unresolved: the full log is asked again
    trainer.acknowledge_finish();
    trainer.start_retry(now).unwrap();
    assert_eq!(trainer.progress().unwrap().total, missed.len());
}

#[test]
fn reset_all_forgets_everything() {
    let now = Instant::now();
    let mut trainer = Trainer::new(untimed(&[1])).unwrap();
    trainer.start_quiz(now).unwrap();
    let fact = trainer.current_question().unwrap();
    trainer.submit_answer(fact.product() + 1, now).unwrap();

    trainer.reset_all();
    assert_eq!(trainer.mode(), Mode::Idle);
    assert!(trainer.mistakes().is_empty());
    assert!(trainer.table_stats().iter().all(|s| s.attempts == 0));
    assert_eq!(
        trainer.start_retry(now),
        Err(TrainerError::Configuration(ConfigError::NoMistakes))
    );
}

#[test]
fn random_answers_and_ticks_keep_counters_consistent() {
    let mut rng = StdRng::seed_from_u64(7);
    let start = Instant::now();

    for round in 0..20 {
        let mut now = start;
        let mut session = QuizSession::new();
        let pause = Duration::from_millis(rng.gen_range(0..3) * 400);
        let config = SessionConfig::timed(rng.gen_range(2..6)).with_feedback_pause(pause);
        let tables: BTreeSet<u8> = (0..rng.gen_range(1..4)).map(|_| rng.gen_range(0..=12)).collect();
        let questions = times_drill::QuestionPool::from_tables(&tables).unwrap();
        let total = questions.len();
        session.start(questions, false, config, now).unwrap();

        for _ in 0..400 {
            now += Duration::from_millis(rng.gen_range(0..2500));
            if rng.gen_bool(0.5) {
                let _ = session.submit_answer(rng.gen_range(0..150), now);
            } else {
                session.tick(now);
            }

            let state = session.state();
            assert!(state.score_correct <= state.cursor, "round {round}");
            assert!(state.cursor <= state.questions.len(), "round {round}");
            if state.mode == Mode::Finished {
                assert_eq!(state.cursor, total);
                break;
            }
        }

        let attempts = session.stats().total_attempts() as usize;
        let score = session.state().score_correct;
        assert_eq!(attempts, session.state().cursor);
        assert_eq!(session.mistakes().len(), attempts - score);
    }
}
