use crate::{
    error::ConfigError,
    fact::{Fact, Question, QuestionSet, MAX_OPERAND},
    mistakes::{ErrorLog, MistakeRecord},
};
use itertools::Itertools;
use rand::{seq::SliceRandom, Rng};
use std::collections::BTreeSet;

/// Builds shuffled question sets from a table selection or the mistake backlog
pub struct QuestionPool;

impl QuestionPool {
    /// Every fact `a × b` for `a` in `tables` and `b` in `1..=12`, shuffled.
    pub fn from_tables(tables: &BTreeSet<u8>) -> Result<QuestionSet, ConfigError> {
        Self::from_tables_with_rng(tables, &mut rand::thread_rng())
    }

    pub fn from_tables_with_rng<R: Rng + ?Sized>(
        tables: &BTreeSet<u8>,
        rng: &mut R,
    ) -> Result<QuestionSet, ConfigError> {
        validate_tables(tables)?;

        let mut questions: Vec<Question> = tables
            .iter()
            .cartesian_product(1..=MAX_OPERAND)
            .map(|(&a, b)| Question::from_fact(Fact::new(a, b)))
            .collect();
        questions.shuffle(rng);

        Ok(QuestionSet::new(questions))
    }

    /// Unresolved mistakes, or the whole history when everything is resolved.
    pub fn from_mistakes(log: &ErrorLog) -> Result<QuestionSet, ConfigError> {
        Self::from_mistakes_with_rng(log, &mut rand::thread_rng())
    }

    pub fn from_mistakes_with_rng<R: Rng + ?Sized>(
        log: &ErrorLog,
        rng: &mut R,
    ) -> Result<QuestionSet, ConfigError> {
        if log.is_empty() {
            return Err(ConfigError::NoMistakes);
        }

        let mut pool: Vec<&MistakeRecord> = log.unresolved().collect();
        if pool.is_empty() {
            pool = log.all().iter().collect();
        }

        let mut questions: Vec<Question> = pool
            .into_iter()
            .map(|r| Question::new(r.fact, r.correct_answer))
            .collect();
        questions.shuffle(rng);

        Ok(QuestionSet::new(questions))
    }
}

pub fn validate_tables(tables: &BTreeSet<u8>) -> Result<(), ConfigError> {
    if tables.is_empty() {
        return Err(ConfigError::NoTablesSelected);
    }
    match tables.iter().find(|&&t| t > MAX_OPERAND) {
        Some(&t) => Err(ConfigError::TableOutOfRange(t)),
        None => Ok(()),
    }
}
