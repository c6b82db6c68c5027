use crate::fact::Fact;
use chrono::{DateTime, Local};
use serde::Serialize;

/// How a question was missed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Outcome {
    Wrong,
    Timeout,
}

/// One missed or timed-out fact
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MistakeRecord {
    pub timestamp: DateTime<Local>,
    pub fact: Fact,
    pub correct_answer: u32,
    /// `None` for timeouts
    pub user_answer: Option<u32>,
    pub outcome: Outcome,
    pub resolved: bool,
}

impl MistakeRecord {
    pub fn a(&self) -> u8 {
        self.fact.a
    }

    pub fn b(&self) -> u8 {
        self.fact.b
    }
}

/// Append-only mistake history. Records are only ever flipped to resolved,
/// and only a full [`ErrorLog::clear`] removes them.
#[derive(Debug, Clone, Default)]
pub struct ErrorLog {
    records: Vec<MistakeRecord>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(
        &mut self,
        fact: Fact,
        correct_answer: u32,
        user_answer: Option<u32>,
        outcome: Outcome,
    ) -> &MistakeRecord {
        tracing::debug!(%fact, correct_answer, ?user_answer, %outcome, "mistake logged");
        self.records.push(MistakeRecord {
            timestamp: Local::now(),
            fact,
            correct_answer,
            user_answer,
            outcome,
            resolved: false,
        });
        &self.records[self.records.len() - 1]
    }

    /// Marks the oldest unresolved record for `fact` as resolved.
    ///
    /// Returns whether a record changed. Finding nothing is not a fault: a
    /// correct answer for a fact that was never missed lands here too.
    pub fn resolve(&mut self, fact: Fact) -> bool {
        match self
            .records
            .iter_mut()
            .find(|r| !r.resolved && r.fact == fact)
        {
            Some(record) => {
                record.resolved = true;
                tracing::debug!(%fact, "mistake resolved");
                true
            }
            None => false,
        }
    }

    pub fn all(&self) -> &[MistakeRecord] {
        &self.records
    }

    pub fn unresolved(&self) -> impl Iterator<Item = &MistakeRecord> {
        self.records.iter().filter(|r| !r.resolved)
    }

    pub fn unresolved_count(&self) -> usize {
        self.unresolved().count()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
