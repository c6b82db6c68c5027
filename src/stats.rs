use crate::fact::{MAX_OPERAND, TABLE_COUNT};
use serde::Serialize;

/// Attempt counters for one multiplication table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TableStat {
    pub table: u8,
    pub attempts: u64,
    pub correct: u64,
}

impl TableStat {
    /// Fraction of correct attempts, 0.0 when the table was never attempted
    pub fn accuracy(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.correct as f64 / self.attempts as f64
        }
    }

    pub fn accuracy_percent(&self) -> f64 {
        self.accuracy() * 100.0
    }
}

/// Per-table accuracy bookkeeping for the lifetime of the process
#[derive(Debug, Clone)]
pub struct StatsTracker {
    tables: [TableStat; TABLE_COUNT],
}

impl StatsTracker {
    pub fn new() -> Self {
        let mut tables = [TableStat::default(); TABLE_COUNT];
        for (table, stat) in (0..=MAX_OPERAND).zip(tables.iter_mut()) {
            stat.table = table;
        }
        Self { tables }
    }

    pub fn record(&mut self, table: u8, correct: bool) {
        match self.tables.get_mut(table as usize) {
            Some(stat) => {
                stat.attempts += 1;
                if correct {
                    stat.correct += 1;
                }
            }
            None => tracing::warn!(table, "ignoring attempt for unknown table"),
        }
    }

    pub fn get(&self, table: u8) -> Option<&TableStat> {
        self.tables.get(table as usize)
    }

    /// One entry per table 0..=12 in ascending order, untouched tables included.
    pub fn snapshot(&self) -> Vec<TableStat> {
        self.tables.to_vec()
    }

    pub fn total_attempts(&self) -> u64 {
        self.tables.iter().map(|s| s.attempts).sum()
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for StatsTracker {
    fn default() -> Self {
        Self::new()
    }
}
