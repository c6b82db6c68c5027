use crate::mistakes::{MistakeRecord, Outcome};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug, Serialize)]
struct MistakeRow {
    timestamp: String,
    a: u8,
    b: u8,
    question: String,
    correct_answer: u32,
    user_answer: Option<u32>,
    outcome: Outcome,
    resolved: bool,
}

impl From<&MistakeRecord> for MistakeRow {
    fn from(r: &MistakeRecord) -> Self {
        Self {
            timestamp: r.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            a: r.a(),
            b: r.b(),
            question: r.fact.to_string(),
            correct_answer: r.correct_answer,
            user_answer: r.user_answer,
            outcome: r.outcome,
            resolved: r.resolved,
        }
    }
}

/// Writes the mistake log as CSV with a header row, one line per record.
pub fn write_mistakes_csv<W: io::Write>(records: &[MistakeRecord], writer: W) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    if records.is_empty() {
        // serialize() only emits headers alongside the first row
        wtr.write_record([
            "timestamp",
            "a",
            "b",
            "question",
            "correct_answer",
            "user_answer",
            "outcome",
            "resolved",
        ])?;
    }
    for record in records {
        wtr.serialize(MistakeRow::from(record))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn export_mistakes_csv<P: AsRef<Path>>(records: &[MistakeRecord], path: P) -> csv::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;
    write_mistakes_csv(records, file)?;
    tracing::info!(path = %path.display(), count = records.len(), "mistakes exported");
    Ok(())
}
