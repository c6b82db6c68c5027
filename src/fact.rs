use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest operand (and table number) the trainer deals with.
pub const MAX_OPERAND: u8 = 12;

/// Number of tables, 0 through 12.
pub const TABLE_COUNT: usize = MAX_OPERAND as usize + 1;

/// An ordered operand pair. The product is always derived from the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fact {
    pub a: u8,
    pub b: u8,
}

impl Fact {
    pub fn new(a: u8, b: u8) -> Self {
        Self { a, b }
    }

    pub fn product(&self) -> u32 {
        self.a as u32 * self.b as u32
    }

    /// The table this fact is counted under in the stats.
    pub fn table(&self) -> u8 {
        self.a
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} × {}", self.a, self.b)
    }
}

/// A fact together with the answer the learner is expected to give.
///
/// Two questions are the same fact when their operand pairs match; the
/// stored answer plays no part in that comparison.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Question {
    fact: Fact,
    answer: u32,
}

impl Question {
    pub fn new(fact: Fact, answer: u32) -> Self {
        Self { fact, answer }
    }

    pub fn from_fact(fact: Fact) -> Self {
        Self::new(fact, fact.product())
    }

    pub fn fact(&self) -> Fact {
        self.fact
    }

    pub fn a(&self) -> u8 {
        self.fact.a
    }

    pub fn b(&self) -> u8 {
        self.fact.b
    }

    pub fn answer(&self) -> u32 {
        self.answer
    }

    pub fn is_correct(&self, value: u32) -> bool {
        value == self.answer
    }
}

impl PartialEq for Question {
    fn eq(&self, other: &Self) -> bool {
        self.fact == other.fact
    }
}

impl Eq for Question {}

/// The shuffled questions of one run. Built once, then only read by index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Question> {
        self.questions.get(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }
}

impl From<Vec<Question>> for QuestionSet {
    fn from(questions: Vec<Question>) -> Self {
        Self::new(questions)
    }
}

impl<'a> IntoIterator for &'a QuestionSet {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}
