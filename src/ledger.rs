use std::slice;

use crate::node::Answer;

/// One answered question, as it was shown when the user answered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerEntry {
    question: String,
    answer: Answer,
}

impl AnswerEntry {
    pub fn new(question: impl Into<String>, answer: Answer) -> Self {
        AnswerEntry {
            question: question.into(),
            answer,
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> Answer {
        self.answer
    }
}

/// Append-only transcript of a single game. Entries are never edited,
/// reordered, or removed individually; `clear` drops the whole session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerLedger {
    entries: Vec<AnswerEntry>,
}

impl AnswerLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: AnswerEntry) {
        self.entries.push(entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[AnswerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, AnswerEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a AnswerLedger {
    type Item = &'a AnswerEntry;
    type IntoIter = slice::Iter<'a, AnswerEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
