use super::domain::{Response, MAX_RESPONSE, MIN_RESPONSE};
use super::questions::QuestionBank;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResponseError {
    #[error("response value {value} for question {question_id} is outside -3..=3")]
    OutOfRange { question_id: u32, value: i8 },
    #[error("question {0} is not part of this battery")]
    UnknownQuestion(u32),
}

#[derive(Debug, thiserror::Error)]
pub enum ResponseImportError {
    #[error("invalid answers CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Response(#[from] ResponseError),
}

#[derive(Debug, Deserialize)]
struct AnswerRow {
    question_id: u32,
    value: i8,
}

/// Upsert-by-question collection of answers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSet {
    values: BTreeMap<u32, i8>,
}

impl ResponseSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an answer, returning the value it replaced.
    pub fn record(&mut self, question_id: u32, value: i8) -> Result<Option<i8>, ResponseError> {
        if !(MIN_RESPONSE..=MAX_RESPONSE).contains(&value) {
            return Err(ResponseError::OutOfRange { question_id, value });
        }
        Ok(self.values.insert(question_id, value))
    }

    /// Like [`ResponseSet::record`] but refuses ids missing from `bank`.
    pub fn record_in(
        &mut self,
        bank: &QuestionBank,
        question_id: u32,
        value: i8,
    ) -> Result<Option<i8>, ResponseError> {
        if !bank.contains(question_id) {
            return Err(ResponseError::UnknownQuestion(question_id));
        }
        self.record(question_id, value)
    }

    /// Reads `question_id,value` rows; a repeated id keeps the last value.
    pub fn from_csv_reader<R: Read>(
        reader: R,
        bank: &QuestionBank,
    ) -> Result<Self, ResponseImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut responses = Self::new();
        for row in csv_reader.deserialize::<AnswerRow>() {
            let row = row?;
            responses.record_in(bank, row.question_id, row.value)?;
        }
        Ok(responses)
    }

    pub fn get(&self, question_id: u32) -> Option<i8> {
        self.values.get(&question_id).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = Response> + '_ {
        self.values.iter().map(|(&question_id, &value)| Response {
            question_id,
            value,
        })
    }

    /// Share of the bank answered, as a rounded percentage.
    pub fn progress(&self, bank: &QuestionBank) -> u8 {
        if bank.is_empty() {
            return 0;
        }
        let answered = self
            .values
            .keys()
            .filter(|question_id| bank.contains(**question_id))
            .count();
        ((answered as f64 / bank.len() as f64) * 100.0).round() as u8
    }

    pub fn is_page_complete(&self, bank: &QuestionBank, page: usize) -> bool {
        bank.page(page)
            .iter()
            .all(|question| self.values.contains_key(&question.id))
    }
}

impl FromIterator<Response> for ResponseSet {
    /// Later entries for the same question overwrite earlier ones.
    fn from_iter<I: IntoIterator<Item = Response>>(iter: I) -> Self {
        let values = iter
            .into_iter()
            .map(|response| (response.question_id, response.value))
            .collect();
        Self { values }
    }
}
