use super::domain::{Dimension, Question};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::io::Read;

/// Questions shown per page of the battery.
pub const QUESTIONS_PER_PAGE: usize = 10;

const STANDARD_BATTERY: &str = include_str!("../../data/questions.csv");

#[derive(Debug, thiserror::Error)]
pub enum QuestionBankError {
    #[error("invalid question bank CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("question id {0} appears more than once")]
    DuplicateId(u32),
    #[error("question {id} uses unknown dimension '{code}'")]
    UnknownDimension { id: u32, code: String },
    #[error("question {0} has no text")]
    MissingText(u32),
}

/// Ordered, immutable battery with constant-time lookup by id.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
    index: HashMap<u32, usize>,
}

impl QuestionBank {
    /// The embedded 120-item battery.
    ///
    /// Items are phrased toward the second pole (E, S, T, J) unless flagged
    /// `reverse`; negative Likert values express agreement.
    pub fn standard() -> Result<Self, QuestionBankError> {
        Self::from_reader(STANDARD_BATTERY.as_bytes())
    }

    /// Reads `id,dimension,reverse,text` rows.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, QuestionBankError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut questions = Vec::new();
        for row in csv_reader.deserialize::<QuestionRow>() {
            let row = row?;
            let dimension = Dimension::from_code(&row.dimension).ok_or_else(|| {
                QuestionBankError::UnknownDimension {
                    id: row.id,
                    code: row.dimension.clone(),
                }
            })?;
            if row.text.is_empty() {
                return Err(QuestionBankError::MissingText(row.id));
            }
            questions.push(Question {
                id: row.id,
                text: row.text,
                dimension,
                reverse: row.reverse,
            });
        }

        Self::from_questions(questions)
    }

    pub fn from_questions(questions: Vec<Question>) -> Result<Self, QuestionBankError> {
        let mut index = HashMap::with_capacity(questions.len());
        for (position, question) in questions.iter().enumerate() {
            if index.insert(question.id, position).is_some() {
                return Err(QuestionBankError::DuplicateId(question.id));
            }
        }
        Ok(Self { questions, index })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, id: u32) -> Option<&Question> {
        self.index.get(&id).map(|&position| &self.questions[position])
    }

    pub fn contains(&self, id: u32) -> bool {
        self.index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn count_for(&self, dimension: Dimension) -> usize {
        self.questions
            .iter()
            .filter(|question| question.dimension == dimension)
            .count()
    }

    pub fn page_count(&self) -> usize {
        self.questions.len().div_ceil(QUESTIONS_PER_PAGE)
    }

    /// Questions on zero-based `page`; empty past the last page.
    pub fn page(&self, page: usize) -> &[Question] {
        let start = page.saturating_mul(QUESTIONS_PER_PAGE);
        if start >= self.questions.len() {
            return &[];
        }
        let end = (start + QUESTIONS_PER_PAGE).min(self.questions.len());
        &self.questions[start..end]
    }
}

#[derive(Debug, Deserialize)]
struct QuestionRow {
    id: u32,
    dimension: String,
    #[serde(deserialize_with = "flexible_bool")]
    reverse: bool,
    text: String,
}

fn flexible_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" | "" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "expected a boolean reverse flag, got '{other}'"
        ))),
    }
}
