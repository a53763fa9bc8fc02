use super::cognitive::{derive_stack, CognitiveStack};
use super::domain::{TraitScores, TypeCode};
use super::questions::QuestionBank;
use super::report::{Report, ReportSource, Resolution};
use super::responses::{ResponseError, ResponseSet};
use super::scoring::{aggregate, classify, dominant_trait_insight, TraitInsight};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Fresh or just reset; nothing answered yet.
    Reset,
    Collecting,
    Resolving,
    Complete,
}

impl SessionPhase {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Reset => "Reset",
            Self::Collecting => "Collecting",
            Self::Resolving => "Resolving",
            Self::Complete => "Complete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Response(#[from] ResponseError),
    #[error("responses are locked while the report is resolving")]
    Resolving,
    #[error("assessment already completed; reset to start over")]
    AlreadyComplete,
    #[error("no submission is in progress")]
    NotResolving,
    #[error("completion for generation {ticket} arrived after reset to generation {current}")]
    StaleCompletion { ticket: u64, current: u64 },
}

/// Scores and type captured at submit time, stamped with the session generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitTicket {
    pub generation: u64,
    pub scores: TraitScores,
    pub type_code: TypeCode,
}

/// Everything a completed assessment hands to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentOutcome {
    pub scores: TraitScores,
    pub type_code: TypeCode,
    pub stack: CognitiveStack,
    pub report: Report,
    pub source: ReportSource,
    pub insight: TraitInsight,
    pub completed_at: DateTime<Utc>,
}

impl AssessmentOutcome {
    pub fn new(ticket: &SubmitTicket, resolution: Resolution) -> Self {
        Self {
            scores: ticket.scores,
            type_code: ticket.type_code,
            stack: derive_stack(ticket.type_code),
            report: resolution.report,
            source: resolution.source,
            insight: dominant_trait_insight(&ticket.scores),
            completed_at: Utc::now(),
        }
    }
}

/// One respondent's assessment, driven through
/// `Reset → Collecting → Resolving → Complete` and back to `Reset`.
#[derive(Debug, Clone)]
pub struct AssessmentSession {
    phase: SessionPhase,
    generation: u64,
    responses: ResponseSet,
    outcome: Option<AssessmentOutcome>,
    started_at: DateTime<Utc>,
}

impl Default for AssessmentSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AssessmentSession {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Reset,
            generation: 0,
            responses: ResponseSet::new(),
            outcome: None,
            started_at: Utc::now(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn responses(&self) -> &ResponseSet {
        &self.responses
    }

    pub fn outcome(&self) -> Option<&AssessmentOutcome> {
        self.outcome.as_ref()
    }

    /// Upserts one answer. Only allowed before submission.
    pub fn record(
        &mut self,
        bank: &QuestionBank,
        question_id: u32,
        value: i8,
    ) -> Result<Option<i8>, SessionError> {
        self.ensure_accepting()?;
        let previous = self.responses.record_in(bank, question_id, value)?;
        self.phase = SessionPhase::Collecting;
        Ok(previous)
    }

    /// Scores and classifies the collected answers and locks the session.
    pub fn begin_submit(&mut self, bank: &QuestionBank) -> Result<SubmitTicket, SessionError> {
        self.ensure_accepting()?;
        let scores = aggregate(self.responses.iter(), bank);
        let type_code = classify(&scores);
        self.phase = SessionPhase::Resolving;
        Ok(SubmitTicket {
            generation: self.generation,
            scores,
            type_code,
        })
    }

    /// Stores the outcome if the ticket still belongs to this generation.
    pub fn complete(
        &mut self,
        ticket: &SubmitTicket,
        outcome: AssessmentOutcome,
    ) -> Result<(), SessionError> {
        if ticket.generation != self.generation {
            return Err(SessionError::StaleCompletion {
                ticket: ticket.generation,
                current: self.generation,
            });
        }
        if self.phase != SessionPhase::Resolving {
            return Err(SessionError::NotResolving);
        }
        self.outcome = Some(outcome);
        self.phase = SessionPhase::Complete;
        Ok(())
    }

    /// Discards answers and any result; in-flight completions become stale.
    pub fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.responses.clear();
        self.outcome = None;
        self.phase = SessionPhase::Reset;
        self.started_at = Utc::now();
    }

    pub fn snapshot(&self, bank: &QuestionBank) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            generation: self.generation,
            answered: self.responses.len(),
            total_questions: bank.len(),
            progress: self.responses.progress(bank),
            completed_pages: (0..bank.page_count())
                .filter(|page| self.responses.is_page_complete(bank, *page))
                .collect(),
            started_at: self.started_at,
            outcome: self.outcome.clone(),
        }
    }

    fn ensure_accepting(&self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::Reset | SessionPhase::Collecting => Ok(()),
            SessionPhase::Resolving => Err(SessionError::Resolving),
            SessionPhase::Complete => Err(SessionError::AlreadyComplete),
        }
    }
}

/// Read-only view of a session for API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub generation: u64,
    pub answered: usize,
    pub total_questions: usize,
    pub progress: u8,
    /// Zero-based pages whose questions are all answered.
    pub completed_pages: Vec<usize>,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<AssessmentOutcome>,
}
