//! Personality assessment: question battery, scoring, type classification,
//! cognitive stacks, report resolution, and the session lifecycle.

pub mod cognitive;
pub mod domain;
pub mod questions;
pub mod report;
pub mod repository;
pub mod responses;
pub mod router;
pub mod scoring;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use cognitive::{derive_stack, Attitude, CognitiveFunction, CognitiveStack};
pub use domain::{
    Dimension, DimensionSlider, Question, Response, TraitScores, TypeCode, TypeCodeError,
};
pub use questions::{QuestionBank, QuestionBankError, QUESTIONS_PER_PAGE};
pub use report::{
    CognitiveFunctionsBlock, GeneratedReport, GenerationError, GenerationRequest,
    HttpReportGenerator, Report, ReportCatalog, ReportGenerator, ReportResolver, ReportSource,
    Resolution, TypeProfile,
};
pub use repository::{RepositoryError, SessionId, SessionRepository};
pub use responses::{ResponseError, ResponseImportError, ResponseSet};
pub use router::assessment_router;
pub use scoring::{aggregate, classify, contribution, dominant_trait_insight, TraitInsight};
pub use service::{AssessmentService, AssessmentServiceError};
pub use session::{
    AssessmentOutcome, AssessmentSession, SessionError, SessionPhase, SessionSnapshot,
    SubmitTicket,
};
