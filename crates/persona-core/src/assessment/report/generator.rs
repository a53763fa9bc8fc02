use super::{GeneratedReport, ReportSchemaError};
use crate::assessment::domain::{TraitScores, TypeCode};
use crate::config::GeneratorConfig;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt::Debug;

/// Payload sent to an external report generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub scores: TraitScores,
    pub type_code: TypeCode,
    pub prompt: String,
}

impl GenerationRequest {
    pub fn new(scores: TraitScores, type_code: TypeCode) -> Self {
        let prompt = format!(
            "Write a psychometric profile for type {type_code}. Scores run 0-100 and measure \
             the second pole of each pair (E-I, S-N, T-F, J-P): Extraversion {}, Sensing {}, \
             Thinking {}, Judging {}. Reflect the nuance of this score distribution, stay \
             professional and empathetic, and answer with a single JSON object in the report \
             schema, including the full cognitiveFunctions block.",
            scores.extraversion, scores.sensing, scores.thinking, scores.judging,
        );
        Self {
            scores,
            type_code,
            prompt,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("report generator is not configured")]
    Disabled,
    #[error("report generator request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("report generator answered with HTTP {0}")]
    Status(u16),
    #[error("report generator returned an empty body")]
    EmptyBody,
    #[error("report generator returned invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("report generator violated the report schema: {0}")]
    Schema(#[from] ReportSchemaError),
}

/// Best-effort source of narrative content; any error sends the caller to the catalog.
#[async_trait]
pub trait ReportGenerator: Debug + Send + Sync {
    async fn generate(&self, request: &GenerationRequest)
        -> Result<GeneratedReport, GenerationError>;
}

/// Turns a raw generator body into a schema-checked report.
///
/// Partial payloads, including a missing or incomplete `cognitiveFunctions`
/// block, are rejected outright; nothing is merged with catalog content.
pub fn parse_generated(body: &str) -> Result<GeneratedReport, GenerationError> {
    let body = body.trim();
    if body.is_empty() {
        return Err(GenerationError::EmptyBody);
    }
    let report: GeneratedReport = serde_json::from_str(body)?;
    report.validate()?;
    Ok(report)
}

/// JSON-over-HTTP generator.
pub struct HttpReportGenerator {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpReportGenerator {
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, GenerationError> {
        let endpoint = config.endpoint.clone().ok_or(GenerationError::Disabled)?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Debug for HttpReportGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpReportGenerator")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ReportGenerator for HttpReportGenerator {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GeneratedReport, GenerationError> {
        let mut call = self.client.post(&self.endpoint).json(request);
        if let Some(key) = &self.api_key {
            call = call.bearer_auth(key);
        }

        let response = call.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        parse_generated(&body)
    }
}
