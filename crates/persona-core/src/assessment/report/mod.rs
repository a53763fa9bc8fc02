//! Narrative reports and the policy that picks where they come from.

mod catalog;
mod generator;
mod resolver;
mod template;

pub use catalog::ReportCatalog;
pub use generator::{
    parse_generated, GenerationError, GenerationRequest, HttpReportGenerator, ReportGenerator,
};
pub use resolver::{ReportResolver, ReportSource, Resolution};
pub use template::generic_profile;

use super::cognitive::CognitiveStack;
use super::domain::TypeCode;
use serde::{Deserialize, Serialize};

/// Complete narrative handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub type_code: TypeCode,
    #[serde(flatten)]
    pub profile: TypeProfile,
    pub cognitive_functions: CognitiveFunctionsBlock,
}

impl Report {
    pub fn assemble(type_code: TypeCode, profile: TypeProfile, stack: &CognitiveStack) -> Self {
        Self {
            type_code,
            profile,
            cognitive_functions: CognitiveFunctionsBlock::from(stack),
        }
    }

    /// Every text present and non-blank, every list non-empty.
    pub fn validate(&self) -> Result<(), ReportSchemaError> {
        self.profile.validate()?;
        self.cognitive_functions.validate()
    }
}

/// Full report payload as an external generator must return it.
///
/// Every narrative section and the complete cognitive-functions block are
/// required; a missing key fails deserialization and a blank value fails
/// [`GeneratedReport::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedReport {
    #[serde(flatten)]
    pub profile: TypeProfile,
    pub cognitive_functions: CognitiveFunctionsBlock,
}

impl GeneratedReport {
    pub fn validate(&self) -> Result<(), ReportSchemaError> {
        self.profile.validate()?;
        self.cognitive_functions.validate()
    }

    /// Keeps the narrative and replaces the functions block with the derived stack.
    pub fn into_report(self, type_code: TypeCode, stack: &CognitiveStack) -> Report {
        Report::assemble(type_code, self.profile, stack)
    }
}

impl From<Report> for GeneratedReport {
    fn from(report: Report) -> Self {
        Self {
            profile: report.profile,
            cognitive_functions: report.cognitive_functions,
        }
    }
}

/// Everything in a report that depends on narrative content rather than on
/// the type code alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeProfile {
    pub type_name: String,
    pub summary: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub psychology: PsychologyProfile,
    pub career: CareerPath,
    pub lifestyle: Lifestyle,
    pub life_insights: LifeInsights,
}

impl TypeProfile {
    pub fn validate(&self) -> Result<(), ReportSchemaError> {
        require_text("typeName", &self.type_name)?;
        require_text("summary", &self.summary)?;
        require_list("strengths", &self.strengths)?;
        require_list("weaknesses", &self.weaknesses)?;

        require_text("psychology.subconscious", &self.psychology.subconscious)?;
        require_text("psychology.paradox", &self.psychology.paradox)?;
        require_list("psychology.motivations", &self.psychology.motivations)?;
        require_list("psychology.fears", &self.psychology.fears)?;

        require_text("career.title", &self.career.title)?;
        require_text("career.description", &self.career.description)?;
        require_list("career.roles", &self.career.roles)?;

        require_list("lifestyle.hobbies", &self.lifestyle.hobbies)?;
        require_text("lifestyle.environment", &self.lifestyle.environment)?;
        require_text("lifestyle.stressRelief", &self.lifestyle.stress_relief)?;

        let insights = &self.life_insights;
        insights.work.validate("lifeInsights.work")?;
        insights.friendships.validate("lifeInsights.friendships")?;
        insights.relationships.validate("lifeInsights.relationships")?;
        insights.stress.validate("lifeInsights.stress")?;
        require_text("lifeInsights.growth", &insights.growth)?;
        require_text("lifeInsights.unhealthy", &insights.unhealthy)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PsychologyProfile {
    pub subconscious: String,
    pub paradox: String,
    pub motivations: Vec<String>,
    pub fears: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerPath {
    pub title: String,
    pub description: String,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lifestyle {
    pub hobbies: Vec<String>,
    pub environment: String,
    pub stress_relief: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifeInsightDetail {
    pub summary: String,
    pub strengths: Vec<String>,
    pub challenges: Vec<String>,
    pub actionable_tip: String,
}

impl LifeInsightDetail {
    fn validate(&self, area: &str) -> Result<(), ReportSchemaError> {
        require_text(&format!("{area}.summary"), &self.summary)?;
        require_list(&format!("{area}.strengths"), &self.strengths)?;
        require_list(&format!("{area}.challenges"), &self.challenges)?;
        require_text(&format!("{area}.actionableTip"), &self.actionable_tip)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifeInsights {
    pub work: LifeInsightDetail,
    pub friendships: LifeInsightDetail,
    pub relationships: LifeInsightDetail,
    pub stress: LifeInsightDetail,
    pub growth: String,
    pub unhealthy: String,
}

/// Display form of a cognitive stack, using full function names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CognitiveFunctionsBlock {
    pub dominant: String,
    pub auxiliary: String,
    pub tertiary: String,
    pub inferior: String,
    pub explanation: String,
}

impl CognitiveFunctionsBlock {
    pub fn validate(&self) -> Result<(), ReportSchemaError> {
        require_text("cognitiveFunctions.dominant", &self.dominant)?;
        require_text("cognitiveFunctions.auxiliary", &self.auxiliary)?;
        require_text("cognitiveFunctions.tertiary", &self.tertiary)?;
        require_text("cognitiveFunctions.inferior", &self.inferior)?;
        require_text("cognitiveFunctions.explanation", &self.explanation)
    }
}

impl From<&CognitiveStack> for CognitiveFunctionsBlock {
    fn from(stack: &CognitiveStack) -> Self {
        Self {
            dominant: stack.dominant.full_name().to_string(),
            auxiliary: stack.auxiliary.full_name().to_string(),
            tertiary: stack.tertiary.full_name().to_string(),
            inferior: stack.inferior.full_name().to_string(),
            explanation: stack.explanation.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("report field `{field}` is missing or empty")]
pub struct ReportSchemaError {
    pub field: String,
}

fn require_text(field: &str, value: &str) -> Result<(), ReportSchemaError> {
    if value.trim().is_empty() {
        return Err(ReportSchemaError {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn require_list(field: &str, values: &[String]) -> Result<(), ReportSchemaError> {
    if values.is_empty() {
        return Err(ReportSchemaError {
            field: field.to_string(),
        });
    }
    for (index, value) in values.iter().enumerate() {
        require_text(&format!("{field}[{index}]"), value)?;
    }
    Ok(())
}
