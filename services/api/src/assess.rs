use crate::infra::{build_resolver, InMemorySessionRepository};
use clap::Args;
use persona_core::assessment::{
    derive_stack, AssessmentOutcome, AssessmentService, CognitiveStack, Dimension, QuestionBank,
    ReportResolver, Response, ResponseSet, TypeCode, QUESTIONS_PER_PAGE,
};
use persona_core::config::AppConfig;
use persona_core::error::AppError;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
#[command(group(
    clap::ArgGroup::new("source")
        .required(true)
        .args(["answers", "uniform"])
))]
pub(crate) struct AssessArgs {
    /// CSV file with `question_id,value` rows (values -3..=3)
    #[arg(long)]
    pub(crate) answers: Option<PathBuf>,
    /// Answer every question with the same value (-3..=3)
    #[arg(
        long,
        allow_hyphen_values = true,
        value_parser = clap::value_parser!(i8).range(-3..=3)
    )]
    pub(crate) uniform: Option<i8>,
    /// Print the outcome as JSON instead of a text summary
    #[arg(long)]
    pub(crate) json: bool,
    /// Skip the external report generator even if one is configured
    #[arg(long)]
    pub(crate) offline: bool,
}

#[derive(Args, Debug)]
pub(crate) struct StackArgs {
    /// Four-letter type code, e.g. INTJ
    pub(crate) code: String,
}

#[derive(Args, Debug, Default)]
pub(crate) struct QuestionsArgs {
    /// Zero-based page of ten questions; omit to list the whole battery
    #[arg(long)]
    pub(crate) page: Option<usize>,
}

pub(crate) async fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let AssessArgs {
        answers,
        uniform,
        json,
        offline,
    } = args;

    let bank = Arc::new(QuestionBank::standard()?);
    let responses = match (answers, uniform) {
        (Some(path), _) => ResponseSet::from_csv_reader(File::open(path)?, &bank)?,
        (None, Some(value)) => uniform_responses(&bank, value),
        (None, None) => ResponseSet::new(),
    };

    let resolver = if offline {
        ReportResolver::offline()
    } else {
        build_resolver(&AppConfig::load()?.generator)
    };

    let outcome = assess(bank, resolver, &responses).await?;

    if json {
        let rendered = serde_json::to_string_pretty(&outcome).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        render_outcome(&outcome);
    }
    Ok(())
}

pub(crate) fn run_stack(args: StackArgs) -> Result<(), AppError> {
    let code: TypeCode = args.code.parse()?;
    let stack = derive_stack(code);
    println!("Cognitive stack for {code}");
    render_stack(&stack);
    Ok(())
}

pub(crate) fn run_questions(args: QuestionsArgs) -> Result<(), AppError> {
    let bank = QuestionBank::standard()?;
    let questions = match args.page {
        Some(page) => {
            println!(
                "Page {page} (pages 0-{}, {QUESTIONS_PER_PAGE} per page)",
                bank.page_count().saturating_sub(1)
            );
            bank.page(page)
        }
        None => bank.questions(),
    };

    if questions.is_empty() {
        println!("No questions on this page.");
    }
    for question in questions {
        println!(
            "{:>4}  [{}{}]  {}",
            question.id,
            question.dimension.code(),
            if question.reverse { ", reversed" } else { "" },
            question.text
        );
    }
    Ok(())
}

fn uniform_responses(bank: &QuestionBank, value: i8) -> ResponseSet {
    bank.questions()
        .iter()
        .map(|question| Response {
            question_id: question.id,
            value,
        })
        .collect()
}

/// Drives one session through the same lifecycle the HTTP surface uses.
async fn assess(
    bank: Arc<QuestionBank>,
    resolver: ReportResolver,
    responses: &ResponseSet,
) -> Result<AssessmentOutcome, AppError> {
    let service = AssessmentService::new(
        bank,
        Arc::new(resolver),
        Arc::new(InMemorySessionRepository::default()),
    );
    let (session, _) = service.start()?;
    for response in responses.iter() {
        service.record(&session, response.question_id, response.value)?;
    }
    Ok(service.submit(&session).await?)
}

fn render_outcome(outcome: &AssessmentOutcome) {
    let report = &outcome.report;
    println!("{} | {}", outcome.type_code, report.profile.type_name);
    println!("Report source: {:?}", outcome.source);

    println!("\nTrait scores");
    for dimension in Dimension::ordered() {
        let slider = dimension.slider();
        println!(
            "- {:<8} {:>3}% {} ({} <-> {})",
            slider.label,
            outcome.scores.get(dimension),
            dimension.second_pole_label(),
            slider.left,
            slider.right
        );
    }

    println!("\n{}", outcome.insight.title);
    println!("  {}", outcome.insight.content);

    println!("\nSummary");
    println!("  {}", report.profile.summary);

    println!("\nCognitive functions");
    render_stack(&outcome.stack);

    println!("\nStrengths");
    for strength in &report.profile.strengths {
        println!("- {strength}");
    }
    println!("Weaknesses");
    for weakness in &report.profile.weaknesses {
        println!("- {weakness}");
    }

    let career = &report.profile.career;
    println!("\nCareer: {}", career.title);
    println!("  {}", career.description);
    println!("  Roles: {}", career.roles.join(", "));

    println!("\nGrowth");
    println!("  {}", report.profile.life_insights.growth);
}

fn render_stack(stack: &CognitiveStack) {
    let slots = ["Dominant", "Auxiliary", "Tertiary", "Inferior"];
    for (slot, function) in slots.iter().zip(stack.functions()) {
        println!("- {slot:<9} {function} ({})", function.full_name());
    }
    println!("  {}", stack.explanation);
}

#[cfg(test)]
mod tests {
    use super::*;
    use persona_core::assessment::ReportSource;

    fn bank() -> Arc<QuestionBank> {
        Arc::new(QuestionBank::standard().expect("battery"))
    }

    #[tokio::test]
    async fn neutral_uniform_answers_assess_as_infp() {
        let bank = bank();
        let responses = uniform_responses(&bank, 0);
        assert_eq!(responses.len(), 120);

        let outcome = assess(bank, ReportResolver::offline(), &responses)
            .await
            .expect("assessment completes");
        assert_eq!(outcome.type_code.to_string(), "INFP");
        assert_eq!(outcome.source, ReportSource::Catalog);
    }

    #[tokio::test]
    async fn csv_answers_feed_the_same_pipeline() {
        let bank = bank();
        let responses = ResponseSet::from_csv_reader("question_id,value\n1,-3\n".as_bytes(), &bank)
            .expect("answers parse");

        let outcome = assess(bank, ReportResolver::offline(), &responses)
            .await
            .expect("assessment completes");
        assert_eq!(outcome.type_code.to_string(), "ENFP");
        assert_eq!(outcome.scores.extraversion, 100);
    }
}
