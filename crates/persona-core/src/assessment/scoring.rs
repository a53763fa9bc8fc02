use super::domain::{
    Dimension, Response, TraitScores, TypeCode, MAX_RESPONSE, MIN_RESPONSE, NEUTRAL_SCORE,
};
use super::questions::QuestionBank;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use tracing::debug;

/// Maps one (already polarity-corrected) answer onto 0..=100.
///
/// `-3` lands on 100 (second pole) and `+3` on 0.
pub fn contribution(effective_value: i8) -> f64 {
    ((3.0 - f64::from(effective_value)) / 6.0) * 100.0
}

/// Folds answers into per-dimension means; unmatched ids are skipped.
pub fn aggregate<I, R>(responses: I, bank: &QuestionBank) -> TraitScores
where
    I: IntoIterator<Item = R>,
    R: Borrow<Response>,
{
    let mut totals = [0.0_f64; 4];
    let mut counts = [0_u32; 4];
    let mut skipped = 0_usize;

    for response in responses {
        let response = response.borrow();
        let Some(question) = bank.get(response.question_id) else {
            skipped += 1;
            continue;
        };
        let value = response.value.clamp(MIN_RESPONSE, MAX_RESPONSE);
        let effective = if question.reverse { -value } else { value };
        let slot = dimension_slot(question.dimension);
        totals[slot] += contribution(effective);
        counts[slot] += 1;
    }

    let mut scores = TraitScores::neutral();
    for dimension in Dimension::ordered() {
        let slot = dimension_slot(dimension);
        let score = if counts[slot] == 0 {
            NEUTRAL_SCORE
        } else {
            (totals[slot] / f64::from(counts[slot]))
                .round()
                .clamp(0.0, 100.0) as u8
        };
        scores.set(dimension, score);
    }

    debug!(?scores, ?counts, skipped, "aggregated responses");
    scores
}

/// Threshold rule: strictly above 50 picks the second pole, ties go to the first.
pub fn classify(scores: &TraitScores) -> TypeCode {
    let leans = |dimension| scores.get(dimension) > NEUTRAL_SCORE;
    TypeCode::new(
        leans(Dimension::ExtraversionIntroversion),
        leans(Dimension::SensingIntuition),
        leans(Dimension::ThinkingFeeling),
        leans(Dimension::JudgingPerceiving),
    )
}

const fn dimension_slot(dimension: Dimension) -> usize {
    match dimension {
        Dimension::ExtraversionIntroversion => 0,
        Dimension::SensingIntuition => 1,
        Dimension::ThinkingFeeling => 2,
        Dimension::JudgingPerceiving => 3,
    }
}

/// Headline observation about the most pronounced preference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitInsight {
    pub title: String,
    pub content: String,
}

pub fn dominant_trait_insight(scores: &TraitScores) -> TraitInsight {
    let distance = |dimension: Dimension| (i16::from(scores.get(dimension)) - 50).abs();
    let dominant = Dimension::ordered()
        .into_iter()
        .reduce(|best, candidate| {
            if distance(candidate) > distance(best) {
                candidate
            } else {
                best
            }
        })
        .unwrap_or(Dimension::ExtraversionIntroversion);

    let pole = if scores.get(dominant) > NEUTRAL_SCORE {
        dominant.second_pole_label()
    } else {
        dominant.first_pole_label()
    };

    TraitInsight {
        title: format!("Dominant Vector: {pole}"),
        content: format!(
            "Your high preference for {pole} is the primary filter through which you view the world."
        ),
    }
}
