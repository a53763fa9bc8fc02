use super::{CareerPath, LifeInsightDetail, LifeInsights, Lifestyle, PsychologyProfile, TypeProfile};
use crate::assessment::domain::TypeCode;

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

fn detail(summary: &str, strength: &str, challenge: &str, tip: &str) -> LifeInsightDetail {
    LifeInsightDetail {
        summary: summary.to_string(),
        strengths: owned(&[strength]),
        challenges: owned(&[challenge]),
        actionable_tip: tip.to_string(),
    }
}

/// Complete profile built only from the letters of `code`.
///
/// Used whenever the catalog has no entry, so it must stay as complete as a
/// catalog profile.
pub fn generic_profile(code: TypeCode) -> TypeProfile {
    let (nature_strength, nature_weakness) = if code.is_thinking() {
        ("Analytical Rigor", "Bluntness")
    } else {
        ("Empathic Attunement", "Conflict Avoidance")
    };
    let (tactics_strength, tactics_weakness) = if code.is_judging() {
        ("Structured Follow-through", "Rigidity")
    } else {
        ("Adaptability", "Occasional Indecision")
    };
    let energy = if code.is_extraverted() {
        "draws energy from people and activity"
    } else {
        "recharges through reflection and solitude"
    };

    TypeProfile {
        type_name: format!("The Dynamic ({code})"),
        summary: format!(
            "A unique cognitive blend that {energy} and shows high adaptability."
        ),
        strengths: owned(&[nature_strength, tactics_strength, "Resilience"]),
        weaknesses: owned(&[nature_weakness, tactics_weakness]),
        psychology: PsychologyProfile {
            subconscious: "Balanced".to_string(),
            paradox: "Versatile".to_string(),
            motivations: owned(&["Growth"]),
            fears: owned(&["Stagnation"]),
        },
        career: CareerPath {
            title: "Specialist".to_string(),
            description: "Adaptable professional.".to_string(),
            roles: owned(&["Consultant"]),
        },
        lifestyle: Lifestyle {
            hobbies: owned(&["Various"]),
            environment: "Balanced".to_string(),
            stress_relief: "Rest".to_string(),
        },
        life_insights: LifeInsights {
            work: detail("Flexible", nature_strength, "Focus", "Plan ahead."),
            friendships: detail("Loyal", "Empathy", "Boundaries", "Communicate."),
            relationships: detail("Supportive", "Trust", "Conflict", "Openness."),
            stress: detail("Calm", "Resilience", "Panic", "Breathe."),
            growth: "Focus on your auxiliary trait.".to_string(),
            unhealthy: "Avoid over-reliance on your dominant trait.".to_string(),
        },
    }
}
