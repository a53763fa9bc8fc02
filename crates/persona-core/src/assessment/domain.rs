use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowest Likert value a respondent can give.
pub const MIN_RESPONSE: i8 = -3;
/// Highest Likert value a respondent can give.
pub const MAX_RESPONSE: i8 = 3;
/// Score assigned to a dimension that received no responses.
pub const NEUTRAL_SCORE: u8 = 50;

/// One of the four bipolar trait axes measured by the battery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dimension {
    #[serde(rename = "EI")]
    ExtraversionIntroversion,
    #[serde(rename = "SN")]
    SensingIntuition,
    #[serde(rename = "TF")]
    ThinkingFeeling,
    #[serde(rename = "JP")]
    JudgingPerceiving,
}

impl Dimension {
    /// Fixed presentation order: mind, energy, nature, tactics.
    pub const fn ordered() -> [Self; 4] {
        [
            Self::ExtraversionIntroversion,
            Self::SensingIntuition,
            Self::ThinkingFeeling,
            Self::JudgingPerceiving,
        ]
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::ExtraversionIntroversion => "EI",
            Self::SensingIntuition => "SN",
            Self::ThinkingFeeling => "TF",
            Self::JudgingPerceiving => "JP",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "EI" => Some(Self::ExtraversionIntroversion),
            "SN" => Some(Self::SensingIntuition),
            "TF" => Some(Self::ThinkingFeeling),
            "JP" => Some(Self::JudgingPerceiving),
            _ => None,
        }
    }

    /// Letter chosen when the score is at or below the threshold.
    pub const fn first_pole_letter(self) -> char {
        match self {
            Self::ExtraversionIntroversion => 'I',
            Self::SensingIntuition => 'N',
            Self::ThinkingFeeling => 'F',
            Self::JudgingPerceiving => 'P',
        }
    }

    /// Letter chosen when the score is strictly above the threshold.
    pub const fn second_pole_letter(self) -> char {
        match self {
            Self::ExtraversionIntroversion => 'E',
            Self::SensingIntuition => 'S',
            Self::ThinkingFeeling => 'T',
            Self::JudgingPerceiving => 'J',
        }
    }

    pub const fn first_pole_label(self) -> &'static str {
        match self {
            Self::ExtraversionIntroversion => "Introversion",
            Self::SensingIntuition => "Intuition",
            Self::ThinkingFeeling => "Feeling",
            Self::JudgingPerceiving => "Prospecting",
        }
    }

    pub const fn second_pole_label(self) -> &'static str {
        match self {
            Self::ExtraversionIntroversion => "Extraversion",
            Self::SensingIntuition => "Observant",
            Self::ThinkingFeeling => "Thinking",
            Self::JudgingPerceiving => "Judging",
        }
    }

    pub const fn slider(self) -> DimensionSlider {
        match self {
            Self::ExtraversionIntroversion => DimensionSlider {
                label: "Mind",
                left: "Introverted",
                right: "Extraverted",
            },
            Self::SensingIntuition => DimensionSlider {
                label: "Energy",
                left: "Intuitive",
                right: "Observant",
            },
            Self::ThinkingFeeling => DimensionSlider {
                label: "Nature",
                left: "Feeling",
                right: "Thinking",
            },
            Self::JudgingPerceiving => DimensionSlider {
                label: "Tactics",
                left: "Prospecting",
                right: "Judging",
            },
        }
    }
}

/// Labels a presentation layer uses to draw one dimension as a slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DimensionSlider {
    pub label: &'static str,
    pub left: &'static str,
    pub right: &'static str,
}

/// A single Likert item of the battery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub text: String,
    pub dimension: Dimension,
    /// Item is phrased against the dimension's second pole; its value is negated.
    pub reverse: bool,
}

/// A respondent's answer to one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub question_id: u32,
    pub value: i8,
}

/// Normalized dominance of each dimension's second pole, 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TraitScores {
    pub extraversion: u8,
    pub sensing: u8,
    pub thinking: u8,
    pub judging: u8,
}

impl TraitScores {
    pub const fn neutral() -> Self {
        Self {
            extraversion: NEUTRAL_SCORE,
            sensing: NEUTRAL_SCORE,
            thinking: NEUTRAL_SCORE,
            judging: NEUTRAL_SCORE,
        }
    }

    pub const fn get(&self, dimension: Dimension) -> u8 {
        match dimension {
            Dimension::ExtraversionIntroversion => self.extraversion,
            Dimension::SensingIntuition => self.sensing,
            Dimension::ThinkingFeeling => self.thinking,
            Dimension::JudgingPerceiving => self.judging,
        }
    }

    pub fn set(&mut self, dimension: Dimension, score: u8) {
        let slot = match dimension {
            Dimension::ExtraversionIntroversion => &mut self.extraversion,
            Dimension::SensingIntuition => &mut self.sensing,
            Dimension::ThinkingFeeling => &mut self.thinking,
            Dimension::JudgingPerceiving => &mut self.judging,
        };
        *slot = score.min(100);
    }
}

impl Default for TraitScores {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Four-letter categorical type over {E,I}×{S,N}×{T,F}×{J,P}.
///
/// Only conforming codes can be constructed, so every downstream mapping is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeCode {
    extraverted: bool,
    sensing: bool,
    thinking: bool,
    judging: bool,
}

impl TypeCode {
    pub const fn new(extraverted: bool, sensing: bool, thinking: bool, judging: bool) -> Self {
        Self {
            extraverted,
            sensing,
            thinking,
            judging,
        }
    }

    /// All sixteen codes, introverts first.
    pub fn all() -> [Self; 16] {
        let mut codes = [Self::new(false, false, false, false); 16];
        for (index, slot) in codes.iter_mut().enumerate() {
            *slot = Self::new(
                index & 0b1000 != 0,
                index & 0b0100 != 0,
                index & 0b0010 != 0,
                index & 0b0001 != 0,
            );
        }
        codes
    }

    pub const fn is_extraverted(&self) -> bool {
        self.extraverted
    }

    pub const fn is_sensing(&self) -> bool {
        self.sensing
    }

    pub const fn is_thinking(&self) -> bool {
        self.thinking
    }

    pub const fn is_judging(&self) -> bool {
        self.judging
    }

    /// Whether the code leans to the second pole of `dimension`.
    pub const fn leans_second_pole(&self, dimension: Dimension) -> bool {
        match dimension {
            Dimension::ExtraversionIntroversion => self.extraverted,
            Dimension::SensingIntuition => self.sensing,
            Dimension::ThinkingFeeling => self.thinking,
            Dimension::JudgingPerceiving => self.judging,
        }
    }

    pub fn letters(&self) -> [char; 4] {
        Dimension::ordered().map(|dimension| {
            if self.leans_second_pole(dimension) {
                dimension.second_pole_letter()
            } else {
                dimension.first_pole_letter()
            }
        })
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for letter in self.letters() {
            write!(f, "{letter}")?;
        }
        Ok(())
    }
}

/// Raised when a string is not a four-letter type code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a four-letter type code over E/I, S/N, T/F, J/P")]
pub struct TypeCodeError {
    pub value: String,
}

impl FromStr for TypeCode {
    type Err = TypeCodeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || TypeCodeError {
            value: raw.to_string(),
        };
        let letters: Vec<char> = raw.trim().to_ascii_uppercase().chars().collect();
        let [mind, energy, nature, tactics] = letters.as_slice() else {
            return Err(invalid());
        };

        let pick = |letter: char, dimension: Dimension| {
            if letter == dimension.second_pole_letter() {
                Some(true)
            } else if letter == dimension.first_pole_letter() {
                Some(false)
            } else {
                None
            }
        };

        match (
            pick(*mind, Dimension::ExtraversionIntroversion),
            pick(*energy, Dimension::SensingIntuition),
            pick(*nature, Dimension::ThinkingFeeling),
            pick(*tactics, Dimension::JudgingPerceiving),
        ) {
            (Some(e), Some(s), Some(t), Some(j)) => Ok(Self::new(e, s, t, j)),
            _ => Err(invalid()),
        }
    }
}

impl Serialize for TypeCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TypeCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_distinct_and_round_trip_through_text() {
        let codes = TypeCode::all();
        let rendered: HashSet<String> = codes.iter().map(TypeCode::to_string).collect();
        assert_eq!(rendered.len(), 16);
        for code in codes {
            let parsed: TypeCode = code.to_string().parse().expect("code parses");
            assert_eq!(parsed, code);
        }
        assert_eq!(codes[0].to_string(), "INFP");
        assert_eq!(codes[15].to_string(), "ESTJ");
    }

    #[test]
    fn parsing_is_case_insensitive_and_trims() {
        let code: TypeCode = " intj ".parse().expect("lowercase accepted");
        assert_eq!(code.to_string(), "INTJ");
    }

    #[test]
    fn parsing_rejects_letters_out_of_position() {
        for raw in ["", "INT", "INTJX", "NITJ", "IXTJ", "ESTQ"] {
            assert!(raw.parse::<TypeCode>().is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn scores_serialize_with_pole_names() {
        let scores = TraitScores {
            extraversion: 71,
            sensing: 20,
            thinking: 50,
            judging: 100,
        };
        let json = serde_json::to_value(scores).expect("serialize");
        assert_eq!(json["Extraversion"], 71);
        assert_eq!(json["Judging"], 100);
    }

    #[test]
    fn set_clamps_to_upper_bound() {
        let mut scores = TraitScores::neutral();
        scores.set(Dimension::ThinkingFeeling, 180);
        assert_eq!(scores.get(Dimension::ThinkingFeeling), 100);
    }

    #[test]
    fn type_code_serializes_as_string() {
        let code: TypeCode = "ENFP".parse().expect("valid");
        assert_eq!(serde_json::to_value(code).expect("serialize"), "ENFP");
        let back: TypeCode = serde_json::from_str("\"ENFP\"").expect("deserialize");
        assert_eq!(back, code);
        assert!(serde_json::from_str::<TypeCode>("\"EEEE\"").is_err());
    }
}
