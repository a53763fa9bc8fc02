//! Jungian cognitive-function stacks.
//!
//! Every type pairs one judging process (Thinking or Feeling) with one
//! perceiving process (Sensing or Intuition). Judging types extravert their
//! judging process and introvert their perceiving process; perceiving types do
//! the reverse. Extraverts lead with whichever process is extraverted,
//! introverts with whichever is introverted. The lower half of the stack mirrors
//! the upper half through the fixed opposite table.

use super::domain::TypeCode;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attitude {
    Extraverted,
    Introverted,
}

impl Attitude {
    const fn from_extraverted(extraverted: bool) -> Self {
        if extraverted {
            Self::Extraverted
        } else {
            Self::Introverted
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CognitiveFunction {
    Te,
    Ti,
    Fe,
    Fi,
    Se,
    Si,
    Ne,
    Ni,
}

impl CognitiveFunction {
    pub const ALL: [Self; 8] = [
        Self::Te,
        Self::Ti,
        Self::Fe,
        Self::Fi,
        Self::Se,
        Self::Si,
        Self::Ne,
        Self::Ni,
    ];

    pub const fn abbreviation(self) -> &'static str {
        match self {
            Self::Te => "Te",
            Self::Ti => "Ti",
            Self::Fe => "Fe",
            Self::Fi => "Fi",
            Self::Se => "Se",
            Self::Si => "Si",
            Self::Ne => "Ne",
            Self::Ni => "Ni",
        }
    }

    pub const fn full_name(self) -> &'static str {
        match self {
            Self::Te => "Extraverted Thinking",
            Self::Ti => "Introverted Thinking",
            Self::Fe => "Extraverted Feeling",
            Self::Fi => "Introverted Feeling",
            Self::Se => "Extraverted Sensing",
            Self::Si => "Introverted Sensing",
            Self::Ne => "Extraverted Intuition",
            Self::Ni => "Introverted Intuition",
        }
    }

    pub const fn attitude(self) -> Attitude {
        match self {
            Self::Te | Self::Fe | Self::Se | Self::Ne => Attitude::Extraverted,
            Self::Ti | Self::Fi | Self::Si | Self::Ni => Attitude::Introverted,
        }
    }

    /// Shadow partner: both the process and the attitude flip.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Te => Self::Fi,
            Self::Ti => Self::Fe,
            Self::Fe => Self::Ti,
            Self::Fi => Self::Te,
            Self::Se => Self::Ni,
            Self::Si => Self::Ne,
            Self::Ne => Self::Si,
            Self::Ni => Self::Se,
        }
    }

    const fn judging(thinking: bool, attitude: Attitude) -> Self {
        match (thinking, attitude) {
            (true, Attitude::Extraverted) => Self::Te,
            (true, Attitude::Introverted) => Self::Ti,
            (false, Attitude::Extraverted) => Self::Fe,
            (false, Attitude::Introverted) => Self::Fi,
        }
    }

    const fn perceiving(sensing: bool, attitude: Attitude) -> Self {
        match (sensing, attitude) {
            (true, Attitude::Extraverted) => Self::Se,
            (true, Attitude::Introverted) => Self::Si,
            (false, Attitude::Extraverted) => Self::Ne,
            (false, Attitude::Introverted) => Self::Ni,
        }
    }
}

impl fmt::Display for CognitiveFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

/// Ordered dominant → inferior functions for one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CognitiveStack {
    pub dominant: CognitiveFunction,
    pub auxiliary: CognitiveFunction,
    pub tertiary: CognitiveFunction,
    pub inferior: CognitiveFunction,
    pub explanation: String,
}

impl CognitiveStack {
    pub fn functions(&self) -> [CognitiveFunction; 4] {
        [self.dominant, self.auxiliary, self.tertiary, self.inferior]
    }
}

pub fn derive_stack(code: TypeCode) -> CognitiveStack {
    let judging_attitude = Attitude::from_extraverted(code.is_judging());
    let perceiving_attitude = Attitude::from_extraverted(!code.is_judging());

    let judging = CognitiveFunction::judging(code.is_thinking(), judging_attitude);
    let perceiving = CognitiveFunction::perceiving(code.is_sensing(), perceiving_attitude);

    let (dominant, auxiliary) = match (code.is_extraverted(), code.is_judging()) {
        (true, true) => (judging, perceiving),
        (true, false) => (perceiving, judging),
        (false, true) => (perceiving, judging),
        (false, false) => (judging, perceiving),
    };

    let lens = match dominant.attitude() {
        Attitude::Introverted => "internal reflection",
        Attitude::Extraverted => "external action",
    };
    let explanation = format!(
        "Your mental hierarchy is led by {}, so you meet reality through {lens}. {} supports it as a dependable second perspective.",
        dominant.full_name(),
        auxiliary.full_name(),
    );

    CognitiveStack {
        dominant,
        auxiliary,
        tertiary: auxiliary.opposite(),
        inferior: dominant.opposite(),
        explanation,
    }
}
