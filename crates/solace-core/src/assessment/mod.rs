//! Structured assessments
//!
//! Question banks for PHQ-9, GAD-7 and a short custom check-in, and a pure
//! scorer mapping a completed answer set to a severity band.

mod questions;
mod scorer;

pub use questions::{questions_for, AnswerOption, Question};
pub use scorer::{score, AssessmentResult, Severity};

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Assessment instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssessmentKind {
    /// Patient Health Questionnaire (depression), 9 items
    Phq9,
    /// Generalized Anxiety Disorder scale, 7 items
    Gad7,
    /// Three-item daily check-in
    Custom,
}

impl AssessmentKind {
    /// Returns the string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Phq9 => "phq9",
            Self::Gad7 => "gad7",
            Self::Custom => "custom",
        }
    }

    /// Human-readable name
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Phq9 => "PHQ-9",
            Self::Gad7 => "GAD-7",
            Self::Custom => "Custom",
        }
    }
}

impl fmt::Display for AssessmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssessmentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "").as_str() {
            "phq9" => Ok(Self::Phq9),
            "gad7" => Ok(Self::Gad7),
            "custom" => Ok(Self::Custom),
            other => Err(Error::Validation(format!(
                "unknown assessment type: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind() {
        assert_eq!("PHQ-9".parse::<AssessmentKind>().unwrap(), AssessmentKind::Phq9);
        assert_eq!("gad7".parse::<AssessmentKind>().unwrap(), AssessmentKind::Gad7);
        assert!(matches!(
            "mmpi".parse::<AssessmentKind>(),
            Err(Error::Validation(_))
        ));
    }
}
