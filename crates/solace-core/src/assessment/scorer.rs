//! Assessment scoring

use super::AssessmentKind;
use serde::{Deserialize, Serialize};
use solace_nlp::RiskLevel;
use std::collections::BTreeMap;
use std::fmt;

/// Maximum PHQ-9 score
pub const PHQ9_MAX: i32 = 27;

/// Maximum GAD-7 score
pub const GAD7_MAX: i32 = 21;

/// Points per custom item
const CUSTOM_POINTS_PER_ITEM: i32 = 5;

/// Severity band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// PHQ-9 / GAD-7: 0-4
    Minimal,
    /// PHQ-9 / GAD-7: 5-9
    Mild,
    /// PHQ-9 / GAD-7: 10-14; custom: 40-60%
    Moderate,
    /// PHQ-9: 15-19
    ModeratelySevere,
    /// PHQ-9: 20+, GAD-7: 15+
    Severe,
    /// Custom: up to 20%
    VeryLow,
    /// Custom: 20-40%
    Low,
    /// Custom: 60-80%
    High,
    /// Custom: above 80%
    VeryHigh,
}

impl Severity {
    /// Returns the string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Mild => "mild",
            Self::Moderate => "moderate",
            Self::ModeratelySevere => "moderately_severe",
            Self::Severe => "severe",
            Self::VeryLow => "very_low",
            Self::Low => "low",
            Self::High => "high",
            Self::VeryHigh => "very_high",
        }
    }

    /// Wording used in interpretations
    #[must_use]
    pub fn phrase(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scored assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    /// Instrument
    #[serde(rename = "type")]
    pub kind: AssessmentKind,
    /// Sum of all answers
    pub total_score: i32,
    /// Severity band
    pub severity_level: Severity,
    /// Highest possible score
    pub max_score: i32,
    /// One-line interpretation
    pub interpretation: String,
    /// Clinical risk for PHQ-9 and GAD-7; none for the custom check-in
    pub risk_level: Option<RiskLevel>,
    /// Band-specific advice
    pub recommendations: Vec<String>,
}

/// Score a completed answer set. Pure; never fails.
#[must_use]
pub fn score(kind: AssessmentKind, responses: &BTreeMap<String, i32>) -> AssessmentResult {
    let total_score = responses
        .values()
        .fold(0_i32, |total, value| total.saturating_add(*value));

    match kind {
        AssessmentKind::Phq9 => {
            let severity = match total_score {
                i32::MIN..=4 => Severity::Minimal,
                5..=9 => Severity::Mild,
                10..=14 => Severity::Moderate,
                15..=19 => Severity::ModeratelySevere,
                _ => Severity::Severe,
            };
            AssessmentResult {
                kind,
                total_score,
                severity_level: severity,
                max_score: PHQ9_MAX,
                interpretation: format!(
                    "PHQ-9 score of {} indicates {} depression",
                    total_score,
                    severity.phrase()
                ),
                risk_level: Some(clinical_risk(severity)),
                recommendations: depression_advice(severity),
            }
        }
        AssessmentKind::Gad7 => {
            let severity = match total_score {
                i32::MIN..=4 => Severity::Minimal,
                5..=9 => Severity::Mild,
                10..=14 => Severity::Moderate,
                _ => Severity::Severe,
            };
            AssessmentResult {
                kind,
                total_score,
                severity_level: severity,
                max_score: GAD7_MAX,
                interpretation: format!(
                    "GAD-7 score of {} indicates {} anxiety",
                    total_score,
                    severity.phrase()
                ),
                risk_level: Some(clinical_risk(severity)),
                recommendations: anxiety_advice(severity),
            }
        }
        AssessmentKind::Custom => {
            let max_score = i32::try_from(responses.len())
                .unwrap_or(i32::MAX)
                .saturating_mul(CUSTOM_POINTS_PER_ITEM);
            let total = f64::from(total_score);
            let max = f64::from(max_score);
            let severity = if total <= max * 0.2 {
                Severity::VeryLow
            } else if total <= max * 0.4 {
                Severity::Low
            } else if total <= max * 0.6 {
                Severity::Moderate
            } else if total <= max * 0.8 {
                Severity::High
            } else {
                Severity::VeryHigh
            };
            AssessmentResult {
                kind,
                total_score,
                severity_level: severity,
                max_score,
                interpretation: format!(
                    "Custom assessment score of {}/{} indicates {} level",
                    total_score,
                    max_score,
                    severity.phrase()
                ),
                risk_level: None,
                recommendations: Vec::new(),
            }
        }
    }
}

fn clinical_risk(severity: Severity) -> RiskLevel {
    match severity {
        Severity::Minimal | Severity::Mild => RiskLevel::Low,
        Severity::Moderate => RiskLevel::Medium,
        _ => RiskLevel::High,
    }
}

fn depression_advice(severity: Severity) -> Vec<String> {
    let advice: &[&str] = match severity {
        Severity::Minimal => &["Continue current practices", "Monitor mood regularly"],
        Severity::Mild => &["Consider counseling", "Regular exercise", "Social activities"],
        Severity::Moderate => &[
            "Professional therapy recommended",
            "Consider medication evaluation",
        ],
        Severity::ModeratelySevere => &[
            "Immediate professional help",
            "Consider medication",
            "Crisis support",
        ],
        _ => &[
            "Emergency professional intervention",
            "Crisis hotline contact",
            "Immediate support needed",
        ],
    };
    advice.iter().map(|s| (*s).to_string()).collect()
}

fn anxiety_advice(severity: Severity) -> Vec<String> {
    let advice: &[&str] = match severity {
        Severity::Minimal => &["Continue current practices", "Monitor anxiety levels"],
        Severity::Mild => &[
            "Breathing exercises",
            "Mindfulness practice",
            "Regular exercise",
        ],
        Severity::Moderate => &[
            "Professional therapy (CBT)",
            "Anxiety management techniques",
        ],
        _ => &[
            "Immediate professional help",
            "Consider medication evaluation",
            "Crisis support",
        ],
    };
    advice.iter().map(|s| (*s).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(prefix: &str, values: &[i32]) -> BTreeMap<String, i32> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| (format!("{}_{}", prefix, i + 1), *v))
            .collect()
    }

    #[test]
    fn test_phq9_sum_8_is_mild_low_risk() {
        for values in [
            vec![1, 1, 1, 1, 1, 1, 1, 1, 0],
            vec![3, 3, 2, 0, 0, 0, 0, 0, 0],
            vec![0, 0, 0, 0, 0, 0, 0, 3, 5],
        ] {
            let result = score(AssessmentKind::Phq9, &answers("phq9", &values));
            assert_eq!(result.total_score, 8);
            assert_eq!(result.severity_level, Severity::Mild);
            assert_eq!(result.risk_level, Some(RiskLevel::Low));
            assert_eq!(result.max_score, 27);
        }
    }

    #[test]
    fn test_phq9_sum_20_is_severe() {
        let result = score(
            AssessmentKind::Phq9,
            &answers("phq9", &[3, 3, 3, 3, 2, 2, 2, 1, 1]),
        );
        assert_eq!(result.total_score, 20);
        assert_eq!(result.severity_level, Severity::Severe);
        assert_eq!(result.risk_level, Some(RiskLevel::High));
        assert_eq!(
            result.interpretation,
            "PHQ-9 score of 20 indicates severe depression"
        );
    }

    #[test]
    fn test_phq9_band_edges() {
        let cases = [
            (4, Severity::Minimal),
            (5, Severity::Mild),
            (9, Severity::Mild),
            (10, Severity::Moderate),
            (14, Severity::Moderate),
            (15, Severity::ModeratelySevere),
            (19, Severity::ModeratelySevere),
            (27, Severity::Severe),
        ];
        for (total, expected) in cases {
            let responses = BTreeMap::from([("phq9_1".to_string(), total)]);
            assert_eq!(score(AssessmentKind::Phq9, &responses).severity_level, expected);
        }
        let result = score(
            AssessmentKind::Phq9,
            &BTreeMap::from([("phq9_1".to_string(), 17)]),
        );
        assert_eq!(
            result.interpretation,
            "PHQ-9 score of 17 indicates moderately severe depression"
        );
    }

    #[test]
    fn test_gad7_sum_10_is_moderate() {
        let result = score(AssessmentKind::Gad7, &answers("gad7", &[2, 2, 2, 1, 1, 1, 1]));
        assert_eq!(result.total_score, 10);
        assert_eq!(result.severity_level, Severity::Moderate);
        assert_eq!(result.risk_level, Some(RiskLevel::Medium));
        assert_eq!(result.max_score, 21);

        let severe = score(AssessmentKind::Gad7, &answers("gad7", &[3, 3, 3, 3, 3, 0, 0]));
        assert_eq!(severe.severity_level, Severity::Severe);
    }

    #[test]
    fn test_custom_bands_use_response_count() {
        // max = 15
        let cases = [
            (&[1, 1, 1][..], Severity::VeryLow),
            (&[2, 2, 2][..], Severity::Low),
            (&[3, 3, 3][..], Severity::Moderate),
            (&[4, 4, 4][..], Severity::High),
            (&[5, 5, 3][..], Severity::VeryHigh),
        ];
        for (values, expected) in cases {
            let result = score(AssessmentKind::Custom, &answers("custom", values));
            assert_eq!(result.max_score, 15);
            assert_eq!(result.severity_level, expected, "values {values:?}");
            assert_eq!(result.risk_level, None);
        }
    }

    #[test]
    fn test_empty_responses_do_not_panic() {
        let empty = BTreeMap::new();
        assert_eq!(score(AssessmentKind::Phq9, &empty).severity_level, Severity::Minimal);
        assert_eq!(score(AssessmentKind::Custom, &empty).severity_level, Severity::VeryLow);
    }

    #[test]
    fn test_extreme_values_saturate() {
        let high: BTreeMap<String, i32> =
            (1..=3).map(|i| (format!("phq9_{i}"), i32::MAX)).collect();
        let result = score(AssessmentKind::Phq9, &high);
        assert_eq!(result.total_score, i32::MAX);
        assert_eq!(result.severity_level, Severity::Severe);

        let low: BTreeMap<String, i32> =
            (1..=3).map(|i| (format!("gad7_{i}"), i32::MIN)).collect();
        let result = score(AssessmentKind::Gad7, &low);
        assert_eq!(result.total_score, i32::MIN);
        assert_eq!(result.severity_level, Severity::Minimal);
    }
}
