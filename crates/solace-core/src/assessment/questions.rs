//! Question banks

use super::AssessmentKind;
use serde::{Deserialize, Serialize};

/// One selectable answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    /// Score contributed by this answer
    pub value: i32,
    /// Answer text
    pub label: String,
}

/// One question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Stable identifier, e.g. `phq9_3`
    pub id: String,
    /// Question text
    pub text: String,
    /// Allowed answers
    pub options: Vec<AnswerOption>,
}

impl Question {
    /// Whether `value` is one of the allowed answers
    #[must_use]
    pub fn accepts(&self, value: i32) -> bool {
        self.options.iter().any(|o| o.value == value)
    }
}

const FREQUENCY_LABELS: [&str; 4] = [
    "Not at all",
    "Several days",
    "More than half the days",
    "Nearly every day",
];

const PHQ9_ITEMS: [&str; 9] = [
    "Little interest or pleasure in doing things",
    "Feeling down, depressed, or hopeless",
    "Trouble falling or staying asleep, or sleeping too much",
    "Feeling tired or having little energy",
    "Poor appetite or overeating",
    "Feeling bad about yourself - or that you are a failure or have let yourself or your family down",
    "Trouble concentrating on things, such as reading the newspaper or watching television",
    "Moving or speaking so slowly that other people could have noticed, or the opposite - being so fidgety or restless that you have been moving around a lot more than usual",
    "Thoughts that you would be better off dead, or of hurting yourself",
];

const GAD7_ITEMS: [&str; 7] = [
    "Feeling nervous, anxious, or on edge",
    "Not being able to stop or control worrying",
    "Worrying too much about different things",
    "Trouble relaxing",
    "Being so restless that it is hard to sit still",
    "Becoming easily annoyed or irritable",
    "Feeling afraid, as if something awful might happen",
];

const CUSTOM_ITEMS: [(&str, [&str; 5]); 3] = [
    (
        "How would you rate your overall mood today?",
        ["Very poor", "Poor", "Fair", "Good", "Excellent"],
    ),
    (
        "How well did you sleep last night?",
        ["Very poorly", "Poorly", "Fairly well", "Well", "Very well"],
    ),
    (
        "How would you rate your stress level today?",
        ["Very low", "Low", "Moderate", "High", "Very high"],
    ),
];

fn frequency_question(prefix: &str, index: usize, text: &str) -> Question {
    Question {
        id: format!("{}_{}", prefix, index + 1),
        text: text.to_string(),
        options: FREQUENCY_LABELS
            .iter()
            .enumerate()
            .map(|(value, label)| AnswerOption {
                value: value as i32,
                label: (*label).to_string(),
            })
            .collect(),
    }
}

/// Ordered questions of an instrument
#[must_use]
pub fn questions_for(kind: AssessmentKind) -> Vec<Question> {
    match kind {
        AssessmentKind::Phq9 => PHQ9_ITEMS
            .iter()
            .enumerate()
            .map(|(i, text)| frequency_question("phq9", i, text))
            .collect(),
        AssessmentKind::Gad7 => GAD7_ITEMS
            .iter()
            .enumerate()
            .map(|(i, text)| frequency_question("gad7", i, text))
            .collect(),
        AssessmentKind::Custom => CUSTOM_ITEMS
            .iter()
            .enumerate()
            .map(|(i, (text, labels))| Question {
                id: format!("custom_{}", i + 1),
                text: (*text).to_string(),
                options: labels
                    .iter()
                    .enumerate()
                    .map(|(v, label)| AnswerOption {
                        value: v as i32 + 1,
                        label: (*label).to_string(),
                    })
                    .collect(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_sizes_and_ids() {
        let phq9 = questions_for(AssessmentKind::Phq9);
        assert_eq!(phq9.len(), 9);
        assert_eq!(phq9[0].id, "phq9_1");
        assert_eq!(phq9[8].id, "phq9_9");

        let gad7 = questions_for(AssessmentKind::Gad7);
        assert_eq!(gad7.len(), 7);
        assert_eq!(gad7[6].options[3].label, "Nearly every day");

        let custom = questions_for(AssessmentKind::Custom);
        assert_eq!(custom.len(), 3);
        assert!(custom[0].accepts(5));
        assert!(!custom[0].accepts(0));
        assert!(phq9[0].accepts(0));
        assert!(!phq9[0].accepts(4));
    }
}
