//! Intent detector

use super::classifier::IntentClassifier;
use super::patterns::pattern_scores;
use super::types::{Intent, IntentContext, IntentSignal};
use super::vote::WeightedVote;
use crate::level::UrgencyLevel;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Substrings that make any message high urgency
const HIGH_URGENCY_KEYWORDS: &[&str] = &[
    "urgent",
    "emergency",
    "crisis",
    "help",
    "now",
    "immediately",
    "can't take it",
    "breaking down",
    "falling apart",
];

/// Intents that are medium urgency by themselves
const MEDIUM_URGENCY_INTENTS: &[Intent] = &[
    Intent::Depression,
    Intent::Anxiety,
    Intent::ProfessionalHelp,
];

const NEGATIONS: &[&str] = &["not", "no", "never", "can't", "won't", "don't"];
const INTENSIFIERS: &[&str] = &["very", "really", "extremely", "so", "too"];
const TIME_WORDS: &[&str] = &[
    "today",
    "yesterday",
    "tomorrow",
    "now",
    "recently",
    "always",
    "never",
];
const UNCERTAINTY_WORDS: &[&str] = &["maybe", "perhaps", "might", "could", "possibly"];

/// Pattern tables blended with an optional learned classifier
#[derive(Clone, Default)]
pub struct IntentDetector {
    classifier: Option<Arc<dyn IntentClassifier>>,
    vote: WeightedVote,
}

impl fmt::Debug for IntentDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntentDetector")
            .field("classifier", &self.classifier.is_some())
            .field("vote", &self.vote)
            .finish()
    }
}

impl IntentDetector {
    /// Pattern-only detector
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a learned classifier
    #[must_use]
    pub fn with_classifier(mut self, classifier: Arc<dyn IntentClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Replace the voting strategy
    #[must_use]
    pub fn with_vote(mut self, vote: WeightedVote) -> Self {
        self.vote = vote;
        self
    }

    /// Whether a learned classifier is attached
    #[must_use]
    pub fn has_classifier(&self) -> bool {
        self.classifier.is_some()
    }

    /// Detect the intent of one utterance
    #[must_use]
    pub fn detect(&self, text: &str) -> IntentSignal {
        if text.trim().is_empty() {
            return IntentSignal::general();
        }

        let lower = text.to_lowercase();
        let pattern = pattern_scores(&lower);
        let model = self.model_scores(text);

        let all_intents = self.vote.combine(&pattern, &model);
        let (primary_intent, confidence) = WeightedVote::winner(&all_intents);
        let urgency_level = urgency(&lower, primary_intent);

        debug!(
            intent = %primary_intent,
            confidence,
            urgency = %urgency_level,
            "Intent detected"
        );

        IntentSignal {
            primary_intent,
            confidence,
            all_intents,
            urgency_level,
            context: context_cues(&lower),
        }
    }

    fn model_scores(&self, text: &str) -> BTreeMap<Intent, f64> {
        let Some(classifier) = &self.classifier else {
            return BTreeMap::new();
        };
        match classifier.predict_proba(text) {
            Ok(scores) => scores,
            Err(e) => {
                warn!(error = %e, "Intent classifier failed, using patterns only");
                BTreeMap::new()
            }
        }
    }
}

fn urgency(lower: &str, primary: Intent) -> UrgencyLevel {
    if primary == Intent::Crisis {
        return UrgencyLevel::High;
    }
    if HIGH_URGENCY_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return UrgencyLevel::High;
    }
    if MEDIUM_URGENCY_INTENTS.contains(&primary) {
        return UrgencyLevel::Medium;
    }
    UrgencyLevel::Low
}

fn context_cues(lower: &str) -> IntentContext {
    let words: Vec<&str> = lower
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !(c.is_alphanumeric() || c == '\'')))
        .collect();
    let has_word = |list: &[&str]| words.iter().any(|w| list.contains(w));

    IntentContext {
        has_question: lower.contains('?'),
        has_exclamation: lower.contains('!'),
        word_count: words.len(),
        has_negation: has_word(NEGATIONS),
        has_intensifiers: has_word(INTENSIFIERS),
        has_time_reference: has_word(TIME_WORDS),
        has_uncertainty: has_word(UNCERTAINTY_WORDS) || lower.contains("not sure"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::intent::classifier::MockIntentClassifier;

    #[test]
    fn test_greeting() {
        let signal = IntentDetector::new().detect("Hello, how are you?");
        assert_eq!(signal.primary_intent, Intent::Greeting);
        assert!((signal.confidence - 0.7 * 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(signal.urgency_level, UrgencyLevel::Low);
        assert!(signal.context.has_question);
    }

    #[test]
    fn test_crisis_is_high_urgency() {
        let signal = IntentDetector::new().detect("I want to kill myself");
        assert_eq!(signal.primary_intent, Intent::Crisis);
        assert!((signal.confidence - 0.7 * 0.25).abs() < 1e-9);
        assert_eq!(signal.urgency_level, UrgencyLevel::High);
    }

    #[test]
    fn test_anxiety_is_medium_urgency() {
        let signal = IntentDetector::new().detect("I'm anxious and stressed, I feel scared");
        assert_eq!(signal.primary_intent, Intent::Anxiety);
        assert_eq!(signal.urgency_level, UrgencyLevel::Medium);
    }

    #[test]
    fn test_urgency_keyword_raises_urgency() {
        let signal = IntentDetector::new().detect("my boss is awful, this is an emergency");
        assert_eq!(signal.primary_intent, Intent::WorkStress);
        assert_eq!(signal.urgency_level, UrgencyLevel::High);
    }

    #[test]
    fn test_work_beats_mood_on_tie() {
        // work_stress and mood_tracking both match one of three patterns
        let signal = IntentDetector::new().detect("feeling stressed at work");
        assert_eq!(signal.primary_intent, Intent::WorkStress);
        assert!(signal.all_intents.contains_key(&Intent::MoodTracking));
    }

    #[test]
    fn test_no_match_defaults_to_general_question() {
        let detector = IntentDetector::new();
        for text in ["", "   ", "purple elephants"] {
            let signal = detector.detect(text);
            assert_eq!(signal.primary_intent, Intent::GeneralQuestion);
            assert!((signal.confidence - 0.1).abs() < 1e-12);
        }
    }

    #[test]
    fn test_classifier_contributes_thirty_percent() {
        let mut classifier = MockIntentClassifier::new();
        classifier
            .expect_predict_proba()
            .returning(|_| Ok(BTreeMap::from([(Intent::SleepIssues, 1.0)])));

        let detector = IntentDetector::new().with_classifier(Arc::new(classifier));
        let signal = detector.detect("purple elephants");
        assert_eq!(signal.primary_intent, Intent::SleepIssues);
        assert!((signal.confidence - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_failing_classifier_degrades_to_patterns() {
        let mut classifier = MockIntentClassifier::new();
        classifier
            .expect_predict_proba()
            .times(1)
            .returning(|_| Err(Error::Classifier("model file missing".to_string())));

        let detector = IntentDetector::new().with_classifier(Arc::new(classifier));
        let signal = detector.detect("Hello, how are you?");
        assert_eq!(signal.primary_intent, Intent::Greeting);
        assert!((signal.confidence - 0.7 * 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_seeded_classifier_with_patterns() {
        let classifier = crate::intent::NaiveBayesClassifier::seeded().unwrap();
        let detector = IntentDetector::new().with_classifier(Arc::new(classifier));
        let signal = detector.detect("stressed at work");
        assert_eq!(signal.primary_intent, Intent::WorkStress);
        assert!(signal.confidence > 0.7 / 3.0);
    }

    #[test]
    fn test_context_cues() {
        let signal = IntentDetector::new().detect("Maybe I'm not sure, is it always like this?");
        assert!(signal.context.has_question);
        assert!(signal.context.has_negation);
        assert!(signal.context.has_time_reference);
        assert!(signal.context.has_uncertainty);
        assert_eq!(signal.context.word_count, 9);
    }
}
