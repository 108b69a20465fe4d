//! Intent types

use crate::level::UrgencyLevel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Closed set of user intents.
///
/// Declaration order is the tie-break order when two intents score equally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Hello, how are you
    Greeting,
    /// Goodbye, thanks
    Farewell,
    /// Self-harm or suicidal statements
    Crisis,
    /// Low mood
    Depression,
    /// Worry, panic
    Anxiety,
    /// Insomnia, nightmares
    SleepIssues,
    /// Partner, family, friends
    RelationshipIssues,
    /// Job pressure
    WorkStress,
    /// Wants a questionnaire
    AssessmentRequest,
    /// Wants advice
    RecommendationRequest,
    /// Wants to log mood
    MoodTracking,
    /// Asks about therapists
    ProfessionalHelp,
    /// Asks about medication
    Medication,
    /// Asks about coping techniques
    CopingStrategies,
    /// Anything else
    GeneralQuestion,
}

impl Intent {
    /// All intents in tie-break order
    pub const ALL: [Self; 15] = [
        Self::Greeting,
        Self::Farewell,
        Self::Crisis,
        Self::Depression,
        Self::Anxiety,
        Self::SleepIssues,
        Self::RelationshipIssues,
        Self::WorkStress,
        Self::AssessmentRequest,
        Self::RecommendationRequest,
        Self::MoodTracking,
        Self::ProfessionalHelp,
        Self::Medication,
        Self::CopingStrategies,
        Self::GeneralQuestion,
    ];

    /// Returns the string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::Farewell => "farewell",
            Self::Crisis => "crisis",
            Self::Depression => "depression",
            Self::Anxiety => "anxiety",
            Self::SleepIssues => "sleep_issues",
            Self::RelationshipIssues => "relationship_issues",
            Self::WorkStress => "work_stress",
            Self::AssessmentRequest => "assessment_request",
            Self::RecommendationRequest => "recommendation_request",
            Self::MoodTracking => "mood_tracking",
            Self::ProfessionalHelp => "professional_help",
            Self::Medication => "medication",
            Self::CopingStrategies => "coping_strategies",
            Self::GeneralQuestion => "general_question",
        }
    }

    /// Canned reply used when no generator is available
    #[must_use]
    pub fn response_template(&self) -> &'static str {
        match self {
            Self::Greeting => "Hello! I'm here to support you. How are you feeling today?",
            Self::Farewell => "Take care! Remember, I'm always here if you need to talk.",
            Self::Crisis => "I'm concerned about what you're saying. Please reach out to a crisis hotline immediately. National Suicide Prevention Lifeline: 988",
            Self::Depression => "I hear that you're feeling depressed. That must be really difficult. Would you like to talk about what's been going on?",
            Self::Anxiety => "It sounds like you're experiencing anxiety. That can be overwhelming. What's making you feel anxious right now?",
            Self::SleepIssues => "Sleep problems can really affect your mental health. What's been keeping you up at night?",
            Self::RelationshipIssues => "Relationship problems can be stressful. Would you like to talk about what's happening?",
            Self::WorkStress => "Work stress can be overwhelming. What's been particularly challenging at work lately?",
            Self::AssessmentRequest => "I'd be happy to help you with an assessment. We have PHQ-9 for depression and GAD-7 for anxiety. Which would you like to take?",
            Self::RecommendationRequest => "I'd be glad to suggest some strategies that might help. What specific area would you like support with?",
            Self::MoodTracking => "Tracking your mood is a great way to understand your patterns. How are you feeling right now on a scale of 1-10?",
            Self::ProfessionalHelp => "Seeking professional help is a positive step. I can help you understand what to expect from therapy or counseling.",
            Self::Medication => "Medication can be an important part of mental health treatment. What questions do you have about your medication?",
            Self::CopingStrategies => "There are many effective coping strategies. What situations are you looking to manage better?",
            Self::GeneralQuestion => "I'm here to help with your questions. What would you like to know more about?",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|i| i.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown intent: {s}"))
    }
}

/// Surface cues of one message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentContext {
    /// Contains a question mark
    pub has_question: bool,
    /// Contains an exclamation mark
    pub has_exclamation: bool,
    /// Whitespace-separated words
    pub word_count: usize,
    /// Contains a negation word
    pub has_negation: bool,
    /// Contains an intensifier
    pub has_intensifiers: bool,
    /// Mentions a point or span of time
    pub has_time_reference: bool,
    /// Expresses uncertainty
    pub has_uncertainty: bool,
}

/// Intent signal for one utterance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentSignal {
    /// Winning intent
    pub primary_intent: Intent,
    /// Combined score of the winning intent, `[0, 1]`
    pub confidence: f64,
    /// Combined score of every intent seen by either path
    pub all_intents: BTreeMap<Intent, f64>,
    /// Urgency of the message
    pub urgency_level: UrgencyLevel,
    /// Surface cues
    #[serde(default)]
    pub context: IntentContext,
}

impl IntentSignal {
    /// Fallback signal when nothing matched
    #[must_use]
    pub fn general() -> Self {
        Self {
            primary_intent: Intent::GeneralQuestion,
            confidence: 0.1,
            all_intents: BTreeMap::new(),
            urgency_level: UrgencyLevel::Low,
            context: IntentContext::default(),
        }
    }

    /// Whether the message warrants a human taking over
    #[must_use]
    pub fn should_escalate_to_human(&self) -> bool {
        match self.primary_intent {
            Intent::Crisis => true,
            _ if self.urgency_level == UrgencyLevel::High && self.confidence > 0.7 => true,
            Intent::ProfessionalHelp => self.confidence > 0.8,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_round_trips_through_str() {
        for intent in Intent::ALL {
            assert_eq!(intent.as_str().parse::<Intent>(), Ok(intent));
        }
        assert!("smalltalk".parse::<Intent>().is_err());
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&Intent::SleepIssues).unwrap();
        assert_eq!(json, "\"sleep_issues\"");
    }

    #[test]
    fn test_should_escalate_to_human() {
        let mut signal = IntentSignal::general();
        assert!(!signal.should_escalate_to_human());

        signal.primary_intent = Intent::Crisis;
        assert!(signal.should_escalate_to_human());

        signal.primary_intent = Intent::ProfessionalHelp;
        signal.confidence = 0.75;
        assert!(!signal.should_escalate_to_human());
        signal.confidence = 0.85;
        assert!(signal.should_escalate_to_human());

        signal.primary_intent = Intent::Anxiety;
        signal.urgency_level = UrgencyLevel::High;
        assert!(signal.should_escalate_to_human());
    }
}
