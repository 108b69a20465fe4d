//! Sentiment analysis
//!
//! Combines the lexicon polarity with keyword indicator counts and an
//! optional emotion model, then derives a risk level with a weighted point
//! system. Analysis never fails: a missing or failing model only removes its
//! contribution.

use crate::error::Result;
use crate::lexicon::{tokenize, Lexicon};
use crate::level::RiskLevel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Polarity above this is positive, below its negation negative
pub const NEUTRAL_BAND: f64 = 0.1;

/// Emotion reported when nothing else is known
pub const NEUTRAL_EMOTION: &str = "neutral";

/// Emotions that add to the risk score
const DISTRESS_EMOTIONS: &[&str] = &["sadness", "anger", "fear"];

/// Mental-health indicator phrase categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorCategory {
    /// Statements of self-harm or suicidal intent
    Crisis,
    /// Requests for help
    SupportSeeking,
    /// Mentions of coping activities
    Coping,
    /// Signs of social isolation
    Social,
    /// Physical symptoms
    Physical,
}

impl IndicatorCategory {
    /// All categories in reporting order
    pub const ALL: [Self; 5] = [
        Self::Crisis,
        Self::SupportSeeking,
        Self::Coping,
        Self::Social,
        Self::Physical,
    ];

    /// Phrases counted for this category
    #[must_use]
    pub fn phrases(&self) -> &'static [&'static str] {
        match self {
            Self::Crisis => &[
                "kill myself",
                "end it all",
                "not worth living",
                "better off dead",
                "hurt myself",
                "suicide",
                "overdose",
                "jump off",
                "hang myself",
            ],
            Self::SupportSeeking => &[
                "need help",
                "can't cope",
                "don't know what to do",
                "feeling lost",
                "need support",
                "reaching out",
                "cry for help",
            ],
            Self::Coping => &[
                "meditation",
                "breathing",
                "exercise",
                "therapy",
                "counseling",
                "talking to someone",
                "journaling",
                "mindfulness",
            ],
            Self::Social => &[
                "lonely",
                "isolated",
                "alone",
                "no friends",
                "social anxiety",
                "avoiding people",
                "withdrawn",
            ],
            Self::Physical => &[
                "headache",
                "stomach ache",
                "tired",
                "exhausted",
                "sleep problems",
                "appetite",
                "weight loss",
                "weight gain",
                "pain",
            ],
        }
    }

    /// Number of this category's phrases present in lowercased text
    #[must_use]
    pub fn count_in(&self, lower: &str) -> u32 {
        self.phrases().iter().filter(|p| lower.contains(*p)).count() as u32
    }
}

/// Sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    /// Polarity above the neutral band
    Positive,
    /// Polarity inside the neutral band
    #[default]
    Neutral,
    /// Polarity below the neutral band
    Negative,
}

impl SentimentLabel {
    /// Label for a polarity value
    #[must_use]
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > NEUTRAL_BAND {
            Self::Positive
        } else if polarity < -NEUTRAL_BAND {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    /// Returns the string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of sentiment over several messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    /// Recent polarity clearly above earlier polarity
    Improving,
    /// No clear movement
    #[default]
    Stable,
    /// Recent polarity clearly below earlier polarity
    Declining,
}

impl TrendDirection {
    /// Compare a recent mean with an earlier mean using the 0.1 band
    #[must_use]
    pub fn compare(recent: f64, earlier: f64) -> Self {
        if recent > earlier + NEUTRAL_BAND {
            Self::Improving
        } else if recent < earlier - NEUTRAL_BAND {
            Self::Declining
        } else {
            Self::Stable
        }
    }
}

/// Sentiment signal for one utterance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentSignal {
    /// Polarity in `[-1, 1]`
    pub polarity: f64,
    /// Subjectivity in `[0, 1]`
    pub subjectivity: f64,
    /// Label derived from polarity
    pub label: SentimentLabel,
    /// `|polarity|`
    pub confidence: f64,
    /// Emotion scores from the emotion model (empty when none ran)
    pub emotions: BTreeMap<String, f64>,
    /// Highest-scoring emotion, `neutral` when unknown
    pub primary_emotion: String,
    /// Indicator phrase counts per category
    pub mental_health_indicator_counts: BTreeMap<IndicatorCategory, u32>,
    /// Risk level from the weighted point system
    pub risk_level: RiskLevel,
}

impl SentimentSignal {
    /// Neutral signal used for empty input
    #[must_use]
    pub fn neutral() -> Self {
        Self {
            polarity: 0.0,
            subjectivity: 0.0,
            label: SentimentLabel::Neutral,
            confidence: 0.0,
            emotions: BTreeMap::new(),
            primary_emotion: NEUTRAL_EMOTION.to_string(),
            mental_health_indicator_counts: IndicatorCategory::ALL
                .iter()
                .map(|c| (*c, 0))
                .collect(),
            risk_level: RiskLevel::Low,
        }
    }

    /// Count for one indicator category
    #[must_use]
    pub fn indicator(&self, category: IndicatorCategory) -> u32 {
        self.mental_health_indicator_counts
            .get(&category)
            .copied()
            .unwrap_or(0)
    }
}

impl Default for SentimentSignal {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Inputs of the risk point system
#[derive(Debug, Clone, PartialEq)]
pub struct RiskInputs {
    /// Crisis indicator count
    pub crisis_indicators: u32,
    /// Support-seeking indicator count
    pub support_seeking: u32,
    /// Utterance polarity
    pub polarity: f64,
    /// Primary emotion name
    pub primary_emotion: String,
    /// Social-isolation indicator count
    pub social_indicators: u32,
    /// Physical-symptom indicator count
    pub physical_symptoms: u32,
}

/// Point weights and thresholds of the risk score.
///
/// The defaults are heuristics; they can be tuned per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskWeights {
    /// Any crisis indicator
    pub crisis: u32,
    /// Any support-seeking indicator
    pub support_seeking: u32,
    /// Polarity below -0.3
    pub strong_negative: u32,
    /// Polarity in `[-0.3, -0.1)`
    pub mild_negative: u32,
    /// Primary emotion is sadness, anger or fear
    pub distress_emotion: u32,
    /// More than two social-isolation indicators
    pub social_isolation: u32,
    /// More than two physical-symptom indicators
    pub physical_symptoms: u32,
    /// Score at or above which risk is high
    pub high_threshold: u32,
    /// Score at or above which risk is medium
    pub medium_threshold: u32,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            crisis: 50,
            support_seeking: 20,
            strong_negative: 15,
            mild_negative: 10,
            distress_emotion: 10,
            social_isolation: 15,
            physical_symptoms: 10,
            high_threshold: 50,
            medium_threshold: 25,
        }
    }
}

impl RiskWeights {
    /// Total points for the given inputs
    #[must_use]
    pub fn score(&self, inputs: &RiskInputs) -> u32 {
        let mut score = 0;
        if inputs.crisis_indicators > 0 {
            score += self.crisis;
        }
        if inputs.support_seeking > 0 {
            score += self.support_seeking;
        }
        if inputs.polarity < -0.3 {
            score += self.strong_negative;
        } else if inputs.polarity < -0.1 {
            score += self.mild_negative;
        }
        if DISTRESS_EMOTIONS.contains(&inputs.primary_emotion.as_str()) {
            score += self.distress_emotion;
        }
        if inputs.social_indicators > 2 {
            score += self.social_isolation;
        }
        if inputs.physical_symptoms > 2 {
            score += self.physical_symptoms;
        }
        score
    }

    /// Risk level for the given inputs
    #[must_use]
    pub fn level(&self, inputs: &RiskInputs) -> RiskLevel {
        let score = self.score(inputs);
        if score >= self.high_threshold {
            RiskLevel::High
        } else if score >= self.medium_threshold {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// Optional emotion model
pub trait EmotionModel: Send + Sync {
    /// Model name for logs
    fn name(&self) -> &str;

    /// Emotion scores for the text
    ///
    /// # Errors
    /// Returns an error if the model cannot score the text
    fn score(&self, text: &str) -> Result<BTreeMap<String, f64>>;
}

/// Emotion keywords by emotion
const EMOTION_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "joy",
        &[
            "happy", "glad", "joy", "excited", "cheerful", "delighted", "grateful", "love",
            "great", "wonderful",
        ],
    ),
    (
        "sadness",
        &[
            "sad", "depressed", "hopeless", "crying", "cry", "unhappy", "miserable", "empty",
            "lonely", "grief", "worthless", "down",
        ],
    ),
    (
        "anger",
        &[
            "angry", "mad", "furious", "annoyed", "frustrated", "hate", "irritated", "rage",
        ],
    ),
    (
        "fear",
        &[
            "scared", "afraid", "anxious", "worried", "panic", "nervous", "terrified", "fear",
            "stressed",
        ],
    ),
    ("surprise", &["surprised", "shocked", "amazed", "unexpected"]),
    ("disgust", &["disgusted", "gross", "revolted", "disgusting"]),
];

/// Keyword-count emotion model
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordEmotionModel;

impl EmotionModel for KeywordEmotionModel {
    fn name(&self) -> &str {
        "keyword"
    }

    fn score(&self, text: &str) -> Result<BTreeMap<String, f64>> {
        let tokens = tokenize(text);
        let mut hits: BTreeMap<String, f64> = BTreeMap::new();
        let mut total = 0.0;

        for (emotion, words) in EMOTION_KEYWORDS {
            let count = tokens.iter().filter(|t| words.contains(&t.as_str())).count();
            if count > 0 {
                hits.insert((*emotion).to_string(), count as f64);
                total += count as f64;
            }
        }

        if total == 0.0 {
            return Ok(BTreeMap::from([(NEUTRAL_EMOTION.to_string(), 1.0)]));
        }

        for value in hits.values_mut() {
            *value /= total;
        }
        Ok(hits)
    }
}

/// Keywords for one condition category found in a text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionMatch {
    /// Keywords found
    pub keywords: Vec<String>,
    /// Number of keywords found
    pub count: usize,
    /// Share of the category's keywords found
    pub confidence: f64,
}

/// Condition keyword scan of one text
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConditionKeywords {
    /// Matches by category
    pub detected: BTreeMap<String, ConditionMatch>,
    /// Keywords found across categories
    pub total_keywords: usize,
    /// Whether any category matched
    pub has_mental_health_content: bool,
}

const CONDITION_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "depression",
        &[
            "depressed", "depression", "sad", "hopeless", "worthless", "empty", "guilty",
            "shame", "suicidal", "death", "die", "kill myself",
        ],
    ),
    (
        "anxiety",
        &[
            "anxious", "anxiety", "worried", "worry", "panic", "nervous", "stressed", "stress",
            "overwhelmed", "fear", "afraid", "scared",
        ],
    ),
    (
        "bipolar",
        &[
            "manic", "mania", "high", "euphoric", "energetic", "irritable", "mood swings",
            "bipolar", "cycling",
        ],
    ),
    (
        "ptsd",
        &[
            "trauma", "flashback", "nightmare", "triggered", "ptsd", "post traumatic",
            "memories", "avoiding", "hypervigilant",
        ],
    ),
    (
        "eating_disorder",
        &[
            "anorexia", "bulimia", "binge", "purge", "body image", "weight", "eating disorder",
            "food", "diet", "starving",
        ],
    ),
    (
        "substance_abuse",
        &[
            "alcohol", "drugs", "addiction", "substance", "drinking", "smoking", "overdose",
            "withdrawal", "rehab",
        ],
    ),
];

/// Sentiment across a run of user messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSentiment {
    /// Label of the mean polarity
    pub overall_sentiment: SentimentLabel,
    /// Mean polarity
    pub avg_polarity: f64,
    /// Mean subjectivity
    pub avg_subjectivity: f64,
    /// Movement of the last three messages against the rest
    pub trend: TrendDirection,
    /// High if any message was high, medium if most were medium
    pub risk_level: RiskLevel,
    /// Messages analyzed
    pub message_count: usize,
    /// Per-message signals
    pub signals: Vec<SentimentSignal>,
}

/// Lexicon-based sentiment analyzer
#[derive(Clone)]
pub struct SentimentAnalyzer {
    lexicon: Lexicon,
    emotion_model: Option<Arc<dyn EmotionModel>>,
    weights: RiskWeights,
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SentimentAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SentimentAnalyzer")
            .field("lexicon_words", &self.lexicon.len())
            .field(
                "emotion_model",
                &self.emotion_model.as_ref().map(|m| m.name().to_string()),
            )
            .field("weights", &self.weights)
            .finish()
    }
}

impl SentimentAnalyzer {
    /// Analyzer with the built-in lexicon and keyword emotion model
    #[must_use]
    pub fn new() -> Self {
        Self {
            lexicon: Lexicon::default(),
            emotion_model: Some(Arc::new(KeywordEmotionModel)),
            weights: RiskWeights::default(),
        }
    }

    /// Analyzer with no emotion model (primary emotion stays neutral)
    #[must_use]
    pub fn without_emotion_model(mut self) -> Self {
        self.emotion_model = None;
        self
    }

    /// Use a different emotion model
    #[must_use]
    pub fn with_emotion_model(mut self, model: Arc<dyn EmotionModel>) -> Self {
        self.emotion_model = Some(model);
        self
    }

    /// Use a different lexicon
    #[must_use]
    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    /// Override risk weights
    #[must_use]
    pub fn with_weights(mut self, weights: RiskWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Risk weights in use
    #[must_use]
    pub fn weights(&self) -> &RiskWeights {
        &self.weights
    }

    /// Analyze one utterance
    #[must_use]
    pub fn analyze(&self, text: &str) -> SentimentSignal {
        if text.trim().is_empty() {
            return SentimentSignal::neutral();
        }

        let lower = text.to_lowercase();
        let lexical = self.lexicon.score(text);
        let polarity = lexical.polarity;

        let emotions = self.emotions(text);
        let primary_emotion = primary_emotion(&emotions);

        let counts: BTreeMap<IndicatorCategory, u32> = IndicatorCategory::ALL
            .iter()
            .map(|c| (*c, c.count_in(&lower)))
            .collect();

        let inputs = RiskInputs {
            crisis_indicators: counts[&IndicatorCategory::Crisis],
            support_seeking: counts[&IndicatorCategory::SupportSeeking],
            polarity,
            primary_emotion: primary_emotion.clone(),
            social_indicators: counts[&IndicatorCategory::Social],
            physical_symptoms: counts[&IndicatorCategory::Physical],
        };
        let risk_level = self.weights.level(&inputs);

        debug!(
            polarity,
            primary_emotion = %primary_emotion,
            risk = %risk_level,
            "Sentiment analyzed"
        );

        SentimentSignal {
            polarity,
            subjectivity: lexical.subjectivity,
            label: SentimentLabel::from_polarity(polarity),
            confidence: polarity.abs(),
            emotions,
            primary_emotion,
            mental_health_indicator_counts: counts,
            risk_level,
        }
    }

    fn emotions(&self, text: &str) -> BTreeMap<String, f64> {
        let Some(model) = &self.emotion_model else {
            return BTreeMap::new();
        };
        match model.score(text) {
            Ok(scores) => scores,
            Err(e) => {
                warn!(model = model.name(), error = %e, "Emotion model failed, continuing without emotions");
                BTreeMap::new()
            }
        }
    }

    /// Keywords of known mental-health conditions present in the text
    #[must_use]
    pub fn detect_condition_keywords(&self, text: &str) -> ConditionKeywords {
        let lower = text.to_lowercase();
        let mut detected = BTreeMap::new();

        for (category, keywords) in CONDITION_KEYWORDS {
            let found: Vec<String> = keywords
                .iter()
                .filter(|k| lower.contains(*k))
                .map(|k| (*k).to_string())
                .collect();
            if !found.is_empty() {
                let count = found.len();
                detected.insert(
                    (*category).to_string(),
                    ConditionMatch {
                        keywords: found,
                        count,
                        confidence: (count as f64 / keywords.len() as f64).min(1.0),
                    },
                );
            }
        }

        let total_keywords = detected.values().map(|m| m.count).sum();
        ConditionKeywords {
            has_mental_health_content: !detected.is_empty(),
            detected,
            total_keywords,
        }
    }

    /// Analyze a run of user messages as a whole
    #[must_use]
    pub fn analyze_conversation<S: AsRef<str>>(&self, messages: &[S]) -> ConversationSentiment {
        let signals: Vec<SentimentSignal> =
            messages.iter().map(|m| self.analyze(m.as_ref())).collect();

        if signals.is_empty() {
            return ConversationSentiment {
                overall_sentiment: SentimentLabel::Neutral,
                avg_polarity: 0.0,
                avg_subjectivity: 0.0,
                trend: TrendDirection::Stable,
                risk_level: RiskLevel::Low,
                message_count: 0,
                signals,
            };
        }

        let n = signals.len() as f64;
        let polarities: Vec<f64> = signals.iter().map(|s| s.polarity).collect();
        let avg_polarity = polarities.iter().sum::<f64>() / n;
        let avg_subjectivity = signals.iter().map(|s| s.subjectivity).sum::<f64>() / n;

        let trend = if signals.len() >= 3 {
            let split = signals.len() - 3;
            let recent = mean(&polarities[split..]);
            let earlier = if split > 0 {
                mean(&polarities[..split])
            } else {
                recent
            };
            TrendDirection::compare(recent, earlier)
        } else {
            TrendDirection::Stable
        };

        let high = signals
            .iter()
            .filter(|s| s.risk_level == RiskLevel::High)
            .count();
        let medium = signals
            .iter()
            .filter(|s| s.risk_level == RiskLevel::Medium)
            .count();
        let risk_level = if high > 0 {
            RiskLevel::High
        } else if medium as f64 > n / 2.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        };

        ConversationSentiment {
            overall_sentiment: SentimentLabel::from_polarity(avg_polarity),
            avg_polarity,
            avg_subjectivity,
            trend,
            risk_level,
            message_count: signals.len(),
            signals,
        }
    }
}

/// Highest-scoring emotion; ties keep the first in key order
fn primary_emotion(emotions: &BTreeMap<String, f64>) -> String {
    let mut best: Option<(&String, f64)> = None;
    for (name, score) in emotions {
        if best.map_or(true, |(_, s)| *score > s) {
            best = Some((name, *score));
        }
    }
    best.map_or_else(|| NEUTRAL_EMOTION.to_string(), |(name, _)| name.clone())
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn inputs(polarity: f64) -> RiskInputs {
        RiskInputs {
            crisis_indicators: 0,
            support_seeking: 0,
            polarity,
            primary_emotion: NEUTRAL_EMOTION.to_string(),
            social_indicators: 0,
            physical_symptoms: 0,
        }
    }

    #[test]
    fn test_risk_points_match_weights() {
        let weights = RiskWeights::default();

        assert_eq!(weights.score(&inputs(0.0)), 0);
        assert_eq!(weights.score(&inputs(-0.31)), 15);
        assert_eq!(weights.score(&inputs(-0.3)), 10);
        assert_eq!(weights.score(&inputs(-0.1)), 0);

        let crisis = RiskInputs {
            crisis_indicators: 1,
            ..inputs(0.5)
        };
        assert_eq!(weights.score(&crisis), 50);
        assert_eq!(weights.level(&crisis), RiskLevel::High);

        let medium = RiskInputs {
            support_seeking: 1,
            primary_emotion: "fear".to_string(),
            ..inputs(0.0)
        };
        assert_eq!(weights.score(&medium), 30);
        assert_eq!(weights.level(&medium), RiskLevel::Medium);

        let isolated = RiskInputs {
            social_indicators: 3,
            physical_symptoms: 3,
            ..inputs(-0.2)
        };
        assert_eq!(weights.score(&isolated), 35);

        // exactly two social indicators do not count
        let two = RiskInputs {
            social_indicators: 2,
            ..inputs(0.0)
        };
        assert_eq!(weights.score(&two), 0);
        assert_eq!(weights.level(&inputs(-0.2)), RiskLevel::Low);
    }

    #[test]
    fn test_custom_weights() {
        let weights = RiskWeights {
            medium_threshold: 10,
            ..RiskWeights::default()
        };
        assert_eq!(weights.level(&inputs(-0.2)), RiskLevel::Medium);
    }

    #[test]
    fn test_empty_input_is_neutral() {
        let signal = SentimentAnalyzer::new().analyze("   ");
        assert_eq!(signal, SentimentSignal::neutral());
        assert_eq!(signal.risk_level, RiskLevel::Low);
        assert_eq!(signal.label, SentimentLabel::Neutral);
    }

    #[test]
    fn test_crisis_phrase_is_high_risk() {
        let signal = SentimentAnalyzer::new().analyze("I want to kill myself");
        assert_eq!(signal.indicator(IndicatorCategory::Crisis), 1);
        assert_eq!(signal.risk_level, RiskLevel::High);
    }

    #[test]
    fn test_positive_message() {
        let signal = SentimentAnalyzer::new().analyze("I feel happy and grateful today");
        assert_eq!(signal.label, SentimentLabel::Positive);
        assert_eq!(signal.primary_emotion, "joy");
        assert_eq!(signal.risk_level, RiskLevel::Low);
        assert!((signal.confidence - signal.polarity.abs()).abs() < 1e-12);
    }

    #[test]
    fn test_support_seeking_sadness_is_medium() {
        // support (20) + strong negative (15) + sadness (10) = 45
        let signal = SentimentAnalyzer::new().analyze("I'm so sad, I need help");
        assert_eq!(signal.indicator(IndicatorCategory::SupportSeeking), 1);
        assert_eq!(signal.primary_emotion, "sadness");
        assert_eq!(signal.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_without_emotion_model_is_neutral_emotion() {
        let analyzer = SentimentAnalyzer::new().without_emotion_model();
        let signal = analyzer.analyze("I'm so sad");
        assert!(signal.emotions.is_empty());
        assert_eq!(signal.primary_emotion, NEUTRAL_EMOTION);
    }

    struct FailingModel;

    impl EmotionModel for FailingModel {
        fn name(&self) -> &str {
            "failing"
        }

        fn score(&self, _text: &str) -> Result<BTreeMap<String, f64>> {
            Err(Error::EmotionModel("offline".to_string()))
        }
    }

    #[test]
    fn test_failing_emotion_model_degrades() {
        let analyzer = SentimentAnalyzer::new().with_emotion_model(Arc::new(FailingModel));
        let signal = analyzer.analyze("I feel sad");
        assert!(signal.emotions.is_empty());
        assert_eq!(signal.primary_emotion, NEUTRAL_EMOTION);
        assert_eq!(signal.label, SentimentLabel::Negative);
    }

    #[test]
    fn test_keyword_emotion_model_normalizes() {
        let scores = KeywordEmotionModel.score("sad and scared and sad").unwrap();
        assert!((scores["sadness"] - 2.0 / 3.0).abs() < 1e-9);
        assert!((scores["fear"] - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(
            KeywordEmotionModel.score("the bus was late").unwrap()[NEUTRAL_EMOTION],
            1.0
        );
    }

    #[test]
    fn test_condition_keywords() {
        let result = SentimentAnalyzer::new()
            .detect_condition_keywords("My anxiety and panic attacks are getting worse");
        assert!(result.has_mental_health_content);
        let anxiety = &result.detected["anxiety"];
        assert_eq!(anxiety.keywords, vec!["anxiety", "panic"]);
        assert_eq!(result.total_keywords, 2);
    }

    #[test]
    fn test_conversation_trend_and_risk() {
        let analyzer = SentimentAnalyzer::new();
        let result = analyzer.analyze_conversation(&[
            "I feel terrible",
            "everything is awful",
            "I feel a bit better",
            "today was good",
            "I am happy",
        ]);
        assert_eq!(result.message_count, 5);
        assert_eq!(result.trend, TrendDirection::Improving);
        assert_eq!(result.risk_level, RiskLevel::Low);

        let empty: [&str; 0] = [];
        assert_eq!(analyzer.analyze_conversation(&empty).message_count, 0);
    }
}
