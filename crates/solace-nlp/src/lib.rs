//! Solace NLP - per-utterance signal extraction
//!
//! Three independent, stateless extractors turn one utterance into a
//! structured signal:
//! - [`SentimentAnalyzer`]: polarity, emotions, indicator counts, risk level
//! - [`IntentDetector`]: pattern tables blended with an optional classifier
//! - [`CrisisScanner`]: fixed keyword list, never fails once constructed

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod crisis;
pub mod error;
pub mod intent;
pub mod lexicon;
pub mod level;
pub mod sentiment;

pub use crisis::{CrisisCheck, CrisisScanner, CrisisThresholds};
pub use error::{Error, Result};
pub use intent::{
    Intent, IntentClassifier, IntentContext, IntentDetector, IntentSignal, NaiveBayesClassifier,
    WeightedVote,
};
pub use lexicon::Lexicon;
pub use level::{RiskLevel, UrgencyLevel};
pub use sentiment::{
    ConditionKeywords, ConversationSentiment, EmotionModel, IndicatorCategory,
    KeywordEmotionModel, RiskInputs, RiskWeights, SentimentAnalyzer, SentimentLabel,
    SentimentSignal, TrendDirection,
};
