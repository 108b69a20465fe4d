//! Context data types

use crate::assessment::{AssessmentKind, Question};
use crate::recommend::Recommendation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use solace_nlp::{Intent, IntentSignal, SentimentLabel, SentimentSignal, TrendDirection};
use std::collections::BTreeMap;
use std::fmt;

/// Utterances kept in the history ring buffer
pub const HISTORY_LIMIT: usize = 20;
/// Entries considered by summaries and the mood trend
pub const SUMMARY_WINDOW: usize = 5;
/// Inactivity after which a session ends, in seconds
pub const IDLE_LIMIT_SECS: i64 = 1800;
/// Absolute session length cap, in seconds
pub const MAX_SESSION_SECS: i64 = 7200;

/// Session-level mood, recomputed from recent polarities
pub type MoodTrend = SentimentLabel;

/// Free-form user preference overlay
pub type PreferenceMap = BTreeMap<String, serde_json::Value>;

/// Who produced an utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The person seeking support
    User,
    /// The assistant
    Bot,
}

impl Sender {
    /// Returns the string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message in the conversation. Never mutated once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    /// Author
    pub sender: Sender,
    /// Message text
    pub text: String,
    /// When it was recorded
    pub timestamp: DateTime<Utc>,
    /// Arbitrary annotations (signal snapshots, generator usage)
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Utterance {
    /// Create an utterance without metadata
    #[must_use]
    pub fn new(sender: Sender, text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            sender,
            text: text.into(),
            timestamp,
            metadata: BTreeMap::new(),
        }
    }

    /// Attach metadata
    #[must_use]
    pub fn with_metadata(mut self, metadata: BTreeMap<String, serde_json::Value>) -> Self {
        self.metadata = metadata;
        self
    }
}

/// A sentiment signal as recorded in the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentEntry {
    /// When the signal was applied
    pub timestamp: DateTime<Utc>,
    /// The signal
    pub signal: SentimentSignal,
}

/// An intent signal as recorded in the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentEntry {
    /// When the signal was applied
    pub timestamp: DateTime<Utc>,
    /// The signal
    pub signal: IntentSignal,
}

/// Assessment currently being answered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentInProgress {
    /// Instrument
    #[serde(rename = "type")]
    pub kind: AssessmentKind,
    /// Questions in presentation order
    pub questions: Vec<Question>,
    /// Answers so far, by question id
    pub responses: BTreeMap<String, i32>,
    /// Index of the next question to present
    pub current_question: usize,
    /// When the assessment started
    pub started_at: DateTime<Utc>,
}

impl AssessmentInProgress {
    /// Look up a question by id
    #[must_use]
    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    /// Next question without an answer
    #[must_use]
    pub fn next_question(&self) -> Option<&Question> {
        self.questions
            .iter()
            .find(|q| !self.responses.contains_key(&q.id))
    }

    /// Whether every question has an answer
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.next_question().is_none()
    }
}

/// Payload handed back when an assessment is completed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedAssessment {
    /// Instrument
    #[serde(rename = "type")]
    pub kind: AssessmentKind,
    /// Answers by question id
    pub responses: BTreeMap<String, i32>,
    /// When the assessment started
    pub started_at: DateTime<Utc>,
    /// When it was completed
    pub completed_at: DateTime<Utc>,
    /// Seconds between start and completion
    pub duration_secs: f64,
}

/// A recommendation shown to the user, with follow-up flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRecord {
    /// What was recommended
    pub recommendation: Recommendation,
    /// When it was given
    pub given_at: DateTime<Utc>,
    /// User accepted it
    pub accepted: bool,
    /// User reported completing it
    pub completed: bool,
}

/// Read-only view of a session for display and logging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextSummary {
    /// Session id
    pub session_id: String,
    /// User id, if known
    pub user_id: Option<String>,
    /// Seconds from session start to last activity
    pub session_duration_secs: f64,
    /// Utterances currently in the history buffer
    pub message_count: usize,
    /// Topic derived from recent intents
    pub current_topic: Option<String>,
    /// Session-level mood
    pub mood_trend: MoodTrend,
    /// Mean polarity over the last five sentiment entries
    pub avg_sentiment: f64,
    /// Most frequent intent over the last five intent entries
    pub most_common_intent: Intent,
    /// Crisis latch
    pub crisis_detected: bool,
    /// Escalation latch
    pub escalation_needed: bool,
    /// An assessment is being answered
    pub assessment_in_progress: bool,
    /// Recommendations given so far
    pub recommendations_count: usize,
    /// Last five utterances
    pub recent_messages: Vec<Utterance>,
    /// Preference overlay
    pub user_preferences: PreferenceMap,
}

/// Movement of polarity across the session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentTrend {
    /// Last three polarities against the earlier ones
    pub direction: TrendDirection,
    /// Mean absolute change between consecutive polarities
    pub volatility: f64,
    /// Mean of the last three polarities
    pub recent_sentiment: f64,
    /// Sentiment entries recorded
    pub sentiment_count: usize,
}

/// Why a session stopped being eligible for automated replies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryReason {
    /// No activity for longer than [`IDLE_LIMIT_SECS`]
    Idle,
    /// Session older than [`MAX_SESSION_SECS`]
    MaxDuration,
}

impl fmt::Display for ExpiryReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle for more than {IDLE_LIMIT_SECS}s"),
            Self::MaxDuration => write!(f, "session longer than {MAX_SESSION_SECS}s"),
        }
    }
}

/// Answer of the continuation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum Continuation {
    /// Keep replying automatically
    Continue,
    /// Crisis with escalation: stop auto-replying, a human should take over
    Handoff,
    /// Session timed out and should be closed
    Expired(ExpiryReason),
}

impl Continuation {
    /// Whether automated dialogue may go on
    #[must_use]
    pub fn should_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }
}
