//! Per-session conversation state

use super::types::{
    AssessmentInProgress, CompletedAssessment, ContextSummary, Continuation, ExpiryReason,
    IntentEntry, MoodTrend, PreferenceMap, RecommendationRecord, Sender, SentimentEntry,
    SentimentTrend, Utterance, HISTORY_LIMIT, IDLE_LIMIT_SECS, MAX_SESSION_SECS, SUMMARY_WINDOW,
};
use crate::assessment::{AssessmentKind, AssessmentResult, Question};
use crate::error::{Error, Result};
use crate::recommend::Recommendation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use solace_nlp::{
    Intent, IntentSignal, RiskLevel, SentimentLabel, SentimentSignal, TrendDirection,
    UrgencyLevel,
};
use std::collections::{BTreeMap, VecDeque};
use tracing::{debug, info, warn};

/// Intent confidence above which a high-urgency intent latches escalation
const ESCALATION_CONFIDENCE: f64 = 0.7;

/// Intents that move the conversation topic; others leave it unchanged
const TOPIC_TABLE: &[(Intent, &str)] = &[
    (Intent::Depression, "depression"),
    (Intent::Anxiety, "anxiety"),
    (Intent::RelationshipIssues, "relationships"),
    (Intent::WorkStress, "work"),
    (Intent::SleepIssues, "sleep"),
    (Intent::CopingStrategies, "coping"),
    (Intent::ProfessionalHelp, "professional_help"),
    (Intent::AssessmentRequest, "assessment"),
    (Intent::MoodTracking, "mood_tracking"),
];

fn topic_for(intent: Intent) -> Option<&'static str> {
    TOPIC_TABLE
        .iter()
        .find(|(i, _)| *i == intent)
        .map(|(_, topic)| *topic)
}

fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 1000.0
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Conversation state of one session.
///
/// Every mutation takes the current time explicitly; the context never reads
/// a clock itself. `crisis_detected` and `escalation_needed` are one-way
/// latches that only [`initialize`](Self::initialize) resets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationContext {
    session_id: String,
    user_id: Option<String>,
    history: VecDeque<Utterance>,
    sentiment_history: Vec<SentimentEntry>,
    intent_history: Vec<IntentEntry>,
    mood_trend: MoodTrend,
    current_topic: Option<String>,
    crisis_detected: bool,
    escalation_needed: bool,
    assessment_in_progress: Option<AssessmentInProgress>,
    recommendations_given: Vec<RecommendationRecord>,
    #[serde(default)]
    last_assessment: Option<AssessmentResult>,
    user_preferences: PreferenceMap,
    session_start: DateTime<Utc>,
    last_activity: DateTime<Utc>,
    #[serde(default)]
    version: u64,
}

impl ConversationContext {
    /// Fresh context for a new session
    #[must_use]
    pub fn new(session_id: impl Into<String>, user_id: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            session_id: session_id.into(),
            user_id,
            history: VecDeque::with_capacity(HISTORY_LIMIT),
            sentiment_history: Vec::new(),
            intent_history: Vec::new(),
            mood_trend: SentimentLabel::Neutral,
            current_topic: None,
            crisis_detected: false,
            escalation_needed: false,
            assessment_in_progress: None,
            recommendations_given: Vec::new(),
            last_assessment: None,
            user_preferences: PreferenceMap::new(),
            session_start: now,
            last_activity: now,
            version: 0,
        }
    }

    /// Reset all history and flags for a (possibly new) session id.
    /// The storage version is kept.
    pub fn initialize(
        &mut self,
        session_id: impl Into<String>,
        user_id: Option<String>,
        now: DateTime<Utc>,
    ) {
        let version = self.version;
        *self = Self::new(session_id, user_id, now);
        self.version = version;
        info!(session_id = %self.session_id, "Conversation context initialized");
    }

    /// Append an utterance, evicting the oldest past [`HISTORY_LIMIT`]
    pub fn add_message(&mut self, utterance: Utterance) {
        self.last_activity = utterance.timestamp;
        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(utterance);
    }

    /// Shorthand for [`add_message`](Self::add_message) without metadata
    pub fn add_text(&mut self, sender: Sender, text: impl Into<String>, now: DateTime<Utc>) {
        self.add_message(Utterance::new(sender, text, now));
    }

    /// Record a sentiment signal; a high risk level latches crisis and escalation
    pub fn update_sentiment(&mut self, signal: SentimentSignal, now: DateTime<Utc>) {
        let high_risk = signal.risk_level == RiskLevel::High;
        self.sentiment_history.push(SentimentEntry {
            timestamp: now,
            signal,
        });
        self.recompute_mood_trend();

        if high_risk {
            if !self.crisis_detected {
                warn!(session_id = %self.session_id, "High-risk sentiment, crisis latched");
            }
            self.crisis_detected = true;
            self.escalation_needed = true;
        }
    }

    /// Record an intent signal; a confident high-urgency intent latches escalation
    pub fn update_intent(&mut self, signal: IntentSignal, now: DateTime<Utc>) {
        if let Some(topic) = topic_for(signal.primary_intent) {
            self.current_topic = Some(topic.to_string());
        }

        if signal.urgency_level == UrgencyLevel::High
            && signal.confidence > ESCALATION_CONFIDENCE
            && !self.escalation_needed
        {
            warn!(
                session_id = %self.session_id,
                intent = %signal.primary_intent,
                confidence = signal.confidence,
                "Urgent intent, escalation latched"
            );
            self.escalation_needed = true;
        }

        self.intent_history.push(IntentEntry {
            timestamp: now,
            signal,
        });
    }

    fn recompute_mood_trend(&mut self) {
        if self.sentiment_history.len() < 2 {
            return;
        }
        let recent: Vec<f64> = self
            .sentiment_history
            .iter()
            .rev()
            .take(SUMMARY_WINDOW)
            .map(|e| e.signal.polarity)
            .collect();
        self.mood_trend = SentimentLabel::from_polarity(mean(&recent));
    }

    /// Install an assessment. Fails with a state conflict, leaving the
    /// running assessment untouched, if one is already in progress.
    pub fn start_assessment(
        &mut self,
        kind: AssessmentKind,
        questions: Vec<Question>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if let Some(running) = &self.assessment_in_progress {
            return Err(Error::StateConflict(format!(
                "assessment {} already in progress",
                running.kind
            )));
        }
        if questions.is_empty() {
            return Err(Error::Validation(format!(
                "assessment {kind} has no questions"
            )));
        }

        debug!(session_id = %self.session_id, kind = %kind, questions = questions.len(), "Assessment started");
        self.assessment_in_progress = Some(AssessmentInProgress {
            kind,
            questions,
            responses: BTreeMap::new(),
            current_question: 0,
            started_at: now,
        });
        Ok(())
    }

    /// Record an answer. Returns `false` and changes nothing when no
    /// assessment is running.
    pub fn add_assessment_response(&mut self, question_id: impl Into<String>, value: i32) -> bool {
        let Some(assessment) = self.assessment_in_progress.as_mut() else {
            return false;
        };
        assessment.responses.insert(question_id.into(), value);
        assessment.current_question = assessment.responses.len().min(assessment.questions.len());
        true
    }

    /// Finish the running assessment, if any, and hand back its answers
    pub fn complete_assessment(&mut self, now: DateTime<Utc>) -> Option<CompletedAssessment> {
        let assessment = self.assessment_in_progress.take()?;
        Some(CompletedAssessment {
            kind: assessment.kind,
            responses: assessment.responses,
            started_at: assessment.started_at,
            completed_at: now,
            duration_secs: seconds_between(assessment.started_at, now),
        })
    }

    /// Keep the latest scored assessment for recommendation requests
    pub fn record_assessment_result(&mut self, result: AssessmentResult) {
        self.last_assessment = Some(result);
    }

    /// Latest scored assessment
    #[must_use]
    pub fn last_assessment(&self) -> Option<&AssessmentResult> {
        self.last_assessment.as_ref()
    }

    /// Record a recommendation given to the user
    pub fn add_recommendation(&mut self, recommendation: Recommendation, now: DateTime<Utc>) {
        self.recommendations_given.push(RecommendationRecord {
            recommendation,
            given_at: now,
            accepted: false,
            completed: false,
        });
    }

    /// Flag a given recommendation as accepted; `false` for an unknown index
    pub fn mark_recommendation_accepted(&mut self, index: usize) -> bool {
        match self.recommendations_given.get_mut(index) {
            Some(record) => {
                record.accepted = true;
                true
            }
            None => false,
        }
    }

    /// Flag a given recommendation as completed; `false` for an unknown index
    pub fn mark_recommendation_completed(&mut self, index: usize) -> bool {
        match self.recommendations_given.get_mut(index) {
            Some(record) => {
                record.completed = true;
                true
            }
            None => false,
        }
    }

    /// Merge preferences over the existing overlay
    pub fn update_user_preferences(&mut self, preferences: PreferenceMap) {
        self.user_preferences.extend(preferences);
    }

    /// Most recent utterances, oldest first; all of them when `limit` is `None`
    #[must_use]
    pub fn history(&self, limit: Option<usize>) -> Vec<Utterance> {
        let skip = limit.map_or(0, |l| self.history.len().saturating_sub(l));
        self.history.iter().skip(skip).cloned().collect()
    }

    /// Derived view of the session. Pure: repeated calls without a mutation
    /// in between return identical summaries.
    #[must_use]
    pub fn summary(&self) -> ContextSummary {
        let recent_polarities: Vec<f64> = self
            .sentiment_history
            .iter()
            .rev()
            .take(SUMMARY_WINDOW)
            .map(|e| e.signal.polarity)
            .collect();

        ContextSummary {
            session_id: self.session_id.clone(),
            user_id: self.user_id.clone(),
            session_duration_secs: seconds_between(self.session_start, self.last_activity),
            message_count: self.history.len(),
            current_topic: self.current_topic.clone(),
            mood_trend: self.mood_trend,
            avg_sentiment: mean(&recent_polarities),
            most_common_intent: self.most_common_recent_intent(),
            crisis_detected: self.crisis_detected,
            escalation_needed: self.escalation_needed,
            assessment_in_progress: self.assessment_in_progress.is_some(),
            recommendations_count: self.recommendations_given.len(),
            recent_messages: self.history(Some(SUMMARY_WINDOW)),
            user_preferences: self.user_preferences.clone(),
        }
    }

    fn most_common_recent_intent(&self) -> Intent {
        let start = self.intent_history.len().saturating_sub(SUMMARY_WINDOW);
        // first-seen order decides ties
        let mut counts: Vec<(Intent, usize)> = Vec::new();
        for entry in &self.intent_history[start..] {
            let intent = entry.signal.primary_intent;
            match counts.iter_mut().find(|(i, _)| *i == intent) {
                Some((_, n)) => *n += 1,
                None => counts.push((intent, 1)),
            }
        }

        let mut best: Option<(Intent, usize)> = None;
        for (intent, n) in counts {
            if best.is_none_or(|(_, max)| n > max) {
                best = Some((intent, n));
            }
        }
        best.map_or(Intent::GeneralQuestion, |(intent, _)| intent)
    }

    /// Direction and volatility of polarity over the whole session
    #[must_use]
    pub fn sentiment_trend(&self) -> SentimentTrend {
        let polarities: Vec<f64> = self
            .sentiment_history
            .iter()
            .map(|e| e.signal.polarity)
            .collect();
        let n = polarities.len();
        let split = n.saturating_sub(3);
        let recent = mean(&polarities[split..]);

        let direction = if n >= 2 {
            let earlier = if n > 3 { mean(&polarities[..split]) } else { recent };
            TrendDirection::compare(recent, earlier)
        } else {
            TrendDirection::Stable
        };

        let volatility = if n > 1 {
            let changes: Vec<f64> = polarities.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
            mean(&changes)
        } else {
            0.0
        };

        SentimentTrend {
            direction,
            volatility,
            recent_sentiment: recent,
            sentiment_count: n,
        }
    }

    /// Continuation policy, evaluated lazily against `now`. Pure.
    ///
    /// Timeouts win over a crisis handoff so expired sessions are always
    /// closed.
    #[must_use]
    pub fn continuation(&self, now: DateTime<Utc>) -> Continuation {
        if (now - self.session_start).num_seconds() > MAX_SESSION_SECS {
            Continuation::Expired(ExpiryReason::MaxDuration)
        } else if (now - self.last_activity).num_seconds() > IDLE_LIMIT_SECS {
            Continuation::Expired(ExpiryReason::Idle)
        } else if self.crisis_detected && self.escalation_needed {
            Continuation::Handoff
        } else {
            Continuation::Continue
        }
    }

    /// Whether automated dialogue should go on
    #[must_use]
    pub fn should_continue_conversation(&self, now: DateTime<Utc>) -> bool {
        self.continuation(now).should_continue()
    }

    /// Plain-text context block for the reply generator
    #[must_use]
    pub fn context_for_prompt(&self) -> String {
        let mut lines = vec![format!("Session ID: {}", self.session_id)];
        if let Some(user_id) = &self.user_id {
            lines.push(format!("User ID: {user_id}"));
        }
        if let Some(topic) = &self.current_topic {
            lines.push(format!("Current topic: {topic}"));
        }
        lines.push(format!("Mood trend: {}", self.mood_trend.as_str()));

        let recent = self.history(Some(3));
        if !recent.is_empty() {
            lines.push("Recent conversation:".to_string());
            for utterance in &recent {
                lines.push(format!("- {}: {}", utterance.sender, utterance.text));
            }
        }

        if let Some(assessment) = &self.assessment_in_progress {
            lines.push(format!(
                "Assessment in progress: {} (question {}/{})",
                assessment.kind.display_name(),
                assessment.current_question + 1,
                assessment.questions.len()
            ));
        }
        if self.crisis_detected {
            lines.push(
                "CRISIS DETECTED: handle with extreme care and provide crisis resources"
                    .to_string(),
            );
        }
        if self.escalation_needed {
            lines.push("ESCALATION NEEDED: consider referring to human support".to_string());
        }
        lines.join("\n")
    }

    /// Session id
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// User id, if known
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Utterances in the history buffer
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.history.len()
    }

    /// All recorded sentiment entries
    #[must_use]
    pub fn sentiment_history(&self) -> &[SentimentEntry] {
        &self.sentiment_history
    }

    /// All recorded intent entries
    #[must_use]
    pub fn intent_history(&self) -> &[IntentEntry] {
        &self.intent_history
    }

    /// Session-level mood
    #[must_use]
    pub fn mood_trend(&self) -> MoodTrend {
        self.mood_trend
    }

    /// Current topic
    #[must_use]
    pub fn current_topic(&self) -> Option<&str> {
        self.current_topic.as_deref()
    }

    /// Crisis latch
    #[must_use]
    pub fn crisis_detected(&self) -> bool {
        self.crisis_detected
    }

    /// Escalation latch
    #[must_use]
    pub fn escalation_needed(&self) -> bool {
        self.escalation_needed
    }

    /// Assessment being answered
    #[must_use]
    pub fn assessment_in_progress(&self) -> Option<&AssessmentInProgress> {
        self.assessment_in_progress.as_ref()
    }

    /// Recommendations given so far
    #[must_use]
    pub fn recommendations_given(&self) -> &[RecommendationRecord] {
        &self.recommendations_given
    }

    /// Preference overlay
    #[must_use]
    pub fn user_preferences(&self) -> &PreferenceMap {
        &self.user_preferences
    }

    /// Session start
    #[must_use]
    pub fn session_start(&self) -> DateTime<Utc> {
        self.session_start
    }

    /// Last recorded utterance time
    #[must_use]
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    /// Optimistic concurrency token, bumped by every successful store save
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    pub(crate) fn set_version(&mut self, version: u64) {
        self.version = version;
    }
}
