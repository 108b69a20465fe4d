//! Orchestrator core structure
//!
//! Contains the `Orchestrator` struct, its builder methods and the helpers
//! shared by the operation modules.

use crate::clock::{Clock, SystemClock};
use crate::context::{ConversationContext, Utterance};
use crate::error::{Error, Result};
use crate::event_bus::{EventBus, SessionEvent};
use crate::generator::TextGenerator;
use crate::journal::Journal;
use crate::store::SessionStore;
use dashmap::DashMap;
use solace_nlp::{CrisisScanner, IntentDetector, SentimentAnalyzer};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::config::OrchestratorConfig;

/// Main orchestrator that drives conversation turns.
///
/// Turns of one session are serialized through a per-session lane; turns of
/// different sessions run fully in parallel.
pub struct Orchestrator {
    pub(crate) sentiment: Arc<SentimentAnalyzer>,
    pub(crate) intent: Arc<IntentDetector>,
    pub(crate) crisis: Arc<CrisisScanner>,
    pub(crate) generator: Arc<dyn TextGenerator>,
    pub(crate) store: Arc<dyn SessionStore>,
    pub(crate) journal: Option<Arc<dyn Journal>>,
    pub(crate) event_bus: Option<Arc<EventBus>>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) config: OrchestratorConfig,
    pub(crate) lanes: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl Orchestrator {
    /// Create an orchestrator with default extractors and the system clock
    #[must_use]
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        store: Arc<dyn SessionStore>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            sentiment: Arc::new(SentimentAnalyzer::new()),
            intent: Arc::new(IntentDetector::new()),
            crisis: Arc::new(CrisisScanner::default()),
            generator,
            store,
            journal: None,
            event_bus: None,
            clock: Arc::new(SystemClock),
            config,
            lanes: Arc::new(DashMap::new()),
        }
    }

    /// Set the sentiment analyzer
    #[must_use]
    pub fn with_sentiment_analyzer(mut self, analyzer: SentimentAnalyzer) -> Self {
        self.sentiment = Arc::new(analyzer);
        self
    }

    /// Set the intent detector
    #[must_use]
    pub fn with_intent_detector(mut self, detector: IntentDetector) -> Self {
        self.intent = Arc::new(detector);
        self
    }

    /// Set the crisis scanner
    #[must_use]
    pub fn with_crisis_scanner(mut self, scanner: CrisisScanner) -> Self {
        self.crisis = Arc::new(scanner);
        self
    }

    /// Set the journal for write-through persistence
    #[must_use]
    pub fn with_journal(mut self, journal: Arc<dyn Journal>) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Set the event bus
    #[must_use]
    pub fn with_event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.event_bus = Some(bus);
        self
    }

    /// Get a reference to the event bus (if set)
    #[must_use]
    pub fn event_bus(&self) -> Option<&Arc<EventBus>> {
        self.event_bus.as_ref()
    }

    /// Set the time source
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Configuration
    #[must_use]
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Generator name
    #[must_use]
    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    /// Sessions with a lane (i.e. touched since startup and not ended)
    #[must_use]
    pub fn active_lane_count(&self) -> usize {
        self.lanes.len()
    }

    pub(crate) fn lane(&self, session_id: &str) -> Arc<Mutex<()>> {
        self.lanes
            .entry(session_id.to_string())
            .or_default()
            .clone()
    }

    pub(crate) async fn load(&self, session_id: &str) -> Result<ConversationContext> {
        self.store
            .get(session_id)
            .await?
            .ok_or_else(|| Error::NotFound(session_id.to_string()))
    }

    /// [`Self::load`] for a caller holding exactly one clone of the
    /// session's lane. An unknown session leaves no lane behind.
    pub(crate) async fn load_in_lane(&self, session_id: &str) -> Result<ConversationContext> {
        let result = self.load(session_id).await;
        if matches!(result, Err(Error::NotFound(_))) {
            self.lanes
                .remove_if(session_id, |_, lane| Arc::strong_count(lane) <= 2);
        }
        result
    }

    pub(crate) fn emit(&self, event: SessionEvent) {
        if let Some(bus) = &self.event_bus {
            bus.publish(event);
        }
    }

    /// Remove a session from the store and drop its lane. The caller holds
    /// the lane.
    pub(crate) async fn close(&self, session_id: &str, reason: String) -> Result<bool> {
        let removed = self.store.delete(session_id).await?;
        self.lanes.remove(session_id);
        info!(session_id = %session_id, reason = %reason, "Session closed");
        self.emit(SessionEvent::SessionEnded {
            session_id: session_id.to_string(),
            reason,
        });
        Ok(removed)
    }

    pub(crate) async fn journal_utterance(&self, session_id: &str, utterance: &Utterance) {
        if let Some(journal) = &self.journal {
            let result = journal.append_utterance(session_id, utterance).await;
            log_journal_failure(session_id, "utterance", result);
        }
    }

    pub(crate) async fn journal_recommendations(
        &self,
        session_id: &str,
        first_index: usize,
        recommendations: &[crate::recommend::Recommendation],
    ) {
        let Some(journal) = &self.journal else {
            return;
        };
        for (offset, recommendation) in recommendations.iter().enumerate() {
            let result = journal
                .record_recommendation(session_id, first_index + offset, recommendation)
                .await;
            log_journal_failure(session_id, "recommendation", result);
        }
    }
}

/// Journal writes never fail an operation
pub(crate) fn log_journal_failure(session_id: &str, kind: &str, result: Result<()>) {
    if let Err(e) = result {
        warn!(session_id = %session_id, kind = %kind, error = %e, "Journal write failed");
    }
}
