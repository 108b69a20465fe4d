//! EventBus - broadcast-based session events
//!
//! Lets observers (dashboards, crisis-team notifiers, audit loggers) follow
//! sessions without touching the turn path. Events carry signals and ids,
//! never message text.

use crate::assessment::{AssessmentKind, Severity};
use serde::Serialize;
use solace_nlp::{Intent, RiskLevel};
use tokio::sync::broadcast;

/// Events emitted by the orchestrator
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A session was created
    SessionStarted {
        /// Session identifier
        session_id: String,
        /// User identifier, if known
        user_id: Option<String>,
    },
    /// A turn finished
    TurnCompleted {
        /// Session identifier
        session_id: String,
        /// Crisis or the primary intent
        conversation_type: Intent,
        /// Escalation signal of this turn
        escalation_needed: bool,
        /// The reply is the fallback message
        generator_failed: bool,
    },
    /// Crisis keywords matched
    CrisisDetected {
        /// Session identifier
        session_id: String,
        /// Keyword-count severity
        severity: RiskLevel,
        /// Distinct keywords matched
        keyword_count: usize,
    },
    /// The session's escalation latch flipped to true
    EscalationRaised {
        /// Session identifier
        session_id: String,
    },
    /// An assessment was scored
    AssessmentCompleted {
        /// Session identifier
        session_id: String,
        /// Instrument
        kind: AssessmentKind,
        /// Severity band
        severity: Severity,
    },
    /// A session was closed
    SessionEnded {
        /// Session identifier
        session_id: String,
        /// Why it ended
        reason: String,
    },
}

impl SessionEvent {
    /// Session the event belongs to
    #[must_use]
    pub fn session_id(&self) -> &str {
        match self {
            Self::SessionStarted { session_id, .. }
            | Self::TurnCompleted { session_id, .. }
            | Self::CrisisDetected { session_id, .. }
            | Self::EscalationRaised { session_id }
            | Self::AssessmentCompleted { session_id, .. }
            | Self::SessionEnded { session_id, .. } => session_id,
        }
    }
}

/// Broadcast-based event bus.
///
/// Slow subscribers miss events (lagged) rather than blocking the publisher.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<SessionEvent>,
}

impl EventBus {
    /// Create a bus buffering up to `capacity` events per subscriber
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to all future events
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    /// Publish an event; returns how many subscribers received it
    pub fn publish(&self, event: SessionEvent) -> usize {
        // send() fails only when nobody is listening
        self.sender.send(event).unwrap_or(0)
    }

    /// Number of active subscribers
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
