//! Orchestrator configuration and inputs

use crate::recommend::UserProfile;
use std::time::Duration;

/// Configuration for the orchestrator
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Earlier utterances forwarded to the generator
    pub history_for_prompt: usize,
    /// Recommendations attached to a single turn
    pub max_turn_recommendations: usize,
    /// Time budget used when neither the caller nor the user stated one
    pub default_available_minutes: u32,
    /// Keep generating replies after a crisis handoff; when false the
    /// crisis template is returned without calling the generator
    pub reply_after_handoff: bool,
    /// Run the three extractors on the blocking pool in parallel
    pub concurrent_extractors: bool,
    /// Upper bound on one generator call
    pub generation_timeout: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            history_for_prompt: 10,
            max_turn_recommendations: 3,
            default_available_minutes: 30,
            reply_after_handoff: true,
            concurrent_extractors: true,
            generation_timeout: Duration::from_secs(20),
        }
    }
}

impl OrchestratorConfig {
    /// Create a new configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the generator timeout
    #[must_use]
    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }

    /// Set how many earlier utterances reach the generator
    #[must_use]
    pub fn with_history_for_prompt(mut self, n: usize) -> Self {
        self.history_for_prompt = n;
        self
    }

    /// Set the per-turn recommendation cap
    #[must_use]
    pub fn with_max_turn_recommendations(mut self, n: usize) -> Self {
        self.max_turn_recommendations = n;
        self
    }

    /// Set the default time budget
    #[must_use]
    pub fn with_default_available_minutes(mut self, minutes: u32) -> Self {
        self.default_available_minutes = minutes;
        self
    }

    /// Set whether replies continue after a crisis handoff
    #[must_use]
    pub fn with_reply_after_handoff(mut self, enabled: bool) -> Self {
        self.reply_after_handoff = enabled;
        self
    }

    /// Set whether extractors run in parallel
    #[must_use]
    pub fn with_concurrent_extractors(mut self, enabled: bool) -> Self {
        self.concurrent_extractors = enabled;
        self
    }
}

/// Input for one turn
#[derive(Debug, Clone)]
pub struct TurnInput {
    /// Target session
    pub session_id: String,
    /// The user's message
    pub text: String,
    /// Profile snapshot from the host; derived from the session when absent
    pub profile: Option<UserProfile>,
    /// Minutes the user has right now
    pub available_minutes: Option<u32>,
}

impl TurnInput {
    /// Create a new input
    #[must_use]
    pub fn new(session_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            text: text.into(),
            profile: None,
            available_minutes: None,
        }
    }

    /// Attach a profile snapshot
    #[must_use]
    pub fn with_profile(mut self, profile: UserProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// State the available time
    #[must_use]
    pub fn with_available_minutes(mut self, minutes: u32) -> Self {
        self.available_minutes = Some(minutes);
        self
    }
}

/// Parameters of an explicit recommendation request
#[derive(Debug, Clone, Default)]
pub struct RecommendationQuery {
    /// Profile snapshot; derived from the session when absent
    pub profile: Option<UserProfile>,
    /// Minutes available
    pub available_minutes: Option<u32>,
}

impl RecommendationQuery {
    /// Empty query
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a profile snapshot
    #[must_use]
    pub fn with_profile(mut self, profile: UserProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// State the available time
    #[must_use]
    pub fn with_available_minutes(mut self, minutes: u32) -> Self {
        self.available_minutes = Some(minutes);
        self
    }
}
