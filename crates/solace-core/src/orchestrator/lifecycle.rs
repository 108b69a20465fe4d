//! Session lifecycle: start, inspect, continue, end

use super::core::Orchestrator;
use crate::context::{ContextSummary, Continuation, ConversationContext, PreferenceMap};
use crate::error::Result;
use crate::event_bus::SessionEvent;
use tracing::{info, instrument};
use uuid::Uuid;

impl Orchestrator {
    /// Open a new session and return its id
    #[instrument(skip(self))]
    pub async fn start_session(&self, user_id: Option<String>) -> Result<String> {
        let session_id = Uuid::new_v4().to_string();
        let mut ctx = ConversationContext::new(session_id.clone(), user_id.clone(), self.clock.now());
        self.store.save(&mut ctx).await?;

        info!(session_id = %session_id, user_id = ?user_id, "Session started");
        self.emit(SessionEvent::SessionStarted {
            session_id: session_id.clone(),
            user_id,
        });
        Ok(session_id)
    }

    /// Summary of a session
    pub async fn get_context_summary(&self, session_id: &str) -> Result<ContextSummary> {
        Ok(self.load(session_id).await?.summary())
    }

    /// Continuation policy for a session. An expired session is removed.
    #[instrument(skip(self))]
    pub async fn should_continue(&self, session_id: &str) -> Result<Continuation> {
        let lane = self.lane(session_id);
        let _guard = lane.lock().await;

        let ctx = self.load_in_lane(session_id).await?;
        let continuation = ctx.continuation(self.clock.now());
        if let Continuation::Expired(reason) = continuation {
            self.close(session_id, reason.to_string()).await?;
        }
        Ok(continuation)
    }

    /// End a session, returning its final summary
    #[instrument(skip(self))]
    pub async fn end_session(&self, session_id: &str) -> Result<ContextSummary> {
        let lane = self.lane(session_id);
        let _guard = lane.lock().await;

        let summary = self.load_in_lane(session_id).await?.summary();
        self.close(session_id, "ended".to_string()).await?;
        Ok(summary)
    }

    /// Merge preference keys into the session's overlay
    pub async fn update_preferences(
        &self,
        session_id: &str,
        preferences: PreferenceMap,
    ) -> Result<()> {
        let lane = self.lane(session_id);
        let _guard = lane.lock().await;

        let mut ctx = self.load_in_lane(session_id).await?;
        ctx.update_user_preferences(preferences);
        self.store.save(&mut ctx).await
    }
}
