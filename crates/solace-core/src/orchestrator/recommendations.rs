//! Recommendation operations and profile derivation

use super::core::{log_journal_failure, Orchestrator};
use super::RecommendationQuery;
use crate::context::ConversationContext;
use crate::error::{Error, Result};
use crate::recommend::{
    emergency_recommendations, select, CurrentContext, Preferences, Recommendation, TimeOfDay,
    UserProfile,
};
use chrono::{DateTime, Timelike, Utc};
use tracing::{debug, instrument};

impl Orchestrator {
    /// Recommendations for a session, recorded into its context.
    ///
    /// A session that has seen a crisis always gets the emergency list.
    #[instrument(skip(self, query))]
    pub async fn get_recommendations(
        &self,
        session_id: &str,
        query: RecommendationQuery,
    ) -> Result<Vec<Recommendation>> {
        let lane = self.lane(session_id);
        let _guard = lane.lock().await;

        let now = self.clock.now();
        let mut ctx = self.load_in_lane(session_id).await?;
        let recommendations = if ctx.crisis_detected() {
            emergency_recommendations()
        } else {
            let profile = query
                .profile
                .unwrap_or_else(|| profile_from_context(&ctx));
            let current = current_context(
                &ctx,
                now,
                query.available_minutes,
                self.config.default_available_minutes,
            );
            select(&profile, &current, ctx.last_assessment())
        };

        let first_index = ctx.recommendations_given().len();
        for recommendation in &recommendations {
            ctx.add_recommendation(recommendation.clone(), now);
        }
        self.store.save(&mut ctx).await?;
        self.journal_recommendations(session_id, first_index, &recommendations)
            .await;
        Ok(recommendations)
    }

    /// Mark a given recommendation as accepted
    pub async fn accept_recommendation(&self, session_id: &str, index: usize) -> Result<()> {
        self.update_recommendation(session_id, index, true).await
    }

    /// Mark a given recommendation as completed
    pub async fn complete_recommendation(&self, session_id: &str, index: usize) -> Result<()> {
        self.update_recommendation(session_id, index, false).await
    }

    async fn update_recommendation(
        &self,
        session_id: &str,
        index: usize,
        accepted: bool,
    ) -> Result<()> {
        let lane = self.lane(session_id);
        let _guard = lane.lock().await;

        let mut ctx = self.load_in_lane(session_id).await?;
        let known = if accepted {
            ctx.mark_recommendation_accepted(index)
        } else {
            ctx.mark_recommendation_completed(index)
        };
        if !known {
            return Err(Error::Validation(format!(
                "no recommendation at index {index}"
            )));
        }
        let (accepted, completed) = ctx
            .recommendations_given()
            .get(index)
            .map_or((false, false), |r| (r.accepted, r.completed));
        self.store.save(&mut ctx).await?;

        if let Some(journal) = &self.journal {
            let written = journal
                .record_recommendation_status(session_id, index, accepted, completed)
                .await;
            log_journal_failure(session_id, "recommendation_status", written);
        }
        Ok(())
    }
}

/// Profile for a session that did not provide one.
///
/// Status, stress and mood come from the preference overlay when set there;
/// otherwise mood follows the recent average sentiment and stress is neutral.
pub(crate) fn profile_from_context(ctx: &ConversationContext) -> UserProfile {
    let overlay = ctx.user_preferences();
    let preferences = serde_json::to_value(overlay)
        .and_then(serde_json::from_value::<Preferences>)
        .unwrap_or_else(|e| {
            debug!(error = %e, "Ignoring malformed preference overlay");
            Preferences::default()
        });

    let avg_sentiment = ctx.summary().avg_sentiment;
    let derived_mood = (5.0 + 5.0 * avg_sentiment).round().clamp(1.0, 10.0) as i32;
    let int_key = |key: &str| {
        overlay
            .get(key)
            .and_then(serde_json::Value::as_i64)
            .map(|v| v as i32)
    };

    UserProfile {
        mental_health_status: overlay
            .get("mental_health_status")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("healthy")
            .to_string(),
        mood_score: int_key("mood_score").unwrap_or(derived_mood),
        stress_level: int_key("stress_level").unwrap_or(5),
        preferences,
    }
}

/// Situation for a recommendation request at `now`
pub(crate) fn current_context(
    ctx: &ConversationContext,
    now: DateTime<Utc>,
    available_minutes: Option<u32>,
    default_minutes: u32,
) -> CurrentContext {
    let available_minutes = available_minutes
        .or_else(|| {
            ctx.user_preferences()
                .get("available_minutes")
                .and_then(serde_json::Value::as_u64)
                .map(|v| v as u32)
        })
        .unwrap_or(default_minutes);

    CurrentContext {
        current_mood: ctx.mood_trend().as_str().to_string(),
        time_of_day: TimeOfDay::from_hour(now.hour()),
        available_minutes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::PreferenceMap;
    use crate::recommend::ActivityLevel;
    use chrono::TimeZone;
    use serde_json::json;

    fn ctx() -> ConversationContext {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        ConversationContext::new("s1", None, start)
    }

    #[test]
    fn test_profile_defaults_without_overlay() {
        let profile = profile_from_context(&ctx());
        assert_eq!(profile.mental_health_status, "healthy");
        assert_eq!(profile.mood_score, 5);
        assert_eq!(profile.stress_level, 5);
        assert_eq!(profile.preferences, Preferences::default());
    }

    #[test]
    fn test_profile_reads_overlay() {
        let mut c = ctx();
        let mut overlay = PreferenceMap::new();
        overlay.insert("stress_level".into(), json!(8));
        overlay.insert("mental_health_status".into(), json!("mild_anxiety"));
        overlay.insert("likes_exercise".into(), json!(false));
        overlay.insert("activity_level".into(), json!("low"));
        c.update_user_preferences(overlay);

        let profile = profile_from_context(&c);
        assert_eq!(profile.stress_level, 8);
        assert_eq!(profile.mental_health_status, "mild_anxiety");
        assert_eq!(profile.preferences.likes_exercise, Some(false));
        assert_eq!(profile.preferences.activity_level, ActivityLevel::Low);
    }

    #[test]
    fn test_current_context_minutes_precedence() {
        let mut c = ctx();
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 19, 0, 0).unwrap();

        let current = current_context(&c, now, None, 30);
        assert_eq!(current.available_minutes, 30);
        assert_eq!(current.time_of_day, TimeOfDay::Evening);
        assert_eq!(current.current_mood, "neutral");

        let mut overlay = PreferenceMap::new();
        overlay.insert("available_minutes".into(), json!(10));
        c.update_user_preferences(overlay);
        assert_eq!(current_context(&c, now, None, 30).available_minutes, 10);
        assert_eq!(current_context(&c, now, Some(45), 30).available_minutes, 45);
    }
}
