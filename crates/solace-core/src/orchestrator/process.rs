//! The turn pipeline
//!
//! 1. extract sentiment, intent and crisis signals
//! 2. apply them and the user utterance to the context, save
//! 3. call the generator with no context held, bounded by a timeout
//! 4. pick recommendations
//! 5. reload, append the bot utterance and recommendations, save

use super::core::Orchestrator;
use super::{TurnInput, TurnResult};
use crate::context::{Continuation, Sender, Utterance};
use crate::error::{Error, Result};
use crate::event_bus::SessionEvent;
use crate::generator::{safety_check, GenerationRequest, FALLBACK_MESSAGE};
use crate::recommend::{emergency_recommendations, select};
use serde_json::json;
use solace_llm::TokenUsage;
use solace_nlp::{CrisisCheck, Intent, IntentSignal, RiskLevel, SentimentSignal, UrgencyLevel};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

struct Reply {
    text: String,
    generator_failed: bool,
    safety_flagged: bool,
    usage: Option<TokenUsage>,
}

impl Reply {
    fn fallback(generator_failed: bool, safety_flagged: bool, usage: Option<TokenUsage>) -> Self {
        Self {
            text: FALLBACK_MESSAGE.to_string(),
            generator_failed,
            safety_flagged,
            usage,
        }
    }
}

impl Orchestrator {
    /// Process one user message.
    ///
    /// Safety signals survive generator outages: when generation fails or
    /// times out, the reply is [`FALLBACK_MESSAGE`] and every signal computed
    /// from the message is still reported and recorded.
    ///
    /// # Errors
    ///
    /// - `Validation` for an empty message
    /// - `NotFound` for an unknown session
    /// - `SessionExpired` when the session passed its idle or duration limit;
    ///   the session is removed
    #[instrument(skip(self, input), fields(session_id = %input.session_id))]
    pub async fn submit_message(&self, input: TurnInput) -> Result<TurnResult> {
        let text = input.text.trim();
        if text.is_empty() {
            return Err(Error::Validation("message is empty".to_string()));
        }
        let session_id = input.session_id.as_str();

        let lane = self.lane(session_id);
        let _guard = lane.lock().await;

        let now = self.clock.now();
        let mut ctx = self.load_in_lane(session_id).await?;
        let before = ctx.continuation(now);
        if let Continuation::Expired(reason) = before {
            self.close(session_id, reason.to_string()).await?;
            return Err(Error::SessionExpired(format!("{session_id}: {reason}")));
        }

        let (sentiment, intent, crisis) = self.extract(text).await?;
        let conversation_type = if crisis.is_crisis {
            Intent::Crisis
        } else {
            intent.primary_intent
        };
        let escalation_needed = crisis.is_crisis
            || intent.urgency_level == UrgencyLevel::High
            || sentiment.risk_level == RiskLevel::High;

        debug!(
            conversation_type = %conversation_type,
            risk = %sentiment.risk_level,
            urgency = %intent.urgency_level,
            crisis = crisis.is_crisis,
            "Signals extracted"
        );

        // apply signals and the user utterance before the generator call
        let history = ctx.history(Some(self.config.history_for_prompt));
        let escalated_before = ctx.escalation_needed();
        let user_utterance = Utterance::new(Sender::User, text, now)
            .with_metadata(signal_metadata(&sentiment, &intent, &crisis));
        ctx.add_message(user_utterance.clone());
        ctx.update_sentiment(sentiment.clone(), now);
        ctx.update_intent(intent.clone(), now);
        let escalation_raised = !escalated_before && ctx.escalation_needed();
        let context_summary = ctx.context_for_prompt();
        self.store.save(&mut ctx).await?;
        self.journal_utterance(session_id, &user_utterance).await;

        if crisis.is_crisis {
            warn!(
                severity = %crisis.severity,
                keywords = crisis.matched_keywords.len(),
                "Crisis keywords detected"
            );
            self.emit(SessionEvent::CrisisDetected {
                session_id: session_id.to_string(),
                severity: crisis.severity,
                keyword_count: crisis.matched_keywords.len(),
            });
        }
        if escalation_raised {
            self.emit(SessionEvent::EscalationRaised {
                session_id: session_id.to_string(),
            });
        }

        let reply = if before == Continuation::Handoff && !self.config.reply_after_handoff {
            debug!("Session handed off, answering with crisis template");
            Reply {
                text: Intent::Crisis.response_template().to_string(),
                generator_failed: false,
                safety_flagged: false,
                usage: None,
            }
        } else {
            let request = GenerationRequest {
                conversation_type,
                user_message: text.to_string(),
                history,
                context_summary,
            };
            self.generate(&request).await
        };

        let recommendations = if crisis.is_crisis {
            emergency_recommendations()
        } else if intent.primary_intent == Intent::RecommendationRequest
            || sentiment.risk_level == RiskLevel::Medium
        {
            let profile = input
                .profile
                .clone()
                .unwrap_or_else(|| super::recommendations::profile_from_context(&ctx));
            let current = super::recommendations::current_context(
                &ctx,
                now,
                input.available_minutes,
                self.config.default_available_minutes,
            );
            let mut picked = select(&profile, &current, ctx.last_assessment());
            picked.truncate(self.config.max_turn_recommendations);
            picked
        } else {
            Vec::new()
        };

        // re-acquire the context for the reply; the lane is still held
        let replied_at = self.clock.now();
        let mut ctx = self.load_in_lane(session_id).await?;
        let mut bot_metadata = BTreeMap::new();
        bot_metadata.insert("conversation_type".to_string(), json!(conversation_type));
        if reply.generator_failed || reply.safety_flagged {
            bot_metadata.insert("fallback".to_string(), json!(true));
        }
        let bot_utterance =
            Utterance::new(Sender::Bot, reply.text.clone(), replied_at).with_metadata(bot_metadata);
        ctx.add_message(bot_utterance.clone());

        let first_index = ctx.recommendations_given().len();
        for recommendation in &recommendations {
            ctx.add_recommendation(recommendation.clone(), replied_at);
        }
        let crisis_detected = crisis.is_crisis || ctx.crisis_detected();
        let continuation = ctx.continuation(replied_at);
        self.store.save(&mut ctx).await?;

        self.journal_utterance(session_id, &bot_utterance).await;
        self.journal_recommendations(session_id, first_index, &recommendations)
            .await;

        self.emit(SessionEvent::TurnCompleted {
            session_id: session_id.to_string(),
            conversation_type,
            escalation_needed,
            generator_failed: reply.generator_failed,
        });
        info!(
            conversation_type = %conversation_type,
            escalation_needed,
            crisis_detected,
            recommendations = recommendations.len(),
            generator_failed = reply.generator_failed,
            "Turn completed"
        );

        Ok(TurnResult {
            session_id: session_id.to_string(),
            response: reply.text,
            conversation_type,
            sentiment,
            intent,
            crisis,
            escalation_needed,
            crisis_detected,
            recommendations,
            generator_failed: reply.generator_failed,
            safety_flagged: reply.safety_flagged,
            usage: reply.usage,
            continuation,
        })
    }

    async fn extract(&self, text: &str) -> Result<(SentimentSignal, IntentSignal, CrisisCheck)> {
        if !self.config.concurrent_extractors {
            return Ok((
                self.sentiment.analyze(text),
                self.intent.detect(text),
                self.crisis.scan(text),
            ));
        }

        let (sentiment, intent, crisis) = (
            Arc::clone(&self.sentiment),
            Arc::clone(&self.intent),
            Arc::clone(&self.crisis),
        );
        let (t1, t2, t3) = (text.to_string(), text.to_string(), text.to_string());

        tokio::try_join!(
            tokio::task::spawn_blocking(move || sentiment.analyze(&t1)),
            tokio::task::spawn_blocking(move || intent.detect(&t2)),
            tokio::task::spawn_blocking(move || crisis.scan(&t3)),
        )
        .map_err(|e| Error::Internal(format!("signal extraction task failed: {e}")))
    }

    async fn generate(&self, request: &GenerationRequest) -> Reply {
        let timeout = self.config.generation_timeout;
        match tokio::time::timeout(timeout, self.generator.generate(request)).await {
            Ok(Ok(generation)) if generation.text.trim().is_empty() => {
                warn!(generator = self.generator.name(), "Generator returned an empty reply");
                Reply::fallback(true, false, generation.usage)
            }
            Ok(Ok(generation)) => {
                let check = safety_check(&generation.text);
                if check.is_safe {
                    Reply {
                        text: generation.text,
                        generator_failed: false,
                        safety_flagged: false,
                        usage: generation.usage,
                    }
                } else {
                    warn!(
                        generator = self.generator.name(),
                        phrases = ?check.flagged_phrases,
                        "Unsafe reply replaced by fallback"
                    );
                    Reply::fallback(false, true, generation.usage)
                }
            }
            Ok(Err(e)) => {
                warn!(generator = self.generator.name(), error = %e, "Generator failed, using fallback");
                Reply::fallback(true, false, None)
            }
            Err(_) => {
                warn!(
                    generator = self.generator.name(),
                    timeout_ms = timeout.as_millis() as u64,
                    "Generator timed out, using fallback"
                );
                Reply::fallback(true, false, None)
            }
        }
    }
}

fn signal_metadata(
    sentiment: &SentimentSignal,
    intent: &IntentSignal,
    crisis: &CrisisCheck,
) -> BTreeMap<String, serde_json::Value> {
    let mut metadata = BTreeMap::new();
    metadata.insert("sentiment".to_string(), json!(sentiment.label));
    metadata.insert("polarity".to_string(), json!(sentiment.polarity));
    metadata.insert("risk_level".to_string(), json!(sentiment.risk_level));
    metadata.insert("intent".to_string(), json!(intent.primary_intent));
    metadata.insert("urgency_level".to_string(), json!(intent.urgency_level));
    metadata.insert("crisis".to_string(), json!(crisis.is_crisis));
    metadata
}
