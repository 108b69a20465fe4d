use super::*;
use crate::assessment::{AssessmentKind, Severity};
use crate::clock::ManualClock;
use crate::context::{Continuation, ConversationContext, ExpiryReason, PreferenceMap, Sender};
use crate::error::Error;
use crate::event_bus::{EventBus, SessionEvent};
use crate::generator::{LlmGenerator, TemplateGenerator, FALLBACK_MESSAGE};
use crate::journal::{JournalEntry, MemoryJournal};
use crate::recommend::{exceeds_time_budget, UserProfile};
use crate::store::{MemoryStore, MockSessionStore, SessionStore};
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use serde_json::json;
use solace_llm::{MockProvider, MockReply};
use solace_nlp::{Intent, RiskLevel};
use std::sync::Arc;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

struct Harness {
    orchestrator: Orchestrator,
    provider: MockProvider,
    store: MemoryStore,
    journal: Arc<MemoryJournal>,
    clock: ManualClock,
    bus: Arc<EventBus>,
}

fn harness_with(config: OrchestratorConfig) -> Harness {
    let provider = MockProvider::new();
    let store = MemoryStore::new_unchecked();
    let journal = Arc::new(MemoryJournal::new());
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());
    let bus = Arc::new(EventBus::new(64));

    let generator = Arc::new(LlmGenerator::new(Arc::new(provider.clone())));
    let orchestrator = Orchestrator::new(generator, Arc::new(store.clone()), config)
        .with_journal(journal.clone())
        .with_event_bus(bus.clone())
        .with_clock(Arc::new(clock.clone()));

    Harness {
        orchestrator,
        provider,
        store,
        journal,
        clock,
        bus,
    }
}

fn harness() -> Harness {
    harness_with(OrchestratorConfig::default())
}

fn drain(rx: &mut tokio::sync::broadcast::Receiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn test_ordinary_turn_uses_generator_reply() {
    let h = harness();
    h.provider.push_text("  Hello! How can I support you today?  ");
    let id = h.orchestrator.start_session(Some("u1".into())).await.unwrap();

    let result = h
        .orchestrator
        .submit_message(TurnInput::new(&id, "hello"))
        .await
        .unwrap();

    assert_eq!(result.response, "Hello! How can I support you today?");
    assert_eq!(result.conversation_type, Intent::Greeting);
    assert!(!result.generator_failed);
    assert!(!result.escalation_needed);
    assert!(result.recommendations.is_empty());
    assert_eq!(result.continuation, Continuation::Continue);

    let summary = h.orchestrator.get_context_summary(&id).await.unwrap();
    assert_eq!(summary.message_count, 2);
    assert_eq!(summary.user_id.as_deref(), Some("u1"));
}

#[tokio::test]
async fn test_crisis_survives_generator_failure() {
    let h = harness();
    h.provider.push_failure("upstream unavailable");
    let mut rx = h.bus.subscribe();
    let id = h.orchestrator.start_session(None).await.unwrap();

    let result = h
        .orchestrator
        .submit_message(TurnInput::new(&id, "I want to kill myself"))
        .await
        .unwrap();

    assert!(result.crisis.is_crisis);
    assert_eq!(result.conversation_type, Intent::Crisis);
    assert!(result.generator_failed);
    assert_eq!(result.response, FALLBACK_MESSAGE);
    assert!(result.escalation_needed);
    assert!(result.crisis_detected);
    assert_eq!(result.continuation, Continuation::Handoff);
    assert_eq!(result.recommendations.len(), 3);
    assert!(result.recommendations.iter().all(|r| r.is_emergency));

    let summary = h.orchestrator.get_context_summary(&id).await.unwrap();
    assert!(summary.crisis_detected);
    assert!(summary.escalation_needed);
    assert_eq!(summary.recommendations_count, 3);
    // the fallback is recorded as the bot reply
    assert_eq!(summary.message_count, 2);

    let events = drain(&mut rx);
    assert!(matches!(events[0], SessionEvent::SessionStarted { .. }));
    assert!(events
        .iter()
        .any(|e| matches!(e, SessionEvent::CrisisDetected { .. })));
    assert!(events
        .iter()
        .any(|e| matches!(e, SessionEvent::EscalationRaised { .. })));
    assert!(matches!(
        events.last(),
        Some(SessionEvent::TurnCompleted {
            generator_failed: true,
            escalation_needed: true,
            ..
        })
    ));
}

#[tokio::test]
async fn test_generator_timeout_uses_fallback() {
    let h = harness_with(
        OrchestratorConfig::default().with_generation_timeout(Duration::from_millis(50)),
    );
    h.provider.push(MockReply::Delayed(
        Duration::from_secs(5),
        "too late".to_string(),
    ));
    let id = h.orchestrator.start_session(None).await.unwrap();

    let result = h
        .orchestrator
        .submit_message(TurnInput::new(&id, "hello"))
        .await
        .unwrap();

    assert!(result.generator_failed);
    assert_eq!(result.response, FALLBACK_MESSAGE);
    assert_eq!(result.conversation_type, Intent::Greeting);
}

#[tokio::test]
async fn test_unsafe_reply_is_replaced() {
    let h = harness();
    h.provider.push_text("Maybe you should end it all.");
    let id = h.orchestrator.start_session(None).await.unwrap();

    let result = h
        .orchestrator
        .submit_message(TurnInput::new(&id, "hello"))
        .await
        .unwrap();

    assert!(result.safety_flagged);
    assert!(!result.generator_failed);
    assert_eq!(result.response, FALLBACK_MESSAGE);
}

#[tokio::test]
async fn test_empty_message_rejected() {
    let h = harness();
    let id = h.orchestrator.start_session(None).await.unwrap();

    let err = h
        .orchestrator
        .submit_message(TurnInput::new(&id, "   "))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(h.provider.prompts().is_empty());
}

#[tokio::test]
async fn test_unknown_session() {
    let h = harness();
    let err = h
        .orchestrator
        .submit_message(TurnInput::new("missing", "hello"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn test_unknown_sessions_leave_no_lanes() {
    let h = harness();
    let id = h.orchestrator.start_session(None).await.unwrap();
    h.orchestrator
        .submit_message(TurnInput::new(&id, "hello"))
        .await
        .unwrap();

    for i in 0..50 {
        let err = h
            .orchestrator
            .submit_message(TurnInput::new(format!("unknown-{i}"), "hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
    assert_err!(h.orchestrator.should_continue("unknown-0").await);
    assert_err!(
        h.orchestrator
            .start_assessment("unknown-1", AssessmentKind::Phq9)
            .await
    );

    assert_eq!(h.orchestrator.active_lane_count(), 1);
}

#[tokio::test]
async fn test_turns_of_one_session_are_serialized() {
    let h = harness();
    h.provider
        .push(MockReply::Delayed(Duration::from_millis(30), "first".into()));
    h.provider
        .push(MockReply::Delayed(Duration::from_millis(30), "second".into()));
    let id = h.orchestrator.start_session(None).await.unwrap();

    let (a, b) = tokio::join!(
        h.orchestrator.submit_message(TurnInput::new(&id, "hello")),
        h.orchestrator.submit_message(TurnInput::new(&id, "good morning")),
    );
    a.unwrap();
    b.unwrap();

    let ctx = h.store.get(&id).await.unwrap().unwrap();
    let senders: Vec<Sender> = ctx.history(None).iter().map(|u| u.sender).collect();
    assert_eq!(
        senders,
        vec![Sender::User, Sender::Bot, Sender::User, Sender::Bot]
    );
    // one save at start plus two per turn
    assert_eq!(ctx.version(), 5);
}

#[tokio::test]
async fn test_history_passed_to_generator_excludes_current_message() {
    let h = harness();
    let id = h.orchestrator.start_session(None).await.unwrap();

    h.orchestrator
        .submit_message(TurnInput::new(&id, "hello"))
        .await
        .unwrap();
    h.orchestrator
        .submit_message(TurnInput::new(&id, "good evening"))
        .await
        .unwrap();

    let prompts = h.provider.prompts();
    assert_eq!(prompts.len(), 2);
    // two history turns + current message
    assert_eq!(prompts[1].turns.len(), 3);
    assert_eq!(prompts[1].turns[2].text, "good evening");
}

#[tokio::test]
async fn test_expired_session_is_removed() {
    let h = harness();
    let id = h.orchestrator.start_session(None).await.unwrap();
    h.clock.advance(ChronoDuration::minutes(31));

    let err = h
        .orchestrator
        .submit_message(TurnInput::new(&id, "hello"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::SessionExpired(_)));
    assert_eq!(h.store.count().await.unwrap(), 0);
    assert_eq!(h.orchestrator.active_lane_count(), 0);

    let err = h.orchestrator.get_context_summary(&id).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn test_should_continue_policy() {
    let h = harness();
    let mut rx = h.bus.subscribe();
    let id = h.orchestrator.start_session(None).await.unwrap();

    assert_eq!(
        h.orchestrator.should_continue(&id).await.unwrap(),
        Continuation::Continue
    );

    h.clock.advance(ChronoDuration::minutes(45));
    assert_eq!(
        h.orchestrator.should_continue(&id).await.unwrap(),
        Continuation::Expired(ExpiryReason::Idle)
    );
    assert!(!h.store.exists(&id).await.unwrap());

    let events = drain(&mut rx);
    assert!(matches!(
        events.last(),
        Some(SessionEvent::SessionEnded { .. })
    ));
}

#[tokio::test]
async fn test_handoff_without_auto_reply() {
    let h = harness_with(OrchestratorConfig::default().with_reply_after_handoff(false));
    let id = h.orchestrator.start_session(None).await.unwrap();

    let first = h
        .orchestrator
        .submit_message(TurnInput::new(&id, "I want to kill myself"))
        .await
        .unwrap();
    assert_eq!(first.continuation, Continuation::Handoff);

    let second = h
        .orchestrator
        .submit_message(TurnInput::new(&id, "thanks"))
        .await
        .unwrap();
    assert_eq!(second.response, Intent::Crisis.response_template());
    assert!(second.crisis_detected);
    assert_eq!(h.provider.prompts().len(), 1);
}

#[tokio::test]
async fn test_recommendation_request_turn() {
    let h = harness();
    let id = h.orchestrator.start_session(None).await.unwrap();

    let profile = UserProfile::default().with_stress_level(8);
    let result = h
        .orchestrator
        .submit_message(
            TurnInput::new(&id, "Do you have any advice or tips")
                .with_profile(profile)
                .with_available_minutes(15),
        )
        .await
        .unwrap();

    assert_eq!(result.intent.primary_intent, Intent::RecommendationRequest);
    assert_eq!(result.sentiment.risk_level, RiskLevel::Low);
    assert!(!result.recommendations.is_empty());
    assert!(result.recommendations.len() <= 3);
    assert!(result
        .recommendations
        .iter()
        .any(|r| r.kind == "quick_stress_relief"));
    assert!(result
        .recommendations
        .iter()
        .all(|r| !exceeds_time_budget(r, 15)));

    let summary = h.orchestrator.get_context_summary(&id).await.unwrap();
    assert_eq!(summary.recommendations_count, result.recommendations.len());
}

#[tokio::test]
async fn test_assessment_flow() {
    let h = harness();
    let mut rx = h.bus.subscribe();
    let id = h.orchestrator.start_session(None).await.unwrap();

    let questions = h
        .orchestrator
        .start_assessment(&id, AssessmentKind::Phq9)
        .await
        .unwrap();
    assert_eq!(questions.len(), 9);

    let err = h
        .orchestrator
        .start_assessment(&id, AssessmentKind::Gad7)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::StateConflict(_)));

    let err = h
        .orchestrator
        .submit_assessment_answer(&id, "phq9_1", 7)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    let err = h
        .orchestrator
        .submit_assessment_answer(&id, "gad7_1", 1)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    for (i, question) in questions.iter().enumerate() {
        let next = h
            .orchestrator
            .submit_assessment_answer(&id, &question.id, 1)
            .await
            .unwrap();
        assert_eq!(next.as_ref(), questions.get(i + 1));
    }

    let result = h.orchestrator.complete_assessment(&id).await.unwrap();
    assert_eq!(result.total_score, 9);
    assert_eq!(result.severity_level, Severity::Mild);
    assert_eq!(result.risk_level, Some(RiskLevel::Low));

    let err = h.orchestrator.complete_assessment(&id).await.unwrap_err();
    assert!(matches!(err, Error::StateConflict(_)));
    let err = h
        .orchestrator
        .submit_assessment_answer(&id, "phq9_1", 1)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::StateConflict(_)));

    let journal = h.journal.entries_for(&id);
    assert!(journal
        .iter()
        .any(|e| matches!(e, JournalEntry::Assessment { .. })));
    assert!(drain(&mut rx).iter().any(|e| matches!(
        e,
        SessionEvent::AssessmentCompleted {
            severity: Severity::Mild,
            ..
        }
    )));
}

#[tokio::test]
async fn test_recommendation_follow_up() {
    let h = harness();
    let id = h.orchestrator.start_session(None).await.unwrap();

    let mut overlay = PreferenceMap::new();
    overlay.insert("stress_level".into(), json!(9));
    h.orchestrator.update_preferences(&id, overlay).await.unwrap();

    let recommendations = h
        .orchestrator
        .get_recommendations(&id, RecommendationQuery::new().with_available_minutes(10))
        .await
        .unwrap();
    assert!(recommendations
        .iter()
        .any(|r| r.kind == "quick_stress_relief"));

    h.orchestrator.accept_recommendation(&id, 0).await.unwrap();
    h.orchestrator.complete_recommendation(&id, 0).await.unwrap();
    let err = h
        .orchestrator
        .accept_recommendation(&id, 99)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let ctx = h.store.get(&id).await.unwrap().unwrap();
    let first = &ctx.recommendations_given()[0];
    assert!(first.accepted && first.completed);

    let statuses: Vec<_> = h
        .journal
        .entries_for(&id)
        .into_iter()
        .filter(|e| matches!(e, JournalEntry::RecommendationStatus { .. }))
        .collect();
    assert_eq!(statuses.len(), 2);
}

#[tokio::test]
async fn test_crisis_session_gets_emergency_recommendations() {
    let h = harness();
    let id = h.orchestrator.start_session(None).await.unwrap();
    h.orchestrator
        .submit_message(TurnInput::new(&id, "I want to kill myself"))
        .await
        .unwrap();

    let recommendations = h
        .orchestrator
        .get_recommendations(&id, RecommendationQuery::new())
        .await
        .unwrap();
    assert_eq!(recommendations.len(), 3);
    assert!(recommendations.iter().all(|r| r.is_emergency));
}

#[tokio::test]
async fn test_end_session_returns_final_summary() {
    let orchestrator = Orchestrator::new(
        Arc::new(TemplateGenerator::new()),
        Arc::new(MemoryStore::new_unchecked()),
        OrchestratorConfig::default().with_concurrent_extractors(false),
    );
    let id = assert_ok!(orchestrator.start_session(None).await);
    let result = assert_ok!(
        orchestrator
            .submit_message(TurnInput::new(&id, "hello"))
            .await
    );
    assert_eq!(result.response, Intent::Greeting.response_template());

    let summary = assert_ok!(orchestrator.end_session(&id).await);
    assert_eq!(summary.message_count, 2);
    assert!(matches!(
        assert_err!(orchestrator.end_session(&id).await),
        Error::NotFound(_)
    ));
}

#[tokio::test]
async fn test_store_conflict_fails_turn_before_generation() {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
    let mut store = MockSessionStore::new();
    store
        .expect_get()
        .returning(move |id| Ok(Some(ConversationContext::new(id, None, start))));
    store
        .expect_save()
        .times(1)
        .returning(|ctx| {
            Err(Error::StateConflict(format!(
                "session {} changed concurrently",
                ctx.session_id()
            )))
        });

    let provider = MockProvider::new();
    let orchestrator = Orchestrator::new(
        Arc::new(LlmGenerator::new(Arc::new(provider.clone()))),
        Arc::new(store),
        OrchestratorConfig::default(),
    )
    .with_clock(Arc::new(ManualClock::new(start)));

    let err = assert_err!(
        orchestrator
            .submit_message(TurnInput::new("s1", "hello"))
            .await
    );
    assert!(matches!(err, Error::StateConflict(_)));
    assert!(provider.prompts().is_empty());
}
