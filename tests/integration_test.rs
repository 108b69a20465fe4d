//! Integration tests for Solace
//!
//! These tests drive the full pipeline through the public API:
//! - solace-nlp: signal extraction
//! - solace-llm: mock provider behind the LLM generator
//! - solace-core: orchestrator, context, assessment, recommendations, stores

use chrono::{TimeZone, Utc};
use solace_core::{
    AssessmentKind, Continuation, Error, Journal, LlmGenerator, ManualClock, MemoryJournal,
    MemoryStore, Orchestrator, OrchestratorConfig, RecommendationQuery, Severity, SqliteStore,
    TemplateGenerator, TurnInput, UserProfile, FALLBACK_MESSAGE,
};
use solace_core::journal::JournalEntry;
use solace_core::SessionStore;
use solace_llm::MockProvider;
use solace_nlp::{Intent, RiskLevel};
use std::sync::Arc;

fn offline_orchestrator() -> Orchestrator {
    Orchestrator::new(
        Arc::new(TemplateGenerator::new()),
        Arc::new(MemoryStore::new_unchecked()),
        OrchestratorConfig::default(),
    )
}

// ============================================================================
// Crisis handling
// ============================================================================

#[tokio::test]
async fn test_crisis_message_with_failing_generator() {
    let provider = MockProvider::new();
    provider.push_failure("service unavailable");
    let journal = Arc::new(MemoryJournal::new());
    let orchestrator = Orchestrator::new(
        Arc::new(LlmGenerator::new(Arc::new(provider))),
        Arc::new(MemoryStore::new_unchecked()),
        OrchestratorConfig::default(),
    )
    .with_journal(journal.clone() as Arc<dyn Journal>);

    let id = orchestrator.start_session(Some("user-1".into())).await.unwrap();
    let result = orchestrator
        .submit_message(TurnInput::new(&id, "I want to kill myself"))
        .await
        .unwrap();

    assert!(result.crisis.is_crisis);
    assert!(result.crisis.matched_keywords.contains("kill myself"));
    assert_eq!(result.sentiment.risk_level, RiskLevel::High);
    assert_eq!(result.conversation_type, Intent::Crisis);
    assert!(result.generator_failed);
    assert_eq!(result.response, FALLBACK_MESSAGE);
    assert!(result.escalation_needed);
    assert!(result.crisis_detected);
    assert_eq!(result.continuation, Continuation::Handoff);
    assert!(result
        .recommendations
        .iter()
        .any(|r| r.title == "Crisis Support Resources"));

    // user utterance, fallback reply and the three emergency resources
    let entries = journal.entries_for(&id);
    assert_eq!(entries.len(), 5);
    assert!(matches!(entries[0], JournalEntry::Utterance { .. }));
}

#[tokio::test]
async fn test_escalation_never_clears() {
    let orchestrator = offline_orchestrator();
    let id = orchestrator.start_session(None).await.unwrap();

    orchestrator
        .submit_message(TurnInput::new(&id, "I want to kill myself"))
        .await
        .unwrap();
    for text in ["hello", "thank you", "I feel a bit better now"] {
        let result = orchestrator
            .submit_message(TurnInput::new(&id, text))
            .await
            .unwrap();
        assert!(result.crisis_detected);
    }

    let summary = orchestrator.get_context_summary(&id).await.unwrap();
    assert!(summary.crisis_detected);
    assert!(summary.escalation_needed);
    assert_eq!(
        orchestrator.should_continue(&id).await.unwrap(),
        Continuation::Handoff
    );
}

// ============================================================================
// Recommendations
// ============================================================================

#[tokio::test]
async fn test_high_stress_short_on_time() {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 14, 0, 0).unwrap());
    let orchestrator = offline_orchestrator().with_clock(Arc::new(clock));
    let id = orchestrator.start_session(None).await.unwrap();

    let query = RecommendationQuery::new()
        .with_profile(UserProfile::default().with_stress_level(8))
        .with_available_minutes(15);
    let recommendations = orchestrator.get_recommendations(&id, query).await.unwrap();

    let kinds: Vec<&str> = recommendations.iter().map(|r| r.kind.as_str()).collect();
    assert_eq!(kinds, vec!["quick_stress_relief"]);

    orchestrator.accept_recommendation(&id, 0).await.unwrap();
    let summary = orchestrator.get_context_summary(&id).await.unwrap();
    assert_eq!(summary.recommendations_count, 1);
}

// ============================================================================
// Assessments
// ============================================================================

async fn run_assessment(
    orchestrator: &Orchestrator,
    session_id: &str,
    kind: AssessmentKind,
    answers: &[i32],
) -> solace_core::AssessmentResult {
    let questions = orchestrator.start_assessment(session_id, kind).await.unwrap();
    assert_eq!(questions.len(), answers.len());
    for (question, value) in questions.iter().zip(answers) {
        orchestrator
            .submit_assessment_answer(session_id, &question.id, *value)
            .await
            .unwrap();
    }
    orchestrator.complete_assessment(session_id).await.unwrap()
}

#[tokio::test]
async fn test_assessment_scoring_bands() {
    let orchestrator = offline_orchestrator();
    let id = orchestrator.start_session(None).await.unwrap();

    let mild = run_assessment(
        &orchestrator,
        &id,
        AssessmentKind::Phq9,
        &[1, 1, 1, 1, 1, 1, 1, 1, 0],
    )
    .await;
    assert_eq!(mild.total_score, 8);
    assert_eq!(mild.severity_level, Severity::Mild);
    assert_eq!(mild.risk_level, Some(RiskLevel::Low));

    let severe = run_assessment(
        &orchestrator,
        &id,
        AssessmentKind::Phq9,
        &[3, 3, 3, 3, 2, 2, 2, 1, 1],
    )
    .await;
    assert_eq!(severe.total_score, 20);
    assert_eq!(severe.severity_level, Severity::Severe);
    assert_eq!(severe.risk_level, Some(RiskLevel::High));

    let anxiety = run_assessment(
        &orchestrator,
        &id,
        AssessmentKind::Gad7,
        &[2, 2, 2, 1, 1, 1, 1],
    )
    .await;
    assert_eq!(anxiety.total_score, 10);
    assert_eq!(anxiety.severity_level, Severity::Moderate);
    assert_eq!(anxiety.risk_level, Some(RiskLevel::Medium));
}

#[tokio::test]
async fn test_assessment_conflict() {
    let orchestrator = offline_orchestrator();
    let id = orchestrator.start_session(None).await.unwrap();

    orchestrator
        .start_assessment(&id, AssessmentKind::Custom)
        .await
        .unwrap();
    let err = orchestrator
        .start_assessment(&id, AssessmentKind::Phq9)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::StateConflict(_)));

    let summary = orchestrator.get_context_summary(&id).await.unwrap();
    assert!(summary.assessment_in_progress);
}

// ============================================================================
// Context invariants
// ============================================================================

#[tokio::test]
async fn test_history_is_bounded_and_summary_is_stable() {
    let orchestrator = offline_orchestrator();
    let id = orchestrator.start_session(None).await.unwrap();

    for i in 0..15 {
        orchestrator
            .submit_message(TurnInput::new(&id, format!("hello number {i}")))
            .await
            .unwrap();
    }

    let first = orchestrator.get_context_summary(&id).await.unwrap();
    let second = orchestrator.get_context_summary(&id).await.unwrap();
    assert_eq!(first.message_count, 20);
    assert_eq!(first, second);
    assert_eq!(first.recent_messages.len(), 5);
    assert_eq!(
        first.recent_messages.last().map(|u| u.text.as_str()),
        Some(Intent::Greeting.response_template())
    );
}

#[tokio::test]
async fn test_sqlite_backed_session() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(
        SqliteStore::new(dir.path().join("sessions.db"))
            .await
            .unwrap(),
    );
    let orchestrator = Orchestrator::new(
        Arc::new(TemplateGenerator::new()),
        store.clone(),
        OrchestratorConfig::default(),
    );

    let id = orchestrator.start_session(None).await.unwrap();
    orchestrator
        .submit_message(TurnInput::new(&id, "hello"))
        .await
        .unwrap();

    let ctx = store.get(&id).await.unwrap().unwrap();
    assert_eq!(ctx.message_count(), 2);
    assert_eq!(ctx.version(), 3);

    orchestrator.end_session(&id).await.unwrap();
    assert!(!store.exists(&id).await.unwrap());
}
