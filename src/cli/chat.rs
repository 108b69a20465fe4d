//! `solace chat`

use super::assess::{ask, print_result};
use super::input::LineInput;
use crate::app;
use crate::settings::AppConfig;
use anyhow::bail;
use solace_core::{
    format_error_for_cli, AssessmentKind, Continuation, Error, Orchestrator, Recommendation,
    RecommendationQuery, TurnInput,
};
use tracing::warn;

const CRISIS_NOTICE: &str = "If you are in danger, call or text 988 (Suicide & Crisis Lifeline), \
text HOME to 741741, or call 911.";

/// Interactive session loop
pub async fn run(config: &AppConfig, user: Option<String>, offline: bool) -> anyhow::Result<()> {
    let orchestrator = match app::build_orchestrator(config, offline).await {
        Ok(orchestrator) => orchestrator,
        Err(e) => bail!(format_error_for_cli(&e)),
    };
    let session_id = orchestrator.start_session(user).await?;
    let mut input = LineInput::stdin();

    println!("Solace is listening. Commands: /assess <phq9|gad7|custom>, /recommend, /summary, /quit");
    while let Some(line) = input.read("you> ").await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let outcome = match line.split_whitespace().next() {
            Some("/quit") => break,
            Some("/summary") => summary(&orchestrator, &session_id).await,
            Some("/recommend") => recommend(&orchestrator, &session_id).await,
            Some("/assess") => {
                let kind = line.split_whitespace().nth(1).unwrap_or("phq9");
                assessment(&orchestrator, &session_id, kind, &mut input).await
            }
            _ => turn(&orchestrator, &session_id, line).await,
        };

        match outcome {
            Ok(()) => {}
            Err(e @ (Error::SessionExpired(_) | Error::NotFound(_))) => {
                print!("{}", format_error_for_cli(&e));
                return Ok(());
            }
            Err(e) if e.is_fatal() => bail!(format_error_for_cli(&e)),
            Err(e) => {
                warn!(error = %e, "Command failed");
                print!("{}", format_error_for_cli(&e));
            }
        }
    }

    let summary = orchestrator.end_session(&session_id).await?;
    println!(
        "Session ended after {} messages. Take care.",
        summary.message_count
    );
    Ok(())
}

async fn turn(orchestrator: &Orchestrator, session_id: &str, text: &str) -> solace_core::Result<()> {
    let result = orchestrator
        .submit_message(TurnInput::new(session_id, text))
        .await?;

    println!("solace> {}", result.response);
    if result.crisis_detected {
        println!("\n{CRISIS_NOTICE}");
    }
    print_recommendations(&result.recommendations);
    if result.continuation == Continuation::Handoff {
        println!("\n(A human counselor should take over this conversation.)");
    }
    Ok(())
}

async fn summary(orchestrator: &Orchestrator, session_id: &str) -> solace_core::Result<()> {
    let summary = orchestrator.get_context_summary(session_id).await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

async fn recommend(orchestrator: &Orchestrator, session_id: &str) -> solace_core::Result<()> {
    let recommendations = orchestrator
        .get_recommendations(session_id, RecommendationQuery::new())
        .await?;
    print_recommendations(&recommendations);
    Ok(())
}

async fn assessment(
    orchestrator: &Orchestrator,
    session_id: &str,
    kind: &str,
    input: &mut LineInput,
) -> solace_core::Result<()> {
    let kind: AssessmentKind = kind.parse()?;
    let questions = orchestrator.start_assessment(session_id, kind).await?;

    println!("{} ({} questions)", kind.display_name(), questions.len());
    for question in &questions {
        let answer = ask(input, question)
            .await
            .map_err(|e| Error::Internal(format!("reading answer: {e}")))?;
        let Some(value) = answer else {
            break;
        };
        orchestrator
            .submit_assessment_answer(session_id, &question.id, value)
            .await?;
    }

    let result = orchestrator.complete_assessment(session_id).await?;
    print_result(&result);
    Ok(())
}

fn print_recommendations(recommendations: &[Recommendation]) {
    if recommendations.is_empty() {
        return;
    }
    println!("\nSuggestions:");
    for (i, r) in recommendations.iter().enumerate() {
        println!("  {}. {} ({}) - {}", i + 1, r.title, r.duration, r.description);
    }
}
