//! Assessment operations

use super::core::{log_journal_failure, Orchestrator};
use crate::assessment::{questions_for, score, AssessmentKind, AssessmentResult, Question};
use crate::error::{Error, Result};
use crate::event_bus::SessionEvent;
use tracing::{info, instrument};

impl Orchestrator {
    /// Start an assessment and return its questions
    ///
    /// # Errors
    ///
    /// `StateConflict` if another assessment is still running.
    #[instrument(skip(self))]
    pub async fn start_assessment(
        &self,
        session_id: &str,
        kind: AssessmentKind,
    ) -> Result<Vec<Question>> {
        let lane = self.lane(session_id);
        let _guard = lane.lock().await;

        let mut ctx = self.load_in_lane(session_id).await?;
        let questions = questions_for(kind);
        ctx.start_assessment(kind, questions.clone(), self.clock.now())?;
        self.store.save(&mut ctx).await?;
        Ok(questions)
    }

    /// Record one answer and return the next unanswered question, if any
    ///
    /// # Errors
    ///
    /// - `StateConflict` when no assessment is running
    /// - `Validation` for an unknown question or a value outside its options
    pub async fn submit_assessment_answer(
        &self,
        session_id: &str,
        question_id: &str,
        value: i32,
    ) -> Result<Option<Question>> {
        let lane = self.lane(session_id);
        let _guard = lane.lock().await;

        let mut ctx = self.load_in_lane(session_id).await?;
        let running = ctx
            .assessment_in_progress()
            .ok_or_else(|| Error::StateConflict("no assessment in progress".to_string()))?;
        let question = running.question(question_id).ok_or_else(|| {
            Error::Validation(format!("unknown question {question_id} for {}", running.kind))
        })?;
        if !question.accepts(value) {
            return Err(Error::Validation(format!(
                "value {value} is not an option for {question_id}"
            )));
        }

        ctx.add_assessment_response(question_id, value);
        let next = ctx
            .assessment_in_progress()
            .and_then(|a| a.next_question())
            .cloned();
        self.store.save(&mut ctx).await?;
        Ok(next)
    }

    /// Score the running assessment. Unanswered questions count as zero.
    ///
    /// # Errors
    ///
    /// `StateConflict` when no assessment is running.
    #[instrument(skip(self))]
    pub async fn complete_assessment(&self, session_id: &str) -> Result<AssessmentResult> {
        let lane = self.lane(session_id);
        let _guard = lane.lock().await;

        let mut ctx = self.load_in_lane(session_id).await?;
        let completed = ctx
            .complete_assessment(self.clock.now())
            .ok_or_else(|| Error::StateConflict("no assessment in progress".to_string()))?;
        let result = score(completed.kind, &completed.responses);
        ctx.record_assessment_result(result.clone());
        self.store.save(&mut ctx).await?;

        if let Some(journal) = &self.journal {
            let written = journal.record_assessment(session_id, &result).await;
            log_journal_failure(session_id, "assessment", written);
        }

        info!(
            kind = %result.kind,
            total_score = result.total_score,
            severity = %result.severity_level,
            duration_secs = completed.duration_secs,
            "Assessment completed"
        );
        self.emit(SessionEvent::AssessmentCompleted {
            session_id: session_id.to_string(),
            kind: result.kind,
            severity: result.severity_level,
        });
        Ok(result)
    }
}
