//! Rule-based candidate generation, filtering and ranking

use super::catalog;
use super::{ActivityLevel, CurrentContext, Recommendation, UserProfile};
use crate::assessment::{AssessmentResult, Severity};
use tracing::debug;

/// Upper bound on the ranked list
pub const MAX_RECOMMENDATIONS: usize = 5;

const HIGH_RISK_STATUSES: [&str; 3] = ["severe_depression", "severe_anxiety", "bipolar"];

/// Produce a ranked list of at most [`MAX_RECOMMENDATIONS`] suggestions.
///
/// Candidates come from five independent rule sets plus the professional
/// help rule; anything over the time budget or against stated preferences
/// is dropped, then the rest is sorted by priority and personalization.
#[must_use]
pub fn select(
    profile: &UserProfile,
    context: &CurrentContext,
    assessment: Option<&AssessmentResult>,
) -> Vec<Recommendation> {
    let severity = assessment.map(|a| a.severity_level);

    let mut candidates = Vec::new();
    candidates.extend(mood_based(profile));
    candidates.extend(stress_based(profile, context));
    candidates.extend(status_based(profile, severity));
    candidates.extend(catalog::for_time_of_day(context.time_of_day));
    candidates.extend(activity_based(profile, context));
    if needs_professional_help(profile, severity) {
        candidates.extend(catalog::professional_help());
    }

    let generated = candidates.len();
    let mut ranked: Vec<Recommendation> = candidates
        .into_iter()
        .filter(|r| !exceeds_time_budget(r, context.available_minutes))
        .filter(|r| allowed_by_preferences(r, profile))
        .map(|mut r| {
            r.personalization_score = personalization_score(&r, profile, context);
            r
        })
        .collect();

    ranked.sort_by(|a, b| {
        a.priority.cmp(&b.priority).then_with(|| {
            b.personalization_score
                .partial_cmp(&a.personalization_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    });
    ranked.truncate(MAX_RECOMMENDATIONS);

    debug!(
        generated,
        selected = ranked.len(),
        available_minutes = context.available_minutes,
        "Selected recommendations"
    );
    ranked
}

fn mood_based(profile: &UserProfile) -> Vec<Recommendation> {
    if profile.mood_score <= 3 {
        vec![catalog::mood_boost(), catalog::social_connection()]
    } else if profile.mood_score >= 8 {
        vec![catalog::mood_maintenance()]
    } else {
        Vec::new()
    }
}

fn stress_based(profile: &UserProfile, context: &CurrentContext) -> Vec<Recommendation> {
    if profile.stress_level >= 7 {
        let mut out = vec![catalog::deep_relaxation()];
        if context.available_minutes < 30 {
            out.push(catalog::quick_stress_relief());
        }
        out
    } else if profile.stress_level >= 5 {
        vec![catalog::stress_management()]
    } else {
        Vec::new()
    }
}

fn status_based(profile: &UserProfile, severity: Option<Severity>) -> Vec<Recommendation> {
    let status = profile.mental_health_status.to_lowercase();
    if status.contains("depression") {
        let mut out = Vec::new();
        if is_clinically_significant(severity.unwrap_or(Severity::Mild)) {
            out.push(catalog::depression_professional_support());
        }
        out.push(catalog::depression_management());
        out
    } else if status.contains("anxiety") {
        vec![catalog::anxiety_management()]
    } else {
        Vec::new()
    }
}

fn activity_based(profile: &UserProfile, context: &CurrentContext) -> Option<Recommendation> {
    match profile.preferences.activity_level {
        ActivityLevel::Low if context.available_minutes >= 20 => Some(catalog::gentle_activity()),
        ActivityLevel::High if context.available_minutes >= 30 => {
            Some(catalog::energetic_activity())
        }
        _ => None,
    }
}

fn is_clinically_significant(severity: Severity) -> bool {
    matches!(
        severity,
        Severity::Moderate | Severity::ModeratelySevere | Severity::Severe
    )
}

fn needs_professional_help(profile: &UserProfile, severity: Option<Severity>) -> bool {
    severity.is_some_and(is_clinically_significant)
        || HIGH_RISK_STATUSES.contains(&profile.mental_health_status.to_lowercase().as_str())
}

/// Whether a plain "N minutes" duration is above the budget.
///
/// Only a leading whole number counts. Ranges ("15-30 minutes") and
/// durations without minutes ("Ongoing", "Immediate") always fit.
#[must_use]
pub fn exceeds_time_budget(recommendation: &Recommendation, available_minutes: u32) -> bool {
    if !recommendation.duration.contains("minutes") {
        return false;
    }
    recommendation
        .duration
        .split_whitespace()
        .next()
        .and_then(|first| first.parse::<u32>().ok())
        .is_some_and(|minutes| minutes > available_minutes)
}

fn allowed_by_preferences(recommendation: &Recommendation, profile: &UserProfile) -> bool {
    let prefs = &profile.preferences;
    if recommendation.kind == "physical_activity" && prefs.likes_exercise == Some(false) {
        return false;
    }
    if recommendation.kind == "meditation" && prefs.likes_meditation == Some(false) {
        return false;
    }
    !prefs.opted_out.iter().any(|t| t == &recommendation.kind)
}

/// Additive fit score in `[0, 1]`: base 0.5, +0.3 for a liked activity
/// type, +0.2 for a current-mood keyword match, +0.2 for a status match.
#[must_use]
pub fn personalization_score(
    recommendation: &Recommendation,
    profile: &UserProfile,
    context: &CurrentContext,
) -> f64 {
    let prefs = &profile.preferences;
    let content = recommendation.content.to_lowercase();
    let mut score = 0.5;

    let liked = match recommendation.kind.as_str() {
        "physical_activity" => prefs.likes_exercise,
        "meditation" => prefs.likes_meditation,
        "social_connection" => prefs.likes_social,
        _ => None,
    };
    if liked == Some(true) {
        score += 0.3;
    }

    let mood = context.current_mood.to_lowercase();
    if recommendation.kind.contains("mood") && !mood.is_empty() && content.contains(&mood) {
        score += 0.2;
    }

    let status = profile.mental_health_status.to_lowercase();
    if !status.is_empty() && content.contains(&status) {
        score += 0.2;
    }

    f64::min(score, 1.0)
}
