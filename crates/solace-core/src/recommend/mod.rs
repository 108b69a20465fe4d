//! Recommendation selection
//!
//! Stateless: given a profile snapshot, the current context and an optional
//! assessment result, produce a ranked list of suggested activities. Crisis
//! handling bypasses the ranking entirely via [`emergency_recommendations`].

mod catalog;
mod selector;

pub use catalog::{daily_recommendations, emergency_recommendations, weekly_recommendations};
pub use selector::{exceeds_time_budget, personalization_score, select, MAX_RECOMMENDATIONS};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A suggested activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Category, e.g. `quick_stress_relief`
    #[serde(rename = "type")]
    pub kind: String,
    /// Short title
    pub title: String,
    /// One-line description
    pub description: String,
    /// Instructions
    pub content: String,
    /// 1 is most urgent
    pub priority: u8,
    /// Free-text duration, e.g. "5 minutes" or "Ongoing"
    pub duration: String,
    /// Part of the crisis resource list
    pub is_emergency: bool,
    /// Fit with the user's preferences and context, `[0, 1]`
    pub personalization_score: f64,
}

impl Recommendation {
    pub(crate) fn new(
        kind: &str,
        title: &str,
        description: &str,
        content: &str,
        priority: u8,
        duration: &str,
    ) -> Self {
        Self {
            kind: kind.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            content: content.to_string(),
            priority,
            duration: duration.to_string(),
            is_emergency: false,
            personalization_score: 0.0,
        }
    }

    pub(crate) fn emergency(mut self) -> Self {
        self.is_emergency = true;
        self
    }
}

/// Preferred intensity of physical activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    /// Gentle activity only
    Low,
    /// No stated preference
    #[default]
    Moderate,
    /// Enjoys intense exercise
    High,
}

/// Stated preferences; `None` means "not asked"
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Preferred activity intensity
    pub activity_level: ActivityLevel,
    /// Enjoys exercise
    pub likes_exercise: Option<bool>,
    /// Enjoys meditation
    pub likes_meditation: Option<bool>,
    /// Enjoys social activities
    pub likes_social: Option<bool>,
    /// Recommendation types never to suggest
    pub opted_out: Vec<String>,
}

/// Snapshot of what is known about the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    /// Free-text status such as `healthy`, `mild_depression`, `bipolar`
    pub mental_health_status: String,
    /// Self-reported mood, 1-10
    pub mood_score: i32,
    /// Self-reported stress, 1-10
    pub stress_level: i32,
    /// Preferences
    pub preferences: Preferences,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            mental_health_status: "healthy".to_string(),
            mood_score: 5,
            stress_level: 5,
            preferences: Preferences::default(),
        }
    }
}

impl UserProfile {
    /// Set mood score
    #[must_use]
    pub fn with_mood_score(mut self, mood_score: i32) -> Self {
        self.mood_score = mood_score;
        self
    }

    /// Set stress level
    #[must_use]
    pub fn with_stress_level(mut self, stress_level: i32) -> Self {
        self.stress_level = stress_level;
        self
    }

    /// Set mental health status
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.mental_health_status = status.into();
        self
    }

    /// Set preferences
    #[must_use]
    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }
}

/// Part of the day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    /// Before noon
    #[default]
    Morning,
    /// Noon to 18:00
    Afternoon,
    /// 18:00 onwards
    Evening,
}

impl TimeOfDay {
    /// Part of the day for a 0-23 hour
    #[must_use]
    pub fn from_hour(hour: u32) -> Self {
        if hour < 12 {
            Self::Morning
        } else if hour < 18 {
            Self::Afternoon
        } else {
            Self::Evening
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
        })
    }
}

/// Situation at the time of the request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrentContext {
    /// Mood word, e.g. `negative`
    pub current_mood: String,
    /// Part of the day
    pub time_of_day: TimeOfDay,
    /// Minutes the user has available
    pub available_minutes: u32,
}

impl Default for CurrentContext {
    fn default() -> Self {
        Self {
            current_mood: "neutral".to_string(),
            time_of_day: TimeOfDay::Morning,
            available_minutes: 30,
        }
    }
}
