//! Weighted vote between the pattern and model paths

use super::types::Intent;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Confidence reported when nothing scored
pub const FALLBACK_CONFIDENCE: f64 = 0.1;

/// Linear blend of pattern and model scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedVote {
    /// Weight of the pattern score
    pub pattern_weight: f64,
    /// Weight of the model probability
    pub model_weight: f64,
}

impl Default for WeightedVote {
    fn default() -> Self {
        Self {
            pattern_weight: 0.7,
            model_weight: 0.3,
        }
    }
}

impl WeightedVote {
    /// Create a vote with explicit weights
    #[must_use]
    pub fn new(pattern_weight: f64, model_weight: f64) -> Self {
        Self {
            pattern_weight,
            model_weight,
        }
    }

    /// Combined score for every intent seen by either path
    #[must_use]
    pub fn combine(
        &self,
        pattern: &BTreeMap<Intent, f64>,
        model: &BTreeMap<Intent, f64>,
    ) -> BTreeMap<Intent, f64> {
        pattern
            .keys()
            .chain(model.keys())
            .map(|intent| {
                let p = pattern.get(intent).copied().unwrap_or(0.0);
                let m = model.get(intent).copied().unwrap_or(0.0);
                (*intent, self.pattern_weight * p + self.model_weight * m)
            })
            .collect()
    }

    /// Highest combined score, earlier intents winning ties; general question
    /// with [`FALLBACK_CONFIDENCE`] when nothing is above zero
    #[must_use]
    pub fn winner(combined: &BTreeMap<Intent, f64>) -> (Intent, f64) {
        let mut best: Option<(Intent, f64)> = None;
        for (intent, score) in combined {
            if *score > 0.0 && best.map_or(true, |(_, s)| *score > s) {
                best = Some((*intent, *score));
            }
        }
        best.unwrap_or((Intent::GeneralQuestion, FALLBACK_CONFIDENCE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_uses_union_of_intents() {
        let pattern = BTreeMap::from([(Intent::Anxiety, 0.5)]);
        let model = BTreeMap::from([(Intent::Anxiety, 0.5), (Intent::WorkStress, 1.0)]);
        let combined = WeightedVote::default().combine(&pattern, &model);

        assert_eq!(combined.len(), 2);
        assert!((combined[&Intent::Anxiety] - 0.5).abs() < 1e-9);
        assert!((combined[&Intent::WorkStress] - 0.3).abs() < 1e-9);
        assert_eq!(WeightedVote::winner(&combined).0, Intent::Anxiety);
    }

    #[test]
    fn test_ties_go_to_earlier_intent() {
        let combined = BTreeMap::from([(Intent::MoodTracking, 0.2), (Intent::WorkStress, 0.2)]);
        assert_eq!(WeightedVote::winner(&combined).0, Intent::WorkStress);
    }

    #[test]
    fn test_nothing_above_zero_falls_back() {
        let combined = BTreeMap::from([(Intent::Greeting, 0.0)]);
        assert_eq!(
            WeightedVote::winner(&combined),
            (Intent::GeneralQuestion, FALLBACK_CONFIDENCE)
        );
        assert_eq!(
            WeightedVote::winner(&BTreeMap::new()),
            (Intent::GeneralQuestion, FALLBACK_CONFIDENCE)
        );
    }

    #[test]
    fn test_swapped_weights() {
        let pattern = BTreeMap::from([(Intent::Greeting, 1.0)]);
        let model = BTreeMap::from([(Intent::Farewell, 1.0)]);
        let combined = WeightedVote::new(0.2, 0.8).combine(&pattern, &model);
        assert_eq!(WeightedVote::winner(&combined).0, Intent::Farewell);
    }
}
