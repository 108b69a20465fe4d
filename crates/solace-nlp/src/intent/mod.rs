//! Intent detection
//!
//! Two scoring paths feed one vote:
//! - fixed regex tables per intent ([`patterns`])
//! - an optional learned classifier ([`IntentClassifier`])
//!
//! The [`WeightedVote`] strategy blends them; the detector falls back to the
//! pattern path alone whenever the classifier is missing or fails.

mod classifier;
mod detector;
mod patterns;
mod types;
mod vote;

pub use classifier::{IntentClassifier, NaiveBayesClassifier, SEED_EXAMPLES};
pub use detector::IntentDetector;
pub use patterns::pattern_scores;
pub use types::{Intent, IntentContext, IntentSignal};
pub use vote::WeightedVote;
