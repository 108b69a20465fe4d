//! Learned intent classifiers

use super::types::Intent;
use crate::error::{Error, Result};
use crate::lexicon::tokenize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// A classifier producing per-intent probabilities
#[cfg_attr(test, mockall::automock)]
pub trait IntentClassifier: Send + Sync {
    /// Probability per intent for the text. An empty map means the
    /// classifier has no opinion.
    ///
    /// # Errors
    /// Returns an error if the classifier cannot run
    fn predict_proba(&self, text: &str) -> Result<BTreeMap<Intent, f64>>;
}

/// Two seed phrases per intent
pub const SEED_EXAMPLES: &[(&str, Intent)] = &[
    ("hi there how are you", Intent::Greeting),
    ("hello good morning", Intent::Greeting),
    ("bye see you later", Intent::Farewell),
    ("thank you goodbye", Intent::Farewell),
    ("i want to kill myself", Intent::Crisis),
    ("i feel like ending it all", Intent::Crisis),
    ("i'm so depressed", Intent::Depression),
    ("feeling hopeless and sad", Intent::Depression),
    ("i'm really anxious", Intent::Anxiety),
    ("worried about everything", Intent::Anxiety),
    ("can't sleep at night", Intent::SleepIssues),
    ("having trouble sleeping", Intent::SleepIssues),
    ("problems with my partner", Intent::RelationshipIssues),
    ("fighting with family", Intent::RelationshipIssues),
    ("stressed at work", Intent::WorkStress),
    ("overwhelmed with work", Intent::WorkStress),
    ("can i take an assessment", Intent::AssessmentRequest),
    ("how am i doing mentally", Intent::AssessmentRequest),
    ("what should i do", Intent::RecommendationRequest),
    ("need some advice", Intent::RecommendationRequest),
    ("how is my mood today", Intent::MoodTracking),
    ("track my emotions", Intent::MoodTracking),
    ("need to see a therapist", Intent::ProfessionalHelp),
    ("should i get counseling", Intent::ProfessionalHelp),
    ("taking medication", Intent::Medication),
    ("side effects of my meds", Intent::Medication),
    ("how to cope with stress", Intent::CopingStrategies),
    ("breathing exercises", Intent::CopingStrategies),
    ("what is depression", Intent::GeneralQuestion),
    ("how does therapy work", Intent::GeneralQuestion),
];

/// Words ignored by the classifier
const STOP_WORDS: &[&str] = &[
    "a", "about", "all", "am", "an", "and", "are", "as", "at", "be", "been", "but", "by", "can",
    "could", "do", "does", "doing", "for", "from", "get", "had", "has", "have", "having", "he",
    "her", "here", "him", "his", "how", "i", "i'm", "if", "in", "is", "it", "its", "like", "me",
    "my", "myself", "of", "on", "or", "our", "see", "she", "should", "so", "some", "take",
    "that", "the", "their", "them", "then", "there", "they", "this", "to", "up", "very", "was",
    "we", "were", "what", "when", "where", "which", "who", "why", "will", "with", "would",
    "you", "your",
];

/// Multinomial naive Bayes over word counts with Laplace smoothing
#[derive(Debug, Clone)]
pub struct NaiveBayesClassifier {
    log_priors: BTreeMap<Intent, f64>,
    word_counts: BTreeMap<Intent, HashMap<String, f64>>,
    class_totals: BTreeMap<Intent, f64>,
    vocabulary: HashSet<String>,
    alpha: f64,
}

impl NaiveBayesClassifier {
    /// Train on labelled phrases.
    ///
    /// # Errors
    /// Returns [`Error::Configuration`] when there is nothing to learn from
    pub fn train<S: AsRef<str>>(examples: &[(S, Intent)]) -> Result<Self> {
        let mut doc_counts: BTreeMap<Intent, f64> = BTreeMap::new();
        let mut word_counts: BTreeMap<Intent, HashMap<String, f64>> = BTreeMap::new();
        let mut vocabulary = HashSet::new();

        for (text, intent) in examples {
            *doc_counts.entry(*intent).or_default() += 1.0;
            let counts = word_counts.entry(*intent).or_default();
            for token in features(text.as_ref()) {
                vocabulary.insert(token.clone());
                *counts.entry(token).or_default() += 1.0;
            }
        }

        if vocabulary.is_empty() {
            return Err(Error::Configuration(
                "intent classifier has no training vocabulary".to_string(),
            ));
        }

        let total_docs: f64 = doc_counts.values().sum();
        let log_priors = doc_counts
            .iter()
            .map(|(intent, n)| (*intent, (n / total_docs).ln()))
            .collect();
        let class_totals = word_counts
            .iter()
            .map(|(intent, counts)| (*intent, counts.values().sum()))
            .collect();

        Ok(Self {
            log_priors,
            word_counts,
            class_totals,
            vocabulary,
            alpha: 1.0,
        })
    }

    /// Classifier trained on [`SEED_EXAMPLES`]
    ///
    /// # Errors
    /// Never fails for the built-in seed set; the signature matches [`Self::train`]
    pub fn seeded() -> Result<Self> {
        Self::train(SEED_EXAMPLES)
    }

    /// Number of distinct features learned
    #[must_use]
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }
}

impl IntentClassifier for NaiveBayesClassifier {
    fn predict_proba(&self, text: &str) -> Result<BTreeMap<Intent, f64>> {
        let tokens: Vec<String> = features(text)
            .into_iter()
            .filter(|t| self.vocabulary.contains(t))
            .collect();

        // Without a single known word the posterior is just the prior; report
        // no opinion rather than a flat distribution.
        if tokens.is_empty() {
            return Ok(BTreeMap::new());
        }

        let vocab = self.vocabulary.len() as f64;
        let mut log_posteriors: BTreeMap<Intent, f64> = BTreeMap::new();
        for (intent, log_prior) in &self.log_priors {
            let counts = &self.word_counts[intent];
            let denominator = self.class_totals[intent] + self.alpha * vocab;
            let likelihood: f64 = tokens
                .iter()
                .map(|t| ((counts.get(t).copied().unwrap_or(0.0) + self.alpha) / denominator).ln())
                .sum();
            log_posteriors.insert(*intent, log_prior + likelihood);
        }

        let max = log_posteriors
            .values()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        let exp: BTreeMap<Intent, f64> = log_posteriors
            .into_iter()
            .map(|(intent, lp)| (intent, (lp - max).exp()))
            .collect();
        let norm: f64 = exp.values().sum();

        Ok(exp.into_iter().map(|(i, v)| (i, v / norm)).collect())
    }
}

fn features(text: &str) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|t| !STOP_WORDS.contains(&t.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_classifier_learns_seed_phrases() {
        let classifier = NaiveBayesClassifier::seeded().unwrap();
        assert!(classifier.vocabulary_size() > 20);

        let probs = classifier.predict_proba("stressed at work").unwrap();
        let (best, _) = probs
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .unwrap();
        assert_eq!(*best, Intent::WorkStress);

        let total: f64 = probs.values().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_words_give_no_opinion() {
        let classifier = NaiveBayesClassifier::seeded().unwrap();
        assert!(classifier.predict_proba("zebra quantum").unwrap().is_empty());
    }

    #[test]
    fn test_empty_training_set_is_rejected() {
        let examples: [(&str, Intent); 1] = [("the a of", Intent::Greeting)];
        assert!(matches!(
            NaiveBayesClassifier::train(&examples),
            Err(Error::Configuration(_))
        ));
    }
}
