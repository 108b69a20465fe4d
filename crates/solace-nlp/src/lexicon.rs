//! Word-level polarity lexicon
//!
//! The baseline polarity score used by the sentiment analyzer. Words map to
//! values in `[-1, 1]`; negators flip and damp the next few scored words and
//! intensifiers amplify the next scored word.

use std::collections::HashMap;

/// Scored words and their polarity
const POLARITY_WORDS: &[(&str, f64)] = &[
    // positive
    ("happy", 0.8),
    ("good", 0.7),
    ("great", 0.8),
    ("wonderful", 0.9),
    ("amazing", 0.9),
    ("excellent", 0.9),
    ("fantastic", 0.9),
    ("love", 0.8),
    ("joy", 0.8),
    ("cheerful", 0.8),
    ("best", 0.8),
    ("grateful", 0.7),
    ("thankful", 0.7),
    ("excited", 0.7),
    ("optimistic", 0.7),
    ("glad", 0.6),
    ("hopeful", 0.6),
    ("peaceful", 0.6),
    ("proud", 0.6),
    ("enjoy", 0.6),
    ("confident", 0.6),
    ("motivated", 0.6),
    ("relieved", 0.6),
    ("energized", 0.6),
    ("calm", 0.5),
    ("better", 0.5),
    ("relaxed", 0.5),
    ("nice", 0.5),
    ("improving", 0.5),
    ("supported", 0.5),
    ("content", 0.4),
    ("safe", 0.4),
    ("fine", 0.3),
    ("okay", 0.2),
    // negative
    ("suicide", -1.0),
    ("hopeless", -0.9),
    ("worthless", -0.9),
    ("terrible", -0.9),
    ("awful", -0.9),
    ("horrible", -0.9),
    ("miserable", -0.9),
    ("worst", -0.9),
    ("kill", -0.9),
    ("depressed", -0.8),
    ("hate", -0.8),
    ("useless", -0.8),
    ("helpless", -0.8),
    ("desperate", -0.8),
    ("dead", -0.8),
    ("die", -0.8),
    ("sad", -0.7),
    ("bad", -0.7),
    ("angry", -0.7),
    ("unhappy", -0.7),
    ("ashamed", -0.7),
    ("broken", -0.7),
    ("panic", -0.7),
    ("failure", -0.7),
    ("anxious", -0.6),
    ("stressed", -0.6),
    ("lonely", -0.6),
    ("exhausted", -0.6),
    ("scared", -0.6),
    ("afraid", -0.6),
    ("fear", -0.6),
    ("hurt", -0.6),
    ("pain", -0.6),
    ("upset", -0.6),
    ("overwhelmed", -0.6),
    ("empty", -0.6),
    ("guilty", -0.6),
    ("worse", -0.6),
    ("frustrated", -0.6),
    ("isolated", -0.6),
    ("worried", -0.5),
    ("nervous", -0.5),
    ("alone", -0.5),
    ("numb", -0.5),
    ("cry", -0.5),
    ("crying", -0.5),
    ("sick", -0.5),
    ("struggling", -0.5),
    ("tired", -0.4),
    ("lost", -0.4),
];

/// Words that flip the polarity of the following scored words
const NEGATORS: &[&str] = &[
    "not", "no", "never", "don't", "dont", "can't", "cant", "cannot", "won't", "isn't",
    "wasn't", "didn't", "doesn't", "aren't", "nothing",
];

/// Words that amplify the next scored word
const INTENSIFIERS: &[&str] = &[
    "very",
    "really",
    "extremely",
    "so",
    "totally",
    "incredibly",
    "completely",
    "deeply",
];

/// Tokens a negator reaches forward
const NEGATION_SCOPE: usize = 3;

/// Multiplier applied to a negated word
const NEGATION_FACTOR: f64 = -0.5;

/// Multiplier applied after an intensifier
const INTENSIFIER_FACTOR: f64 = 1.5;

/// Lexicon score for one text
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LexiconScore {
    /// Mean polarity of scored words, `[-1, 1]`
    pub polarity: f64,
    /// Share of tokens that carry sentiment, `[0, 1]`
    pub subjectivity: f64,
    /// Number of scored tokens
    pub scored_tokens: usize,
    /// Total tokens
    pub tokens: usize,
}

/// Polarity lexicon
#[derive(Debug, Clone)]
pub struct Lexicon {
    words: HashMap<String, f64>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            words: POLARITY_WORDS
                .iter()
                .map(|(w, v)| ((*w).to_string(), *v))
                .collect(),
        }
    }
}

impl Lexicon {
    /// Empty lexicon
    #[must_use]
    pub fn empty() -> Self {
        Self {
            words: HashMap::new(),
        }
    }

    /// Add or replace a word's polarity (clamped to `[-1, 1]`)
    pub fn insert(&mut self, word: &str, polarity: f64) {
        self.words
            .insert(word.to_lowercase(), polarity.clamp(-1.0, 1.0));
    }

    /// Polarity of a single word
    #[must_use]
    pub fn get(&self, word: &str) -> Option<f64> {
        self.words.get(&word.to_lowercase()).copied()
    }

    /// Number of words
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the lexicon has no words
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Score a text
    #[must_use]
    pub fn score(&self, text: &str) -> LexiconScore {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return LexiconScore::default();
        }

        let mut sum = 0.0;
        let mut scored = 0usize;
        let mut negation_left = 0usize;
        let mut boost = 1.0;

        for token in &tokens {
            if NEGATORS.contains(&token.as_str()) {
                negation_left = NEGATION_SCOPE;
                continue;
            }
            if INTENSIFIERS.contains(&token.as_str()) {
                boost = INTENSIFIER_FACTOR;
                continue;
            }

            if let Some(&value) = self.words.get(token) {
                let mut value = (value * boost).clamp(-1.0, 1.0);
                if negation_left > 0 {
                    value *= NEGATION_FACTOR;
                }
                sum += value;
                scored += 1;
                boost = 1.0;
            }
            negation_left = negation_left.saturating_sub(1);
        }

        if scored == 0 {
            return LexiconScore {
                tokens: tokens.len(),
                ..LexiconScore::default()
            };
        }

        LexiconScore {
            polarity: (sum / scored as f64).clamp(-1.0, 1.0),
            subjectivity: (scored as f64 / tokens.len() as f64).clamp(0.0, 1.0),
            scored_tokens: scored,
            tokens: tokens.len(),
        }
    }
}

/// Lowercase word tokens; apostrophes stay inside words ("can't")
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphabetic() || c == '\''))
        .map(|t| t.trim_matches('\'').to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}
