//! Crisis keyword scanner
//!
//! A plain case-insensitive substring match against a fixed list. There is no
//! model behind it, so once a scanner exists, `scan` cannot fail.

use crate::error::{Error, Result};
use crate::level::RiskLevel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::warn;

/// Built-in crisis keyword list
pub const DEFAULT_CRISIS_KEYWORDS: &[&str] = &[
    "suicide",
    "kill myself",
    "end it all",
    "not worth living",
    "hurt myself",
    "self harm",
    "cut myself",
    "overdose",
    "jump off",
    "hang myself",
    "die",
    "death",
    "dead",
];

/// Result of scanning one utterance
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CrisisCheck {
    /// True iff at least one keyword matched
    pub is_crisis: bool,
    /// Keywords found in the text
    pub matched_keywords: BTreeSet<String>,
    /// Severity derived from the match count
    pub severity: RiskLevel,
}

/// Match-count thresholds for crisis severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrisisThresholds {
    /// Minimum matches for medium severity
    pub medium_at: usize,
    /// Matches above this count are high severity
    pub high_above: usize,
}

impl Default for CrisisThresholds {
    fn default() -> Self {
        Self {
            medium_at: 1,
            high_above: 2,
        }
    }
}

impl CrisisThresholds {
    /// Severity for a number of matched keywords
    #[must_use]
    pub fn severity(&self, matches: usize) -> RiskLevel {
        if matches > self.high_above {
            RiskLevel::High
        } else if matches >= self.medium_at {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// Case-insensitive crisis keyword scanner
#[derive(Debug, Clone)]
pub struct CrisisScanner {
    keywords: Vec<String>,
    thresholds: CrisisThresholds,
}

impl Default for CrisisScanner {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_CRISIS_KEYWORDS
                .iter()
                .map(|k| (*k).to_string())
                .collect(),
            thresholds: CrisisThresholds::default(),
        }
    }
}

impl CrisisScanner {
    /// Build a scanner over a custom keyword list.
    ///
    /// # Errors
    /// Returns [`Error::Configuration`] when no usable keyword remains; a
    /// scanner that can never match would silently report "no crisis".
    pub fn new<I, S>(keywords: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        if keywords.is_empty() {
            return Err(Error::Configuration(
                "crisis keyword list is empty".to_string(),
            ));
        }

        Ok(Self {
            keywords,
            thresholds: CrisisThresholds::default(),
        })
    }

    /// Override severity thresholds
    #[must_use]
    pub fn with_thresholds(mut self, thresholds: CrisisThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Keywords this scanner matches
    #[must_use]
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Scan one utterance
    #[must_use]
    pub fn scan(&self, text: &str) -> CrisisCheck {
        let lower = text.to_lowercase();
        let matched_keywords: BTreeSet<String> = self
            .keywords
            .iter()
            .filter(|k| lower.contains(k.as_str()))
            .cloned()
            .collect();

        let severity = self.thresholds.severity(matched_keywords.len());
        let is_crisis = !matched_keywords.is_empty();
        if is_crisis {
            warn!(
                matches = matched_keywords.len(),
                severity = %severity,
                "Crisis keywords detected"
            );
        }

        CrisisCheck {
            is_crisis,
            matched_keywords,
            severity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_match_is_low() {
        let check = CrisisScanner::default().scan("I had a nice walk today");
        assert!(!check.is_crisis);
        assert!(check.matched_keywords.is_empty());
        assert_eq!(check.severity, RiskLevel::Low);
    }

    #[test]
    fn test_single_match_is_medium_crisis() {
        let check = CrisisScanner::default().scan("I want to KILL MYSELF");
        assert!(check.is_crisis);
        assert_eq!(check.matched_keywords.len(), 1);
        assert!(check.matched_keywords.contains("kill myself"));
        assert_eq!(check.severity, RiskLevel::Medium);
    }

    #[test]
    fn test_three_matches_is_high() {
        let check =
            CrisisScanner::default().scan("I think about suicide and death, I want to hurt myself");
        assert_eq!(check.matched_keywords.len(), 3);
        assert_eq!(check.severity, RiskLevel::High);
    }

    #[test]
    fn test_substring_semantics() {
        // "dead" is found inside "deadline"; plain substring matching is intended
        let check = CrisisScanner::default().scan("my deadline is tomorrow");
        assert!(check.matched_keywords.contains("dead"));
    }

    #[test]
    fn test_empty_keyword_list_is_configuration_error() {
        let empty: Vec<&str> = vec![];
        assert!(matches!(
            CrisisScanner::new(empty),
            Err(Error::Configuration(_))
        ));
        assert!(CrisisScanner::new(["   "]).is_err());
    }

    #[test]
    fn test_custom_keywords_and_thresholds() {
        let scanner = CrisisScanner::new(["Give Up"])
            .unwrap()
            .with_thresholds(CrisisThresholds {
                medium_at: 1,
                high_above: 0,
            });
        let check = scanner.scan("i just want to give up");
        assert!(check.is_crisis);
        assert_eq!(check.severity, RiskLevel::High);
    }
}
