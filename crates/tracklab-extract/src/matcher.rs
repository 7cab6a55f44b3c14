//! Label selection by name pattern.

use std::collections::BTreeSet;

use regex::Regex;
use tracklab_core::{Error, Result};

/// Decides which body-part labels belong to a group
pub trait LabelMatcher: Send + Sync {
    fn is_match(&self, label: &str) -> bool;

    /// Human-readable description for diagnostics
    fn describe(&self) -> String;

    /// Matching labels, in the order they appear in `labels`
    fn select(&self, labels: &[String]) -> Vec<String> {
        labels
            .iter()
            .filter(|label| self.is_match(label))
            .cloned()
            .collect()
    }
}

/// Regular expression anchored at the start of the label.
///
/// `(\w+finger_r|pinky_r)` matches `ring_finger_r` and `pinky_r_tip` but not
/// `left_pinky_r`: the pattern must match a prefix, not any substring.
#[derive(Debug, Clone)]
pub struct PrefixRegexMatcher {
    pattern: String,
    regex: Regex,
}

impl PrefixRegexMatcher {
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{})", pattern))
            .map_err(|e| Error::InvalidPattern(format!("{}: {}", pattern, e)))?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl LabelMatcher for PrefixRegexMatcher {
    fn is_match(&self, label: &str) -> bool {
        self.regex.is_match(label)
    }

    fn describe(&self) -> String {
        format!("prefix /{}/", self.pattern)
    }
}

/// Exact label membership
#[derive(Debug, Clone, Default)]
pub struct ExactSetMatcher {
    labels: BTreeSet<String>,
}

impl ExactSetMatcher {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }
}

impl LabelMatcher for ExactSetMatcher {
    fn is_match(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    fn describe(&self) -> String {
        format!("exact {:?}", self.labels)
    }
}
