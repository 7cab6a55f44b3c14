//! Assembling marker groups from a wide table.

use tracklab_core::{MarkerGroup, Result};

use crate::matcher::{LabelMatcher, PrefixRegexMatcher};
use crate::source::TabularSource;

/// Builds a [`MarkerGroup`] from every label accepted by a matcher
#[derive(Debug, Clone)]
pub struct GroupExtractor<M> {
    matcher: M,
}

impl<M: LabelMatcher> GroupExtractor<M> {
    pub fn new(matcher: M) -> Self {
        Self { matcher }
    }

    pub fn matcher(&self) -> &M {
        &self.matcher
    }

    /// Extract the group from `source`, considering only `known_labels`.
    ///
    /// Members appear in `known_labels` order. No match yields an empty group;
    /// callers that need a fixed size check it themselves.
    pub fn extract<S>(&self, source: &S, known_labels: &[String]) -> Result<MarkerGroup>
    where
        S: TabularSource + ?Sized,
    {
        let matched = self.matcher.select(known_labels);

        if matched.is_empty() {
            tracing::warn!(
                matcher = %self.matcher.describe(),
                candidates = known_labels.len(),
                "no labels matched"
            );
            return Ok(MarkerGroup::empty());
        }

        tracing::debug!(
            matcher = %self.matcher.describe(),
            parts = ?matched,
            "parts in group"
        );

        let members = matched
            .iter()
            .map(|label| source.read_marker(label))
            .collect::<Result<Vec<_>>>()?;

        MarkerGroup::new(members)
    }

    /// Extract using every label the source enumerates
    pub fn extract_all<S>(&self, source: &S) -> Result<MarkerGroup>
    where
        S: TabularSource + ?Sized,
    {
        let labels = source.labels();
        self.extract(source, &labels)
    }
}

/// Extract the labels matching `name_pattern` (anchored at the label start)
pub fn extract_group<S>(source: &S, name_pattern: &str, known_labels: &[String]) -> Result<MarkerGroup>
where
    S: TabularSource + ?Sized,
{
    GroupExtractor::new(PrefixRegexMatcher::new(name_pattern)?).extract(source, known_labels)
}
