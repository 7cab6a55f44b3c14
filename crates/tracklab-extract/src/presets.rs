//! Named group definitions for the tracked body parts.

use serde::{Deserialize, Serialize};
use tracklab_core::{MarkerGroup, Result};

use crate::canonical::{canonicalize_order_with, RolePolicy};
use crate::extractor::GroupExtractor;
use crate::matcher::PrefixRegexMatcher;
use crate::source::TabularSource;

/// Pupil corner roles, in the order quadrilateral geometry expects
pub const PUPIL_SIDES: [&str; 4] = ["top", "bottom", "left", "right"];

/// Right-hand fingers
pub const RIGHT_PAW_PATTERN: &str = r"(\w+finger_r|pinky_r)";

pub const PUPIL_PATTERN: &str = r"(pupil)";

/// How to select, validate and order one marker group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSpec {
    pub name: String,
    /// Label pattern anchored at the start of the label
    pub pattern: String,
    /// Role tokens for canonical ordering; empty keeps source order
    #[serde(default)]
    pub role_tokens: Vec<String>,
    #[serde(default)]
    pub policy: RolePolicy,
}

impl GroupSpec {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            role_tokens: Vec::new(),
            policy: RolePolicy::default(),
        }
    }

    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.role_tokens = roles.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_policy(mut self, policy: RolePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The four pupil corners, canonicalized to top/bottom/left/right
    pub fn pupil() -> Self {
        Self::new("pupil", PUPIL_PATTERN).with_roles(PUPIL_SIDES)
    }

    /// Fingers of the right paw, in source order
    pub fn right_paw() -> Self {
        Self::new("right_paw", RIGHT_PAW_PATTERN)
    }

    /// Fixed group size implied by the role tokens
    pub fn expected_count(&self) -> Option<usize> {
        if self.role_tokens.is_empty() {
            None
        } else {
            Some(self.role_tokens.len())
        }
    }

    pub fn extractor(&self) -> Result<GroupExtractor<PrefixRegexMatcher>> {
        Ok(GroupExtractor::new(PrefixRegexMatcher::new(&self.pattern)?))
    }

    /// Extract the group from every label of `source`.
    ///
    /// With `impose_order` and role tokens set, the group must have exactly
    /// one member per role and is returned in role order.
    pub fn load<S>(&self, source: &S, impose_order: bool) -> Result<MarkerGroup>
    where
        S: TabularSource + ?Sized,
    {
        let group = self.extractor()?.extract_all(source)?;

        match self.expected_count() {
            Some(count) if impose_order => {
                canonicalize_order_with(&group, count, self.role_tokens.as_slice(), self.policy)
            }
            _ => Ok(group),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::WideTable;
    use tracklab_core::Error;

    fn pupil_table(labels: &[&str]) -> WideTable {
        let mut table = WideTable::new("DLC_eye");
        for (i, label) in labels.iter().enumerate() {
            table
                .insert_marker(label, vec![i as f64; 4], vec![0.0; 4], vec![1.0; 4])
                .unwrap();
        }
        table
    }

    #[test]
    fn test_pupil_preset_orders_sides() {
        let table = pupil_table(&[
            "nose_tip",
            "pupil_right_r",
            "pupil_left_r",
            "pupil_bottom_r",
            "pupil_top_r",
        ]);

        let group = GroupSpec::pupil().load(&table, true).unwrap();
        assert_eq!(
            group.names(),
            vec!["pupil_top_r", "pupil_bottom_r", "pupil_left_r", "pupil_right_r"]
        );

        let unordered = GroupSpec::pupil().load(&table, false).unwrap();
        assert_eq!(unordered.names()[0], "pupil_right_r");
    }

    #[test]
    fn test_pupil_preset_cardinality() {
        let table = pupil_table(&["pupil_top_r", "pupil_bottom_r", "pupil_left_r"]);
        assert_eq!(
            GroupSpec::pupil().load(&table, true),
            Err(Error::Cardinality {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn test_right_paw_preset() {
        let table = pupil_table(&["pinky_r", "thumb_l", "ring_finger_r", "middle_finger_r"]);
        let group = GroupSpec::right_paw().load(&table, true).unwrap();
        assert_eq!(group.names(), vec!["pinky_r", "ring_finger_r", "middle_finger_r"]);
        assert_eq!(GroupSpec::right_paw().expected_count(), None);
    }
}
