//! Role-based canonical ordering of marker groups.
//!
//! Geometry on a group assumes fixed row roles (for a pupil: top, bottom,
//! left, right). Raw label order depends on the tracking network, so the
//! group is reordered by looking for each role token inside member names.

use serde::{Deserialize, Serialize};
use tracklab_core::{Error, MarkerGroup, Result};

/// How to resolve a role token contained in more than one member name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RolePolicy {
    /// Reject the group with [`Error::AmbiguousRoleMatch`]
    #[default]
    Strict,
    /// Take the first candidate in member order
    FirstMatch,
}

/// Reorder `group` so member `i` is the one whose name contains `role_tokens[i]`.
///
/// Ambiguous tokens are rejected; see [`canonicalize_order_with`].
pub fn canonicalize_order<T: AsRef<str>>(
    group: &MarkerGroup,
    expected_count: usize,
    role_tokens: &[T],
) -> Result<MarkerGroup> {
    canonicalize_order_with(group, expected_count, role_tokens, RolePolicy::Strict)
}

pub fn canonicalize_order_with<T: AsRef<str>>(
    group: &MarkerGroup,
    expected_count: usize,
    role_tokens: &[T],
    policy: RolePolicy,
) -> Result<MarkerGroup> {
    if group.n_markers() != expected_count {
        return Err(Error::Cardinality {
            expected: expected_count,
            actual: group.n_markers(),
        });
    }
    if role_tokens.len() != expected_count {
        return Err(Error::InvalidInput(format!(
            "{} role tokens given for a group of {}",
            role_tokens.len(),
            expected_count
        )));
    }

    let names = group.names();
    let mut order: Vec<usize> = Vec::with_capacity(expected_count);

    for role in role_tokens {
        let role = role.as_ref();
        let candidates: Vec<usize> = names
            .iter()
            .enumerate()
            .filter(|(_, name)| name.contains(role))
            .map(|(i, _)| i)
            .collect();

        let index = match (candidates.as_slice(), policy) {
            ([], _) => {
                return Err(Error::RoleNotFound {
                    role: role.to_string(),
                })
            }
            ([only], _) => *only,
            ([first, ..], RolePolicy::FirstMatch) => {
                tracing::warn!(
                    role,
                    chosen = %names[*first],
                    candidates = candidates.len(),
                    "ambiguous role token, using first match"
                );
                *first
            }
            (_, RolePolicy::Strict) => {
                return Err(Error::AmbiguousRoleMatch {
                    role: role.to_string(),
                    candidates: candidates.iter().map(|&i| names[i].clone()).collect(),
                })
            }
        };

        // two roles resolving to one marker would not be a permutation
        if order.contains(&index) {
            return Err(Error::AmbiguousRoleMatch {
                role: role.to_string(),
                candidates: vec![names[index].clone()],
            });
        }
        order.push(index);
    }

    tracing::debug!(?order, "canonical member order");
    group.permuted(&order)
}
