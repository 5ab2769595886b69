/*!
 * Resolved Permissions
 * The effective result handed back to the host
 */

use super::pass::{verdict_in, Pass};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Effective permissions for a user, optionally within a world
///
/// `permissions` holds one entry per node; denied nodes keep their `-`
/// prefix so the host can apply explicit denies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Resolved {
    pub permissions: BTreeSet<String>,
    pub groups: Vec<String>,
    pub prefix: String,
    pub suffix: String,
    pub priority: i32,
}

impl Resolved {
    /// Verdict for a node: granted, denied, or unset
    pub fn verdict(&self, node: &str) -> Option<bool> {
        verdict_in(&self.permissions, node)
    }

    /// Whether a node is explicitly granted
    pub fn has_permission(&self, node: &str) -> bool {
        self.verdict(node) == Some(true)
    }

    /// Whether the user effectively belongs to a group (case-insensitive)
    pub fn in_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g.eq_ignore_ascii_case(group))
    }
}

impl From<Pass> for Resolved {
    fn from(pass: Pass) -> Self {
        Self {
            permissions: pass.permissions().clone(),
            groups: pass.groups().to_vec(),
            prefix: pass.prefix().to_string(),
            suffix: pass.suffix().to_string(),
            priority: pass.priority(),
        }
    }
}
