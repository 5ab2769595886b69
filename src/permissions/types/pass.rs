/*!
 * Pass
 * A bundle of permission nodes, group references, prefix, suffix, and priority
 *
 * ## Merge rules
 * `Pass::merge(base, overlay, overlay_priority)` combines two passes:
 * - Permissions: union; when one side grants a node the other denies, the
 *   overlay wins if `overlay_priority >= base.priority`, otherwise the base.
 * - Prefix/suffix: an empty value never replaces a non-empty one; when both
 *   are set and differ the same priority comparison decides.
 * - Groups: overlay's references first, then base's, duplicates removed.
 * - Priority: `max(base.priority, overlay.priority)`.
 */

use super::node::{self, Node};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

/// Permission bundle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pass {
    permissions: BTreeSet<String>,
    groups: Vec<String>,
    prefix: String,
    suffix: String,
    priority: i32,
}

impl Pass {
    /// Create an empty pass
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_permission(mut self, raw: &str) -> Self {
        let normalized = node::normalize(raw);
        if Node::parse(&normalized).is_some() {
            self.permissions.insert(normalized);
        }
        self
    }

    /// Add several nodes as requested, keeping both a node and its negation
    /// if both are given
    pub fn with_permissions<I, S>(self, nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        nodes
            .into_iter()
            .fold(self, |pass, raw| pass.with_permission(raw.as_ref()))
    }

    pub fn with_group(mut self, name: &str) -> Self {
        self.add_group(name);
        self
    }

    pub fn with_groups<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .fold(self, |pass, name| pass.with_group(name.as_ref()))
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn permissions(&self) -> &BTreeSet<String> {
        &self.permissions
    }

    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Whether this pass carries nothing worth storing
    ///
    /// Priority alone does not count.
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
            && self.groups.is_empty()
            && self.prefix.is_empty()
            && self.suffix.is_empty()
    }

    /// Verdict for a node: `Some(true)` granted, `Some(false)` denied,
    /// `None` when the pass says nothing about it
    ///
    /// A pass that requests both forms of a node denies it.
    pub fn verdict(&self, node: &str) -> Option<bool> {
        verdict_in(&self.permissions, node)
    }

    /// Nodes this pass grants after settling conflicts
    pub fn granted(&self) -> impl Iterator<Item = &str> + '_ {
        self.verdicts()
            .into_iter()
            .filter_map(|(name, granted)| granted.then_some(name))
    }

    /// Whether a group is referenced (case-insensitive)
    pub fn has_group(&self, name: &str) -> bool {
        self.groups.iter().any(|g| g.eq_ignore_ascii_case(name))
    }

    /// Grant or deny a node, replacing its opposite form
    ///
    /// Returns false if the pass already held exactly this node.
    pub fn add_permission(&mut self, raw: &str) -> bool {
        let normalized = node::normalize(raw);
        let Some(parsed) = Node::parse(&normalized) else {
            return false;
        };
        self.permissions.remove(&parsed.opposite());
        self.permissions.insert(normalized)
    }

    /// Remove a node in either form
    pub fn remove_permission(&mut self, raw: &str) -> bool {
        let normalized = node::normalize(raw);
        let Some(parsed) = Node::parse(&normalized) else {
            return false;
        };
        let removed_grant = self.permissions.remove(&node::render(parsed.name, true));
        let removed_deny = self.permissions.remove(&node::render(parsed.name, false));
        removed_grant || removed_deny
    }

    /// Append a group reference unless already present
    pub fn add_group(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.has_group(name) {
            return false;
        }
        self.groups.push(name.to_string());
        true
    }

    pub fn remove_group(&mut self, name: &str) -> bool {
        let before = self.groups.len();
        self.groups.retain(|g| !g.eq_ignore_ascii_case(name));
        self.groups.len() != before
    }

    /// Replace all group references
    pub fn set_groups<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.groups.clear();
        for name in names {
            self.add_group(name.as_ref());
        }
    }

    pub fn retain_groups<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.groups.retain(|g| keep(g));
    }

    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
    }

    pub fn set_suffix(&mut self, suffix: impl Into<String>) {
        self.suffix = suffix.into();
    }

    pub fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }

    /// Merge `overlay` onto `base`
    ///
    /// `overlay_priority` is compared with `base.priority` to settle
    /// conflicts; ties go to the overlay. Never fails.
    pub fn merge(base: &Pass, overlay: &Pass, overlay_priority: i32) -> Pass {
        let overlay_wins = overlay_priority >= base.priority;

        let mut verdicts = base.verdicts();
        for (name, granted) in overlay.verdicts() {
            match verdicts.entry(name) {
                Entry::Vacant(slot) => {
                    slot.insert(granted);
                }
                Entry::Occupied(mut slot) => {
                    if *slot.get() != granted && overlay_wins {
                        slot.insert(granted);
                    }
                }
            }
        }

        let permissions = verdicts
            .into_iter()
            .map(|(name, granted)| node::render(name, granted))
            .collect();

        let mut groups: Vec<String> = Vec::with_capacity(overlay.groups.len() + base.groups.len());
        for name in overlay.groups.iter().chain(base.groups.iter()) {
            if !groups.iter().any(|g| g.eq_ignore_ascii_case(name)) {
                groups.push(name.clone());
            }
        }

        Pass {
            permissions,
            groups,
            prefix: pick_text(&base.prefix, &overlay.prefix, overlay_wins),
            suffix: pick_text(&base.suffix, &overlay.suffix, overlay_wins),
            priority: base.priority.max(overlay.priority),
        }
    }

    /// One verdict per node name; a deny in the same pass beats a grant
    fn verdicts(&self) -> BTreeMap<&str, bool> {
        let mut verdicts = BTreeMap::new();
        for raw in &self.permissions {
            if let Some(parsed) = Node::parse(raw) {
                verdicts
                    .entry(parsed.name)
                    .and_modify(|granted: &mut bool| *granted &= parsed.granted)
                    .or_insert(parsed.granted);
            }
        }
        verdicts
    }
}

/// Verdict lookup over a settled or requested node set
pub(crate) fn verdict_in(permissions: &BTreeSet<String>, node: &str) -> Option<bool> {
    let normalized = node::normalize(node);
    // One leading `-` is the verdict marker, same as `Node::parse`
    let name = normalized
        .strip_prefix(crate::core::limits::NEGATION_PREFIX)
        .unwrap_or(normalized.as_str());
    if permissions.contains(&node::render(name, false)) {
        Some(false)
    } else if permissions.contains(name) {
        Some(true)
    } else {
        None
    }
}

fn pick_text(base: &str, overlay: &str, overlay_wins: bool) -> String {
    if overlay.is_empty() || (!base.is_empty() && !overlay_wins) {
        base.to_string()
    } else {
        overlay.to_string()
    }
}
