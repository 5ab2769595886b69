/*!
 * Group Registry
 * Immutable, versioned snapshot of every group plus the default group name
 *
 * Mutations return a new registry with a bumped version; a published
 * registry is never edited in place. Chain resolution walks group
 * references depth-first with an explicit visited set, so reference cycles
 * are cut silently and every group contributes at most once.
 */

use super::group::{group_key, Group};
use super::types::Pass;
use crate::core::limits::DEFAULT_GROUP_NAME;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// Registry of groups keyed by lower-cased name
#[derive(Debug, Clone)]
pub struct GroupRegistry {
    groups: BTreeMap<String, Arc<Group>>,
    default_group: String,
    version: u64,
}

impl Default for GroupRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_GROUP_NAME)
    }
}

impl GroupRegistry {
    /// Empty registry with the given default group name
    pub fn new(default_group: impl Into<String>) -> Self {
        Self {
            groups: BTreeMap::new(),
            default_group: default_group.into(),
            version: 0,
        }
    }

    /// Build from loaded groups; later duplicates (case-insensitive) replace
    /// earlier ones
    pub fn from_groups<I>(groups: I, default_group: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = Group>,
    {
        let mut registry = Self::new(default_group);
        for group in groups {
            registry.groups.insert(group.key(), Arc::new(group));
        }
        registry
    }

    /// Case-insensitive lookup; unknown names are simply absent
    pub fn get(&self, name: &str) -> Option<&Group> {
        self.groups.get(&group_key(name)).map(Arc::as_ref)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.groups.contains_key(&group_key(name))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Groups in key order
    pub fn groups(&self) -> impl Iterator<Item = &Group> + '_ {
        self.groups.values().map(Arc::as_ref)
    }

    pub fn default_group(&self) -> &str {
        &self.default_group
    }

    /// Version counter, bumped by every derived registry
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Next version with `group` added or replaced
    pub fn with_group(&self, group: Group) -> Self {
        let mut next = self.next_version();
        next.groups.insert(group.key(), Arc::new(group));
        next
    }

    /// Next version without the named group
    pub fn without_group(&self, name: &str) -> Self {
        let mut next = self.next_version();
        next.groups.remove(&group_key(name));
        next
    }

    /// Next version with a different default group
    pub fn with_default_group(&self, name: impl Into<String>) -> Self {
        let mut next = self.next_version();
        next.default_group = name.into();
        next
    }

    /// Next version holding a freshly loaded group set
    pub fn replaced<I>(&self, groups: I) -> Self
    where
        I: IntoIterator<Item = Group>,
    {
        let mut next = Self::from_groups(groups, self.default_group.clone());
        next.version = self.version + 1;
        next
    }

    fn next_version(&self) -> Self {
        Self {
            groups: self.groups.clone(),
            default_group: self.default_group.clone(),
            version: self.version + 1,
        }
    }

    /// Merged pass of every group reachable from `start`
    ///
    /// Groups are visited depth-first in listed order, each before its
    /// parents. At equal priority an earlier-visited group wins conflicts;
    /// a later group only overrides with strictly higher priority. Names
    /// already in `visited` are skipped, which also breaks cycles. The
    /// returned pass lists the visited groups in traversal order.
    pub fn resolve_chain(&self, start: &[String], visited: &mut HashSet<String>) -> Pass {
        let order = self.walk(start, None, visited);
        chain_pass(&order)
    }

    /// Like [`GroupRegistry::resolve_chain`], within a world
    ///
    /// World overlays add traversal edges (their references are followed
    /// before the global ones). After the base chain is merged, each
    /// visited group's overlay for `world` is merged on top with the
    /// group's own priority, last-visited first so that earlier groups win
    /// ties. Groups without an overlay contribute nothing extra.
    pub fn resolve_world_chain(
        &self,
        start: &[String],
        world: &str,
        visited: &mut HashSet<String>,
    ) -> Pass {
        let order = self.walk(start, Some(world), visited);
        let base = chain_pass(&order);

        order.iter().rev().fold(base, |acc, group| match group.world_pass(world) {
            Some(overlay) => {
                let mut merged = Pass::merge(&acc, overlay, group.priority());
                merged.set_groups(acc.groups());
                merged
            }
            None => acc,
        })
    }

    fn walk<'a>(
        &'a self,
        start: &[String],
        world: Option<&str>,
        visited: &mut HashSet<String>,
    ) -> Vec<&'a Group> {
        let mut order = Vec::new();
        self.visit(start.iter(), world, visited, &mut order);
        order
    }

    fn visit<'a, 'n, I>(
        &'a self,
        names: I,
        world: Option<&str>,
        visited: &mut HashSet<String>,
        order: &mut Vec<&'a Group>,
    ) where
        I: Iterator<Item = &'n String>,
    {
        for name in names {
            if !visited.insert(group_key(name)) {
                continue;
            }
            if let Some(group) = self.get(name) {
                order.push(group);
                self.visit(group.edges(world), world, visited, order);
            }
        }
    }
}

/// Fold visited groups so that earlier groups act as the overlay
fn chain_pass(order: &[&Group]) -> Pass {
    let mut acc = order
        .iter()
        .fold(None::<Pass>, |acc, group| {
            Some(match acc {
                None => group.pass().clone(),
                Some(acc) => Pass::merge(group.pass(), &acc, acc.priority()),
            })
        })
        .unwrap_or_default();
    acc.set_groups(order.iter().map(|group| group.name()));
    acc
}
