/*!
 * Scoped Passes
 * A global pass plus per-world overlays, shared by users and groups
 */

use super::pass::Pass;
use std::collections::BTreeMap;

/// Global pass with world-scoped overlays
///
/// World names are matched exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopedPass {
    global: Pass,
    worlds: BTreeMap<String, Pass>,
}

impl ScopedPass {
    pub fn new(global: Pass) -> Self {
        Self {
            global,
            worlds: BTreeMap::new(),
        }
    }

    pub fn global(&self) -> &Pass {
        &self.global
    }

    pub fn global_mut(&mut self) -> &mut Pass {
        &mut self.global
    }

    /// Overlay for a world, if one is defined
    pub fn world(&self, world: &str) -> Option<&Pass> {
        self.worlds.get(world)
    }

    pub fn worlds(&self) -> &BTreeMap<String, Pass> {
        &self.worlds
    }

    pub fn set_world(&mut self, world: impl Into<String>, pass: Pass) {
        self.worlds.insert(world.into(), pass);
    }

    pub fn remove_world(&mut self, world: &str) -> Option<Pass> {
        self.worlds.remove(world)
    }

    /// Pass for a scope: the global pass for `None`, otherwise the world
    /// overlay if present
    pub fn scope(&self, world: Option<&str>) -> Option<&Pass> {
        match world {
            None => Some(&self.global),
            Some(world) => self.worlds.get(world),
        }
    }

    /// Mutable pass for a scope, creating an empty world overlay on demand
    pub fn scope_mut(&mut self, world: Option<&str>) -> &mut Pass {
        match world {
            None => &mut self.global,
            Some(world) => self.worlds.entry(world.to_string()).or_default(),
        }
    }

    /// Drop world overlays that carry nothing
    pub fn prune_empty_worlds(&mut self) {
        self.worlds.retain(|_, pass| !pass.is_empty());
    }

    /// Global pass and every world overlay are empty
    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.worlds.values().all(Pass::is_empty)
    }
}
