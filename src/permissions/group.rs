/*!
 * Group
 * A named, shared pass that users and other groups reference
 */

use super::types::{Pass, ScopedPass};

/// Permission group
///
/// The display name keeps its original case; lookups go through
/// [`Group::key`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    name: String,
    passes: ScopedPass,
}

impl Group {
    /// Create a group with an empty pass
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_pass(name, Pass::new())
    }

    pub fn with_pass(name: impl Into<String>, pass: Pass) -> Self {
        Self {
            name: name.into(),
            passes: ScopedPass::new(pass),
        }
    }

    pub fn with_world_pass(mut self, world: impl Into<String>, pass: Pass) -> Self {
        self.passes.set_world(world, pass);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registry key (lower-cased name)
    pub fn key(&self) -> String {
        group_key(&self.name)
    }

    pub fn pass(&self) -> &Pass {
        self.passes.global()
    }

    pub fn world_pass(&self, world: &str) -> Option<&Pass> {
        self.passes.world(world)
    }

    pub fn passes(&self) -> &ScopedPass {
        &self.passes
    }

    pub fn passes_mut(&mut self) -> &mut ScopedPass {
        &mut self.passes
    }

    pub fn priority(&self) -> i32 {
        self.passes.global().priority()
    }

    /// Groups this group inherits from, globally
    pub fn parents(&self) -> &[String] {
        self.passes.global().groups()
    }

    /// Outgoing references when traversing within `world`: the world
    /// overlay's references first, then the global ones
    pub(crate) fn edges<'a>(&'a self, world: Option<&str>) -> impl Iterator<Item = &'a String> + 'a {
        let world_refs = world
            .and_then(|w| self.passes.world(w))
            .map(Pass::groups)
            .unwrap_or_default();
        world_refs.iter().chain(self.parents().iter())
    }
}

/// Case-insensitive registry key for a group name
pub fn group_key(name: &str) -> String {
    name.trim().to_lowercase()
}
