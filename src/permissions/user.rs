/*!
 * User
 * Per-player pass, world overlays, and the resolution entry point
 *
 * ## Resolution
 * 1. Start from an empty pass.
 * 2. Merge the chain of the user's known groups (or the registry's default
 *    group when none is known), world-aware when a world is given.
 * 3. Merge the user's own pass with its own priority, so direct values win
 *    ties against inherited ones.
 * 4. With a world and a user overlay for it, resolve the overlay the same
 *    way and combine it with the global result per [`WorldPolicy`].
 *
 * Resolution is pure: no I/O, no mutation, no errors.
 */

use super::registry::GroupRegistry;
use super::types::{Pass, ScopedPass};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// How a user's world overlay combines with their global result
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorldPolicy {
    /// World result merged on top of the fully resolved global result
    #[default]
    Overlay,
    /// World result applied beneath the user's direct global pass, so
    /// direct global grants beat world-inherited ones
    Underlay,
}

impl FromStr for WorldPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overlay" => Ok(Self::Overlay),
            "underlay" => Ok(Self::Underlay),
            other => Err(format!("unknown world policy '{other}'")),
        }
    }
}

impl fmt::Display for WorldPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overlay => f.write_str("overlay"),
            Self::Underlay => f.write_str("underlay"),
        }
    }
}

/// A player's stored permission data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    name: String,
    passes: ScopedPass,
}

impl User {
    /// User with no stored data
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

    /// Storage key (lower-cased name)
    pub fn key(&self) -> String {
        user_key(&self.name)
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

    /// Nothing worth persisting: global pass and every overlay are empty
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Effective pass with the default world policy
    pub fn resolve(&self, registry: &GroupRegistry, world: Option<&str>) -> Pass {
        self.resolve_with(registry, world, WorldPolicy::default())
    }

    pub fn resolve_with(
        &self,
        registry: &GroupRegistry,
        world: Option<&str>,
        policy: WorldPolicy,
    ) -> Pass {
        let own = self.pass();
        let start = self.starting_groups(registry);

        let chain = match world {
            Some(world) => registry.resolve_world_chain(&start, world, &mut HashSet::new()),
            None => registry.resolve_chain(&start, &mut HashSet::new()),
        };
        let inherited = Pass::merge(&Pass::new(), &chain, chain.priority());
        let global = Pass::merge(&inherited, own, own.priority());

        let world_layer = world.and_then(|world| {
            self.world_pass(world).map(|overlay| {
                let chain =
                    registry.resolve_world_chain(overlay.groups(), world, &mut HashSet::new());
                let inherited = Pass::merge(&Pass::new(), &chain, chain.priority());
                Pass::merge(&inherited, overlay, overlay.priority())
            })
        });

        let mut resolved = match (world_layer, policy) {
            (None, _) => global,
            (Some(layer), WorldPolicy::Overlay) => Pass::merge(&global, &layer, layer.priority()),
            (Some(layer), WorldPolicy::Underlay) => {
                let under = Pass::merge(&inherited, &layer, layer.priority());
                Pass::merge(&under, own, own.priority())
            }
        };
        resolved.retain_groups(|name| registry.contains(name));
        resolved
    }

    /// Known group references, or the default group when none is known
    fn starting_groups(&self, registry: &GroupRegistry) -> Vec<String> {
        let known: Vec<String> = self
            .pass()
            .groups()
            .iter()
            .filter(|name| registry.contains(name))
            .cloned()
            .collect();
        if known.is_empty() {
            vec![registry.default_group().to_string()]
        } else {
            known
        }
    }
}

/// Storage key for a player name
pub fn user_key(name: &str) -> String {
    name.trim().to_lowercase()
}
