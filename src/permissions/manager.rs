/*!
 * Permission Manager
 * Host-facing entry point: resolution, user lifecycle, and admin edits
 *
 * The group registry is published through an RCU cell. Resolutions read a
 * snapshot and never block on edits; every group edit publishes a new
 * registry version and then persists the whole group set.
 */

use super::cache::{CacheStats, ResolutionCache};
use super::group::Group;
use super::registry::GroupRegistry;
use super::types::{Pass, Resolved};
use super::user::{user_key, User, WorldPolicy};
use crate::config::MultipassConfig;
use crate::core::errors::{validate_name, MultipassError, Result};
use crate::core::RcuCell;
use crate::data::DataSource;
use ahash::RandomState;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Central permission manager
#[derive(Clone)]
pub struct PermissionManager {
    /// Current group registry version
    registry: RcuCell<GroupRegistry>,
    /// Persistence backend
    source: Arc<dyn DataSource>,
    /// Users loaded so far, keyed by lower-cased name
    users: Arc<DashMap<String, User, RandomState>>,
    /// Resolution results
    cache: Arc<ResolutionCache>,
    policy: WorldPolicy,
}

impl PermissionManager {
    /// Create a manager and load the first registry version from `source`
    pub fn new(source: Arc<dyn DataSource>, config: &MultipassConfig) -> Result<Self> {
        debug!(source = source.name(), "Initializing permission manager");
        let groups = source.load_groups()?;
        let registry = GroupRegistry::from_groups(groups.into_values(), config.default_group.clone());
        if !registry.contains(registry.default_group()) {
            warn!(
                group = registry.default_group(),
                "Default group is not defined; users without groups inherit nothing"
            );
        }
        info!(groups = registry.len(), "Permission manager ready");

        Ok(Self {
            registry: RcuCell::new(registry),
            source,
            users: Arc::new(DashMap::with_hasher(RandomState::new())),
            cache: Arc::new(ResolutionCache::new(config.cache_size)),
            policy: config.world_policy,
        })
    }

    /// Current registry snapshot
    pub fn registry(&self) -> Arc<GroupRegistry> {
        self.registry.load()
    }

    pub fn world_policy(&self) -> WorldPolicy {
        self.policy
    }

    pub fn source(&self) -> &dyn DataSource {
        self.source.as_ref()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Reload groups from the data source and drop every cached user
    pub fn reload(&self) -> Result<()> {
        let groups = self.source.load_groups()?;
        self.registry
            .update(|current| current.replaced(groups.values().cloned()));
        self.users.clear();
        self.cache.clear();
        let registry = self.registry.load();
        info!(
            groups = registry.len(),
            version = registry.version(),
            "Groups reloaded"
        );
        Ok(())
    }

    // =========================================================================
    // RESOLUTION
    // =========================================================================

    /// Effective permissions for a player, optionally within a world
    ///
    /// Never fails: a user that cannot be loaded, or whose name is not a
    /// valid storage key, resolves as a transient empty user
    /// (default-group membership only).
    #[instrument(level = "trace", skip(self))]
    pub fn resolve(&self, name: &str, world: Option<&str>) -> Arc<Resolved> {
        let key = user_key(name);
        let registry = self.registry.load();

        if let Some(cached) = self.cache.get(&key, world, registry.version()) {
            return cached;
        }

        match self.user(name) {
            Ok(user) => {
                let resolved = Arc::new(Resolved::from(user.resolve_with(&registry, world, self.policy)));
                self.cache
                    .put(&key, world, registry.version(), Arc::clone(&resolved));
                resolved
            }
            Err(e) => {
                warn!(user = name, error = %e, "Failed to load user, resolving as empty");
                Arc::new(Resolved::from(
                    User::new(name).resolve_with(&registry, world, self.policy),
                ))
            }
        }
    }

    /// Whether a node is granted to the player
    pub fn has_permission(&self, name: &str, world: Option<&str>, node: &str) -> bool {
        self.resolve(name, world).has_permission(node)
    }

    /// Whether the player effectively belongs to a group, directly or through
    /// inheritance
    pub fn in_group(&self, name: &str, world: Option<&str>, group: &str) -> bool {
        self.resolve(name, world).in_group(group)
    }

    // =========================================================================
    // USERS
    // =========================================================================

    /// Loaded user, fetched from the data source on first use
    ///
    /// Unknown players yield an empty transient user that is not kept;
    /// only users with stored data stay loaded. Names that cannot be
    /// storage keys are rejected before the data source is consulted.
    pub fn user(&self, name: &str) -> Result<User> {
        validate_name(name)?;
        let key = user_key(name);
        if let Some(user) = self.users.get(&key) {
            return Ok(user.value().clone());
        }
        let user = self.source.load_user(name)?;
        if !user.is_empty() {
            self.users.insert(key, user.clone());
        }
        Ok(user)
    }

    pub fn is_stored(&self, name: &str) -> bool {
        validate_name(name).is_ok() && self.source.is_stored(name)
    }

    /// Number of users currently held in memory
    pub fn loaded_users(&self) -> usize {
        self.users.len()
    }

    /// Drop a player's cached data
    ///
    /// Hosts should call this when a player leaves; loaded users are
    /// otherwise kept until the next reload.
    pub fn forget_user(&self, name: &str) {
        let key = user_key(name);
        self.users.remove(&key);
        self.cache.invalidate_user(&key);
    }

    /// Edit one of a user's passes and persist the result
    ///
    /// `world` selects the world overlay (created on demand); `None` edits
    /// the global pass. Empty overlays are dropped before saving, and an
    /// empty user has its stored record deleted.
    pub fn edit_user<F>(&self, name: &str, world: Option<&str>, edit: F) -> Result<User>
    where
        F: FnOnce(&mut Pass),
    {
        validate_name(name)?;
        let mut user = self.user(name)?;
        edit(user.passes_mut().scope_mut(world));
        user.passes_mut().prune_empty_worlds();

        self.source.save_user(&user)?;
        let key = user.key();
        if user.is_empty() {
            self.users.remove(&key);
        } else {
            self.users.insert(key.clone(), user.clone());
        }
        self.cache.invalidate_user(&key);
        debug!(user = name, world = ?world, "User updated");
        Ok(user)
    }

    pub fn user_add_permission(&self, name: &str, world: Option<&str>, node: &str) -> Result<User> {
        self.edit_user(name, world, |pass| {
            pass.add_permission(node);
        })
    }

    pub fn user_remove_permission(&self, name: &str, world: Option<&str>, node: &str) -> Result<User> {
        self.edit_user(name, world, |pass| {
            pass.remove_permission(node);
        })
    }

    /// Add a group membership; the group must exist
    pub fn user_add_group(&self, name: &str, world: Option<&str>, group: &str) -> Result<User> {
        self.require_group(group)?;
        self.edit_user(name, world, |pass| {
            pass.add_group(group);
        })
    }

    /// Replace all memberships with a single group; the group must exist
    pub fn user_set_group(&self, name: &str, world: Option<&str>, group: &str) -> Result<User> {
        self.require_group(group)?;
        self.edit_user(name, world, |pass| pass.set_groups([group]))
    }

    pub fn user_remove_group(&self, name: &str, world: Option<&str>, group: &str) -> Result<User> {
        self.edit_user(name, world, |pass| {
            pass.remove_group(group);
        })
    }

    pub fn user_set_prefix(&self, name: &str, world: Option<&str>, prefix: &str) -> Result<User> {
        self.edit_user(name, world, |pass| pass.set_prefix(prefix))
    }

    pub fn user_set_suffix(&self, name: &str, world: Option<&str>, suffix: &str) -> Result<User> {
        self.edit_user(name, world, |pass| pass.set_suffix(suffix))
    }

    pub fn user_set_priority(&self, name: &str, world: Option<&str>, priority: i32) -> Result<User> {
        self.edit_user(name, world, |pass| pass.set_priority(priority))
    }

    // =========================================================================
    // GROUPS
    // =========================================================================

    /// Create a group; fails if one with the same name (any case) exists
    pub fn create_group(&self, name: &str, pass: Pass) -> Result<()> {
        validate_name(name)?;
        self.registry.try_update(|current| -> Result<(GroupRegistry, ())> {
            if current.contains(name) {
                return Err(MultipassError::GroupExists(name.to_string()));
            }
            Ok((current.with_group(Group::with_pass(name, pass.clone())), ()))
        })?;
        info!(group = name, "Group created");
        self.save_groups()
    }

    /// Remove a group; references to it elsewhere become dangling and are
    /// ignored by resolution
    pub fn remove_group(&self, name: &str) -> Result<()> {
        self.registry.try_update(|current| -> Result<(GroupRegistry, ())> {
            if !current.contains(name) {
                return Err(MultipassError::GroupNotFound(name.to_string()));
            }
            Ok((current.without_group(name), ()))
        })?;
        info!(group = name, "Group removed");
        self.save_groups()
    }

    /// Edit one of a group's passes, publish the new registry, and persist
    ///
    /// The closure may run more than once if another edit is published
    /// concurrently.
    pub fn edit_group<F>(&self, name: &str, world: Option<&str>, mut edit: F) -> Result<()>
    where
        F: FnMut(&mut Pass),
    {
        self.registry.try_update(|current| -> Result<(GroupRegistry, ())> {
            let mut group = current
                .get(name)
                .cloned()
                .ok_or_else(|| MultipassError::GroupNotFound(name.to_string()))?;
            edit(group.passes_mut().scope_mut(world));
            group.passes_mut().prune_empty_worlds();
            Ok((current.with_group(group), ()))
        })?;
        debug!(group = name, world = ?world, "Group updated");
        self.save_groups()
    }

    pub fn group_add_permission(&self, name: &str, world: Option<&str>, node: &str) -> Result<()> {
        self.edit_group(name, world, |pass| {
            pass.add_permission(node);
        })
    }

    pub fn group_remove_permission(&self, name: &str, world: Option<&str>, node: &str) -> Result<()> {
        self.edit_group(name, world, |pass| {
            pass.remove_permission(node);
        })
    }

    /// Make `name` inherit from `parent`; the parent must exist
    pub fn group_add_parent(&self, name: &str, world: Option<&str>, parent: &str) -> Result<()> {
        self.require_group(parent)?;
        self.edit_group(name, world, |pass| {
            pass.add_group(parent);
        })
    }

    pub fn group_remove_parent(&self, name: &str, world: Option<&str>, parent: &str) -> Result<()> {
        self.edit_group(name, world, |pass| {
            pass.remove_group(parent);
        })
    }

    pub fn group_set_prefix(&self, name: &str, world: Option<&str>, prefix: &str) -> Result<()> {
        self.edit_group(name, world, |pass| pass.set_prefix(prefix))
    }

    pub fn group_set_suffix(&self, name: &str, world: Option<&str>, suffix: &str) -> Result<()> {
        self.edit_group(name, world, |pass| pass.set_suffix(suffix))
    }

    pub fn group_set_priority(&self, name: &str, world: Option<&str>, priority: i32) -> Result<()> {
        self.edit_group(name, world, |pass| pass.set_priority(priority))
    }

    /// Change the implied group for users without known memberships
    pub fn set_default_group(&self, name: &str) -> Result<()> {
        validate_name(name)?;
        self.registry.update(|current| current.with_default_group(name));
        if !self.registry.load().contains(name) {
            warn!(group = name, "Default group set to an undefined group");
        }
        info!(group = name, "Default group changed");
        Ok(())
    }

    fn require_group(&self, name: &str) -> Result<()> {
        if self.registry.load().contains(name) {
            Ok(())
        } else {
            Err(MultipassError::GroupNotFound(name.to_string()))
        }
    }

    fn save_groups(&self) -> Result<()> {
        let registry = self.registry.load();
        let groups: Vec<&Group> = registry.groups().collect();
        self.source.save_groups(&groups)?;
        Ok(())
    }
}

impl std::fmt::Debug for PermissionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.registry.load();
        f.debug_struct("PermissionManager")
            .field("source", &self.source.name())
            .field("groups", &registry.len())
            .field("version", &registry.version())
            .field("users", &self.users.len())
            .field("policy", &self.policy)
            .finish()
    }
}
