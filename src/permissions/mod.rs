/*!
 * Permissions Module
 * Pass merging, group hierarchies, and per-player resolution
 *
 * ## Features
 * - Passes: permission nodes (with `-node` denies), group references,
 *   prefix, suffix, and priority
 * - Groups inheriting from groups, with cycle-safe traversal
 * - World-scoped overlays for users and groups
 * - Versioned registry snapshots for lock-free reads during edits
 * - Resolution cache keyed by player and world
 *
 * ## Usage
 * ```
 * use multipass::permissions::{Group, GroupRegistry, Pass, User};
 *
 * let registry = GroupRegistry::from_groups(
 *     [
 *         Group::with_pass("default", Pass::new().with_permission("spawn.use")),
 *         Group::with_pass("vip", Pass::new().with_permission("fly").with_priority(10)),
 *     ],
 *     "default",
 * );
 *
 * let alice = User::with_pass("alice", Pass::new().with_groups(["vip", "default"]));
 * let resolved = alice.resolve(&registry, None);
 *
 * assert_eq!(resolved.verdict("fly"), Some(true));
 * assert_eq!(resolved.verdict("spawn.use"), Some(true));
 * assert_eq!(resolved.priority(), 10);
 * ```
 */

pub mod cache;
pub mod group;
pub mod manager;
pub mod registry;
pub mod types;
pub mod user;

// Re-export commonly used items
pub use cache::{CacheStats, ResolutionCache};
pub use group::{group_key, Group};
pub use manager::PermissionManager;
pub use registry::GroupRegistry;
pub use types::{normalize_node, Node, Pass, Resolved, ScopedPass};
pub use user::{user_key, User, WorldPolicy};
