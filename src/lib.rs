/*!
 * Multipass
 * Permission resolution for game servers: groups, per-player overrides,
 * world-scoped overlays, prefixes and suffixes
 */

pub mod config;
pub mod core;
pub mod data;
pub mod monitoring;
pub mod permissions;

// Re-exports
pub use crate::core::errors::{MultipassError, Result};
pub use config::{ConfigError, MultipassConfig};
pub use data::{DataError, DataResult, DataSource, MemorySource, YamlSource};
pub use monitoring::init_tracing;
pub use permissions::{
    Group, GroupRegistry, Pass, PermissionManager, Resolved, User, WorldPolicy,
};
