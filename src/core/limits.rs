/*!
 * Limits and Constants
 *
 * Centralized location for names, defaults, and sizing values shared by
 * the resolution core and the persistence layer.
 */

// =============================================================================
// PERMISSION NODES
// =============================================================================

/// Prefix marking a permission node as an explicit deny
pub const NEGATION_PREFIX: char = '-';

// =============================================================================
// GROUPS
// =============================================================================

/// Name of the group every user implicitly belongs to when none of their
/// group references is known to the registry
pub const DEFAULT_GROUP_NAME: &str = "default";

// =============================================================================
// CACHING
// =============================================================================

/// Maximum cached resolutions (one per user/world pair)
/// [PERF] Sized for a busy server; entries are evicted arbitrarily when full
pub const DEFAULT_RESOLUTION_CACHE_SIZE: usize = 10_000;

// =============================================================================
// STORAGE LAYOUT
// =============================================================================

/// Default data directory when none is configured
pub const DEFAULT_DATA_DIR: &str = "plugins/Multipass";

/// Directory (under the data root) holding one file per stored user
pub const USERS_DIR: &str = "users";

/// File (under the data root) holding every group
pub const GROUPS_FILE: &str = "groups.yml";

/// Extension for per-user files
pub const USER_FILE_EXTENSION: &str = "yml";
