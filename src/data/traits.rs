/*!
 * Data Source Traits
 * The persistence boundary the resolution core depends on
 */

use super::errors::DataResult;
use crate::permissions::{Group, User};
use std::collections::BTreeMap;

/// Loads and stores users and groups
///
/// Missing data is never an error: an unknown user loads as an empty
/// [`User`] and a missing group store loads as an empty map. Only real
/// faults (I/O, malformed data) surface as errors.
pub trait DataSource: Send + Sync {
    /// Load a user, or an empty one if nothing is stored
    fn load_user(&self, name: &str) -> DataResult<User>;

    /// Store a user; deletes the stored record when the user is empty
    fn save_user(&self, user: &User) -> DataResult<()>;

    /// Load every group keyed by lower-cased name
    fn load_groups(&self) -> DataResult<BTreeMap<String, Group>>;

    /// Replace the stored group set
    fn save_groups(&self, groups: &[&Group]) -> DataResult<()>;

    /// Whether a record exists for the user
    fn is_stored(&self, name: &str) -> bool;

    /// Backend name for logs
    fn name(&self) -> &str;
}
