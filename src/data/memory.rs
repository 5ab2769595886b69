/*!
 * In-Memory Data Source
 * Volatile store for transient setups and tests
 */

use super::errors::DataResult;
use super::traits::DataSource;
use crate::permissions::{user_key, Group, User};
use ahash::RandomState;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::debug;

/// Data source backed by process memory
#[derive(Debug, Default)]
pub struct MemorySource {
    users: DashMap<String, User, RandomState>,
    groups: RwLock<BTreeMap<String, Group>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with groups
    pub fn with_groups<I>(groups: I) -> Self
    where
        I: IntoIterator<Item = Group>,
    {
        let source = Self::new();
        source
            .groups
            .write()
            .extend(groups.into_iter().map(|g| (g.key(), g)));
        source
    }

    /// Number of stored user records
    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

impl DataSource for MemorySource {
    fn load_user(&self, name: &str) -> DataResult<User> {
        Ok(self
            .users
            .get(&user_key(name))
            .map(|entry| entry.value().clone())
            .unwrap_or_else(|| User::new(name)))
    }

    fn save_user(&self, user: &User) -> DataResult<()> {
        if user.is_empty() {
            self.users.remove(&user.key());
            debug!(user = user.name(), "User data is empty, record removed");
        } else {
            let mut stored = user.clone();
            stored.passes_mut().prune_empty_worlds();
            self.users.insert(user.key(), stored);
            debug!(user = user.name(), "User saved");
        }
        Ok(())
    }

    fn load_groups(&self) -> DataResult<BTreeMap<String, Group>> {
        Ok(self.groups.read().clone())
    }

    fn save_groups(&self, groups: &[&Group]) -> DataResult<()> {
        let stored = groups.iter().map(|g| (g.key(), (*g).clone())).collect();
        *self.groups.write() = stored;
        Ok(())
    }

    fn is_stored(&self, name: &str) -> bool {
        self.users.contains_key(&user_key(name))
    }

    fn name(&self) -> &str {
        "memory"
    }
}
