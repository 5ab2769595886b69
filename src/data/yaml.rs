/*!
 * YAML Data Source
 * One file per user under `users/`, every group in `groups.yml`
 *
 * Layout under the data root:
 * ```text
 * groups.yml          # { <group>: { groups, permissions, prefix, suffix, priority, worlds } }
 * users/<name>.yml    # { groups, permissions, prefix, suffix, priority, worlds }
 * ```
 */

use super::errors::{DataError, DataResult};
use super::record::{group_from_record, user_from_record, GroupRecord, ScopedRecord, UserRecord};
use super::traits::DataSource;
use crate::core::limits::{GROUPS_FILE, USERS_DIR, USER_FILE_EXTENSION};
use crate::permissions::{group_key, user_key, Group, User};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Data source backed by YAML files
#[derive(Debug, Clone)]
pub struct YamlSource {
    user_dir: PathBuf,
    group_file: PathBuf,
}

impl YamlSource {
    /// Open a data directory, creating the users directory if needed
    pub fn open<P: Into<PathBuf>>(root: P) -> DataResult<Self> {
        let root = root.into();
        let user_dir = root.join(USERS_DIR);
        fs::create_dir_all(&user_dir).map_err(|e| DataError::io(&user_dir, e))?;
        Ok(Self {
            user_dir,
            group_file: root.join(GROUPS_FILE),
        })
    }

    fn user_file(&self, name: &str) -> PathBuf {
        self.user_dir
            .join(format!("{}.{}", user_key(name), USER_FILE_EXTENSION))
    }

    /// Write through a sibling temp file so readers never see half a file
    fn write_atomic(path: &Path, contents: &str) -> DataResult<()> {
        let tmp = path.with_extension("yml.tmp");
        fs::write(&tmp, contents).map_err(|e| DataError::io(&tmp, e))?;
        fs::rename(&tmp, path).map_err(|e| DataError::io(path, e))
    }

    /// Read a file, treating absence as `None`
    fn read_optional(path: &Path) -> DataResult<Option<String>> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DataError::io(path, e)),
        }
    }
}

impl DataSource for YamlSource {
    fn load_user(&self, name: &str) -> DataResult<User> {
        debug!(user = name, "Loading permissions");
        let path = self.user_file(name);
        let Some(contents) = Self::read_optional(&path)? else {
            return Ok(User::new(name));
        };
        // An empty file deserializes as null
        let record: Option<UserRecord> =
            serde_yaml::from_str(&contents).map_err(|e| DataError::parse(&path, e))?;
        Ok(user_from_record(name, record.unwrap_or_default()))
    }

    fn save_user(&self, user: &User) -> DataResult<()> {
        let path = self.user_file(user.name());
        if user.is_empty() {
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(DataError::io(&path, e)),
            }
            debug!(user = user.name(), "User data is empty, file removed");
            return Ok(());
        }

        let record = ScopedRecord::from(user.passes());
        let yaml = serde_yaml::to_string(&record).map_err(|e| DataError::Serialize {
            what: format!("user {}", user.name()),
            reason: e.to_string(),
        })?;
        Self::write_atomic(&path, &yaml)?;
        debug!(user = user.name(), path = %path.display(), "User saved");
        Ok(())
    }

    fn load_groups(&self) -> DataResult<BTreeMap<String, Group>> {
        let Some(contents) = Self::read_optional(&self.group_file)? else {
            return Ok(BTreeMap::new());
        };
        let records: Option<BTreeMap<String, GroupRecord>> = serde_yaml::from_str(&contents)
            .map_err(|e| DataError::parse(&self.group_file, e))?;

        let groups: BTreeMap<String, Group> = records
            .unwrap_or_default()
            .into_iter()
            .map(|(name, record)| (group_key(&name), group_from_record(&name, record)))
            .collect();
        info!(count = groups.len(), "Groups loaded");
        Ok(groups)
    }

    fn save_groups(&self, groups: &[&Group]) -> DataResult<()> {
        let records: BTreeMap<&str, GroupRecord> = groups
            .iter()
            .map(|g| (g.name(), ScopedRecord::from(g.passes())))
            .collect();
        let yaml = serde_yaml::to_string(&records).map_err(|e| DataError::Serialize {
            what: "groups".to_string(),
            reason: e.to_string(),
        })?;
        Self::write_atomic(&self.group_file, &yaml)?;
        debug!(count = groups.len(), "Groups saved");
        Ok(())
    }

    fn is_stored(&self, name: &str) -> bool {
        self.user_file(name).exists()
    }

    fn name(&self) -> &str {
        "yaml"
    }
}
