/*!
 * Storage Records
 * Typed intermediate form between domain types and a serialized tree
 *
 * Every field has a default so partial or hand-edited files load cleanly.
 * World overlays live in a nested `worlds` map.
 */

use crate::permissions::{Group, Pass, ScopedPass, User};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One pass as stored
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassRecord {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub prefix: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub suffix: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub priority: i32,
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}

impl From<&Pass> for PassRecord {
    fn from(pass: &Pass) -> Self {
        Self {
            groups: pass.groups().to_vec(),
            permissions: pass.permissions().iter().cloned().collect(),
            prefix: pass.prefix().to_string(),
            suffix: pass.suffix().to_string(),
            priority: pass.priority(),
        }
    }
}

impl From<PassRecord> for Pass {
    fn from(record: PassRecord) -> Self {
        Pass::new()
            .with_groups(record.groups)
            .with_permissions(record.permissions)
            .with_prefix(record.prefix)
            .with_suffix(record.suffix)
            .with_priority(record.priority)
    }
}

/// A global pass plus world overlays as stored
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopedRecord {
    #[serde(flatten)]
    pub pass: PassRecord,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub worlds: BTreeMap<String, PassRecord>,
}

impl From<&ScopedPass> for ScopedRecord {
    fn from(scoped: &ScopedPass) -> Self {
        Self {
            pass: scoped.global().into(),
            worlds: scoped
                .worlds()
                .iter()
                .filter(|(_, pass)| !pass.is_empty())
                .map(|(world, pass)| (world.clone(), pass.into()))
                .collect(),
        }
    }
}

impl From<ScopedRecord> for ScopedPass {
    fn from(record: ScopedRecord) -> Self {
        let mut scoped = ScopedPass::new(record.pass.into());
        for (world, pass) in record.worlds {
            let pass = Pass::from(pass);
            if !pass.is_empty() {
                scoped.set_world(world, pass);
            }
        }
        scoped
    }
}

/// A user file
pub type UserRecord = ScopedRecord;

/// One entry of the group file
pub type GroupRecord = ScopedRecord;

/// Decode a user record
pub fn user_from_record(name: &str, record: UserRecord) -> User {
    let mut user = User::new(name);
    *user.passes_mut() = record.into();
    user
}

/// Decode a group record
pub fn group_from_record(name: &str, record: GroupRecord) -> Group {
    let mut group = Group::new(name);
    *group.passes_mut() = record.into();
    group
}
