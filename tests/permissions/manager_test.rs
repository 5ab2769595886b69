/*!
 * Permission Manager Tests
 * Admin edits, persistence, reload, and caching against a YAML directory
 */

use multipass::{
    DataSource, MultipassConfig, MultipassError, Pass, PermissionManager, WorldPolicy, YamlSource,
};
use std::fs;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

const GROUPS: &str = r#"
default:
  permissions:
    - spawn.use
  prefix: "[D]"
vip:
  groups:
    - default
  permissions:
    - fly
  prefix: "[VIP]"
  priority: 10
  worlds:
    nether:
      permissions:
        - fire.immune
"#;

fn setup() -> (TempDir, PermissionManager) {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("groups.yml"), GROUPS).unwrap();
    let manager = open(&temp, MultipassConfig::default());
    (temp, manager)
}

fn open(temp: &TempDir, config: MultipassConfig) -> PermissionManager {
    let source = YamlSource::open(temp.path()).unwrap();
    PermissionManager::new(Arc::new(source), &config).unwrap()
}

#[test]
fn test_loads_groups_from_disk() {
    let (_temp, manager) = setup();
    let registry = manager.registry();

    assert_eq!(registry.len(), 2);
    assert!(registry.contains("VIP"));
    assert!(manager.has_permission("nobody", None, "spawn.use"));
    assert_eq!(manager.resolve("nobody", None).prefix, "[D]");
}

#[test]
fn test_user_edits_survive_restart() {
    let (temp, manager) = setup();
    manager.user_add_group("Alice", None, "vip").unwrap();
    manager.user_set_suffix("Alice", None, "*").unwrap();
    drop(manager);

    let manager = open(&temp, MultipassConfig::default());
    let resolved = manager.resolve("alice", Some("nether"));
    assert!(resolved.has_permission("fly"));
    assert!(resolved.has_permission("fire.immune"));
    assert!(resolved.has_permission("spawn.use"));
    assert_eq!(resolved.prefix, "[VIP]");
    assert_eq!(resolved.suffix, "*");
    assert_eq!(resolved.priority, 10);
}

#[test]
fn test_group_edits_survive_restart() {
    let (temp, manager) = setup();
    manager
        .create_group("builder", Pass::new().with_permission("worldedit.use"))
        .unwrap();
    manager.group_add_parent("builder", None, "default").unwrap();
    manager
        .group_add_permission("default", Some("nether"), "-pvp")
        .unwrap();
    drop(manager);

    let manager = open(&temp, MultipassConfig::default());
    let registry = manager.registry();
    let builder = registry.get("builder").unwrap();
    assert_eq!(builder.parents(), ["default"]);
    assert_eq!(
        registry.get("default").unwrap().world_pass("nether").unwrap().verdict("pvp"),
        Some(false)
    );
}

#[test]
fn test_emptied_user_file_is_deleted() {
    let (temp, manager) = setup();
    let file = temp.path().join("users/bob.yml");

    manager.user_add_permission("bob", Some("nether"), "fly").unwrap();
    assert!(file.exists());
    assert!(manager.is_stored("BOB"));

    manager.user_remove_permission("bob", Some("nether"), "fly").unwrap();
    assert!(!file.exists());
    assert!(!manager.is_stored("bob"));
}

#[test]
fn test_removed_group_becomes_dangling() {
    let (_temp, manager) = setup();
    manager.user_add_group("carol", None, "vip").unwrap();
    assert!(manager.in_group("carol", None, "vip"));

    manager.remove_group("vip").unwrap();
    let resolved = manager.resolve("carol", None);
    assert!(!resolved.in_group("vip"));
    assert!(resolved.in_group("default"));
    assert!(!resolved.has_permission("fly"));

    assert!(matches!(
        manager.remove_group("vip"),
        Err(MultipassError::GroupNotFound(_))
    ));
}

#[test]
fn test_reload_picks_up_external_changes() {
    let (temp, manager) = setup();
    assert!(!manager.has_permission("dave", None, "chat"));

    fs::write(
        temp.path().join("groups.yml"),
        "default:\n  permissions:\n    - chat\n",
    )
    .unwrap();
    fs::write(temp.path().join("users/dave.yml"), "prefix: \"[Dave]\"\n").unwrap();
    manager.reload().unwrap();

    let resolved = manager.resolve("dave", None);
    assert!(resolved.has_permission("chat"));
    assert!(!resolved.has_permission("spawn.use"));
    assert_eq!(resolved.prefix, "[Dave]");
    assert_eq!(manager.registry().len(), 1);
}

#[test]
fn test_invalid_names_rejected() {
    let (_temp, manager) = setup();
    assert!(matches!(
        manager.create_group("bad/name", Pass::new()),
        Err(MultipassError::InvalidName(_))
    ));
    assert!(matches!(
        manager.user_add_permission("../etc", None, "x"),
        Err(MultipassError::InvalidName(_))
    ));
}

#[test]
fn test_cache_can_be_disabled() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("groups.yml"), GROUPS).unwrap();
    let config = MultipassConfig {
        cache_size: 0,
        world_policy: WorldPolicy::Underlay,
        ..MultipassConfig::default()
    };
    let manager = open(&temp, config);

    let first = manager.resolve("erin", None);
    let second = manager.resolve("erin", None);
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(first, second);
    assert_eq!(manager.cache_stats().hits, 0);
    assert_eq!(manager.world_policy(), WorldPolicy::Underlay);
    assert_eq!(manager.source().name(), "yaml");
}

#[test]
fn test_default_group_can_change() {
    let (_temp, manager) = setup();
    manager.set_default_group("vip").unwrap();

    assert!(manager.has_permission("frank", None, "fly"));
    assert!(manager.has_permission("frank", None, "spawn.use"));
}

#[test]
fn test_resolve_past_cache_capacity() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("groups.yml"), GROUPS).unwrap();
    let config = MultipassConfig {
        cache_size: 2,
        ..MultipassConfig::default()
    };
    let manager = open(&temp, config);

    let (tx, rx) = mpsc::channel();
    let worker = manager.clone();
    thread::spawn(move || {
        let granted: Vec<bool> = ["a", "b", "c", "d", "a"]
            .iter()
            .map(|name| worker.has_permission(name, None, "spawn.use"))
            .collect();
        tx.send(granted).unwrap();
    });

    let granted = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("resolution stalled once the cache was full");
    assert_eq!(granted, vec![true; 5]);
    assert!(manager.cache_stats().size <= 2);
}

#[test]
fn test_unusable_name_never_reaches_storage() {
    let (temp, manager) = setup();
    // users/../outside.yml would resolve to this file
    fs::write(temp.path().join("outside.yml"), "permissions: [escape]\n").unwrap();

    let resolved = manager.resolve("../outside", None);
    assert!(!resolved.has_permission("escape"));
    assert!(resolved.has_permission("spawn.use"));
    assert!(!manager.is_stored("../outside"));
    assert_eq!(manager.loaded_users(), 0);
}
