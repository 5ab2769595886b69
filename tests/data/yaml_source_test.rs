/*!
 * YAML Source Tests
 * File layout, round trips, and the delete-when-empty contract
 */

use multipass::{DataError, DataSource, Group, Pass, User, YamlSource};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn source() -> (TempDir, YamlSource) {
    let temp = TempDir::new().unwrap();
    let source = YamlSource::open(temp.path()).unwrap();
    (temp, source)
}

#[test]
fn test_user_round_trip() {
    let (_temp, source) = source();
    let user = User::with_pass(
        "Alice",
        Pass::new()
            .with_groups(["vip", "default"])
            .with_permissions(["fly", "-pvp"])
            .with_prefix("[A]")
            .with_priority(3),
    )
    .with_world_pass("nether", Pass::new().with_permission("fire.immune"));

    source.save_user(&user).unwrap();
    let loaded = source.load_user("alice").unwrap();

    assert_eq!(loaded.passes(), user.passes());
}

#[test]
fn test_missing_user_is_empty_and_not_stored() {
    let (_temp, source) = source();
    let user = source.load_user("nobody").unwrap();

    assert!(user.is_empty());
    assert!(!source.is_stored("nobody"));
}

#[test]
fn test_empty_user_deletes_file() {
    let (temp, source) = source();
    let file = temp.path().join("users/bob.yml");

    let mut user = User::with_pass("bob", Pass::new().with_permission("fly"));
    source.save_user(&user).unwrap();
    assert!(file.exists());

    user.passes_mut().global_mut().remove_permission("fly");
    source.save_user(&user).unwrap();
    assert!(!file.exists());
    assert!(!source.is_stored("bob"));

    // Deleting again is not an error
    source.save_user(&user).unwrap();
}

#[test]
fn test_empty_world_overlays_are_not_written() {
    let (temp, source) = source();
    let user = User::with_pass("carol", Pass::new().with_prefix("[C]"))
        .with_world_pass("end", Pass::new());

    source.save_user(&user).unwrap();
    let contents = fs::read_to_string(temp.path().join("users/carol.yml")).unwrap();
    assert!(!contents.contains("worlds"));
    assert!(source.load_user("carol").unwrap().passes().worlds().is_empty());
}

#[test]
fn test_missing_groups_file_is_empty() {
    let (_temp, source) = source();
    assert!(source.load_groups().unwrap().is_empty());
}

#[test]
fn test_groups_round_trip_with_worlds() {
    let (_temp, source) = source();
    let default = Group::with_pass("default", Pass::new().with_permission("spawn.use"))
        .with_world_pass("nether", Pass::new().with_permission("fire.immune"));
    let vip = Group::with_pass(
        "VIP",
        Pass::new().with_group("default").with_suffix("*").with_priority(10),
    );

    source.save_groups(&[&default, &vip]).unwrap();
    let groups = source.load_groups().unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(groups["default"], default);
    assert_eq!(groups["vip"].name(), "VIP");
    assert_eq!(groups["vip"].passes(), vip.passes());
}

#[test]
fn test_hand_written_groups_file() {
    let (temp, source) = source();
    fs::write(
        temp.path().join("groups.yml"),
        "Admin:\n  groups: [mod]\n  permissions: ['*', '-ban.exempt']\n  priority: 100\nmod: {}\n",
    )
    .unwrap();

    let groups = source.load_groups().unwrap();
    let admin = &groups["admin"];
    assert_eq!(admin.name(), "Admin");
    assert_eq!(admin.parents(), ["mod"]);
    assert_eq!(admin.pass().verdict("ban.exempt"), Some(false));
    assert_eq!(admin.priority(), 100);
    assert!(groups["mod"].pass().is_empty());
}

#[test]
fn test_malformed_groups_file_reports_path() {
    let (temp, source) = source();
    fs::write(temp.path().join("groups.yml"), "default: [unclosed").unwrap();

    match source.load_groups() {
        Err(DataError::Parse { path, .. }) => assert!(path.ends_with("groups.yml")),
        other => panic!("expected parse error, got {:?}", other),
    }
}
