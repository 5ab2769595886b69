/*!
 * Memory Source Tests
 * The persistence contract against the in-memory store
 */

use multipass::{DataSource, Group, MemorySource, Pass, User};

#[test]
fn test_emptiness_round_trip() {
    let source = MemorySource::new();
    let mut user = User::with_pass("alice", Pass::new().with_group("vip"))
        .with_world_pass("nether", Pass::new().with_permission("fire.immune"));

    source.save_user(&user).unwrap();
    assert!(source.is_stored("alice"));

    user.passes_mut().global_mut().remove_group("vip");
    source.save_user(&user).unwrap();
    assert!(source.is_stored("alice"), "world overlay still holds data");

    user.passes_mut().remove_world("nether");
    source.save_user(&user).unwrap();
    assert!(!source.is_stored("alice"));
    assert_eq!(source.user_count(), 0);
}

#[test]
fn test_user_names_are_case_insensitive() {
    let source = MemorySource::new();
    source
        .save_user(&User::with_pass("Alice", Pass::new().with_permission("fly")))
        .unwrap();

    assert!(source.is_stored("ALICE"));
    assert_eq!(source.load_user("alice").unwrap().pass().verdict("fly"), Some(true));
}

#[test]
fn test_save_groups_replaces_set() {
    let source = MemorySource::with_groups([Group::new("default"), Group::new("old")]);
    let vip = Group::with_pass("vip", Pass::new().with_priority(10));

    source.save_groups(&[&vip]).unwrap();
    let groups = source.load_groups().unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups["vip"].priority(), 10);
}
