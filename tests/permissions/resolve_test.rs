/*!
 * Resolution Tests
 * Group inheritance, user overrides, and dangling references
 */

use multipass::{Group, GroupRegistry, Pass, User};
use pretty_assertions::assert_eq;
use std::collections::{BTreeSet, HashSet};

fn set(nodes: &[&str]) -> BTreeSet<String> {
    nodes.iter().map(|n| n.to_string()).collect()
}

fn registry() -> GroupRegistry {
    GroupRegistry::from_groups(
        [
            Group::with_pass(
                "default",
                Pass::new().with_permission("spawn.use").with_prefix("[D]"),
            ),
            Group::with_pass(
                "vip",
                Pass::new()
                    .with_permissions(["spawn.use", "fly"])
                    .with_priority(10),
            ),
        ],
        "default",
    )
}

#[test]
fn test_vip_and_default_union() {
    let registry = registry();
    let alice = User::with_pass("alice", Pass::new().with_groups(["vip", "default"]));

    let resolved = alice.resolve(&registry, None);

    assert_eq!(resolved.permissions(), &set(&["fly", "spawn.use"]));
    assert_eq!(resolved.priority(), 10);
    assert_eq!(resolved.groups(), ["vip", "default"]);
}

#[test]
fn test_user_prefix_beats_inherited() {
    let registry = registry();
    let bob = User::with_pass(
        "bob",
        Pass::new().with_group("default").with_prefix("[B]"),
    );

    assert_eq!(bob.resolve(&registry, None).prefix(), "[B]");
}

#[test]
fn test_inherited_prefix_fills_empty_user_prefix() {
    let registry = registry();
    let carol = User::with_pass("carol", Pass::new().with_group("default"));

    assert_eq!(carol.resolve(&registry, None).prefix(), "[D]");
}

#[test]
fn test_user_deny_at_equal_priority_overrides_group_grant() {
    let registry = registry();
    let dave = User::with_pass(
        "dave",
        Pass::new()
            .with_group("vip")
            .with_permission("-fly")
            .with_priority(10),
    );

    let resolved = dave.resolve(&registry, None);
    assert_eq!(resolved.verdict("fly"), Some(false));
    assert_eq!(resolved.verdict("spawn.use"), Some(true));
}

#[test]
fn test_lower_priority_user_deny_loses_to_group_grant() {
    let registry = registry();
    let dave = User::with_pass(
        "dave",
        Pass::new().with_group("vip").with_permission("-fly"),
    );

    assert_eq!(dave.resolve(&registry, None).verdict("fly"), Some(true));
}

#[test]
fn test_cycle_terminates_without_duplicates() {
    let registry = GroupRegistry::from_groups(
        [
            Group::with_pass("G1", Pass::new().with_permission("one").with_group("G2")),
            Group::with_pass("G2", Pass::new().with_permission("two").with_group("G1")),
        ],
        "default",
    );
    let user = User::with_pass("erin", Pass::new().with_group("G1"));

    let resolved = user.resolve(&registry, None);

    assert_eq!(resolved.permissions(), &set(&["one", "two"]));
    assert_eq!(resolved.groups(), ["G1", "G2"]);
}

#[test]
fn test_self_reference_is_harmless() {
    let registry = GroupRegistry::from_groups(
        [Group::with_pass("loop", Pass::new().with_permission("x").with_group("LOOP"))],
        "default",
    );

    let chain = registry.resolve_chain(&["loop".to_string()], &mut HashSet::new());
    assert_eq!(chain.permissions(), &set(&["x"]));
    assert_eq!(chain.groups(), ["loop"]);
}

#[test]
fn test_ghost_group_equals_no_groups() {
    let registry = registry();
    let ghost = User::with_pass("frank", Pass::new().with_group("ghost"));
    let plain = User::new("frank");

    assert_eq!(ghost.resolve(&registry, None), plain.resolve(&registry, None));
}

#[test]
fn test_unknown_user_inherits_default_group() {
    let registry = registry();
    let resolved = User::new("steve").resolve(&registry, None);

    assert_eq!(resolved.permissions(), &set(&["spawn.use"]));
    assert_eq!(resolved.groups(), ["default"]);
}

#[test]
fn test_missing_default_group_resolves_to_own_pass() {
    let registry = GroupRegistry::from_groups([Group::new("vip")], "default");
    let user = User::with_pass("gina", Pass::new().with_permission("chat"));

    let resolved = user.resolve(&registry, None);
    assert_eq!(resolved.permissions(), &set(&["chat"]));
    assert!(resolved.groups().is_empty());
}

#[test]
fn test_deep_inheritance() {
    let registry = GroupRegistry::from_groups(
        [
            Group::with_pass("admin", Pass::new().with_permission("ban").with_group("mod")),
            Group::with_pass("mod", Pass::new().with_permission("kick").with_group("default")),
            Group::with_pass("default", Pass::new().with_permission("chat")),
        ],
        "default",
    );
    let user = User::with_pass("hank", Pass::new().with_group("Admin"));

    let resolved = user.resolve(&registry, None);
    assert_eq!(resolved.permissions(), &set(&["ban", "chat", "kick"]));
    assert_eq!(resolved.groups(), ["Admin", "mod", "default"]);
}
