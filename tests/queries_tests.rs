use kintree::db::*;
use kintree::error::KinError;
use kintree::model::*;
use kintree::ops::*;
use kintree::queries::*;

fn setup() -> (rusqlite::Connection, Family) {
    let conn = schema::test_connection();
    account_ops::register(&conn, "alice", "hash", None, None).unwrap();
    let family = family_ops::create_family(&conn, "alice", "Smiths").unwrap();
    (conn, family)
}

#[test]
fn family_view_hydrates_members_and_log() {
    let (conn, _) = setup();
    let alice = member_ops::add_member(
        &conn,
        "alice",
        MemberDraft::with_gender("Alice", Gender::Female),
        None,
        None,
    )
    .unwrap();
    let bob = member_ops::add_member(
        &conn,
        "alice",
        MemberDraft::with_gender("Bob", Gender::Male),
        Some(alice.id),
        Some("spouse"),
    )
    .unwrap();

    let view = family_queries::family_view(&conn, "alice").unwrap();
    assert_eq!(view.family.name, "Smiths");
    assert_eq!(view.members.len(), 2);
    assert_eq!(view.relationships.len(), 2);
    assert!(view.members.iter().any(|m| m.id == alice.id));
    assert!(view.members.iter().any(|m| m.id == bob.id));
}

#[test]
fn family_view_unknown_key_is_not_found() {
    let (conn, _) = setup();
    let result = family_queries::family_view(&conn, "nobody");
    assert!(matches!(result, Err(KinError::NotFound { .. })));
}

#[test]
fn family_view_excludes_removed_members_but_keeps_live_edges() {
    let (conn, _) = setup();
    let alice = member_ops::add_member(
        &conn,
        "alice",
        MemberDraft::with_gender("Alice", Gender::Female),
        None,
        None,
    )
    .unwrap();
    let bob = member_ops::add_member(
        &conn,
        "alice",
        MemberDraft::with_gender("Bob", Gender::Male),
        Some(alice.id),
        Some("spouse"),
    )
    .unwrap();
    let carl = member_ops::add_member(
        &conn,
        "alice",
        MemberDraft::new("Carl"),
        Some(alice.id),
        Some("child"),
    )
    .unwrap();

    member_ops::remove_member(&conn, "alice", bob.id).unwrap();

    let view = family_queries::family_view(&conn, "alice").unwrap();
    assert_eq!(view.members.len(), 2);
    assert!(!view.members.iter().any(|m| m.id == bob.id));
    // The Alice->Carl CHILD edge survives; everything touching Bob is gone.
    assert_eq!(view.relationships.len(), 1);
    assert_eq!(view.relationships[0].kind, EdgeKind::Child);
    assert_eq!(view.relationships[0].to_id, carl.id);
}

#[test]
fn get_family_returns_none_for_unknown_key() {
    let (conn, _) = setup();
    assert!(family_queries::get_family(&conn, "nobody").unwrap().is_none());
    assert!(family_queries::get_family(&conn, "alice").unwrap().is_some());
}

#[test]
fn active_members_excludes_removed() {
    let (conn, family) = setup();
    let alice =
        member_ops::add_member(&conn, "alice", MemberDraft::new("Alice"), None, None).unwrap();
    let bob = member_ops::add_member(
        &conn,
        "alice",
        MemberDraft::new("Bob"),
        Some(alice.id),
        Some("spouse"),
    )
    .unwrap();

    member_ops::remove_member(&conn, "alice", bob.id).unwrap();

    let active = person_queries::active_members(&conn, family.id).unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, alice.id);

    let removed = person_queries::removed_members(&conn, family.id).unwrap();
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].id, bob.id);
}

#[test]
fn find_by_name_is_case_insensitive_and_checks_nickname() {
    let (conn, family) = setup();
    member_ops::add_member(&conn, "alice", MemberDraft::new("Alice Smith"), None, None).unwrap();

    let mut draft = MemberDraft::new("Robert Smith");
    draft.nick_name = Some("Bob".into());
    let alice = person_queries::find_by_name(&conn, family.id, "alice smith").unwrap();
    member_ops::add_member(&conn, "alice", draft, Some(alice[0].id), Some("spouse")).unwrap();

    let hits = person_queries::find_by_name(&conn, family.id, "BOB").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].full_name, "Robert Smith");

    let hits = person_queries::find_by_name(&conn, family.id, "smith").unwrap();
    assert_eq!(hits.len(), 2);
}

#[test]
fn get_member_roundtrip() {
    let (conn, _) = setup();
    let alice =
        member_ops::add_member(&conn, "alice", MemberDraft::new("Alice"), None, None).unwrap();

    let found = person_queries::get_member(&conn, alice.id).unwrap().unwrap();
    assert_eq!(found.full_name, "Alice");
    assert!(person_queries::get_member(&conn, Id::generate()).unwrap().is_none());
}

#[test]
fn family_view_serializes_to_json() {
    let (conn, _) = setup();
    member_ops::add_member(&conn, "alice", MemberDraft::new("Alice"), None, None).unwrap();

    let view = family_queries::family_view(&conn, "alice").unwrap();
    let json = serde_json::to_string(&view).unwrap();
    assert!(json.contains("\"Smiths\""));
    assert!(json.contains("\"Alice\""));
}
