use kintree::db::*;
use kintree::model::*;

fn setup() -> (rusqlite::Connection, Account, Family) {
    let conn = schema::test_connection();

    let account = Account::create("alice".into(), "hash".into());
    account_repo::insert(&conn, &account).unwrap();

    let family = Family::create("Smiths".into(), "alice".into());
    family_repo::insert(&conn, &family).unwrap();

    (conn, account, family)
}

// ==========================================================================
// ACCOUNT REPO TESTS
// ==========================================================================

#[test]
fn account_insert_and_find() {
    let (conn, account, _) = setup();

    let found = account_repo::find_by_username(&conn, "alice").unwrap().unwrap();
    assert_eq!(found.id, account.id);
    assert_eq!(found.username, "alice");
    assert_eq!(found.family_name, None);
}

#[test]
fn account_find_unknown_returns_none() {
    let (conn, _, _) = setup();
    assert!(account_repo::find_by_username(&conn, "bob").unwrap().is_none());
}

#[test]
fn account_update_persists_family_name() {
    let (conn, mut account, _) = setup();

    account.family_name = Some("Smiths".into());
    account_repo::update(&conn, &account).unwrap();

    let found = account_repo::find_by_username(&conn, "alice").unwrap().unwrap();
    assert_eq!(found.family_name, Some("Smiths".into()));
}

#[test]
fn account_exists_checks() {
    let (conn, mut account, _) = setup();

    assert!(account_repo::username_exists(&conn, "alice").unwrap());
    assert!(!account_repo::username_exists(&conn, "bob").unwrap());

    account.email = Some("alice@example.com".into());
    account.mobile = Some("555-1234".into());
    account_repo::update(&conn, &account).unwrap();

    assert!(account_repo::email_exists(&conn, "alice@example.com").unwrap());
    assert!(!account_repo::email_exists(&conn, "bob@example.com").unwrap());
    assert!(account_repo::mobile_exists(&conn, "555-1234").unwrap());
    assert!(!account_repo::mobile_exists(&conn, "555-0000").unwrap());
}

#[test]
fn account_duplicate_username_rejected_by_index() {
    let (conn, _, _) = setup();
    let dup = Account::create("alice".into(), "other".into());
    assert!(account_repo::insert(&conn, &dup).is_err());
}

// ==========================================================================
// FAMILY REPO TESTS
// ==========================================================================

#[test]
fn family_insert_and_find_by_key() {
    let (conn, _, family) = setup();

    let found = family_repo::find_by_key(&conn, "alice").unwrap().unwrap();
    assert_eq!(found.id, family.id);
    assert_eq!(found.name, "Smiths");
    assert!(found.member_ids.is_empty());
    assert!(found.root.person_id.is_none());
}

#[test]
fn family_key_exists() {
    let (conn, _, _) = setup();
    assert!(family_repo::key_exists(&conn, "alice").unwrap());
    assert!(!family_repo::key_exists(&conn, "bob").unwrap());
}

#[test]
fn family_duplicate_key_rejected_by_index() {
    let (conn, _, _) = setup();
    let dup = Family::create("Others".into(), "alice".into());
    assert!(family_repo::insert(&conn, &dup).is_err());
}

#[test]
fn family_update_name() {
    let (conn, _, family) = setup();
    family_repo::update_name(&conn, family.id, "Smith-Jones").unwrap();
    let found = family_repo::find_by_key(&conn, "alice").unwrap().unwrap();
    assert_eq!(found.name, "Smith-Jones");
}

#[test]
fn family_root_node_roundtrip() {
    let (conn, _, family) = setup();

    let mut root = family.root.clone();
    let person_id = Id::generate();
    root.person_id = Some(person_id);
    root.location = 2;
    family_repo::update_root(&conn, family.id, &root).unwrap();

    let found = family_repo::find_by_key(&conn, "alice").unwrap().unwrap();
    assert_eq!(found.root.person_id, Some(person_id));
    assert_eq!(found.root.location, 2);
}

#[test]
fn family_member_ids_track_active_people() {
    let (conn, _, family) = setup();

    let alice = Person::create("Alice".into(), Gender::Female);
    person_repo::insert(&conn, family.id, &alice).unwrap();

    let mut bob = Person::create("Bob".into(), Gender::Male);
    bob.active = false;
    person_repo::insert(&conn, family.id, &bob).unwrap();

    let found = family_repo::find_by_key(&conn, "alice").unwrap().unwrap();
    assert_eq!(found.member_ids, vec![alice.id]);
}

// ==========================================================================
// PERSON REPO TESTS
// ==========================================================================

#[test]
fn person_insert_and_find() {
    let (conn, _, family) = setup();

    let mut alice = Person::create("Alice".into(), Gender::Female);
    alice.bio = Some("Matriarch".into());
    person_repo::insert(&conn, family.id, &alice).unwrap();

    let found = person_repo::find_by_id(&conn, alice.id).unwrap().unwrap();
    assert_eq!(found.full_name, "Alice");
    assert_eq!(found.gender, Gender::Female);
    assert_eq!(found.bio, Some("Matriarch".into()));
    assert!(found.active);
}

#[test]
fn person_find_unknown_returns_none() {
    let (conn, _, _) = setup();
    assert!(person_repo::find_by_id(&conn, Id::generate()).unwrap().is_none());
}

#[test]
fn person_update_profile_and_pointers() {
    let (conn, _, family) = setup();

    let mut alice = Person::create("Alice".into(), Gender::Female);
    person_repo::insert(&conn, family.id, &alice).unwrap();
    let bob = Person::create("Bob".into(), Gender::Male);
    person_repo::insert(&conn, family.id, &bob).unwrap();

    alice.nick_name = Some("Ali".into());
    alice.kinship.spouse_id = Some(bob.id);
    person_repo::update(&conn, &alice).unwrap();

    let found = person_repo::find_by_id(&conn, alice.id).unwrap().unwrap();
    assert_eq!(found.nick_name, Some("Ali".into()));
    assert_eq!(found.kinship.spouse_id, Some(bob.id));
}

#[test]
fn parent_links_hydrate_in_both_directions() {
    let (conn, _, family) = setup();

    let alice = Person::create("Alice".into(), Gender::Female);
    person_repo::insert(&conn, family.id, &alice).unwrap();

    let mut carl = Person::create("Carl".into(), Gender::Male);
    carl.kinship.add_parent(alice.id);
    carl.kinship.mother_id = Some(alice.id);
    person_repo::insert(&conn, family.id, &carl).unwrap();

    let carl = person_repo::find_by_id(&conn, carl.id).unwrap().unwrap();
    assert_eq!(carl.kinship.parent_ids, vec![alice.id]);
    assert_eq!(carl.kinship.mother_id, Some(alice.id));

    // The parent side sees the child through the same join rows.
    let alice = person_repo::find_by_id(&conn, alice.id).unwrap().unwrap();
    assert_eq!(alice.kinship.children_ids, vec![carl.id]);
}

#[test]
fn person_find_active_and_inactive() {
    let (conn, _, family) = setup();

    let alice = Person::create("Alice".into(), Gender::Female);
    person_repo::insert(&conn, family.id, &alice).unwrap();

    let mut bob = Person::create("Bob".into(), Gender::Male);
    bob.active = false;
    person_repo::insert(&conn, family.id, &bob).unwrap();

    let active = person_repo::find_active_by_family(&conn, family.id).unwrap();
    let inactive = person_repo::find_inactive_by_family(&conn, family.id).unwrap();

    assert_eq!(active.len(), 1);
    assert_eq!(active[0].full_name, "Alice");
    assert_eq!(inactive.len(), 1);
    assert_eq!(inactive[0].full_name, "Bob");
}

#[test]
fn person_find_by_name_matches_name_and_nickname() {
    let (conn, _, family) = setup();

    let alice = Person::create("Alice Smith".into(), Gender::Female);
    person_repo::insert(&conn, family.id, &alice).unwrap();

    let mut bob = Person::create("Bob Jones".into(), Gender::Male);
    bob.nick_name = Some("Smithy".into());
    person_repo::insert(&conn, family.id, &bob).unwrap();

    let matches = person_repo::find_by_name(&conn, family.id, "smith").unwrap();
    assert_eq!(matches.len(), 2);

    let matches = person_repo::find_by_name(&conn, family.id, "jones").unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].full_name, "Bob Jones");
}

#[test]
fn person_count_active() {
    let (conn, _, family) = setup();
    assert_eq!(person_repo::count_active(&conn, family.id).unwrap(), 0);

    let alice = Person::create("Alice".into(), Gender::Female);
    person_repo::insert(&conn, family.id, &alice).unwrap();
    assert_eq!(person_repo::count_active(&conn, family.id).unwrap(), 1);
}

// ==========================================================================
// EDGE LOG TESTS
// ==========================================================================

#[test]
fn edges_append_and_list() {
    let (conn, _, family) = setup();
    let a = Id::generate();
    let b = Id::generate();

    family_repo::append_edge(&conn, family.id, &Edge::create(a, b, EdgeKind::Spouse)).unwrap();
    family_repo::append_edge(&conn, family.id, &Edge::create(b, a, EdgeKind::Spouse)).unwrap();

    let edges = family_repo::edges_for_family(&conn, family.id).unwrap();
    assert_eq!(edges.len(), 2);
    assert!(edges.iter().all(|e| e.kind == EdgeKind::Spouse));
}

#[test]
fn edges_delete_for_person_removes_both_sides() {
    let (conn, _, family) = setup();
    let a = Id::generate();
    let b = Id::generate();
    let c = Id::generate();

    family_repo::append_edge(&conn, family.id, &Edge::create(a, b, EdgeKind::Child)).unwrap();
    family_repo::append_edge(&conn, family.id, &Edge::create(b, a, EdgeKind::Spouse)).unwrap();
    family_repo::append_edge(&conn, family.id, &Edge::create(a, c, EdgeKind::Child)).unwrap();

    let deleted = family_repo::delete_edges_for(&conn, family.id, b).unwrap();
    assert_eq!(deleted, 2);

    let edges = family_repo::edges_for_family(&conn, family.id).unwrap();
    assert_eq!(edges.len(), 1);
    assert!(!edges.iter().any(|e| e.touches(b)));
}

#[test]
fn edges_for_person_filters() {
    let (conn, _, family) = setup();
    let a = Id::generate();
    let b = Id::generate();
    let c = Id::generate();

    family_repo::append_edge(&conn, family.id, &Edge::create(a, b, EdgeKind::Child)).unwrap();
    family_repo::append_edge(&conn, family.id, &Edge::create(a, c, EdgeKind::Child)).unwrap();

    let edges = family_repo::edges_for_person(&conn, family.id, b).unwrap();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].to_id, b);
}
