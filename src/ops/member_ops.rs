use rusqlite::Connection;

use crate::db::{family_repo, person_repo};
use crate::error::{KinError, KinResult};
use crate::model::{
    family::parent_slot, AttachKind, Edge, EdgeKind, Family, Gender, Id, Kinship, MemberDraft,
    Person,
};
use crate::validation::{self, trim_optional};

/// Adds a member to the family identified by `family_key` and, when an
/// anchor and relationship are supplied, wires the new member into the
/// kinship graph. The first member added becomes the family's root node.
///
/// Anchor and relation must arrive together; a lone anchor (or a lone
/// relation) adds an unconnected member. Every write happens inside one
/// transaction, so the person record, the parent links, and the
/// relationship log cannot diverge mid-operation.
pub fn add_member(
    conn: &Connection,
    family_key: &str,
    draft: MemberDraft,
    anchor_id: Option<Id<Person>>,
    relation: Option<&str>,
) -> KinResult<Person> {
    let family = family_repo::find_by_key(conn, family_key)?
        .ok_or_else(|| KinError::not_found("Family", family_key))?;

    // Reject an unknown relationship before anything is written.
    let attach = match (anchor_id, relation) {
        (Some(anchor), Some(value)) => {
            let kind = AttachKind::parse(value).ok_or_else(|| KinError::InvalidRelationship {
                value: value.to_string(),
            })?;
            Some((anchor, kind))
        }
        _ => None,
    };

    let full_name = validation::non_blank(&draft.full_name, "fullName")?;
    let first_member = family.member_ids.is_empty();

    let tx = conn.unchecked_transaction()?;

    let mut person = Person::create(full_name, draft.gender.unwrap_or(Gender::Other));
    apply_draft(&mut person, &draft);
    person.location = draft
        .location
        .unwrap_or(family.member_ids.len() as i32);

    person_repo::insert(&tx, family.id, &person)?;

    if let Some((anchor, kind)) = attach {
        attach_member(&tx, &family, &mut person, anchor, kind)?;
        person_repo::update(&tx, &person)?;
    }

    if first_member {
        let mut root = family.root.clone();
        root.person_id = Some(person.id);
        root.location = person.location;
        family_repo::update_root(&tx, family.id, &root)?;
    }

    tx.commit()?;

    log::info!(
        "Member added: {} to family: {}",
        person.full_name,
        family.name
    );

    Ok(person)
}

/// Wires the freshly created member and the anchor together according to
/// the requested relationship. The anchor (and, for a child attach, its
/// spouse) is persisted here; the caller persists the new member.
fn attach_member(
    conn: &Connection,
    family: &Family,
    new: &mut Person,
    anchor_id: Id<Person>,
    kind: AttachKind,
) -> KinResult<()> {
    let mut anchor = person_repo::find_by_id(conn, anchor_id)?
        .ok_or_else(|| KinError::not_found("Member", anchor_id))?;

    match kind {
        AttachKind::Child => {
            // New member is a child of the anchor.
            anchor.kinship.add_child(new.id);
            new.kinship.add_parent(anchor.id);
            set_parent_slot(new, &anchor);
            family_repo::append_edge(
                conn,
                family.id,
                &Edge::create(anchor.id, new.id, EdgeKind::Child),
            )?;

            // A child of one half of a spousal pair is a child of both.
            if let Some(spouse_id) = anchor.kinship.spouse_id {
                if let Some(mut spouse) = person_repo::find_by_id(conn, spouse_id)? {
                    spouse.kinship.add_child(new.id);
                    new.kinship.add_parent(spouse.id);
                    set_parent_slot(new, &spouse);
                    let edge_kind = if spouse.gender == Gender::Female {
                        EdgeKind::Mother
                    } else {
                        EdgeKind::Father
                    };
                    family_repo::append_edge(
                        conn,
                        family.id,
                        &Edge::create(spouse.id, new.id, edge_kind),
                    )?;
                    person_repo::update(conn, &spouse)?;
                }
            }
        }
        AttachKind::Mother => {
            // New member is the anchor's mother.
            new.kinship.add_child(anchor.id);
            anchor.kinship.add_parent(new.id);
            anchor.kinship.mother_id = Some(new.id);
            family_repo::append_edge(
                conn,
                family.id,
                &Edge::create(new.id, anchor.id, EdgeKind::Mother),
            )?;
        }
        AttachKind::Father => {
            // New member is the anchor's father.
            new.kinship.add_child(anchor.id);
            anchor.kinship.add_parent(new.id);
            anchor.kinship.father_id = Some(new.id);
            family_repo::append_edge(
                conn,
                family.id,
                &Edge::create(new.id, anchor.id, EdgeKind::Father),
            )?;
        }
        AttachKind::Parent => {
            // Generic parent: the slot follows the new member's gender.
            // Other defaults to the father slot.
            new.kinship.add_child(anchor.id);
            anchor.kinship.add_parent(new.id);
            let edge_kind = match new.gender {
                Gender::Female => {
                    anchor.kinship.mother_id = Some(new.id);
                    EdgeKind::Mother
                }
                Gender::Male | Gender::Other => {
                    anchor.kinship.father_id = Some(new.id);
                    EdgeKind::Father
                }
            };
            family_repo::append_edge(
                conn,
                family.id,
                &Edge::create(new.id, anchor.id, edge_kind),
            )?;
        }
        AttachKind::Spouse => {
            anchor.kinship.spouse_id = Some(new.id);
            new.kinship.spouse_id = Some(anchor.id);
            family_repo::append_edge(
                conn,
                family.id,
                &Edge::create(anchor.id, new.id, EdgeKind::Spouse),
            )?;
            family_repo::append_edge(
                conn,
                family.id,
                &Edge::create(new.id, anchor.id, EdgeKind::Spouse),
            )?;
        }
    }

    person_repo::update(conn, &anchor)?;
    Ok(())
}

/// Points the child's mother/father slot at the parent, by the parent's
/// gender. Other fills neither slot on this path.
fn set_parent_slot(child: &mut Person, parent: &Person) {
    match parent_slot(parent.gender) {
        Some(EdgeKind::Mother) => child.kinship.mother_id = Some(parent.id),
        Some(EdgeKind::Father) => child.kinship.father_id = Some(parent.id),
        _ => {}
    }
}

/// Removes a member: soft-deletes the person, unwinds every pointer and
/// log edge that references them, then runs one orphan-pruning pass over
/// the survivors. Removing an unknown or already-removed member fails
/// with NotFound.
pub fn remove_member(conn: &Connection, family_key: &str, person_id: Id<Person>) -> KinResult<()> {
    let family = family_repo::find_by_key(conn, family_key)?
        .ok_or_else(|| KinError::not_found("Family", family_key))?;

    let mut person = person_repo::find_by_id(conn, person_id)?
        .ok_or_else(|| KinError::not_found("Member", person_id))?;
    if !person.active || !family.member_ids.contains(&person_id) {
        return Err(KinError::not_found("Member", person_id));
    }

    let tx = conn.unchecked_transaction()?;

    // Soft delete: profile data is retained, pointers are cleared so no
    // derived link can resolve to this member again.
    person.active = false;
    person.kinship = Kinship::default();
    person_repo::update(&tx, &person)?;

    family_repo::delete_edges_for(&tx, family.id, person_id)?;

    let mut members = person_repo::find_active_by_family(&tx, family.id)?;
    for member in &mut members {
        if member.kinship.sever(person_id) {
            person_repo::update(&tx, member)?;
        }
    }

    prune_orphans(&tx, &family)?;

    tx.commit()?;

    log::info!(
        "Member removed: {} from family: {}",
        person.full_name,
        family.name
    );

    Ok(())
}

/// Single pruning pass, no recursion: every active member left without a
/// live link to another active member is soft-deleted, unless the family
/// is down to one active member. Running the pass again on a stable
/// graph removes nothing. Returns the pruned ids.
pub fn prune_orphans(conn: &Connection, family: &Family) -> KinResult<Vec<Id<Person>>> {
    let mut members = person_repo::find_active_by_family(conn, family.id)?;
    let active: Vec<Id<Person>> = members.iter().map(|m| m.id).collect();
    if active.len() <= 1 {
        return Ok(Vec::new());
    }

    let orphans: Vec<Id<Person>> = members
        .iter()
        .filter(|m| is_orphan(m, &active))
        .map(|m| m.id)
        .collect();
    for member in &mut members {
        if orphans.contains(&member.id) {
            member.active = false;
            person_repo::update(conn, member)?;
            log::info!(
                "Orphaned member pruned: {} from family: {}",
                member.full_name,
                family.name
            );
        }
    }

    Ok(orphans)
}

/// A member is orphaned when none of its spouse, children, or parents
/// resolve to another currently-active member.
fn is_orphan(member: &Person, active: &[Id<Person>]) -> bool {
    let kinship = &member.kinship;
    let linked = kinship
        .spouse_id
        .map_or(false, |spouse| active.contains(&spouse))
        || kinship.children_ids.iter().any(|c| active.contains(c))
        || kinship.parent_ids.iter().any(|p| active.contains(p));
    !linked
}

/// Profile-only update of an existing member; kinship is untouched.
pub fn update_member(
    conn: &Connection,
    person_id: Id<Person>,
    draft: MemberDraft,
) -> KinResult<Person> {
    let mut person = person_repo::find_by_id(conn, person_id)?
        .ok_or_else(|| KinError::not_found("Member", person_id))?;

    person.full_name = validation::non_blank(&draft.full_name, "fullName")?;
    if let Some(gender) = draft.gender {
        person.gender = gender;
    }
    if let Some(location) = draft.location {
        person.location = location;
    }
    apply_draft(&mut person, &draft);

    person_repo::update(conn, &person)?;

    log::info!("Member updated: {}", person.full_name);

    Ok(person)
}

fn apply_draft(person: &mut Person, draft: &MemberDraft) {
    person.nick_name = trim_optional(draft.nick_name.as_deref());
    person.mobile = trim_optional(draft.mobile.as_deref());
    person.email = trim_optional(draft.email.as_deref());
    // The media collaborator owns this URL; it is stored untouched.
    person.image_url = draft.image_url.clone();
    person.bio = trim_optional(draft.bio.as_deref());
    person.blood_group = trim_optional(draft.blood_group.as_deref());
    person.birth_day = draft.birth_day;
    person.marriage_anniversary = draft.marriage_anniversary;
    person.job = trim_optional(draft.job.as_deref());
    person.education = trim_optional(draft.education.as_deref());
    person.death_anniversary = draft.death_anniversary;
}
