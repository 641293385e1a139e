use rusqlite::Connection;
use serde::Serialize;

use crate::db::{family_repo, person_repo};
use crate::error::{KinError, KinResult};
use crate::model::{Edge, Family, Person};

/// A family hydrated for presentation: the record itself, its active
/// members, and the relationship log.
#[derive(Debug, Clone, Serialize)]
pub struct FamilyView {
    pub family: Family,
    pub members: Vec<Person>,
    pub relationships: Vec<Edge>,
}

pub fn family_view(conn: &Connection, family_key: &str) -> KinResult<FamilyView> {
    let family = family_repo::find_by_key(conn, family_key)?
        .ok_or_else(|| KinError::not_found("Family", family_key))?;

    let members = person_repo::find_active_by_family(conn, family.id)?;
    let relationships = family_repo::edges_for_family(conn, family.id)?;

    Ok(FamilyView {
        family,
        members,
        relationships,
    })
}

pub fn get_family(conn: &Connection, family_key: &str) -> KinResult<Option<Family>> {
    family_repo::find_by_key(conn, family_key)
}
