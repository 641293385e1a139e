use rusqlite::Connection;

use crate::db::person_repo;
use crate::error::KinResult;
use crate::model::{Family, Id, Person};

pub fn active_members(conn: &Connection, family_id: Id<Family>) -> KinResult<Vec<Person>> {
    person_repo::find_active_by_family(conn, family_id)
}

pub fn removed_members(conn: &Connection, family_id: Id<Family>) -> KinResult<Vec<Person>> {
    person_repo::find_inactive_by_family(conn, family_id)
}

pub fn find_by_name(
    conn: &Connection,
    family_id: Id<Family>,
    query: &str,
) -> KinResult<Vec<Person>> {
    person_repo::find_by_name(conn, family_id, query)
}

pub fn get_member(conn: &Connection, person_id: Id<Person>) -> KinResult<Option<Person>> {
    person_repo::find_by_id(conn, person_id)
}
