use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::error::{KinError, KinResult};
use crate::model::{Edge, EdgeKind, Family, FamilyNode, Id, Person};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

pub fn insert(conn: &Connection, family: &Family) -> KinResult<()> {
    conn.execute(
        "INSERT INTO families (id, name, family_key, root_node) VALUES (?1, ?2, ?3, ?4)",
        params![
            family.id.value.to_string(),
            family.name,
            family.family_key,
            serde_json::to_string(&family.root)?,
        ],
    )?;
    Ok(())
}

pub fn find_by_key(conn: &Connection, family_key: &str) -> KinResult<Option<Family>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, family_key, root_node FROM families WHERE family_key = ?1",
    )?;

    let result = stmt.query_row(params![family_key], |row| {
        let id_str: String = row.get(0)?;
        let name: String = row.get(1)?;
        let key: String = row.get(2)?;
        let root_json: String = row.get(3)?;
        Ok((id_str, name, key, root_json))
    });

    match result {
        Ok((id_str, name, key, root_json)) => {
            let id = Id::new(
                Uuid::parse_str(&id_str)
                    .map_err(|e| KinError::Other(format!("Invalid UUID: {}", e)))?,
            );
            let root: FamilyNode = serde_json::from_str(&root_json)?;
            let member_ids = super::person_repo::active_ids(conn, id)?;
            Ok(Some(Family {
                id,
                name,
                family_key: key,
                root,
                member_ids,
            }))
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn key_exists(conn: &Connection, family_key: &str) -> KinResult<bool> {
    let mut stmt = conn.prepare("SELECT 1 FROM families WHERE family_key = ?1")?;
    let result = stmt.query_row(params![family_key], |_| Ok(()));
    match result {
        Ok(()) => Ok(true),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

pub fn update_name(conn: &Connection, family_id: Id<Family>, name: &str) -> KinResult<()> {
    conn.execute(
        "UPDATE families SET name = ?1, updated_at = datetime('now') WHERE id = ?2",
        params![name, family_id.value.to_string()],
    )?;
    Ok(())
}

pub fn update_root(conn: &Connection, family_id: Id<Family>, root: &FamilyNode) -> KinResult<()> {
    conn.execute(
        "UPDATE families SET root_node = ?1, updated_at = datetime('now') WHERE id = ?2",
        params![serde_json::to_string(root)?, family_id.value.to_string()],
    )?;
    Ok(())
}

pub fn append_edge(conn: &Connection, family_id: Id<Family>, edge: &Edge) -> KinResult<()> {
    conn.execute(
        "INSERT INTO relationship_edges (id, family_id, from_id, to_id, kind, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            edge.id.value.to_string(),
            family_id.value.to_string(),
            edge.from_id.value.to_string(),
            edge.to_id.value.to_string(),
            edge.kind.as_str(),
            edge.created_at.format(TIMESTAMP_FORMAT).to_string(),
        ],
    )?;
    Ok(())
}

/// Deletes every log edge that references `person_id` on either side.
pub fn delete_edges_for(
    conn: &Connection,
    family_id: Id<Family>,
    person_id: Id<Person>,
) -> KinResult<usize> {
    let deleted = conn.execute(
        "DELETE FROM relationship_edges
         WHERE family_id = ?1 AND (from_id = ?2 OR to_id = ?2)",
        params![family_id.value.to_string(), person_id.value.to_string()],
    )?;
    Ok(deleted)
}

pub fn edges_for_family(conn: &Connection, family_id: Id<Family>) -> KinResult<Vec<Edge>> {
    let mut stmt = conn.prepare(
        "SELECT id, from_id, to_id, kind, created_at FROM relationship_edges
         WHERE family_id = ?1 ORDER BY created_at, id",
    )?;

    let rows = stmt
        .query_map(params![family_id.value.to_string()], |row| {
            let id_str: String = row.get(0)?;
            let from_str: String = row.get(1)?;
            let to_str: String = row.get(2)?;
            let kind_str: String = row.get(3)?;
            let created_str: String = row.get(4)?;
            Ok((id_str, from_str, to_str, kind_str, created_str))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(id_str, from_str, to_str, kind_str, created_str)| {
            Ok(Edge {
                id: parse_id(&id_str)?,
                from_id: parse_id(&from_str)?,
                to_id: parse_id(&to_str)?,
                kind: EdgeKind::parse(&kind_str)
                    .ok_or_else(|| KinError::Other(format!("Invalid edge kind: {}", kind_str)))?,
                created_at: NaiveDateTime::parse_from_str(&created_str, TIMESTAMP_FORMAT)
                    .map_err(|e| KinError::Other(format!("Invalid timestamp: {}", e)))?,
            })
        })
        .collect()
}

pub fn edges_for_person(
    conn: &Connection,
    family_id: Id<Family>,
    person_id: Id<Person>,
) -> KinResult<Vec<Edge>> {
    let edges = edges_for_family(conn, family_id)?;
    Ok(edges.into_iter().filter(|e| e.touches(person_id)).collect())
}

fn parse_id<T>(s: &str) -> KinResult<Id<T>> {
    Ok(Id::new(Uuid::parse_str(s).map_err(|e| {
        KinError::Other(format!("Invalid UUID: {}", e))
    })?))
}
