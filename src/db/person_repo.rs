use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::error::{KinError, KinResult};
use crate::model::{Family, Gender, Id, Kinship, Person};

const PERSON_COLUMNS: &str = "id, full_name, nick_name, mobile, email, image_url, bio, gender, \
     blood_group, birth_day, marriage_anniversary, job, education, death_anniversary, \
     location, active, spouse_id, mother_id, father_id";

pub fn insert(conn: &Connection, family_id: Id<Family>, person: &Person) -> KinResult<()> {
    conn.execute(
        "INSERT INTO people (id, family_id, full_name, nick_name, mobile, email, image_url,
         bio, gender, blood_group, birth_day, marriage_anniversary, job, education,
         death_anniversary, location, active, spouse_id, mother_id, father_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)",
        params![
            person.id.value.to_string(),
            family_id.value.to_string(),
            person.full_name,
            person.nick_name,
            person.mobile,
            person.email,
            person.image_url,
            person.bio,
            person.gender.as_str(),
            person.blood_group,
            person.birth_day.map(|d| d.to_string()),
            person.marriage_anniversary.map(|d| d.to_string()),
            person.job,
            person.education,
            person.death_anniversary.map(|d| d.to_string()),
            person.location,
            person.active as i32,
            person.kinship.spouse_id.map(|id| id.value.to_string()),
            person.kinship.mother_id.map(|id| id.value.to_string()),
            person.kinship.father_id.map(|id| id.value.to_string()),
        ],
    )?;
    sync_parent_rows(conn, person)?;
    Ok(())
}

pub fn update(conn: &Connection, person: &Person) -> KinResult<()> {
    conn.execute(
        "UPDATE people SET full_name = ?1, nick_name = ?2, mobile = ?3, email = ?4,
         image_url = ?5, bio = ?6, gender = ?7, blood_group = ?8, birth_day = ?9,
         marriage_anniversary = ?10, job = ?11, education = ?12, death_anniversary = ?13,
         location = ?14, active = ?15, spouse_id = ?16, mother_id = ?17, father_id = ?18,
         updated_at = datetime('now')
         WHERE id = ?19",
        params![
            person.full_name,
            person.nick_name,
            person.mobile,
            person.email,
            person.image_url,
            person.bio,
            person.gender.as_str(),
            person.blood_group,
            person.birth_day.map(|d| d.to_string()),
            person.marriage_anniversary.map(|d| d.to_string()),
            person.job,
            person.education,
            person.death_anniversary.map(|d| d.to_string()),
            person.location,
            person.active as i32,
            person.kinship.spouse_id.map(|id| id.value.to_string()),
            person.kinship.mother_id.map(|id| id.value.to_string()),
            person.kinship.father_id.map(|id| id.value.to_string()),
            person.id.value.to_string(),
        ],
    )?;
    sync_parent_rows(conn, person)?;
    Ok(())
}

/// The parent join table is the single source of truth for parent/child
/// links; rewrite this person's parent rows from their in-memory record.
fn sync_parent_rows(conn: &Connection, person: &Person) -> KinResult<()> {
    conn.execute(
        "DELETE FROM person_parents WHERE person_id = ?1",
        params![person.id.value.to_string()],
    )?;
    for parent_id in &person.kinship.parent_ids {
        conn.execute(
            "INSERT OR IGNORE INTO person_parents (person_id, parent_id) VALUES (?1, ?2)",
            params![person.id.value.to_string(), parent_id.value.to_string()],
        )?;
    }
    Ok(())
}

pub fn find_by_id(conn: &Connection, id: Id<Person>) -> KinResult<Option<Person>> {
    let sql = format!("SELECT {} FROM people WHERE id = ?1", PERSON_COLUMNS);
    let mut stmt = conn.prepare(&sql)?;

    let result = stmt.query_row(params![id.value.to_string()], |row| Ok(row_to_person(row)));

    match result {
        Ok(person) => {
            let mut person = person?;
            hydrate_parent_links(conn, &mut person)?;
            Ok(Some(person))
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn find_active_by_family(conn: &Connection, family_id: Id<Family>) -> KinResult<Vec<Person>> {
    find_by_family(conn, family_id, true)
}

pub fn find_inactive_by_family(conn: &Connection, family_id: Id<Family>) -> KinResult<Vec<Person>> {
    find_by_family(conn, family_id, false)
}

fn find_by_family(conn: &Connection, family_id: Id<Family>, active: bool) -> KinResult<Vec<Person>> {
    let sql = format!(
        "SELECT {} FROM people WHERE family_id = ?1 AND active = ?2
         ORDER BY location, full_name",
        PERSON_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;

    let mut people = stmt
        .query_map(
            params![family_id.value.to_string(), active as i32],
            |row| Ok(row_to_person(row)),
        )?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    for person in &mut people {
        hydrate_parent_links(conn, person)?;
    }
    Ok(people)
}

pub fn find_by_name(
    conn: &Connection,
    family_id: Id<Family>,
    query: &str,
) -> KinResult<Vec<Person>> {
    let pattern = format!("%{}%", query.to_lowercase());
    let sql = format!(
        "SELECT {} FROM people WHERE family_id = ?1 AND active = 1
         AND (LOWER(full_name) LIKE ?2 OR LOWER(COALESCE(nick_name, '')) LIKE ?2)
         ORDER BY location, full_name",
        PERSON_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;

    let mut people = stmt
        .query_map(params![family_id.value.to_string(), pattern], |row| {
            Ok(row_to_person(row))
        })?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    for person in &mut people {
        hydrate_parent_links(conn, person)?;
    }
    Ok(people)
}

pub fn count_active(conn: &Connection, family_id: Id<Family>) -> KinResult<i64> {
    let mut stmt =
        conn.prepare("SELECT COUNT(*) FROM people WHERE family_id = ?1 AND active = 1")?;
    let count: i64 = stmt.query_row(params![family_id.value.to_string()], |row| row.get(0))?;
    Ok(count)
}

pub fn active_ids(conn: &Connection, family_id: Id<Family>) -> KinResult<Vec<Id<Person>>> {
    let mut stmt = conn.prepare(
        "SELECT id FROM people WHERE family_id = ?1 AND active = 1
         ORDER BY location, full_name",
    )?;
    let ids = stmt
        .query_map(params![family_id.value.to_string()], |row| {
            row.get::<_, String>(0)
        })?
        .collect::<Result<Vec<_>, _>>()?;

    ids.iter().map(|s| parse_person_id(s)).collect()
}

/// Fill parent_ids from the join table and children_ids from its reverse
/// direction.
fn hydrate_parent_links(conn: &Connection, person: &mut Person) -> KinResult<()> {
    let mut stmt =
        conn.prepare("SELECT parent_id FROM person_parents WHERE person_id = ?1")?;
    let parents = stmt
        .query_map(params![person.id.value.to_string()], |row| {
            row.get::<_, String>(0)
        })?
        .collect::<Result<Vec<_>, _>>()?;
    person.kinship.parent_ids = parents
        .iter()
        .map(|s| parse_person_id(s))
        .collect::<KinResult<Vec<_>>>()?;

    let mut stmt =
        conn.prepare("SELECT person_id FROM person_parents WHERE parent_id = ?1")?;
    let children = stmt
        .query_map(params![person.id.value.to_string()], |row| {
            row.get::<_, String>(0)
        })?
        .collect::<Result<Vec<_>, _>>()?;
    person.kinship.children_ids = children
        .iter()
        .map(|s| parse_person_id(s))
        .collect::<KinResult<Vec<_>>>()?;

    Ok(())
}

fn parse_person_id(s: &str) -> KinResult<Id<Person>> {
    Ok(Id::new(Uuid::parse_str(s).map_err(|e| {
        KinError::Other(format!("Invalid UUID: {}", e))
    })?))
}

fn row_to_person(row: &rusqlite::Row) -> KinResult<Person> {
    let id_str: String = row.get(0).map_err(rusqlite::Error::from)?;
    let gender_str: String = row.get(7).map_err(rusqlite::Error::from)?;
    let birth_day: Option<String> = row.get(9).map_err(rusqlite::Error::from)?;
    let marriage_anniversary: Option<String> = row.get(10).map_err(rusqlite::Error::from)?;
    let death_anniversary: Option<String> = row.get(13).map_err(rusqlite::Error::from)?;
    let spouse_id: Option<String> = row.get(16).map_err(rusqlite::Error::from)?;
    let mother_id: Option<String> = row.get(17).map_err(rusqlite::Error::from)?;
    let father_id: Option<String> = row.get(18).map_err(rusqlite::Error::from)?;

    Ok(Person {
        id: parse_person_id(&id_str)?,
        full_name: row.get(1).map_err(rusqlite::Error::from)?,
        nick_name: row.get(2).map_err(rusqlite::Error::from)?,
        mobile: row.get(3).map_err(rusqlite::Error::from)?,
        email: row.get(4).map_err(rusqlite::Error::from)?,
        image_url: row.get(5).map_err(rusqlite::Error::from)?,
        bio: row.get(6).map_err(rusqlite::Error::from)?,
        gender: Gender::parse(&gender_str)
            .ok_or_else(|| KinError::Other(format!("Invalid gender: {}", gender_str)))?,
        blood_group: row.get(8).map_err(rusqlite::Error::from)?,
        birth_day: birth_day
            .and_then(|s| chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
        marriage_anniversary: marriage_anniversary
            .and_then(|s| chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
        job: row.get(11).map_err(rusqlite::Error::from)?,
        education: row.get(12).map_err(rusqlite::Error::from)?,
        death_anniversary: death_anniversary
            .and_then(|s| chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
        location: row.get(14).map_err(rusqlite::Error::from)?,
        active: row.get::<_, i32>(15).map_err(rusqlite::Error::from)? != 0,
        kinship: Kinship {
            spouse_id: spouse_id.as_deref().map(parse_person_id).transpose()?,
            children_ids: Vec::new(),
            parent_ids: Vec::new(),
            mother_id: mother_id.as_deref().map(parse_person_id).transpose()?,
            father_id: father_id.as_deref().map(parse_person_id).transpose()?,
        },
    })
}
