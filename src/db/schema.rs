use rusqlite::Connection;

use crate::error::KinResult;

/// Initialize the database schema. Creates all tables if they don't exist.
///
/// Three logical collections (accounts, people, families) keyed by opaque
/// string ids, plus the parent join table and the per-family relationship
/// log. Unique indexes: accounts.username and families.family_key; email
/// and mobile are unique when present.
pub fn initialize(conn: &Connection) -> KinResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS accounts (
            id TEXT PRIMARY KEY NOT NULL,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            email TEXT,
            mobile TEXT,
            family_name TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_accounts_email
            ON accounts(email) WHERE email IS NOT NULL;
        CREATE UNIQUE INDEX IF NOT EXISTS idx_accounts_mobile
            ON accounts(mobile) WHERE mobile IS NOT NULL;

        CREATE TABLE IF NOT EXISTS families (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            family_key TEXT NOT NULL UNIQUE,
            root_node TEXT NOT NULL DEFAULT '{}',
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS people (
            id TEXT PRIMARY KEY NOT NULL,
            family_id TEXT NOT NULL REFERENCES families(id),
            full_name TEXT NOT NULL,
            nick_name TEXT,
            mobile TEXT,
            email TEXT,
            image_url TEXT,
            bio TEXT,
            gender TEXT NOT NULL DEFAULT 'OTHER',
            blood_group TEXT,
            birth_day TEXT,
            marriage_anniversary TEXT,
            job TEXT,
            education TEXT,
            death_anniversary TEXT,
            location INTEGER NOT NULL DEFAULT 0,
            active INTEGER NOT NULL DEFAULT 1,
            spouse_id TEXT,
            mother_id TEXT,
            father_id TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_people_family ON people(family_id);

        CREATE TABLE IF NOT EXISTS person_parents (
            person_id TEXT NOT NULL REFERENCES people(id) ON DELETE CASCADE,
            parent_id TEXT NOT NULL REFERENCES people(id) ON DELETE CASCADE,
            PRIMARY KEY (person_id, parent_id)
        );

        CREATE INDEX IF NOT EXISTS idx_person_parents_parent
            ON person_parents(parent_id);

        CREATE TABLE IF NOT EXISTS relationship_edges (
            id TEXT PRIMARY KEY NOT NULL,
            family_id TEXT NOT NULL REFERENCES families(id) ON DELETE CASCADE,
            from_id TEXT NOT NULL,
            to_id TEXT NOT NULL,
            kind TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_edges_family ON relationship_edges(family_id);

        PRAGMA foreign_keys = ON;
        ",
    )?;
    Ok(())
}

/// Create an in-memory connection for testing. Available in test builds.
pub fn test_connection() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    initialize(&conn).unwrap();
    conn
}
