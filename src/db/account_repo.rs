use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::error::{KinError, KinResult};
use crate::model::{Account, Id};

pub fn insert(conn: &Connection, account: &Account) -> KinResult<()> {
    conn.execute(
        "INSERT INTO accounts (id, username, password_hash, email, mobile, family_name)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            account.id.value.to_string(),
            account.username,
            account.password_hash,
            account.email,
            account.mobile,
            account.family_name,
        ],
    )?;
    Ok(())
}

pub fn update(conn: &Connection, account: &Account) -> KinResult<()> {
    conn.execute(
        "UPDATE accounts SET password_hash = ?1, email = ?2, mobile = ?3,
         family_name = ?4, updated_at = datetime('now')
         WHERE id = ?5",
        params![
            account.password_hash,
            account.email,
            account.mobile,
            account.family_name,
            account.id.value.to_string(),
        ],
    )?;
    Ok(())
}

pub fn find_first(conn: &Connection) -> KinResult<Option<Account>> {
    let mut stmt = conn.prepare(
        "SELECT id, username, password_hash, email, mobile, family_name
         FROM accounts ORDER BY created_at LIMIT 1",
    )?;

    let result = stmt.query_row([], |row| Ok(row_to_account(row)));

    match result {
        Ok(account) => Ok(Some(account?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn find_by_username(conn: &Connection, username: &str) -> KinResult<Option<Account>> {
    let mut stmt = conn.prepare(
        "SELECT id, username, password_hash, email, mobile, family_name
         FROM accounts WHERE username = ?1",
    )?;

    let result = stmt.query_row(params![username], |row| Ok(row_to_account(row)));

    match result {
        Ok(account) => Ok(Some(account?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn username_exists(conn: &Connection, username: &str) -> KinResult<bool> {
    exists(conn, "SELECT 1 FROM accounts WHERE username = ?1", username)
}

pub fn email_exists(conn: &Connection, email: &str) -> KinResult<bool> {
    exists(conn, "SELECT 1 FROM accounts WHERE email = ?1", email)
}

pub fn mobile_exists(conn: &Connection, mobile: &str) -> KinResult<bool> {
    exists(conn, "SELECT 1 FROM accounts WHERE mobile = ?1", mobile)
}

fn exists(conn: &Connection, sql: &str, value: &str) -> KinResult<bool> {
    let mut stmt = conn.prepare(sql)?;
    let result = stmt.query_row(params![value], |_| Ok(()));
    match result {
        Ok(()) => Ok(true),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

fn row_to_account(row: &rusqlite::Row) -> KinResult<Account> {
    let id_str: String = row.get(0).map_err(rusqlite::Error::from)?;

    Ok(Account {
        id: Id::new(
            Uuid::parse_str(&id_str)
                .map_err(|e| KinError::Other(format!("Invalid UUID: {}", e)))?,
        ),
        username: row.get(1).map_err(rusqlite::Error::from)?,
        password_hash: row.get(2).map_err(rusqlite::Error::from)?,
        email: row.get(3).map_err(rusqlite::Error::from)?,
        mobile: row.get(4).map_err(rusqlite::Error::from)?,
        family_name: row.get(5).map_err(rusqlite::Error::from)?,
    })
}
