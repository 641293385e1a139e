use rusqlite::Connection;

use crate::db::{account_repo, family_repo};
use crate::error::{KinError, KinResult};
use crate::model::Family;
use crate::validation;

/// Creates the family owned by `username`. The username doubles as the
/// family key, so an account owns at most one family; a second create
/// fails with a conflict. The family name is also denormalized onto the
/// account record, in the same transaction.
pub fn create_family(conn: &Connection, username: &str, family_name: &str) -> KinResult<Family> {
    let name = validation::non_blank(family_name, "familyName")?;

    let mut account = account_repo::find_by_username(conn, username)?
        .ok_or_else(|| KinError::not_found("Account", username))?;

    if family_repo::key_exists(conn, username)? {
        return Err(KinError::already_exists("Family", username));
    }

    let tx = conn.unchecked_transaction()?;

    let family = Family::create(name.clone(), username.to_string());
    family_repo::insert(&tx, &family)?;

    account.family_name = Some(name);
    account_repo::update(&tx, &account)?;

    tx.commit()?;

    log::info!(
        "Family created: {} for account: {}",
        family.name,
        family.family_key
    );

    Ok(family)
}

/// Renames a family and the denormalized family-name field on the owning
/// account. Both writes commit together or not at all.
pub fn rename_family(conn: &Connection, family_key: &str, new_name: &str) -> KinResult<Family> {
    let name = validation::non_blank(new_name, "familyName")?;

    let mut family = family_repo::find_by_key(conn, family_key)?
        .ok_or_else(|| KinError::not_found("Family", family_key))?;
    let mut account = account_repo::find_by_username(conn, family_key)?
        .ok_or_else(|| KinError::not_found("Account", family_key))?;

    let tx = conn.unchecked_transaction()?;

    family_repo::update_name(&tx, family.id, &name)?;
    account.family_name = Some(name.clone());
    account_repo::update(&tx, &account)?;

    tx.commit()?;

    family.name = name;

    log::info!(
        "Family renamed: {} for family key: {}",
        family.name,
        family.family_key
    );

    Ok(family)
}
