use rusqlite::Connection;

use crate::db::account_repo;
use crate::error::{KinError, KinResult};
use crate::model::Account;
use crate::validation::{self, trim_optional};

/// Registers a new account. The password hash is computed upstream by the
/// auth collaborator and stored verbatim; token issuance stays out of the
/// core. Duplicate username, email, or mobile each fail with a conflict.
pub fn register(
    conn: &Connection,
    username: &str,
    password_hash: &str,
    email: Option<&str>,
    mobile: Option<&str>,
) -> KinResult<Account> {
    let username = validation::non_blank(username, "username")?;

    if account_repo::username_exists(conn, &username)? {
        return Err(KinError::already_exists("Username", &username));
    }

    let email = trim_optional(email);
    if let Some(email) = &email {
        if account_repo::email_exists(conn, email)? {
            return Err(KinError::already_exists("Email", email));
        }
    }

    let mobile = trim_optional(mobile);
    if let Some(mobile) = &mobile {
        if account_repo::mobile_exists(conn, mobile)? {
            return Err(KinError::already_exists("Mobile", mobile));
        }
    }

    let mut account = Account::create(username, password_hash.to_string());
    account.email = email;
    account.mobile = mobile;
    account_repo::insert(conn, &account)?;

    log::info!("Account registered: {}", account.username);

    Ok(account)
}

/// Resolves an account by its username. The auth collaborator hands the
/// core an already-validated username; anything unknown is NotFound.
pub fn get_by_username(conn: &Connection, username: &str) -> KinResult<Account> {
    account_repo::find_by_username(conn, username)?
        .ok_or_else(|| KinError::not_found("Account", username))
}
