use serde::{Deserialize, Serialize};

use super::ids::Id;

/// Identity-store record for a registered principal. The password hash is
/// computed by the auth collaborator; the core stores it verbatim.
/// `family_name` is a denormalized copy kept in sync by the family
/// lifecycle operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Id<Account>,
    pub username: String,
    pub password_hash: String,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub family_name: Option<String>,
}

impl Account {
    pub fn create(username: String, password_hash: String) -> Self {
        Self {
            id: Id::generate(),
            username,
            password_hash,
            email: None,
            mobile: None,
            family_name: None,
        }
    }
}
