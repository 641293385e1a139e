pub mod account_repo;
pub mod family_repo;
pub mod person_repo;
pub mod schema;
