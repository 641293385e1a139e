pub mod family_queries;
pub mod person_queries;
