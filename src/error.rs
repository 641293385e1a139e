use thiserror::Error;

#[derive(Debug, Error)]
pub enum KinError {
    #[error("{field} cannot be blank")]
    BlankField { field: String },

    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    #[error("{entity_type} already exists: {identifier}")]
    AlreadyExists {
        entity_type: String,
        identifier: String,
    },

    #[error("Invalid relationship type: {value}")]
    InvalidRelationship { value: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl KinError {
    pub fn not_found(entity_type: &str, id: impl ToString) -> Self {
        KinError::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }

    pub fn already_exists(entity_type: &str, identifier: impl ToString) -> Self {
        KinError::AlreadyExists {
            entity_type: entity_type.to_string(),
            identifier: identifier.to_string(),
        }
    }
}

pub type KinResult<T> = Result<T, KinError>;
