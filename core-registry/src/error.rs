use thiserror::Error;

/// Errors raised while building or querying the entity registry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Entity name must not be empty")]
    EmptyName,

    #[error("Entity '{0}' is registered more than once")]
    DuplicateEntity(String),

    #[error("Field '{key}' is declared more than once on '{entity}'")]
    DuplicateField { entity: String, key: String },

    #[error("Select field '{key}' on '{entity}' is invalid: {reason}")]
    InvalidSelect {
        entity: String,
        key: String,
        reason: String,
    },

    #[error("Unknown entity: {0}")]
    UnknownEntity(String),
}

pub type Result<T> = std::result::Result<T, RegistryError>;
