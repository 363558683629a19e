use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(#[from] core_runtime::Error),

    #[error("Authentication error: {0}")]
    Auth(#[from] core_auth::AuthError),

    #[error(transparent)]
    Gateway(#[from] core_gateway::GatewayError),

    #[error("Registry error: {0}")]
    Registry(#[from] core_registry::RegistryError),

    /// Login was rejected or returned no usable token. The message is the
    /// server's, or a generic one.
    #[error("{message}")]
    LoginFailed { message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl CoreError {
    /// The underlying gateway failure, if this is one.
    pub fn as_gateway(&self) -> Option<&core_gateway::GatewayError> {
        match self {
            CoreError::Gateway(error) => Some(error),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
