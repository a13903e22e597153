use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid {kind} resource name: {name}")]
    InvalidResourceName { kind: &'static str, name: String },

    #[error("invalid deployment id {id:?}: {reason}")]
    InvalidDeploymentId { id: String, reason: &'static str },

    #[error("invalid display name: {0}")]
    InvalidDisplayName(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
