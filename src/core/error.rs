use thiserror::Error;

use crate::core::types::NodeId;
use crate::settings::value::ValueKind;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Nothing named '{0}'")]
    NotFound(String),

    #[error("Value {value} for '{name}' is outside of {bounds}")]
    OutOfRange {
        name: String,
        value: String,
        bounds: String,
    },

    #[error("Type mismatch for '{name}': expected {expected}, got {actual}")]
    TypeMismatch {
        name: String,
        expected: ValueKind,
        actual: ValueKind,
    },

    #[error("'{parent}' already has a child named '{name}'")]
    DuplicateName { parent: String, name: String },

    #[error("Choice group '{0}' has no choices")]
    EmptyChoices(String),

    #[error("Node {0:?} is not a {1}")]
    WrongNodeKind(NodeId, &'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
