use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum AddChildError {
    #[error("Attempted to add too many nodes")]
    TooManyNodes,
    #[error("No node exists at path {0:?}")]
    InvalidPath(Vec<usize>),
}

pub type AddChildResult = Result<(), AddChildError>;

/// Failures surfaced by [`crate::ActionRegistry`] lookups.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegistryError {
    #[error("Action not found: {0:?}")]
    NotFound(String),
    #[error("The action registry is empty")]
    EmptyRegistry,
    /// The tags are listed in ascending order.
    #[error("No registered action is compatible with tags {0:?}")]
    NoCompatibleAction(Vec<i32>),
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("Failed to read pool config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed pool config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
