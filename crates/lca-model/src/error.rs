use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("flow name must not be empty")]
    EmptyFlowName,
    #[error("flow identifier must not be empty")]
    EmptyIdentifier,
    #[error("unknown flow role: {0}")]
    UnknownRole(String),
    #[error("unknown flow direction: {0}")]
    UnknownDirection(String),
    #[error("unit must not be empty for flow {0}")]
    EmptyUnit(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
