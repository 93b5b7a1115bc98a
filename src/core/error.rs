use crate::core::types::PetId;
use thiserror::Error;

/// The roster already holds as many pets as it can
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Can only have {capacity} pets")]
pub struct CapacityError {
    pub capacity: usize,
}

/// Failure inside the naming collaborator
///
/// Never fatal: the simulation substitutes the fallback name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NamingError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Unexpected status: {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("All name sources failed")]
    Exhausted,
}

#[derive(Error, Debug)]
pub enum SimError {
    #[error(transparent)]
    Capacity(#[from] CapacityError),

    #[error("Pet not found: {0:?}")]
    PetNotFound(PetId),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_message() {
        let err = CapacityError { capacity: 4 };
        assert_eq!(err.to_string(), "Can only have 4 pets");
    }

    #[test]
    fn test_capacity_converts_into_sim_error() {
        let err: SimError = CapacityError { capacity: 2 }.into();
        assert!(matches!(err, SimError::Capacity(CapacityError { capacity: 2 })));
        assert_eq!(err.to_string(), "Can only have 2 pets");
    }
}
