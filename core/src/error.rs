use thiserror::Error;

/// Failures surfaced by the store and query operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A referenced identifier does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: u32 },
    /// Malformed or out-of-range input.
    #[error("{0}")]
    Validation(String),
    /// The requester is not allowed to see the resource.
    #[error("{0}")]
    PermissionDenied(String),
    /// Every identifier for this entity kind has been handed out.
    #[error("no {entity} identifiers left")]
    IdsExhausted { entity: &'static str },
}

impl Error {
    pub(crate) fn not_found(entity: &'static str, id: u32) -> Self {
        Self::NotFound { entity, id }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
