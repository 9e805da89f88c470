//! Service-level error kinds.
//!
//! # Invariants
//! - `NotFound` from storage always surfaces as `ResourceNotFound`.
//! - `IntegrityViolation` from storage always surfaces as `Database`.
//! - Every other repository failure passes through unmodified in `Repo`.

use crate::model::ValidationError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error returned by catalog services.
#[derive(Debug)]
pub enum ServiceError {
    /// Requested identity is absent.
    ResourceNotFound { entity: &'static str, id: i64 },
    /// Storage rejected the operation on referential integrity.
    Database(String),
    /// Input failed entity validation.
    Validation(ValidationError),
    /// Unclassified persistence failure.
    Repo(RepoError),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ResourceNotFound { .. })
    }

    pub fn is_database(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ResourceNotFound { entity, id } => write!(f, "{entity} id not found: {id}"),
            Self::Database(message) => write!(f, "integrity violation: {message}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, id } => Self::ResourceNotFound { entity, id },
            err @ RepoError::IntegrityViolation { .. } => Self::Database(err.to_string()),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}
