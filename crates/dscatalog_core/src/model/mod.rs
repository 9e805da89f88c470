//! Catalog domain model.
//!
//! # Responsibility
//! - Define the persisted catalog entities (`Product`, `Category`).
//! - Own field-level validation shared by every repository implementation.
//!
//! # Invariants
//! - Entity identity is `None` until the first successful save.
//! - Once assigned, identity is stable and never reused for another row.
//!
//! # See also
//! - db/migrations/0001_init.sql

pub mod category;
pub mod product;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Field-level validation failure raised before any write reaches storage.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Name is empty after trim.
    BlankName { entity: &'static str },
    /// Price is negative, NaN or infinite.
    InvalidPrice(f64),
    /// Product references a category that was never persisted.
    UnpersistedCategory(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName { entity } => write!(f, "{entity} name must not be blank"),
            Self::InvalidPrice(price) => {
                write!(f, "product price must be a finite non-negative number, got {price}")
            }
            Self::UnpersistedCategory(name) => {
                write!(f, "category `{name}` must be saved before it can be attached")
            }
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn ensure_name(entity: &'static str, name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::BlankName { entity });
    }
    Ok(())
}
