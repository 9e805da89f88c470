//! Category entity.

use super::{ensure_name, ValidationError};
use serde::{Deserialize, Serialize};

/// Auto-assigned category identity.
pub type CategoryId = i64;

/// Catalog category a product can be filed under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    /// `None` until the category is saved.
    pub id: Option<CategoryId>,
    pub name: String,
}

impl Category {
    /// Creates a transient category without identity.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    /// Creates a category that already carries a persisted identity.
    pub fn with_id(id: CategoryId, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_name("category", &self.name)
    }
}
