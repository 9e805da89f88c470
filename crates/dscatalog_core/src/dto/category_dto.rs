use crate::model::category::{Category, CategoryId};
use serde::{Deserialize, Serialize};

/// Category projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDto {
    pub id: Option<CategoryId>,
    pub name: String,
}

impl CategoryDto {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    /// Copies scalar fields onto an entity, leaving its identity untouched.
    pub fn copy_onto(&self, category: &mut Category) {
        category.name = self.name.clone();
    }
}

impl From<&Category> for CategoryDto {
    fn from(value: &Category) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
        }
    }
}

impl From<Category> for CategoryDto {
    fn from(value: Category) -> Self {
        Self {
            id: value.id,
            name: value.name,
        }
    }
}
