//! Product entity.
//!
//! # Responsibility
//! - Define the canonical product record and its category association.
//! - Validate fields before persistence.
//!
//! # Invariants
//! - `categories` behaves as a set keyed by category id.
//! - `price` is finite and non-negative for every persisted product.

use super::category::{Category, CategoryId};
use super::{ensure_name, ValidationError};
use serde::{Deserialize, Serialize};

/// Auto-assigned product identity.
pub type ProductId = i64;

/// Catalog product.
///
/// Categories form a many-to-many relation; the product side owns the
/// association and rewrites it on every save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// `None` until the product is saved.
    pub id: Option<ProductId>,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub img_url: String,
    /// Unix epoch milliseconds.
    pub date: i64,
    /// Associated categories, sorted by id after load.
    pub categories: Vec<Category>,
}

impl Product {
    /// Creates a transient product without identity or categories.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: f64,
        img_url: impl Into<String>,
        date: i64,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
            price,
            img_url: img_url.into(),
            date,
            categories: Vec::new(),
        }
    }

    /// Attaches a category unless one with the same id is already present.
    pub fn add_category(&mut self, category: Category) {
        let duplicate = category.id.is_some()
            && self
                .categories
                .iter()
                .any(|existing| existing.id == category.id);
        if !duplicate {
            self.categories.push(category);
        }
    }

    /// Replaces the whole category set, dropping duplicate ids.
    pub fn set_categories(&mut self, categories: impl IntoIterator<Item = Category>) {
        self.categories.clear();
        for category in categories {
            self.add_category(category);
        }
    }

    /// Returns ids of attached persisted categories in ascending order.
    pub fn category_ids(&self) -> Vec<CategoryId> {
        let mut ids: Vec<CategoryId> = self.categories.iter().filter_map(|c| c.id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Checks write-path invariants.
    ///
    /// # Errors
    /// - `BlankName` when `name` is empty after trim.
    /// - `InvalidPrice` when `price` is negative or not finite.
    /// - `UnpersistedCategory` when an attached category has no id.
    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_name("product", &self.name)?;
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(ValidationError::InvalidPrice(self.price));
        }
        if let Some(category) = self.categories.iter().find(|c| c.id.is_none()) {
            return Err(ValidationError::UnpersistedCategory(category.name.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Product;
    use crate::model::category::Category;
    use crate::model::ValidationError;

    fn phone() -> Product {
        Product::new("Phone", "Good phone", 800.0, "https://img.example/phone.png", 0)
    }

    #[test]
    fn add_category_ignores_duplicate_ids() {
        let mut product = phone();
        product.add_category(Category::with_id(2, "Electronics"));
        product.add_category(Category::with_id(2, "Electronics"));
        product.add_category(Category::with_id(1, "Books"));

        assert_eq!(product.categories.len(), 2);
        assert_eq!(product.category_ids(), vec![1, 2]);
    }

    #[test]
    fn negative_and_nan_prices_are_rejected() {
        let mut product = phone();
        product.price = -1.0;
        assert!(matches!(
            product.validate(),
            Err(ValidationError::InvalidPrice(_))
        ));

        product.price = f64::NAN;
        assert!(matches!(
            product.validate(),
            Err(ValidationError::InvalidPrice(_))
        ));
    }

    #[test]
    fn transient_category_is_rejected() {
        let mut product = phone();
        product.add_category(Category::new("Draft"));
        assert_eq!(
            product.validate(),
            Err(ValidationError::UnpersistedCategory("Draft".to_string()))
        );
    }
}
