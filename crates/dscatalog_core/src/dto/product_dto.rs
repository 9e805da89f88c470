use crate::model::category::CategoryId;
use crate::model::product::{Product, ProductId};
use serde::{Deserialize, Serialize};

/// Product projection carrying category identities instead of entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: Option<ProductId>,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub img_url: String,
    /// Unix epoch milliseconds.
    pub date: i64,
    #[serde(default)]
    pub category_ids: Vec<CategoryId>,
}

impl ProductDto {
    /// Copies scalar fields onto an entity.
    ///
    /// Identity and categories are left alone; the caller re-resolves
    /// `category_ids` against storage.
    pub fn copy_onto(&self, product: &mut Product) {
        product.name = self.name.clone();
        product.description = self.description.clone();
        product.price = self.price;
        product.img_url = self.img_url.clone();
        product.date = self.date;
    }

    /// Builds a transient entity from scalar fields. Any DTO id is ignored.
    pub fn to_new_entity(&self) -> Product {
        Product::new(
            self.name.clone(),
            self.description.clone(),
            self.price,
            self.img_url.clone(),
            self.date,
        )
    }
}

impl From<&Product> for ProductDto {
    fn from(value: &Product) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
            description: value.description.clone(),
            price: value.price,
            img_url: value.img_url.clone(),
            date: value.date,
            category_ids: value.category_ids(),
        }
    }
}

impl From<Product> for ProductDto {
    fn from(value: Product) -> Self {
        Self::from(&value)
    }
}
