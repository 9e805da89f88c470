//! Product use-case service.
//!
//! # Responsibility
//! - Expose DTO-level CRUD and paged listing for products.
//! - Resolve category id lists against the category repository.
//! - Translate storage failures into `ServiceError` kinds.
//!
//! # Invariants
//! - `insert` always creates a new identity; a DTO id is ignored.
//! - `update` checks existence before mutating anything.
//! - Failed operations leave storage unchanged.

use crate::dto::ProductDto;
use crate::model::category::{Category, CategoryId};
use crate::model::product::ProductId;
use crate::page::{Page, PageRequest};
use crate::repo::category_repo::CategoryRepository;
use crate::repo::product_repo::{ProductFilter, ProductRepository};
use crate::repo::{CATEGORY_ENTITY, PRODUCT_ENTITY};
use crate::service::error::{ServiceError, ServiceResult};
use log::{debug, info, warn};

/// Product service facade over repository implementations.
pub struct ProductService<P: ProductRepository, C: CategoryRepository> {
    products: P,
    categories: C,
}

impl<P: ProductRepository, C: CategoryRepository> ProductService<P, C> {
    /// Creates a service using the provided repository implementations.
    pub fn new(products: P, categories: C) -> Self {
        Self {
            products,
            categories,
        }
    }

    /// Lists one page of products, unfiltered.
    pub fn find_all_paged(&self, page: &PageRequest) -> ServiceResult<Page<ProductDto>> {
        self.search_paged(&ProductFilter::default(), page)
    }

    /// Lists one page of products matching `filter`.
    pub fn search_paged(
        &self,
        filter: &ProductFilter,
        page: &PageRequest,
    ) -> ServiceResult<Page<ProductDto>> {
        let result = self.products.find_all(filter, page)?;
        debug!(
            "event=product_list module=service status=ok page={} size={} returned={} total={}",
            result.number,
            result.size,
            result.number_of_elements(),
            result.total_elements
        );
        Ok(result.map(ProductDto::from))
    }

    /// Gets one product by id.
    ///
    /// # Errors
    /// - `ResourceNotFound` when no product has this id.
    pub fn find_by_id(&self, id: ProductId) -> ServiceResult<ProductDto> {
        let product = self
            .products
            .find_by_id(id)?
            .ok_or(ServiceError::ResourceNotFound {
                entity: PRODUCT_ENTITY,
                id,
            })?;
        Ok(ProductDto::from(product))
    }

    /// Creates a product from `dto` and returns it with its new id.
    ///
    /// # Errors
    /// - `ResourceNotFound` when a listed category id does not exist.
    /// - `Validation` when fields violate entity invariants.
    pub fn insert(&self, dto: &ProductDto) -> ServiceResult<ProductDto> {
        let mut product = dto.to_new_entity();
        product.set_categories(self.resolve_categories(&dto.category_ids)?);

        let saved = self.products.save(&product)?;
        info!(
            "event=product_insert module=service status=ok id={} categories={}",
            saved.id.unwrap_or_default(),
            saved.categories.len()
        );
        Ok(ProductDto::from(saved))
    }

    /// Replaces product fields and categories with those from `dto`.
    ///
    /// # Errors
    /// - `ResourceNotFound` when `id` or a listed category id does not exist.
    /// - `Validation` when fields violate entity invariants.
    pub fn update(&self, id: ProductId, dto: &ProductDto) -> ServiceResult<ProductDto> {
        let mut product = match self.products.find_by_id(id)? {
            Some(product) => product,
            None => {
                warn!(
                    "event=product_update module=service status=error error_code=not_found id={id}"
                );
                return Err(ServiceError::ResourceNotFound {
                    entity: PRODUCT_ENTITY,
                    id,
                });
            }
        };

        dto.copy_onto(&mut product);
        product.set_categories(self.resolve_categories(&dto.category_ids)?);

        let saved = self.products.save(&product)?;
        info!("event=product_update module=service status=ok id={id}");
        Ok(ProductDto::from(saved))
    }

    /// Deletes one product.
    ///
    /// # Errors
    /// - `ResourceNotFound` when `id` does not exist.
    /// - `Database` when order lines still reference the product.
    pub fn delete(&self, id: ProductId) -> ServiceResult<()> {
        match self.products.delete_by_id(id) {
            Ok(()) => {
                info!("event=product_delete module=service status=ok id={id}");
                Ok(())
            }
            Err(err) => {
                let err = ServiceError::from(err);
                warn!("event=product_delete module=service status=error id={id} error={err}");
                Err(err)
            }
        }
    }

    fn resolve_categories(&self, ids: &[CategoryId]) -> ServiceResult<Vec<Category>> {
        ids.iter()
            .map(|&id| {
                self.categories
                    .find_by_id(id)?
                    .ok_or(ServiceError::ResourceNotFound {
                        entity: CATEGORY_ENTITY,
                        id,
                    })
            })
            .collect()
    }
}
