//! In-process catalog store implementing the same storage port as SQLite.
//!
//! # Responsibility
//! - Back services in tests and tools without a database file.
//! - Mirror SQLite semantics: monotonic ids, cascade of category links on
//!   product delete, integrity rejection for referenced rows.
//!
//! # Invariants
//! - Identities are never reused, even after deletes.
//! - Repository handles from one `InMemoryCatalog` share state.

use crate::model::category::{Category, CategoryId};
use crate::model::product::{Product, ProductId};
use crate::page::{Direction, Page, PageRequest, SortProperty};
use crate::repo::category_repo::CategoryRepository;
use crate::repo::product_repo::{ProductFilter, ProductRepository};
use crate::repo::{RepoError, RepoResult, CATEGORY_ENTITY, PRODUCT_ENTITY};
use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::rc::Rc;

#[derive(Debug, Clone)]
struct StoredProduct {
    product: Product,
    category_ids: Vec<CategoryId>,
}

#[derive(Debug, Clone, Copy)]
struct OrderLine {
    product_id: ProductId,
}

#[derive(Debug, Default)]
struct CatalogState {
    products: BTreeMap<ProductId, StoredProduct>,
    categories: BTreeMap<CategoryId, Category>,
    order_lines: BTreeMap<i64, OrderLine>,
    last_product_id: i64,
    last_category_id: i64,
    last_order_line_id: i64,
}

impl CatalogState {
    fn materialize(&self, stored: &StoredProduct) -> Product {
        let mut product = stored.product.clone();
        product.categories = stored
            .category_ids
            .iter()
            .filter_map(|id| self.categories.get(id).cloned())
            .collect();
        product
    }
}

/// Shared in-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    state: Rc<RefCell<CatalogState>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a product repository handle over this catalog.
    pub fn products(&self) -> InMemoryProductRepository {
        InMemoryProductRepository {
            state: Rc::clone(&self.state),
        }
    }

    /// Returns a category repository handle over this catalog.
    pub fn categories(&self) -> InMemoryCategoryRepository {
        InMemoryCategoryRepository {
            state: Rc::clone(&self.state),
        }
    }

    /// Records an order line referencing `product_id` and returns its id.
    ///
    /// While the line exists the product cannot be deleted.
    pub fn add_order_line(&self, product_id: ProductId, quantity: u32) -> RepoResult<i64> {
        if quantity == 0 {
            return Err(RepoError::InvalidData(
                "order line quantity must be positive".to_string(),
            ));
        }

        let mut state = self.state.borrow_mut();
        if !state.products.contains_key(&product_id) {
            return Err(RepoError::NotFound {
                entity: PRODUCT_ENTITY,
                id: product_id,
            });
        }
        state.last_order_line_id += 1;
        let id = state.last_order_line_id;
        state.order_lines.insert(id, OrderLine { product_id });
        Ok(id)
    }
}

/// Product handle over an [`InMemoryCatalog`].
#[derive(Debug, Clone)]
pub struct InMemoryProductRepository {
    state: Rc<RefCell<CatalogState>>,
}

impl ProductRepository for InMemoryProductRepository {
    fn find_by_id(&self, id: ProductId) -> RepoResult<Option<Product>> {
        let state = self.state.borrow();
        Ok(state
            .products
            .get(&id)
            .map(|stored| state.materialize(stored)))
    }

    fn exists_by_id(&self, id: ProductId) -> RepoResult<bool> {
        Ok(self.state.borrow().products.contains_key(&id))
    }

    fn save(&self, product: &Product) -> RepoResult<Product> {
        product.validate()?;

        let mut state = self.state.borrow_mut();
        let category_ids = product.category_ids();
        if let Some(missing) = category_ids
            .iter()
            .find(|id| !state.categories.contains_key(*id))
        {
            return Err(RepoError::NotFound {
                entity: CATEGORY_ENTITY,
                id: *missing,
            });
        }

        let id = match product.id {
            None => {
                state.last_product_id += 1;
                state.last_product_id
            }
            Some(id) if state.products.contains_key(&id) => id,
            Some(id) => {
                return Err(RepoError::NotFound {
                    entity: PRODUCT_ENTITY,
                    id,
                })
            }
        };

        let mut stored = product.clone();
        stored.id = Some(id);
        stored.categories.clear();
        let stored = StoredProduct {
            product: stored,
            category_ids,
        };
        let saved = state.materialize(&stored);
        state.products.insert(id, stored);
        Ok(saved)
    }

    fn delete_by_id(&self, id: ProductId) -> RepoResult<()> {
        let mut state = self.state.borrow_mut();
        if !state.products.contains_key(&id) {
            return Err(RepoError::NotFound {
                entity: PRODUCT_ENTITY,
                id,
            });
        }
        if state.order_lines.values().any(|line| line.product_id == id) {
            return Err(RepoError::IntegrityViolation {
                entity: PRODUCT_ENTITY,
                id,
            });
        }
        state.products.remove(&id);
        Ok(())
    }

    fn find_all(&self, filter: &ProductFilter, page: &PageRequest) -> RepoResult<Page<Product>> {
        let state = self.state.borrow();
        let needle = filter.name_needle();
        let mut matches: Vec<Product> = state
            .products
            .values()
            .filter(|stored| match needle.as_deref() {
                Some(needle) => stored.product.name.to_ascii_lowercase().contains(needle),
                None => true,
            })
            .filter(|stored| match filter.category_id {
                Some(category_id) => stored.category_ids.contains(&category_id),
                None => true,
            })
            .map(|stored| state.materialize(stored))
            .collect();

        if let Some(sort) = page.sort() {
            matches.sort_by(|left, right| {
                let ordering = match sort.property {
                    SortProperty::Id => left.id.cmp(&right.id),
                    SortProperty::Name => left
                        .name
                        .to_ascii_lowercase()
                        .cmp(&right.name.to_ascii_lowercase()),
                    SortProperty::Price => left.price.total_cmp(&right.price),
                    SortProperty::Date => left.date.cmp(&right.date),
                };
                apply_direction(ordering, sort.direction).then(left.id.cmp(&right.id))
            });
        }

        Ok(slice_page(matches, page))
    }
}

/// Category handle over an [`InMemoryCatalog`].
#[derive(Debug, Clone)]
pub struct InMemoryCategoryRepository {
    state: Rc<RefCell<CatalogState>>,
}

impl CategoryRepository for InMemoryCategoryRepository {
    fn find_by_id(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        Ok(self.state.borrow().categories.get(&id).cloned())
    }

    fn exists_by_id(&self, id: CategoryId) -> RepoResult<bool> {
        Ok(self.state.borrow().categories.contains_key(&id))
    }

    fn save(&self, category: &Category) -> RepoResult<Category> {
        category.validate()?;

        let mut state = self.state.borrow_mut();
        let id = match category.id {
            None => {
                state.last_category_id += 1;
                state.last_category_id
            }
            Some(id) if state.categories.contains_key(&id) => id,
            Some(id) => {
                return Err(RepoError::NotFound {
                    entity: CATEGORY_ENTITY,
                    id,
                })
            }
        };

        let saved = Category::with_id(id, category.name.clone());
        state.categories.insert(id, saved.clone());
        Ok(saved)
    }

    fn delete_by_id(&self, id: CategoryId) -> RepoResult<()> {
        let mut state = self.state.borrow_mut();
        if !state.categories.contains_key(&id) {
            return Err(RepoError::NotFound {
                entity: CATEGORY_ENTITY,
                id,
            });
        }
        if state
            .products
            .values()
            .any(|stored| stored.category_ids.contains(&id))
        {
            return Err(RepoError::IntegrityViolation {
                entity: CATEGORY_ENTITY,
                id,
            });
        }
        state.categories.remove(&id);
        Ok(())
    }

    fn find_all(&self, page: &PageRequest) -> RepoResult<Page<Category>> {
        let state = self.state.borrow();
        let mut categories: Vec<Category> = state.categories.values().cloned().collect();

        if let Some(sort) = page.sort() {
            if !matches!(sort.property, SortProperty::Id | SortProperty::Name) {
                return Err(RepoError::UnsupportedSort {
                    entity: CATEGORY_ENTITY,
                    property: sort.property,
                });
            }
            categories.sort_by(|left, right| {
                let ordering = match sort.property {
                    SortProperty::Name => left
                        .name
                        .to_ascii_lowercase()
                        .cmp(&right.name.to_ascii_lowercase()),
                    _ => left.id.cmp(&right.id),
                };
                apply_direction(ordering, sort.direction).then(left.id.cmp(&right.id))
            });
        }

        Ok(slice_page(categories, page))
    }
}

fn apply_direction(ordering: Ordering, direction: Direction) -> Ordering {
    match direction {
        Direction::Asc => ordering,
        Direction::Desc => ordering.reverse(),
    }
}

fn slice_page<T>(rows: Vec<T>, page: &PageRequest) -> Page<T> {
    let total = rows.len() as u64;
    let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let size = page.size() as usize;
    let content = rows.into_iter().skip(offset).take(size).collect();
    Page::new(content, page, total)
}
