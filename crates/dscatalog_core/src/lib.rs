//! Core domain logic for the dscatalog backend.
//! This crate is the single source of truth for catalog invariants.

pub mod config;
pub mod db;
pub mod dto;
pub mod logging;
pub mod model;
pub mod page;
pub mod repo;
pub mod service;

pub use config::{CatalogConfig, ConfigError};
pub use dto::{CategoryDto, ProductDto};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::category::{Category, CategoryId};
pub use model::product::{Product, ProductId};
pub use model::ValidationError;
pub use page::{Direction, Page, PageRequest, Sort, SortProperty};
pub use repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
pub use repo::memory::{InMemoryCatalog, InMemoryCategoryRepository, InMemoryProductRepository};
pub use repo::product_repo::{ProductFilter, ProductRepository, SqliteProductRepository};
pub use repo::{RepoError, RepoResult};
pub use service::category_service::CategoryService;
pub use service::error::{ServiceError, ServiceResult};
pub use service::product_service::ProductService;

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
