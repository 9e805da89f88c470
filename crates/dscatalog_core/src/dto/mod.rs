//! Boundary transfer objects.
//!
//! # Responsibility
//! - Provide flat projections of catalog entities for callers.
//! - Keep entity <-> DTO mapping pure; resolving category ids to entities is
//!   the service layer's job because it needs a repository.
//!
//! # Invariants
//! - DTOs are never persisted directly.

mod category_dto;
mod product_dto;

pub use category_dto::CategoryDto;
pub use product_dto::ProductDto;
