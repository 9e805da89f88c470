//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into DTO-level use-case APIs.
//! - Translate low-level storage signals into `ServiceError` kinds.
//! - Keep callers decoupled from storage details.

pub mod category_service;
pub mod error;
pub mod product_service;
