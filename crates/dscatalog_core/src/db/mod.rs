//! Catalog database lifecycle: open, migrate, seed.
//!
//! # Invariants
//! - Every connection handed out has the current schema and enforces
//!   foreign keys.
//! - Repositories refuse connections that skipped this module.
//!
//! # See also
//! - migrations/0001_init.sql

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;
mod seed;

pub use open::{open_db, open_db_in_memory};
pub use seed::{seed_demo_catalog, DEMO_CATEGORY_COUNT, DEMO_PRODUCT_COUNT};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening, migrating or seeding a catalog database.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was written by a newer build.
    UnsupportedSchemaVersion { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
            Self::UnsupportedSchemaVersion { found, supported } => write!(
                f,
                "catalog schema v{found} requires a newer build (this build knows up to v{supported})"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        if let Self::Sqlite(err) = self {
            Some(err)
        } else {
            None
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
