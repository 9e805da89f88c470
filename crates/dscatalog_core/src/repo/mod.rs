//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the storage port (`ProductRepository`, `CategoryRepository`).
//! - Provide SQLite and in-memory adapters with identical semantics.
//! - Report semantic errors (`NotFound`, `IntegrityViolation`) in addition to
//!   DB transport errors.
//!
//! # Invariants
//! - Writes call `validate()` on the entity before any mutation.
//! - A failed write or delete leaves storage unchanged.
//!
//! # See also
//! - db/migrations/0001_init.sql

pub mod category_repo;
pub mod memory;
pub mod product_repo;

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::ValidationError;
use crate::page::SortProperty;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub(crate) const PRODUCT_ENTITY: &str = "product";
pub(crate) const CATEGORY_ENTITY: &str = "category";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by every catalog adapter.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound {
        entity: &'static str,
        id: i64,
    },
    /// Other rows still reference the target row.
    IntegrityViolation {
        entity: &'static str,
        id: i64,
    },
    InvalidData(String),
    UnsupportedSort {
        entity: &'static str,
        property: SortProperty,
    },
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    /// Connection runs with `PRAGMA foreign_keys = OFF`.
    ForeignKeysDisabled,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::IntegrityViolation { entity, id } => {
                write!(f, "{entity} {id} is still referenced by other rows")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted catalog data: {message}"),
            Self::UnsupportedSort { entity, property } => {
                write!(f, "{entity} cannot be sorted by `{}`", property.as_str())
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it through db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::ForeignKeysDisabled => write!(
                f,
                "connection does not enforce foreign keys; open it through db::open_db"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

const FOREIGN_KEY_FAILURE_MESSAGE: &str = "FOREIGN KEY constraint failed";

/// Returns whether `err` is SQLite rejecting a statement on a foreign key.
///
/// `ON DELETE RESTRICT` actions report `SQLITE_CONSTRAINT_TRIGGER` instead of
/// `SQLITE_CONSTRAINT_FOREIGNKEY`; both carry the same message.
pub(crate) fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(code, message) => {
            code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
                || (code.code == rusqlite::ErrorCode::ConstraintViolation
                    && message
                        .as_deref()
                        .is_some_and(|text| text.contains(FOREIGN_KEY_FAILURE_MESSAGE)))
        }
        _ => false,
    }
}

/// Rejects connections that were not opened through `db::open_db*`.
pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    tables: &[&'static str],
) -> RepoResult<()> {
    let actual_version = current_user_version(conn)?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in tables {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(*table));
        }
    }

    let foreign_keys: i64 = conn.pragma_query_value(None, "foreign_keys", |row| row.get(0))?;
    if foreign_keys == 0 {
        return Err(RepoError::ForeignKeysDisabled);
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

pub(crate) fn row_count_to_u64(value: i64) -> RepoResult<u64> {
    u64::try_from(value).map_err(|_| RepoError::InvalidData(format!("negative row count {value}")))
}

/// Converts a page offset into a SQLite `OFFSET` bind value.
pub(crate) fn offset_to_i64(offset: u64) -> RepoResult<i64> {
    i64::try_from(offset)
        .map_err(|_| RepoError::InvalidData(format!("page offset {offset} exceeds i64")))
}
