//! Demo catalog fixture.
//!
//! # Invariants
//! - Seeding only runs against an empty catalog; existing rows are never
//!   touched.
//! - Seed rows use explicit ids `1..=DEMO_PRODUCT_COUNT` so the fixture is
//!   stable across runs.

use super::DbResult;
use log::info;
use rusqlite::Connection;

pub const DEMO_CATEGORY_COUNT: i64 = 3;
pub const DEMO_PRODUCT_COUNT: i64 = 25;

const SEED_SQL: &str = include_str!("seed.sql");

/// Inserts the demo categories and products into an empty catalog.
///
/// Returns `false` without writing anything when either table already has
/// rows.
pub fn seed_demo_catalog(conn: &mut Connection) -> DbResult<bool> {
    let existing: i64 = conn.query_row(
        "SELECT (SELECT COUNT(*) FROM products) + (SELECT COUNT(*) FROM categories);",
        [],
        |row| row.get(0),
    )?;
    if existing > 0 {
        info!("event=db_seed module=db status=skipped existing_rows={existing}");
        return Ok(false);
    }

    let tx = conn.transaction()?;
    tx.execute_batch(SEED_SQL)?;
    tx.commit()?;

    info!(
        "event=db_seed module=db status=ok categories={} products={}",
        DEMO_CATEGORY_COUNT, DEMO_PRODUCT_COUNT
    );
    Ok(true)
}
