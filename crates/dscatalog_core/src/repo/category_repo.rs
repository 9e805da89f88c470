//! Category repository contract and SQLite implementation.

use crate::model::category::{Category, CategoryId};
use crate::page::{Page, PageRequest, SortProperty};
use crate::repo::{
    ensure_connection_ready, is_foreign_key_violation, offset_to_i64, row_count_to_u64, RepoError,
    RepoResult, CATEGORY_ENTITY,
};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Storage port for categories.
pub trait CategoryRepository {
    fn find_by_id(&self, id: CategoryId) -> RepoResult<Option<Category>>;
    fn exists_by_id(&self, id: CategoryId) -> RepoResult<bool>;
    /// Inserts when `id` is `None`, otherwise updates the existing row.
    fn save(&self, category: &Category) -> RepoResult<Category>;
    /// Fails with `IntegrityViolation` while any product is filed under it.
    fn delete_by_id(&self, id: CategoryId) -> RepoResult<()>;
    fn find_all(&self, page: &PageRequest) -> RepoResult<Page<Category>>;
}

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["categories", "product_categories"])?;
        Ok(Self { conn })
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn find_by_id(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        let category = self
            .conn
            .query_row(
                "SELECT id, name FROM categories WHERE id = ?1;",
                [id],
                parse_category_row,
            )
            .optional()?;
        Ok(category)
    }

    fn exists_by_id(&self, id: CategoryId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn save(&self, category: &Category) -> RepoResult<Category> {
        category.validate()?;

        let id = match category.id {
            None => {
                self.conn.execute(
                    "INSERT INTO categories (name) VALUES (?1);",
                    [category.name.as_str()],
                )?;
                self.conn.last_insert_rowid()
            }
            Some(id) => {
                let changed = self.conn.execute(
                    "UPDATE categories SET name = ?1 WHERE id = ?2;",
                    params![category.name.as_str(), id],
                )?;
                if changed == 0 {
                    return Err(RepoError::NotFound {
                        entity: CATEGORY_ENTITY,
                        id,
                    });
                }
                id
            }
        };

        Ok(Category::with_id(id, category.name.clone()))
    }

    fn delete_by_id(&self, id: CategoryId) -> RepoResult<()> {
        match self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1;", [id])
        {
            Ok(0) => Err(RepoError::NotFound {
                entity: CATEGORY_ENTITY,
                id,
            }),
            Ok(_) => Ok(()),
            Err(err) if is_foreign_key_violation(&err) => Err(RepoError::IntegrityViolation {
                entity: CATEGORY_ENTITY,
                id,
            }),
            Err(err) => Err(err.into()),
        }
    }

    fn find_all(&self, page: &PageRequest) -> RepoResult<Page<Category>> {
        let order_by = match page.sort() {
            None => "id ASC".to_string(),
            Some(sort) => {
                let column = match sort.property {
                    SortProperty::Id => "id",
                    SortProperty::Name => "name COLLATE NOCASE",
                    property => {
                        return Err(RepoError::UnsupportedSort {
                            entity: CATEGORY_ENTITY,
                            property,
                        })
                    }
                };
                format!("{column} {}, id ASC", sort.direction.as_sql())
            }
        };

        let total: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM categories;", [], |row| row.get(0))?;

        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, name FROM categories ORDER BY {order_by} LIMIT ?1 OFFSET ?2;"
        ))?;
        let rows = stmt.query_map(
            params![i64::from(page.size()), offset_to_i64(page.offset())?],
            parse_category_row,
        )?;
        let content = rows.collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(content, page, row_count_to_u64(total)?))
    }
}

fn parse_category_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category::with_id(row.get("id")?, row.get::<_, String>("name")?))
}
