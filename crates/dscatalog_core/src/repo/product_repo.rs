//! Product repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and paged listing over `products`.
//! - Own the `product_categories` join rows; they are rewritten with the
//!   product row in one transaction.
//!
//! # Invariants
//! - New identities come from `AUTOINCREMENT` and are never reused.
//! - Deleting a product cascades its join rows but is rejected while an
//!   order line references it.

use crate::model::category::{Category, CategoryId};
use crate::model::product::{Product, ProductId};
use crate::page::{Page, PageRequest, SortProperty};
use crate::repo::{
    ensure_connection_ready, is_foreign_key_violation, offset_to_i64, row_count_to_u64, RepoError,
    RepoResult, CATEGORY_ENTITY, PRODUCT_ENTITY,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const PRODUCT_SELECT_SQL: &str = "SELECT
    id,
    name,
    description,
    price,
    img_url,
    date
FROM products";

/// Optional listing filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Substring match on `name`, folding ASCII letters only as SQLite
    /// `lower()` does. Blank means no filter.
    pub name: Option<String>,
    /// Restrict to products filed under this category.
    pub category_id: Option<CategoryId>,
}

impl ProductFilter {
    pub(crate) fn name_needle(&self) -> Option<String> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_ascii_lowercase)
    }
}

/// Storage port for products.
pub trait ProductRepository {
    fn find_by_id(&self, id: ProductId) -> RepoResult<Option<Product>>;
    fn exists_by_id(&self, id: ProductId) -> RepoResult<bool>;
    /// Inserts when `id` is `None`, otherwise updates the existing row.
    ///
    /// Returns the stored product with identity populated.
    fn save(&self, product: &Product) -> RepoResult<Product>;
    /// Fails with `NotFound` for unknown ids and `IntegrityViolation` while
    /// other rows reference the product.
    fn delete_by_id(&self, id: ProductId) -> RepoResult<()>;
    fn find_all(&self, filter: &ProductFilter, page: &PageRequest) -> RepoResult<Page<Product>>;
}

/// SQLite-backed product repository.
pub struct SqliteProductRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProductRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            &["products", "categories", "product_categories", "order_items"],
        )?;
        Ok(Self { conn })
    }
}

impl ProductRepository for SqliteProductRepository<'_> {
    fn find_by_id(&self, id: ProductId) -> RepoResult<Option<Product>> {
        let product = self
            .conn
            .query_row(
                &format!("{PRODUCT_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_product_row,
            )
            .optional()?;

        match product {
            Some(mut product) => {
                product.categories = load_categories_for_product(self.conn, id)?;
                Ok(Some(product))
            }
            None => Ok(None),
        }
    }

    fn exists_by_id(&self, id: ProductId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM products WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn save(&self, product: &Product) -> RepoResult<Product> {
        product.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        let id = match product.id {
            None => {
                tx.execute(
                    "INSERT INTO products (name, description, price, img_url, date)
                     VALUES (?1, ?2, ?3, ?4, ?5);",
                    params![
                        product.name.as_str(),
                        product.description.as_str(),
                        product.price,
                        product.img_url.as_str(),
                        product.date,
                    ],
                )?;
                tx.last_insert_rowid()
            }
            Some(id) => {
                let changed = tx.execute(
                    "UPDATE products
                     SET
                        name = ?1,
                        description = ?2,
                        price = ?3,
                        img_url = ?4,
                        date = ?5
                     WHERE id = ?6;",
                    params![
                        product.name.as_str(),
                        product.description.as_str(),
                        product.price,
                        product.img_url.as_str(),
                        product.date,
                        id,
                    ],
                )?;
                if changed == 0 {
                    return Err(RepoError::NotFound {
                        entity: PRODUCT_ENTITY,
                        id,
                    });
                }
                id
            }
        };

        tx.execute("DELETE FROM product_categories WHERE product_id = ?1;", [id])?;
        for category_id in product.category_ids() {
            let exists: i64 = tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?1);",
                [category_id],
                |row| row.get(0),
            )?;
            if exists == 0 {
                return Err(RepoError::NotFound {
                    entity: CATEGORY_ENTITY,
                    id: category_id,
                });
            }
            tx.execute(
                "INSERT INTO product_categories (product_id, category_id) VALUES (?1, ?2);",
                [id, category_id],
            )?;
        }
        tx.commit()?;

        self.find_by_id(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("product {id} missing after save read-back"))
        })
    }

    fn delete_by_id(&self, id: ProductId) -> RepoResult<()> {
        match self.conn.execute("DELETE FROM products WHERE id = ?1;", [id]) {
            Ok(0) => Err(RepoError::NotFound {
                entity: PRODUCT_ENTITY,
                id,
            }),
            Ok(_) => Ok(()),
            Err(err) if is_foreign_key_violation(&err) => Err(RepoError::IntegrityViolation {
                entity: PRODUCT_ENTITY,
                id,
            }),
            Err(err) => Err(err.into()),
        }
    }

    fn find_all(&self, filter: &ProductFilter, page: &PageRequest) -> RepoResult<Page<Product>> {
        let mut where_sql = String::from(" WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(needle) = filter.name_needle() {
            where_sql.push_str(" AND instr(lower(name), ?) > 0");
            bind_values.push(Value::Text(needle));
        }

        if let Some(category_id) = filter.category_id {
            where_sql.push_str(
                " AND EXISTS (
                    SELECT 1
                    FROM product_categories pc
                    WHERE pc.product_id = products.id
                      AND pc.category_id = ?
                )",
            );
            bind_values.push(Value::Integer(category_id));
        }

        let total: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM products{where_sql};"),
            params_from_iter(bind_values.iter()),
            |row| row.get(0),
        )?;

        let order_by = match page.sort() {
            None => "id ASC".to_string(),
            Some(sort) => format!(
                "{} {}, id ASC",
                sort_column(sort.property),
                sort.direction.as_sql()
            ),
        };

        let sql = format!("{PRODUCT_SELECT_SQL}{where_sql} ORDER BY {order_by} LIMIT ? OFFSET ?;");
        bind_values.push(Value::Integer(i64::from(page.size())));
        bind_values.push(Value::Integer(offset_to_i64(page.offset())?));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut products = Vec::new();
        while let Some(row) = rows.next()? {
            let mut product = parse_product_row(row)?;
            if let Some(id) = product.id {
                product.categories = load_categories_for_product(self.conn, id)?;
            }
            products.push(product);
        }

        Ok(Page::new(products, page, row_count_to_u64(total)?))
    }
}

fn sort_column(property: SortProperty) -> &'static str {
    match property {
        SortProperty::Id => "id",
        SortProperty::Name => "name COLLATE NOCASE",
        SortProperty::Price => "price",
        SortProperty::Date => "date",
    }
}

fn parse_product_row(row: &Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: Some(row.get("id")?),
        name: row.get("name")?,
        description: row.get("description")?,
        price: row.get("price")?,
        img_url: row.get("img_url")?,
        date: row.get("date")?,
        categories: Vec::new(),
    })
}

fn load_categories_for_product(
    conn: &Connection,
    product_id: ProductId,
) -> RepoResult<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT c.id, c.name
         FROM product_categories pc
         INNER JOIN categories c ON c.id = pc.category_id
         WHERE pc.product_id = ?1
         ORDER BY c.id ASC;",
    )?;
    let mut rows = stmt.query([product_id])?;
    let mut categories = Vec::new();
    while let Some(row) = rows.next()? {
        categories.push(Category::with_id(row.get(0)?, row.get::<_, String>(1)?));
    }
    Ok(categories)
}
