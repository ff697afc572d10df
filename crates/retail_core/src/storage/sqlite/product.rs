//! Product rows and the best-seller report.

use super::{ensure_connection_ready, insert_one, query_all, read_id};
use crate::model::product::Product;
use crate::model::report::ProductSells;
use crate::model::{Entity, Record};
use crate::storage::{ProductStorage, Storage, StorageResult};
use rusqlite::{params, Connection, Row};

const ENTITY: Entity = Product::ENTITY;
const TOP_SELLED_LIMIT: i64 = 5;

const PRODUCT_SELECT_SQL: &str = "SELECT
    id,
    description,
    price
FROM products;";

const PRODUCT_INSERT_SQL: &str = "INSERT INTO products (
    description,
    price
) VALUES (?1, ?2);";

const TOP_SELLED_SQL: &str = "SELECT
    p.description,
    COALESCE(SUM(s.quantity), 0) AS quantity
FROM products p
INNER JOIN sales s ON s.product_id = p.id
GROUP BY p.id, p.description
ORDER BY quantity DESC, p.id ASC
LIMIT ?1;";

/// SQLite-backed product storage.
pub struct SqliteProductStorage<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProductStorage<'conn> {
    pub fn try_new(conn: &'conn Connection) -> StorageResult<Self> {
        ensure_connection_ready(conn, ENTITY, &["id", "description", "price"])?;
        Ok(Self { conn })
    }
}

impl Storage<Product> for SqliteProductStorage<'_> {
    fn read_all(&self) -> StorageResult<Vec<Product>> {
        query_all(self.conn, ENTITY, PRODUCT_SELECT_SQL, [], parse_product_row)
    }

    fn create(&self, product: &mut Product) -> StorageResult<()> {
        let id = insert_one(
            self.conn,
            ENTITY,
            false,
            PRODUCT_INSERT_SQL,
            params![product.description.as_deref(), product.price],
        )?;
        product.assign_id(id);
        Ok(())
    }
}

impl ProductStorage for SqliteProductStorage<'_> {
    fn top_selled(&self) -> StorageResult<Vec<ProductSells>> {
        query_all(self.conn, ENTITY, TOP_SELLED_SQL, [TOP_SELLED_LIMIT], |row| {
            Ok(ProductSells {
                description: row.get("description")?,
                quantity: row.get::<_, Option<i64>>("quantity")?.unwrap_or_default(),
            })
        })
    }
}

fn parse_product_row(row: &Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: read_id(row, "id")?,
        description: row.get("description")?,
        price: row.get("price")?,
    })
}
