//! Sale rows.

use super::{ensure_connection_ready, insert_one, query_all, read_id};
use crate::model::sale::Sale;
use crate::model::{Entity, Record};
use crate::storage::{SaleStorage, Storage, StorageResult};
use rusqlite::{params, Connection, Row};

const ENTITY: Entity = Sale::ENTITY;

const SALE_SELECT_SQL: &str = "SELECT
    id,
    quantity,
    product_id,
    invoice_id
FROM sales;";

const SALE_INSERT_SQL: &str = "INSERT INTO sales (
    quantity,
    product_id,
    invoice_id
) VALUES (?1, ?2, ?3);";

/// SQLite-backed sale storage. Both product and invoice must exist.
pub struct SqliteSaleStorage<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSaleStorage<'conn> {
    pub fn try_new(conn: &'conn Connection) -> StorageResult<Self> {
        ensure_connection_ready(conn, ENTITY, &["id", "quantity", "product_id", "invoice_id"])?;
        Ok(Self { conn })
    }
}

impl Storage<Sale> for SqliteSaleStorage<'_> {
    fn read_all(&self) -> StorageResult<Vec<Sale>> {
        query_all(self.conn, ENTITY, SALE_SELECT_SQL, [], parse_sale_row)
    }

    fn create(&self, sale: &mut Sale) -> StorageResult<()> {
        let id = insert_one(
            self.conn,
            ENTITY,
            true,
            SALE_INSERT_SQL,
            params![sale.quantity, sale.product_id, sale.invoice_id],
        )?;
        sale.assign_id(id);
        Ok(())
    }
}

impl SaleStorage for SqliteSaleStorage<'_> {}

fn parse_sale_row(row: &Row<'_>) -> rusqlite::Result<Sale> {
    Ok(Sale {
        id: read_id(row, "id")?,
        quantity: row.get("quantity")?,
        product_id: row.get("product_id")?,
        invoice_id: row.get("invoice_id")?,
    })
}
