//! Invoice rows.

use super::{ensure_connection_ready, insert_one, query_all, read_id};
use crate::model::invoice::Invoice;
use crate::model::{Entity, Record};
use crate::storage::{InvoiceStorage, Storage, StorageResult};
use rusqlite::{params, Connection, Row};

const ENTITY: Entity = Invoice::ENTITY;

const INVOICE_SELECT_SQL: &str = "SELECT
    id,
    datetime,
    total,
    customer_id
FROM invoices;";

const INVOICE_INSERT_SQL: &str = "INSERT INTO invoices (
    datetime,
    total,
    customer_id
) VALUES (?1, ?2, ?3);";

/// SQLite-backed invoice storage.
///
/// Creating an invoice for an unknown customer fails with
/// `StorageError::Relation`.
pub struct SqliteInvoiceStorage<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteInvoiceStorage<'conn> {
    pub fn try_new(conn: &'conn Connection) -> StorageResult<Self> {
        ensure_connection_ready(conn, ENTITY, &["id", "datetime", "total", "customer_id"])?;
        Ok(Self { conn })
    }
}

impl Storage<Invoice> for SqliteInvoiceStorage<'_> {
    fn read_all(&self) -> StorageResult<Vec<Invoice>> {
        query_all(self.conn, ENTITY, INVOICE_SELECT_SQL, [], parse_invoice_row)
    }

    fn create(&self, invoice: &mut Invoice) -> StorageResult<()> {
        let id = insert_one(
            self.conn,
            ENTITY,
            true,
            INVOICE_INSERT_SQL,
            params![invoice.datetime, invoice.total, invoice.customer_id],
        )?;
        invoice.assign_id(id);
        Ok(())
    }
}

impl InvoiceStorage for SqliteInvoiceStorage<'_> {}

fn parse_invoice_row(row: &Row<'_>) -> rusqlite::Result<Invoice> {
    Ok(Invoice {
        id: read_id(row, "id")?,
        datetime: row.get("datetime")?,
        total: row.get("total")?,
        customer_id: row.get("customer_id")?,
    })
}
