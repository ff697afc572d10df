//! Customer rows and customer reports.

use super::{ensure_connection_ready, insert_one, query_all, read_id};
use crate::model::customer::Customer;
use crate::model::report::{CustomerAmountSpent, CustomerConditionInfo};
use crate::model::{Entity, Record};
use crate::storage::{CustomerStorage, Storage, StorageResult};
use rusqlite::{params, Connection, Row};

const ENTITY: Entity = Customer::ENTITY;
const TOP_ACTIVE_CUSTOMERS_LIMIT: i64 = 5;

const CUSTOMER_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    \"condition\"
FROM customers;";

const CUSTOMER_INSERT_SQL: &str = "INSERT INTO customers (
    first_name,
    last_name,
    \"condition\"
) VALUES (?1, ?2, ?3);";

const CONDITION_INFO_SQL: &str = "SELECT
    \"condition\",
    COUNT(*) AS total
FROM customers
GROUP BY \"condition\"
ORDER BY \"condition\" ASC;";

const TOP_ACTIVE_CUSTOMERS_SQL: &str = "SELECT
    c.first_name,
    c.last_name,
    TOTAL(i.total) AS amount
FROM customers c
INNER JOIN invoices i ON i.customer_id = c.id
GROUP BY c.id, c.first_name, c.last_name
ORDER BY amount DESC, c.id ASC
LIMIT ?1;";

/// SQLite-backed customer storage.
pub struct SqliteCustomerStorage<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCustomerStorage<'conn> {
    /// Constructs the adapter from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> StorageResult<Self> {
        ensure_connection_ready(conn, ENTITY, &["id", "first_name", "last_name", "condition"])?;
        Ok(Self { conn })
    }
}

impl Storage<Customer> for SqliteCustomerStorage<'_> {
    fn read_all(&self) -> StorageResult<Vec<Customer>> {
        query_all(self.conn, ENTITY, CUSTOMER_SELECT_SQL, [], parse_customer_row)
    }

    fn create(&self, customer: &mut Customer) -> StorageResult<()> {
        let id = insert_one(
            self.conn,
            ENTITY,
            false,
            CUSTOMER_INSERT_SQL,
            params![
                customer.first_name.as_deref(),
                customer.last_name.as_deref(),
                customer.condition,
            ],
        )?;
        customer.assign_id(id);
        Ok(())
    }
}

impl CustomerStorage for SqliteCustomerStorage<'_> {
    fn condition_info(&self) -> StorageResult<Vec<CustomerConditionInfo>> {
        query_all(self.conn, ENTITY, CONDITION_INFO_SQL, [], |row| {
            Ok(CustomerConditionInfo {
                condition: row.get("condition")?,
                total: row.get::<_, Option<i64>>("total")?.unwrap_or_default(),
            })
        })
    }

    fn top_active_customers(&self) -> StorageResult<Vec<CustomerAmountSpent>> {
        query_all(
            self.conn,
            ENTITY,
            TOP_ACTIVE_CUSTOMERS_SQL,
            [TOP_ACTIVE_CUSTOMERS_LIMIT],
            |row| {
                Ok(CustomerAmountSpent {
                    first_name: row.get("first_name")?,
                    last_name: row.get("last_name")?,
                    amount: row.get::<_, Option<f64>>("amount")?.unwrap_or_default(),
                })
            },
        )
    }
}

fn parse_customer_row(row: &Row<'_>) -> rusqlite::Result<Customer> {
    Ok(Customer {
        id: read_id(row, "id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        condition: row.get("condition")?,
    })
}
