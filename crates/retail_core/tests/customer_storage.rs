use chrono::{TimeZone, Utc};
use retail_core::db::open_db_in_memory;
use retail_core::{
    Customer, CustomerAmountSpent, CustomerConditionInfo, CustomerStorage, InternalCause, Invoice,
    SqliteCustomerStorage, SqliteInvoiceStorage, Storage, StorageError, UNASSIGNED_ID,
};
use rusqlite::Connection;

#[test]
fn read_all_on_empty_table_returns_empty_collection() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteCustomerStorage::try_new(&conn).unwrap();

    assert!(storage.read_all().unwrap().is_empty());
}

#[test]
fn create_assigns_id_and_read_all_returns_record() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteCustomerStorage::try_new(&conn).unwrap();

    let mut first = Customer::new("John", "Doe", 1);
    let mut second = Customer::new("Jane", "Roe", 0);
    storage.create(&mut first).unwrap();
    storage.create(&mut second).unwrap();

    assert_ne!(first.id, UNASSIGNED_ID);
    assert_ne!(first.id, second.id);

    let all = storage.read_all().unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.contains(&first));
    assert!(all.contains(&second));
}

#[test]
fn unset_fields_round_trip_as_none_and_zero_as_some() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteCustomerStorage::try_new(&conn).unwrap();

    let mut unset = Customer::default();
    let mut zero = Customer::new("", "", 0);
    storage.create(&mut unset).unwrap();
    storage.create(&mut zero).unwrap();

    let nulls: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM customers WHERE first_name IS NULL AND \"condition\" IS NULL;",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(nulls, 1);

    let all = storage.read_all().unwrap();
    let loaded_unset = all.iter().find(|c| c.id == unset.id).unwrap();
    assert_eq!(loaded_unset.first_name, None);
    assert_eq!(loaded_unset.condition, None);
    assert_eq!(loaded_unset.condition_or_default(), 0);

    let loaded_zero = all.iter().find(|c| c.id == zero.id).unwrap();
    assert_eq!(loaded_zero.first_name.as_deref(), Some(""));
    assert_eq!(loaded_zero.condition, Some(0));
}

#[test]
fn condition_info_counts_customers_per_condition() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteCustomerStorage::try_new(&conn).unwrap();

    for (first, last, condition) in [("John", "Doe", 0), ("Jane", "Doe", 1), ("John", "Smith", 1)] {
        storage
            .create(&mut Customer::new(first, last, condition))
            .unwrap();
    }

    let info = storage.condition_info().unwrap();
    assert_eq!(
        info,
        vec![
            CustomerConditionInfo {
                condition: Some(0),
                total: 1
            },
            CustomerConditionInfo {
                condition: Some(1),
                total: 2
            },
        ]
    );
}

#[test]
fn condition_info_on_empty_table_is_empty() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteCustomerStorage::try_new(&conn).unwrap();

    assert!(storage.condition_info().unwrap().is_empty());
}

#[test]
fn top_active_customers_ranks_by_invoiced_amount() {
    let conn = open_db_in_memory().unwrap();
    let customers = SqliteCustomerStorage::try_new(&conn).unwrap();
    let invoices = SqliteInvoiceStorage::try_new(&conn).unwrap();

    let mut john = Customer::new("John", "Doe", 1);
    let mut jane = Customer::new("Jane", "Doe", 1);
    customers.create(&mut john).unwrap();
    customers.create(&mut jane).unwrap();
    create_invoice(&invoices, john.id, 100.0);
    create_invoice(&invoices, jane.id, 200.0);

    let top = customers.top_active_customers().unwrap();
    assert_eq!(
        top,
        vec![
            CustomerAmountSpent {
                first_name: Some("Jane".to_string()),
                last_name: Some("Doe".to_string()),
                amount: 200.0,
            },
            CustomerAmountSpent {
                first_name: Some("John".to_string()),
                last_name: Some("Doe".to_string()),
                amount: 100.0,
            },
        ]
    );
}

#[test]
fn top_active_customers_sums_invoices_and_caps_at_five() {
    let conn = open_db_in_memory().unwrap();
    let customers = SqliteCustomerStorage::try_new(&conn).unwrap();
    let invoices = SqliteInvoiceStorage::try_new(&conn).unwrap();

    for index in 1..=7 {
        let mut customer = Customer::new(format!("Customer{index}"), "Test", 0);
        customers.create(&mut customer).unwrap();
        create_invoice(&invoices, customer.id, 10.0 * f64::from(index));
        create_invoice(&invoices, customer.id, 1.0);
    }

    let top = customers.top_active_customers().unwrap();
    assert_eq!(top.len(), 5);
    assert_eq!(top[0].first_name.as_deref(), Some("Customer7"));
    assert_eq!(top[0].amount, 71.0);
    assert_eq!(top[4].first_name.as_deref(), Some("Customer3"));
    assert!(top.windows(2).all(|pair| pair[0].amount >= pair[1].amount));
}

#[test]
fn top_active_customers_without_invoices_is_empty() {
    let conn = open_db_in_memory().unwrap();
    let customers = SqliteCustomerStorage::try_new(&conn).unwrap();
    customers
        .create(&mut Customer::new("John", "Doe", 0))
        .unwrap();

    assert!(customers.top_active_customers().unwrap().is_empty());
}

#[test]
fn try_new_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteCustomerStorage::try_new(&conn);
    match result {
        Err(StorageError::Internal {
            cause: InternalCause::SchemaNotReady(message),
            ..
        }) => assert!(message.contains("schema version 0")),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected schema readiness error"),
    }
}

#[test]
fn try_new_rejects_table_missing_columns() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE customers (id INTEGER PRIMARY KEY, first_name TEXT);
         PRAGMA user_version = 1;",
    )
    .unwrap();

    let result = SqliteCustomerStorage::try_new(&conn);
    match result {
        Err(StorageError::Internal {
            cause: InternalCause::SchemaNotReady(message),
            ..
        }) => assert!(message.contains("customers.last_name")),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected missing column error"),
    }
}

#[test]
fn read_all_failure_is_internal() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteCustomerStorage::try_new(&conn).unwrap();
    conn.execute_batch("DROP TABLE sales; DROP TABLE invoices; DROP TABLE customers;")
        .unwrap();

    let err = storage.read_all().unwrap_err();
    assert!(err.is_internal());
    assert!(err.to_string().starts_with("internal storage error. "));
}

fn create_invoice(storage: &SqliteInvoiceStorage<'_>, customer_id: i64, total: f64) {
    let datetime = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
    storage
        .create(&mut Invoice::new(datetime, total, customer_id))
        .unwrap();
}
