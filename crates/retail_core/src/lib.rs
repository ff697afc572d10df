//! Storage core for the retail service.
//!
//! Customers, products, invoices and sales are read and created through
//! backend-agnostic storage contracts, implemented over SQLite (the live
//! store) and over legacy JSON exports (the one-time migration source).

pub mod config;
pub mod db;
pub mod logging;
pub mod migration;
pub mod model;
pub mod storage;

pub use config::{AppConfig, ConfigError, SourceFiles};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use migration::{
    migrate_all, MigrationError, MigrationReport, MigrationResult, MigrationSources, Migrator,
    MIGRATION_ORDER,
};
pub use model::customer::Customer;
pub use model::invoice::Invoice;
pub use model::product::Product;
pub use model::report::{CustomerAmountSpent, CustomerConditionInfo, ProductSells};
pub use model::sale::Sale;
pub use model::{Entity, EntityId, Record, UNASSIGNED_ID};
pub use storage::json_file::{
    JsonFileCustomerStorage, JsonFileInvoiceStorage, JsonFileProductStorage, JsonFileSaleStorage,
    JsonFileStorage,
};
pub use storage::sqlite::{
    SqliteCustomerStorage, SqliteInvoiceStorage, SqliteProductStorage, SqliteSaleStorage,
};
pub use storage::{
    CustomerStorage, InternalCause, InvoiceStorage, ProductStorage, SaleStorage, Storage,
    StorageError, StorageResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
