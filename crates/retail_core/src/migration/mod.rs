//! One-shot migration of legacy JSON exports into the relational store.
//!
//! # Responsibility
//! - Copy one entity collection from a source adapter to a destination adapter.
//! - Run the four entity migrations in foreign-key dependency order.
//!
//! # Invariants
//! - Records are created in source order.
//! - The first failing create aborts the migration; already created rows
//!   stay in place (no rollback).
//! - Entities are migrated strictly in [`MIGRATION_ORDER`].

use crate::model::customer::Customer;
use crate::model::invoice::Invoice;
use crate::model::product::Product;
use crate::model::sale::Sale;
use crate::model::{Entity, EntityId, Record};
use crate::storage::json_file::{
    JsonFileCustomerStorage, JsonFileInvoiceStorage, JsonFileProductStorage, JsonFileSaleStorage,
};
use crate::storage::sqlite::{
    SqliteCustomerStorage, SqliteInvoiceStorage, SqliteProductStorage, SqliteSaleStorage,
};
use crate::storage::{Storage, StorageError};
use log::{error, info};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Read;
use std::marker::PhantomData;
use std::time::Instant;

/// Order in which entities are migrated.
///
/// Invoices reference customers and sales reference both products and
/// invoices. Products have no dependency on invoices, so running them after
/// invoices is valid as long as sales come last.
pub const MIGRATION_ORDER: [Entity; 4] = [
    Entity::Customers,
    Entity::Invoices,
    Entity::Products,
    Entity::Sales,
];

pub type MigrationResult<T> = Result<T, MigrationError>;

/// Migration failure, naming the entity whose copy stopped.
///
/// `record_id` is the exported id of the record whose create failed; it is
/// `None` when the failure happened before any create was attempted.
#[derive(Debug)]
pub struct MigrationError {
    pub entity: Entity,
    pub record_id: Option<EntityId>,
    pub source: StorageError,
}

impl Display for MigrationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.record_id {
            Some(id) => write!(
                f,
                "migration of {} failed at exported id {id}: {}",
                self.entity, self.source
            ),
            None => write!(f, "migration of {} failed: {}", self.entity, self.source),
        }
    }
}

impl Error for MigrationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// Outcome of one successful entity migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationReport {
    pub entity: Entity,
    pub created: usize,
}

/// Copies every `T` from `source` into `destination`.
pub struct Migrator<T, D, S> {
    destination: D,
    source: S,
    _record: PhantomData<fn() -> T>,
}

impl<T, D, S> Migrator<T, D, S>
where
    T: Record,
    D: Storage<T>,
    S: Storage<T>,
{
    pub fn new(destination: D, source: S) -> Self {
        Self {
            destination,
            source,
            _record: PhantomData,
        }
    }

    /// Reads the whole source and creates each record in the destination.
    ///
    /// # Errors
    /// - Returns the source error when the collection cannot be read.
    /// - Returns the first destination error; later records are not attempted.
    pub fn migrate(&self) -> MigrationResult<MigrationReport> {
        let entity = T::ENTITY;
        let started_at = Instant::now();
        info!("event=migrate_entity module=migration status=start entity={entity}");

        let fail = |created: usize, record_id: Option<EntityId>, err: StorageError| {
            error!(
                "event=migrate_entity module=migration status=error entity={entity} created={created} record_id={} duration_ms={} error_kind={} error={err}",
                record_id.map_or_else(|| "-".to_string(), |id| id.to_string()),
                started_at.elapsed().as_millis(),
                err.kind()
            );
            MigrationError {
                entity,
                record_id,
                source: err,
            }
        };

        let mut records = self.source.read_all().map_err(|err| fail(0, None, err))?;
        let total = records.len();
        for (created, record) in records.iter_mut().enumerate() {
            // create overwrites the id, so capture the exported one first
            let exported_id = record.id();
            self.destination
                .create(record)
                .map_err(|err| fail(created, Some(exported_id), err))?;
        }

        info!(
            "event=migrate_entity module=migration status=ok entity={entity} records={total} created={total} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(MigrationReport {
            entity,
            created: total,
        })
    }
}

/// Positioned readers over the four legacy export files.
pub struct MigrationSources<C, I, P, S> {
    pub customers: C,
    pub invoices: I,
    pub products: P,
    pub sales: S,
}

/// Migrates all four legacy exports into `conn` in [`MIGRATION_ORDER`].
///
/// Stops at the first failing entity; entities migrated before it stay
/// persisted.
pub fn migrate_all<C, I, P, S>(
    conn: &Connection,
    sources: MigrationSources<C, I, P, S>,
) -> MigrationResult<Vec<MigrationReport>>
where
    C: Read,
    I: Read,
    P: Read,
    S: Read,
{
    let started_at = Instant::now();
    info!("event=migrate_all module=migration status=start");

    let MigrationSources {
        mut customers,
        mut invoices,
        mut products,
        mut sales,
    } = sources;

    let mut reports = Vec::with_capacity(MIGRATION_ORDER.len());
    for entity in MIGRATION_ORDER {
        let report = match entity {
            Entity::Customers => run::<Customer, _, _, _>(
                entity,
                || SqliteCustomerStorage::try_new(conn),
                JsonFileCustomerStorage::new(&mut customers),
            ),
            Entity::Invoices => run::<Invoice, _, _, _>(
                entity,
                || SqliteInvoiceStorage::try_new(conn),
                JsonFileInvoiceStorage::new(&mut invoices),
            ),
            Entity::Products => run::<Product, _, _, _>(
                entity,
                || SqliteProductStorage::try_new(conn),
                JsonFileProductStorage::new(&mut products),
            ),
            Entity::Sales => run::<Sale, _, _, _>(
                entity,
                || SqliteSaleStorage::try_new(conn),
                JsonFileSaleStorage::new(&mut sales),
            ),
        };

        match report {
            Ok(report) => reports.push(report),
            Err(err) => {
                error!(
                    "event=migrate_all module=migration status=error entity={} migrated_entities={} duration_ms={}",
                    err.entity,
                    reports.len(),
                    started_at.elapsed().as_millis()
                );
                return Err(err);
            }
        }
    }

    info!(
        "event=migrate_all module=migration status=ok migrated_entities={} duration_ms={}",
        reports.len(),
        started_at.elapsed().as_millis()
    );
    Ok(reports)
}

fn run<T, D, S, F>(entity: Entity, destination: F, source: S) -> MigrationResult<MigrationReport>
where
    F: FnOnce() -> Result<D, StorageError>,
    T: Record,
    D: Storage<T>,
    S: Storage<T>,
{
    let destination = destination().map_err(|source| MigrationError {
        entity,
        record_id: None,
        source,
    })?;
    Migrator::new(destination, source).migrate()
}
