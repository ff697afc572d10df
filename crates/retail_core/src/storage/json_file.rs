//! Read-only adapters over legacy JSON export files.
//!
//! # Responsibility
//! - Decode a whole entity collection from an already-opened reader.
//! - Satisfy the shared storage contracts so migrations stay backend-agnostic.
//!
//! # Invariants
//! - The reader is consumed by the first `read_all`; a second call fails
//!   with an internal decode error.
//! - `create` never persists anything and always succeeds.
//! - Aggregates return empty collections.
//! - A `null` or missing field decodes as unset. The exporter wrote unset
//!   invoice times as `0001-01-01T00:00:00Z`; that instant also decodes as unset.

use crate::model::customer::Customer;
use crate::model::invoice::Invoice;
use crate::model::product::Product;
use crate::model::report::{CustomerAmountSpent, CustomerConditionInfo, ProductSells};
use crate::model::sale::Sale;
use crate::model::{EntityId, Record, UNASSIGNED_ID};
use crate::storage::{
    CustomerStorage, InvoiceStorage, ProductStorage, SaleStorage, Storage, StorageError,
    StorageResult,
};
use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, error};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::cell::RefCell;
use std::io::Read;
use std::marker::PhantomData;

/// Wire-shaped record as it appears in a legacy export file.
pub trait WireRecord: DeserializeOwned {
    type Domain: Record;

    fn into_domain(self) -> Self::Domain;
}

/// Storage adapter decoding a JSON array of `W` records from `R`.
pub struct JsonFileStorage<R, W> {
    reader: RefCell<R>,
    _wire: PhantomData<fn() -> W>,
}

pub type JsonFileCustomerStorage<R> = JsonFileStorage<R, CustomerJsonRecord>;
pub type JsonFileProductStorage<R> = JsonFileStorage<R, ProductJsonRecord>;
pub type JsonFileInvoiceStorage<R> = JsonFileStorage<R, InvoiceJsonRecord>;
pub type JsonFileSaleStorage<R> = JsonFileStorage<R, SaleJsonRecord>;

impl<R: Read, W: WireRecord> JsonFileStorage<R, W> {
    /// Wraps a positioned reader; nothing is read until `read_all`.
    pub fn new(reader: R) -> Self {
        Self {
            reader: RefCell::new(reader),
            _wire: PhantomData,
        }
    }
}

impl<R: Read, W: WireRecord> Storage<W::Domain> for JsonFileStorage<R, W> {
    fn read_all(&self) -> StorageResult<Vec<W::Domain>> {
        let entity = <W::Domain as Record>::ENTITY;
        let mut reader = self.reader.borrow_mut();
        let wire: Vec<W> = serde_json::from_reader(&mut *reader).map_err(|err| {
            error!(
                "event=storage_read_all module=storage backend=json_file status=error entity={entity} error_kind=internal error={err}"
            );
            StorageError::internal(entity, err)
        })?;

        debug!(
            "event=storage_read_all module=storage backend=json_file status=ok entity={entity} rows={}",
            wire.len()
        );
        Ok(wire.into_iter().map(WireRecord::into_domain).collect())
    }

    fn create(&self, _record: &mut W::Domain) -> StorageResult<()> {
        Ok(())
    }
}

impl<R: Read> CustomerStorage for JsonFileCustomerStorage<R> {
    fn condition_info(&self) -> StorageResult<Vec<CustomerConditionInfo>> {
        Ok(Vec::new())
    }

    fn top_active_customers(&self) -> StorageResult<Vec<CustomerAmountSpent>> {
        Ok(Vec::new())
    }
}

impl<R: Read> ProductStorage for JsonFileProductStorage<R> {
    fn top_selled(&self) -> StorageResult<Vec<ProductSells>> {
        Ok(Vec::new())
    }
}

impl<R: Read> InvoiceStorage for JsonFileInvoiceStorage<R> {}

impl<R: Read> SaleStorage for JsonFileSaleStorage<R> {}

/// Legacy exports wrote the customer condition either as a code or a flag.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum ConditionValue {
    Code(i64),
    Flag(bool),
}

impl ConditionValue {
    fn code(self) -> i64 {
        match self {
            Self::Code(code) => code,
            Self::Flag(flag) => i64::from(flag),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CustomerJsonRecord {
    #[serde(default)]
    id: Option<EntityId>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    condition: Option<ConditionValue>,
}

impl WireRecord for CustomerJsonRecord {
    type Domain = Customer;

    fn into_domain(self) -> Customer {
        Customer {
            id: self.id.unwrap_or(UNASSIGNED_ID),
            first_name: self.first_name,
            last_name: self.last_name,
            condition: self.condition.map(ConditionValue::code),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProductJsonRecord {
    #[serde(default)]
    id: Option<EntityId>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    price: Option<f64>,
}

impl WireRecord for ProductJsonRecord {
    type Domain = Product;

    fn into_domain(self) -> Product {
        Product {
            id: self.id.unwrap_or(UNASSIGNED_ID),
            description: self.description,
            price: self.price,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct InvoiceJsonRecord {
    #[serde(default)]
    id: Option<EntityId>,
    #[serde(default)]
    datetime: Option<DateTime<Utc>>,
    #[serde(default)]
    total: Option<f64>,
    #[serde(default)]
    customer_id: Option<EntityId>,
}

impl WireRecord for InvoiceJsonRecord {
    type Domain = Invoice;

    fn into_domain(self) -> Invoice {
        Invoice {
            id: self.id.unwrap_or(UNASSIGNED_ID),
            datetime: self.datetime.filter(|datetime| !is_exporter_zero_time(datetime)),
            total: self.total,
            customer_id: self.customer_id,
        }
    }
}

fn is_exporter_zero_time(datetime: &DateTime<Utc>) -> bool {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .is_some_and(|zero| datetime.naive_utc() == zero)
}

#[derive(Debug, Deserialize)]
pub struct SaleJsonRecord {
    #[serde(default)]
    id: Option<EntityId>,
    #[serde(default)]
    quantity: Option<i64>,
    #[serde(default)]
    product_id: Option<EntityId>,
    #[serde(default)]
    invoice_id: Option<EntityId>,
}

impl WireRecord for SaleJsonRecord {
    type Domain = Sale;

    fn into_domain(self) -> Sale {
        Sale {
            id: self.id.unwrap_or(UNASSIGNED_ID),
            quantity: self.quantity,
            product_id: self.product_id,
            invoice_id: self.invoice_id,
        }
    }
}
