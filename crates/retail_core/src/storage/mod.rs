//! Storage contracts shared by every backend.
//!
//! # Responsibility
//! - Define one capability trait per entity (`ReadAll`, `Create`, aggregates).
//! - Define the error taxonomy adapters report through those traits.
//!
//! # Invariants
//! - `read_all` never returns a partial collection on error.
//! - `create` sets the generated id only on success.
//! - Adapters wrap failures and return immediately; nothing is retried.

use crate::model::customer::Customer;
use crate::model::invoice::Invoice;
use crate::model::product::Product;
use crate::model::report::{CustomerAmountSpent, CustomerConditionInfo, ProductSells};
use crate::model::sale::Sale;
use crate::model::{Entity, EntityId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod json_file;
pub mod sqlite;

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure reported by a storage adapter, tagged with the entity it concerns.
#[derive(Debug)]
pub enum StorageError {
    /// Backend malfunction, decode failure or broken invariant.
    Internal {
        entity: Entity,
        cause: InternalCause,
    },
    /// Reserved for point lookups.
    NotFound { entity: Entity, id: EntityId },
    /// A create referenced a row that does not exist.
    Relation {
        entity: Entity,
        cause: rusqlite::Error,
    },
}

/// Underlying reason of an [`StorageError::Internal`] failure.
#[derive(Debug)]
pub enum InternalCause {
    Sqlite(rusqlite::Error),
    Decode(serde_json::Error),
    RowsAffected(usize),
    MissingGeneratedId,
    SchemaNotReady(String),
}

impl StorageError {
    pub fn internal(entity: Entity, cause: impl Into<InternalCause>) -> Self {
        Self::Internal {
            entity,
            cause: cause.into(),
        }
    }

    /// Entity the failed operation was working on.
    pub fn entity(&self) -> Entity {
        match self {
            Self::Internal { entity, .. }
            | Self::NotFound { entity, .. }
            | Self::Relation { entity, .. } => *entity,
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_relation(&self) -> bool {
        matches!(self, Self::Relation { .. })
    }

    /// Short machine-readable kind used in log events.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Internal { .. } => "internal",
            Self::NotFound { .. } => "not_found",
            Self::Relation { .. } => "relation",
        }
    }
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Internal { cause, .. } => write!(f, "internal storage error. {cause}"),
            Self::NotFound { entity, id } => write!(f, "{} not found. id {id}", entity.singular()),
            Self::Relation { entity, cause } => {
                write!(f, "{} relation not found. {cause}", entity.singular())
            }
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Internal { cause, .. } => cause.source_error(),
            Self::NotFound { .. } => None,
            Self::Relation { cause, .. } => Some(cause),
        }
    }
}

impl InternalCause {
    fn source_error(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Decode(err) => Some(err),
            Self::RowsAffected(_) | Self::MissingGeneratedId | Self::SchemaNotReady(_) => None,
        }
    }
}

impl Display for InternalCause {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Decode(err) => write!(f, "{err}"),
            Self::RowsAffected(count) => write!(f, "rows affected != 1 (got {count})"),
            Self::MissingGeneratedId => f.write_str("store returned no generated id"),
            Self::SchemaNotReady(message) => write!(f, "schema not ready: {message}"),
        }
    }
}

impl From<rusqlite::Error> for InternalCause {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<serde_json::Error> for InternalCause {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value)
    }
}

/// Operations every backend provides for entity `T`.
pub trait Storage<T> {
    /// Returns every stored record; empty when there is none.
    fn read_all(&self) -> StorageResult<Vec<T>>;

    /// Persists `record` and writes the generated id back into it.
    fn create(&self, record: &mut T) -> StorageResult<()>;
}

/// Customer storage contract.
pub trait CustomerStorage: Storage<Customer> {
    /// Customer count per condition code.
    fn condition_info(&self) -> StorageResult<Vec<CustomerConditionInfo>>;

    /// Customers ranked by total invoiced amount, at most five.
    fn top_active_customers(&self) -> StorageResult<Vec<CustomerAmountSpent>>;
}

/// Product storage contract.
pub trait ProductStorage: Storage<Product> {
    /// Products ranked by cumulative quantity sold.
    fn top_selled(&self) -> StorageResult<Vec<ProductSells>>;
}

/// Invoice storage contract.
pub trait InvoiceStorage: Storage<Invoice> {}

/// Sale storage contract.
pub trait SaleStorage: Storage<Sale> {}

impl<T, S: Storage<T> + ?Sized> Storage<T> for &S {
    fn read_all(&self) -> StorageResult<Vec<T>> {
        (**self).read_all()
    }

    fn create(&self, record: &mut T) -> StorageResult<()> {
        (**self).create(record)
    }
}
