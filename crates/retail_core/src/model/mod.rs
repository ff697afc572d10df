//! Retail domain model.
//!
//! # Responsibility
//! - Define the four persisted entities and the read-only report rows.
//! - Carry field presence explicitly: `None` is "unset", never a zero value.
//!
//! # Invariants
//! - Entity ids are assigned by the relational store; `0` means unassigned.
//! - Report rows are computed by aggregation and never persisted.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub mod customer;
pub mod invoice;
pub mod product;
pub mod report;
pub mod sale;

/// Store-assigned identifier shared by every entity.
pub type EntityId = i64;

/// Id value carried by entities that have not been persisted yet.
pub const UNASSIGNED_ID: EntityId = 0;

/// Entity kinds known to the retail store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    Customers,
    Invoices,
    Products,
    Sales,
}

impl Entity {
    /// Table (and log) name of this entity.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Customers => "customers",
            Self::Invoices => "invoices",
            Self::Products => "products",
            Self::Sales => "sales",
        }
    }

    /// Singular noun used in user-facing error text.
    pub fn singular(self) -> &'static str {
        match self {
            Self::Customers => "customer",
            Self::Invoices => "invoice",
            Self::Products => "product",
            Self::Sales => "sale",
        }
    }
}

impl Display for Entity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common behavior of persisted entities.
pub trait Record {
    /// Kind tag used for error context and logging.
    const ENTITY: Entity;

    /// Store-assigned id, or [`UNASSIGNED_ID`].
    fn id(&self) -> EntityId;

    /// Records the id generated by the store.
    fn assign_id(&mut self, id: EntityId);
}

macro_rules! impl_record {
    ($ty:ty, $entity:expr) => {
        impl $crate::model::Record for $ty {
            const ENTITY: $crate::model::Entity = $entity;

            fn id(&self) -> $crate::model::EntityId {
                self.id
            }

            fn assign_id(&mut self, id: $crate::model::EntityId) {
                self.id = id;
            }
        }
    };
}

pub(crate) use impl_record;

#[cfg(test)]
mod tests {
    use super::Entity;

    #[test]
    fn entity_names_match_table_names() {
        assert_eq!(Entity::Customers.to_string(), "customers");
        assert_eq!(Entity::Sales.as_str(), "sales");
        assert_eq!(Entity::Invoices.singular(), "invoice");
    }
}
