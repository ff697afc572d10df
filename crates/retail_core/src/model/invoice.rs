//! Invoice entity.

use super::{impl_record, Entity, EntityId, UNASSIGNED_ID};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An invoice issued to a customer.
///
/// `customer_id` must reference an existing customer when the invoice is
/// created; the relational adapter reports a relation error otherwise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: EntityId,
    pub datetime: Option<DateTime<Utc>>,
    pub total: Option<f64>,
    pub customer_id: Option<EntityId>,
}

impl Invoice {
    /// Creates an unpersisted invoice for `customer_id`.
    pub fn new(datetime: DateTime<Utc>, total: f64, customer_id: EntityId) -> Self {
        Self {
            id: UNASSIGNED_ID,
            datetime: Some(datetime),
            total: Some(total),
            customer_id: Some(customer_id),
        }
    }

    /// Total, defaulting to `0.0` when unset.
    pub fn total_or_default(&self) -> f64 {
        self.total.unwrap_or_default()
    }
}

impl_record!(Invoice, Entity::Invoices);
