//! Sale entity: one product line on an invoice.

use super::{impl_record, Entity, EntityId, UNASSIGNED_ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: EntityId,
    pub quantity: Option<i64>,
    /// Must reference an existing product at creation time.
    pub product_id: Option<EntityId>,
    /// Must reference an existing invoice at creation time.
    pub invoice_id: Option<EntityId>,
}

impl Sale {
    /// Creates an unpersisted sale line.
    pub fn new(quantity: i64, product_id: EntityId, invoice_id: EntityId) -> Self {
        Self {
            id: UNASSIGNED_ID,
            quantity: Some(quantity),
            product_id: Some(product_id),
            invoice_id: Some(invoice_id),
        }
    }
}

impl_record!(Sale, Entity::Sales);
