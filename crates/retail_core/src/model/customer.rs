//! Customer entity.

use super::{impl_record, Entity, EntityId, UNASSIGNED_ID};
use serde::{Deserialize, Serialize};

/// A retail customer.
///
/// `condition` is an integer category code; the store enforces no domain
/// for it beyond being an integer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: EntityId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub condition: Option<i64>,
}

impl Customer {
    /// Creates an unpersisted customer with every field set.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, condition: i64) -> Self {
        Self {
            id: UNASSIGNED_ID,
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
            condition: Some(condition),
        }
    }

    /// Condition code, or `0` when unset.
    pub fn condition_or_default(&self) -> i64 {
        self.condition.unwrap_or_default()
    }
}

impl_record!(Customer, Entity::Customers);
