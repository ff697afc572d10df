//! Read-only report rows computed by aggregate queries.

use serde::{Deserialize, Serialize};

/// Number of customers sharing one condition code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerConditionInfo {
    /// `None` groups customers whose condition was never set.
    pub condition: Option<i64>,
    pub total: i64,
}

/// Sum of invoice totals for one customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerAmountSpent {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub amount: f64,
}

/// Cumulative quantity sold for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSells {
    pub description: Option<String>,
    pub quantity: i64,
}
