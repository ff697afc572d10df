//! Product entity.

use super::{impl_record, Entity, EntityId, UNASSIGNED_ID};
use serde::{Deserialize, Serialize};

/// A product on sale. `price` is a non-negative monetary value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: EntityId,
    pub description: Option<String>,
    pub price: Option<f64>,
}

impl Product {
    /// Creates an unpersisted product.
    pub fn new(description: impl Into<String>, price: f64) -> Self {
        Self {
            id: UNASSIGNED_ID,
            description: Some(description.into()),
            price: Some(price),
        }
    }

    /// Price, defaulting to `0.0` when unset.
    pub fn price_or_default(&self) -> f64 {
        self.price.unwrap_or_default()
    }
}

impl_record!(Product, Entity::Products);

#[cfg(test)]
mod tests {
    use super::Product;

    #[test]
    fn unset_price_defaults_to_zero() {
        let product = Product::default();
        assert_eq!(product.price, None);
        assert_eq!(product.price_or_default(), 0.0);
    }
}
