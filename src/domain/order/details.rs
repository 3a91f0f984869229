use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::customer::Customer;
use crate::domain::product::Product;
use super::aggregate::Order;

/// An order loaded together with its lines, its customer and every product
/// its lines reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetails {
    pub order: Order,
    pub customer: Customer,
    pub products: HashMap<Uuid, Product>,
}

impl OrderDetails {
    /// Title of a referenced product, or an empty string when the product
    /// is no longer in the catalog.
    pub fn product_title(&self, product_id: Uuid) -> &str {
        self.products
            .get(&product_id)
            .map(Product::title)
            .unwrap_or_default()
    }
}
