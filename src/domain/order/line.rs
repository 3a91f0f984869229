use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::product::Product;
use super::errors::OrderError;

// ============================================================================
// Order Line - quantity of one product with a frozen total
// ============================================================================
//
// `total` is computed once from the product price at construction and is
// never recomputed. Later price changes do not touch existing lines.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    id: Uuid,
    order_id: Uuid,
    product_id: Uuid,
    quantity: i32,
    total: Decimal,
}

impl OrderLine {
    pub fn create(
        order_id: Uuid,
        quantity: i32,
        product_id: Uuid,
        product: &Product,
    ) -> Result<Self, OrderError> {
        validate_quantity(quantity)?;

        if product.id() != product_id {
            return Err(OrderError::ProductMismatch {
                expected: product_id,
                actual: product.id(),
            });
        }

        let total = Decimal::from(quantity)
            .checked_mul(product.price())
            .ok_or(OrderError::TotalOverflow)?;

        Ok(Self {
            id: Uuid::now_v7(),
            order_id,
            product_id,
            quantity,
            total,
        })
    }

    /// Rebuild a line from persisted columns, keeping the stored total
    pub fn restore(id: Uuid, order_id: Uuid, product_id: Uuid, quantity: i32, total: Decimal) -> Self {
        Self {
            id,
            order_id,
            product_id,
            quantity,
            total,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn order_id(&self) -> Uuid {
        self.order_id
    }

    pub fn product_id(&self) -> Uuid {
        self.product_id
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }

    pub fn total(&self) -> Decimal {
        self.total
    }
}

/// Quantity rule shared by every path that builds a line
pub fn validate_quantity(quantity: i32) -> Result<(), OrderError> {
    if quantity <= 0 {
        return Err(OrderError::InvalidQuantity(quantity));
    }
    Ok(())
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product_priced(price: Decimal) -> Product {
        Product::new("Mouse Gamer", "Mouse Gamer RGB", "mouse-gamer-rgb", price).unwrap()
    }

    #[test]
    fn test_order_line_creation() {
        let order_id = Uuid::now_v7();
        let product = product_priced(Decimal::new(15000, 2));

        let line = OrderLine::create(order_id, 2, product.id(), &product).unwrap();

        assert!(!line.id().is_nil());
        assert_eq!(line.order_id(), order_id);
        assert_eq!(line.product_id(), product.id());
        assert_eq!(line.quantity(), 2);
        assert_eq!(line.total(), Decimal::new(30000, 2));
    }

    #[test]
    fn test_lines_with_same_data_get_distinct_ids() {
        let order_id = Uuid::now_v7();
        let product = product_priced(Decimal::new(10, 0));

        let first = OrderLine::create(order_id, 1, product.id(), &product).unwrap();
        let second = OrderLine::create(order_id, 1, product.id(), &product).unwrap();

        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn test_total_uses_exact_decimal_arithmetic() {
        let cases = [
            (3, Decimal::new(30050, 2), Decimal::new(90150, 2)),
            (1, Decimal::new(1999, 2), Decimal::new(1999, 2)),
            (10, Decimal::new(1, 1), Decimal::new(100, 2)),
            (7, Decimal::new(333, 2), Decimal::new(2331, 2)),
        ];

        for (quantity, price, expected) in cases {
            let product = product_priced(price);
            let line = OrderLine::create(Uuid::now_v7(), quantity, product.id(), &product).unwrap();
            assert_eq!(line.total(), expected, "quantity {quantity} x price {price}");
        }
    }

    #[test]
    fn test_zero_or_negative_quantity_is_rejected() {
        let product = product_priced(Decimal::new(10, 0));

        for quantity in [0, -1, -100, i32::MIN] {
            let result = OrderLine::create(Uuid::now_v7(), quantity, product.id(), &product);
            assert!(matches!(result, Err(OrderError::InvalidQuantity(q)) if q == quantity));
        }
    }

    #[test]
    fn test_quantity_is_checked_before_product_reference() {
        let product = product_priced(Decimal::new(10, 0));

        let result = OrderLine::create(Uuid::now_v7(), 0, Uuid::now_v7(), &product);

        assert!(matches!(result, Err(OrderError::InvalidQuantity(0))));
    }

    #[test]
    fn test_mismatched_product_reference_is_rejected() {
        let product = product_priced(Decimal::new(10, 0));

        let result = OrderLine::create(Uuid::now_v7(), 1, Uuid::now_v7(), &product);

        assert!(matches!(result, Err(OrderError::ProductMismatch { .. })));
    }

    #[test]
    fn test_total_is_a_price_snapshot() {
        let mut product = product_priced(Decimal::new(10, 0));
        let line = OrderLine::create(Uuid::now_v7(), 4, product.id(), &product).unwrap();

        product
            .update("Mouse Gamer", "Mouse Gamer RGB", "mouse-gamer-rgb", Decimal::new(99, 0))
            .unwrap();

        assert_eq!(line.total(), Decimal::new(40, 0));
    }

    #[test]
    fn test_total_beyond_decimal_range_is_rejected() {
        let product = product_priced(Decimal::MAX);

        let result = OrderLine::create(Uuid::now_v7(), 2, product.id(), &product);

        assert!(matches!(result, Err(OrderError::TotalOverflow)));
    }
}
