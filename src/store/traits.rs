use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::customer::{Customer, Email};
use crate::domain::order::{Order, OrderDetails, OrderHeader};
use crate::domain::product::Product;
use super::errors::StoreError;

// ============================================================================
// Store Contracts - capabilities the handlers depend on
// ============================================================================
//
// Reads go straight to the backend. Writes (`add`, `update`, `delete`) are
// only staged; nothing is visible to other scopes until the scope's
// `UnitOfWork::commit` succeeds.
//
// ============================================================================

#[async_trait]
pub trait CustomerStore: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Customer>, StoreError>;

    async fn get_all(&self) -> Result<Vec<Customer>, StoreError>;

    async fn email_exists(&self, email: &Email) -> Result<bool, StoreError>;

    async fn add(&self, customer: Customer) -> Result<(), StoreError>;

    async fn update(&self, customer: Customer) -> Result<(), StoreError>;

    /// Deleting a customer cascades to its orders
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError>;

    async fn get_all(&self) -> Result<Vec<Product>, StoreError>;

    async fn add(&self, product: Product) -> Result<(), StoreError>;

    async fn update(&self, product: Product) -> Result<(), StoreError>;

    /// Deleting a product cascades to the order lines referencing it
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Order root only, no lines
    async fn get_by_id(&self, id: Uuid) -> Result<Option<OrderHeader>, StoreError>;

    /// Order with its lines, its customer and the products the lines reference
    async fn get_with_lines(&self, id: Uuid) -> Result<Option<OrderDetails>, StoreError>;

    /// One page of orders, oldest first. `page` is 1-based.
    async fn get_all(&self, page: usize, page_size: usize) -> Result<Vec<OrderDetails>, StoreError>;

    async fn get_by_customer_id(&self, customer_id: Uuid) -> Result<Vec<OrderDetails>, StoreError>;

    async fn count(&self) -> Result<usize, StoreError>;

    async fn add(&self, order: Order) -> Result<(), StoreError>;

    /// Rewrites the order row and replaces its whole line set
    async fn update(&self, order: Order) -> Result<(), StoreError>;

    /// Deleting an order cascades to its lines
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Apply every change staged in this scope as one atomic write.
    /// On failure nothing is persisted.
    async fn commit(&self) -> Result<(), StoreError>;
}

/// Stores and unit of work of one request, sharing one change set
pub struct StoreScope {
    pub customers: Box<dyn CustomerStore>,
    pub products: Box<dyn ProductStore>,
    pub orders: Box<dyn OrderStore>,
    pub unit_of_work: Box<dyn UnitOfWork>,
}

/// Opens transactional scopes against one backend
pub trait DataContext: Send + Sync {
    fn begin(&self) -> StoreScope;
}

/// Items of 1-based `page` out of `items`
pub fn page_of<T>(items: Vec<T>, page: usize, page_size: usize) -> Vec<T> {
    let skip = page.saturating_sub(1).saturating_mul(page_size);
    items.into_iter().skip(skip).take(page_size).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_of_slices_one_based_pages() {
        let items: Vec<u32> = (1..=25).collect();

        assert_eq!(page_of(items.clone(), 1, 10), (1..=10).collect::<Vec<_>>());
        assert_eq!(page_of(items.clone(), 3, 10), (21..=25).collect::<Vec<_>>());
        assert!(page_of(items, 4, 10).is_empty());
    }

    #[test]
    fn test_page_zero_is_treated_as_first_page() {
        let items: Vec<u32> = (1..=5).collect();

        assert_eq!(page_of(items, 0, 2), vec![1, 2]);
    }
}
