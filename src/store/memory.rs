//! In-memory backend for tests and local development.
//!
//! Committed state lives in one `RwLock`-guarded set of tables. A commit
//! applies its change set to a copy of the tables and swaps the copy in, so
//! a failing change leaves the committed state untouched.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::customer::{Customer, Email};
use crate::domain::order::{Order, OrderDetails, OrderHeader};
use crate::domain::product::Product;
use super::changes::{Change, ChangeSet};
use super::errors::StoreError;
use super::traits::{
    page_of, CustomerStore, DataContext, OrderStore, ProductStore, StoreScope, UnitOfWork,
};

#[derive(Debug, Clone, Default)]
struct Tables {
    customers: HashMap<Uuid, Customer>,
    products: HashMap<Uuid, Product>,
    orders: HashMap<Uuid, Order>,
}

impl Tables {
    fn apply(&mut self, change: Change) -> Result<(), StoreError> {
        match change {
            Change::AddCustomer(customer) => {
                insert_new(&mut self.customers, customer.id(), customer)
            }
            Change::UpdateCustomer(customer) => {
                replace_existing(&mut self.customers, customer.id(), customer)
            }
            Change::DeleteCustomer(id) => {
                self.customers.remove(&id);
                self.orders.retain(|_, order| order.customer_id() != id);
                Ok(())
            }
            Change::AddProduct(product) => insert_new(&mut self.products, product.id(), product),
            Change::UpdateProduct(product) => {
                replace_existing(&mut self.products, product.id(), product)
            }
            Change::DeleteProduct(id) => {
                self.products.remove(&id);
                for order in self.orders.values_mut() {
                    if order.lines().iter().any(|line| line.product_id() == id) {
                        let kept = order
                            .lines()
                            .iter()
                            .filter(|line| line.product_id() != id)
                            .cloned()
                            .collect();
                        *order = Order::restore(order.header(), kept);
                    }
                }
                Ok(())
            }
            Change::AddOrder(order) => insert_new(&mut self.orders, order.id(), order),
            Change::UpdateOrder(order) => replace_existing(&mut self.orders, order.id(), order),
            Change::DeleteOrder(id) => {
                self.orders.remove(&id);
                Ok(())
            }
        }
    }

    fn details(&self, order: &Order) -> Result<OrderDetails, StoreError> {
        let customer = self
            .customers
            .get(&order.customer_id())
            .cloned()
            .ok_or_else(|| {
                StoreError::Corrupt(format!(
                    "order {} references missing customer {}",
                    order.id(),
                    order.customer_id()
                ))
            })?;

        let products = order
            .lines()
            .iter()
            .filter_map(|line| self.products.get(&line.product_id()))
            .map(|product| (product.id(), product.clone()))
            .collect();

        Ok(OrderDetails {
            order: order.clone(),
            customer,
            products,
        })
    }

    /// Orders oldest first; ids break ties
    fn sorted_orders(&self) -> Vec<&Order> {
        let mut orders: Vec<&Order> = self.orders.values().collect();
        orders.sort_by_key(|order| (order.created_at(), order.id()));
        orders
    }
}

fn insert_new<T>(table: &mut HashMap<Uuid, T>, id: Uuid, row: T) -> Result<(), StoreError> {
    if table.contains_key(&id) {
        return Err(StoreError::DuplicateKey(id));
    }
    table.insert(id, row);
    Ok(())
}

fn replace_existing<T>(table: &mut HashMap<Uuid, T>, id: Uuid, row: T) -> Result<(), StoreError> {
    match table.get_mut(&id) {
        Some(existing) => {
            *existing = row;
            Ok(())
        }
        None => Err(StoreError::MissingRow(id)),
    }
}

/// Shared in-memory database. Clones point at the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|e| StoreError::LockPoisoned(format!("Failed to acquire read lock: {e}")))
    }
}

impl DataContext for MemoryDatabase {
    fn begin(&self) -> StoreScope {
        let scope = MemoryScope {
            db: self.clone(),
            changes: ChangeSet::new(),
        };

        StoreScope {
            customers: Box::new(scope.clone()),
            products: Box::new(scope.clone()),
            orders: Box::new(scope.clone()),
            unit_of_work: Box::new(scope),
        }
    }
}

/// One scope's view: committed tables plus its private change set
#[derive(Debug, Clone)]
struct MemoryScope {
    db: MemoryDatabase,
    changes: ChangeSet,
}

#[async_trait]
impl CustomerStore for MemoryScope {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Customer>, StoreError> {
        Ok(self.db.read()?.customers.get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Customer>, StoreError> {
        let mut customers: Vec<Customer> = self.db.read()?.customers.values().cloned().collect();
        customers.sort_by_key(Customer::id);
        Ok(customers)
    }

    async fn email_exists(&self, email: &Email) -> Result<bool, StoreError> {
        Ok(self
            .db
            .read()?
            .customers
            .values()
            .any(|customer| customer.email() == email))
    }

    async fn add(&self, customer: Customer) -> Result<(), StoreError> {
        self.changes.stage(Change::AddCustomer(customer))
    }

    async fn update(&self, customer: Customer) -> Result<(), StoreError> {
        self.changes.stage(Change::UpdateCustomer(customer))
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.changes.stage(Change::DeleteCustomer(id))
    }
}

#[async_trait]
impl ProductStore for MemoryScope {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        Ok(self.db.read()?.products.get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Product>, StoreError> {
        let mut products: Vec<Product> = self.db.read()?.products.values().cloned().collect();
        products.sort_by_key(Product::id);
        Ok(products)
    }

    async fn add(&self, product: Product) -> Result<(), StoreError> {
        self.changes.stage(Change::AddProduct(product))
    }

    async fn update(&self, product: Product) -> Result<(), StoreError> {
        self.changes.stage(Change::UpdateProduct(product))
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.changes.stage(Change::DeleteProduct(id))
    }
}

#[async_trait]
impl OrderStore for MemoryScope {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<OrderHeader>, StoreError> {
        Ok(self.db.read()?.orders.get(&id).map(Order::header))
    }

    async fn get_with_lines(&self, id: Uuid) -> Result<Option<OrderDetails>, StoreError> {
        let tables = self.db.read()?;
        tables.orders.get(&id).map(|order| tables.details(order)).transpose()
    }

    async fn get_all(&self, page: usize, page_size: usize) -> Result<Vec<OrderDetails>, StoreError> {
        let tables = self.db.read()?;
        page_of(tables.sorted_orders(), page, page_size)
            .into_iter()
            .map(|order| tables.details(order))
            .collect()
    }

    async fn get_by_customer_id(&self, customer_id: Uuid) -> Result<Vec<OrderDetails>, StoreError> {
        let tables = self.db.read()?;
        tables
            .sorted_orders()
            .into_iter()
            .filter(|order| order.customer_id() == customer_id)
            .map(|order| tables.details(order))
            .collect()
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.db.read()?.orders.len())
    }

    async fn add(&self, order: Order) -> Result<(), StoreError> {
        self.changes.stage(Change::AddOrder(order))
    }

    async fn update(&self, order: Order) -> Result<(), StoreError> {
        self.changes.stage(Change::UpdateOrder(order))
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.changes.stage(Change::DeleteOrder(id))
    }
}

#[async_trait]
impl UnitOfWork for MemoryScope {
    async fn commit(&self) -> Result<(), StoreError> {
        let changes = self.changes.take()?;
        if changes.is_empty() {
            tracing::debug!("Nothing to commit");
            return Ok(());
        }

        let change_count = changes.len();
        let mut tables = self
            .db
            .tables
            .write()
            .map_err(|e| StoreError::LockPoisoned(format!("Failed to acquire write lock: {e}")))?;

        let mut staged = tables.clone();
        for change in changes {
            staged.apply(change)?;
        }
        *tables = staged;

        tracing::info!(change_count, "✅ Committed changes to memory store");
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use crate::domain::customer::PhoneNumber;
    use crate::domain::order::OrderLine;

    fn create_test_customer(email: &str) -> Customer {
        Customer::new(
            "Cliente Teste",
            Email::new(email),
            PhoneNumber::new("(11) 11111-1111"),
            NaiveDate::from_ymd_opt(1980, 1, 1).unwrap(),
        )
        .unwrap()
    }

    fn create_test_product(price: i64) -> Product {
        Product::new("Produto", "Descrição", "produto", Decimal::new(price, 0)).unwrap()
    }

    fn create_test_order(customer: &Customer, product: &Product, quantity: i32) -> Order {
        let mut order = Order::create(customer.id(), customer, Vec::new()).unwrap();
        let line = OrderLine::create(order.id(), quantity, product.id(), product).unwrap();
        order.add_line(line).unwrap();
        order
    }

    async fn seed(db: &MemoryDatabase, customer: &Customer, product: &Product) {
        let scope = db.begin();
        scope.customers.add(customer.clone()).await.unwrap();
        scope.products.add(product.clone()).await.unwrap();
        scope.unit_of_work.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_staged_writes_are_invisible_until_commit() {
        let db = MemoryDatabase::new();
        let customer = create_test_customer("a@x.com");
        let scope = db.begin();

        scope.customers.add(customer.clone()).await.unwrap();
        assert!(scope.customers.get_by_id(customer.id()).await.unwrap().is_none());

        scope.unit_of_work.commit().await.unwrap();
        assert_eq!(
            scope.customers.get_by_id(customer.id()).await.unwrap(),
            Some(customer)
        );
    }

    #[tokio::test]
    async fn test_dropped_scope_discards_changes() {
        let db = MemoryDatabase::new();
        let customer = create_test_customer("a@x.com");

        {
            let scope = db.begin();
            scope.customers.add(customer.clone()).await.unwrap();
        }

        let scope = db.begin();
        scope.unit_of_work.commit().await.unwrap();
        assert!(scope.customers.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_commit_with_no_changes_succeeds() {
        let db = MemoryDatabase::new();
        assert!(db.begin().unit_of_work.commit().await.is_ok());
    }

    #[tokio::test]
    async fn test_failed_commit_persists_nothing() {
        let db = MemoryDatabase::new();
        let existing = create_test_customer("a@x.com");
        let product = create_test_product(10);
        seed(&db, &existing, &product).await;

        let scope = db.begin();
        let newcomer = create_test_customer("b@x.com");
        scope.customers.add(newcomer.clone()).await.unwrap();
        scope.customers.add(existing.clone()).await.unwrap();

        let result = scope.unit_of_work.commit().await;

        assert!(matches!(result, Err(StoreError::DuplicateKey(id)) if id == existing.id()));
        assert!(scope.customers.get_by_id(newcomer.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_of_missing_row_fails() {
        let db = MemoryDatabase::new();
        let scope = db.begin();
        let product = create_test_product(10);

        scope.products.update(product.clone()).await.unwrap();

        let result = scope.unit_of_work.commit().await;
        assert!(matches!(result, Err(StoreError::MissingRow(id)) if id == product.id()));
    }

    #[tokio::test]
    async fn test_email_exists() {
        let db = MemoryDatabase::new();
        let customer = create_test_customer("joao@email.com");
        seed(&db, &customer, &create_test_product(10)).await;

        let scope = db.begin();
        assert!(scope.customers.email_exists(&Email::new("joao@email.com")).await.unwrap());
        assert!(!scope.customers.email_exists(&Email::new("other@email.com")).await.unwrap());
    }

    #[tokio::test]
    async fn test_bare_and_detailed_order_reads() {
        let db = MemoryDatabase::new();
        let customer = create_test_customer("a@x.com");
        let product = create_test_product(25);
        seed(&db, &customer, &product).await;

        let order = create_test_order(&customer, &product, 2);
        let scope = db.begin();
        scope.orders.add(order.clone()).await.unwrap();
        scope.unit_of_work.commit().await.unwrap();

        let header = scope.orders.get_by_id(order.id()).await.unwrap().unwrap();
        assert_eq!(header, order.header());

        let details = scope.orders.get_with_lines(order.id()).await.unwrap().unwrap();
        assert_eq!(details.order, order);
        assert_eq!(details.customer, customer);
        assert_eq!(details.product_title(product.id()), "Produto");

        assert!(scope.orders.get_by_id(Uuid::now_v7()).await.unwrap().is_none());
        assert!(scope.orders.get_with_lines(Uuid::now_v7()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_orders_are_paged_oldest_first() {
        let db = MemoryDatabase::new();
        let customer = create_test_customer("a@x.com");
        let product = create_test_product(5);
        seed(&db, &customer, &product).await;

        let scope = db.begin();
        let mut ids = Vec::new();
        for quantity in 1..=5 {
            let order = create_test_order(&customer, &product, quantity);
            ids.push(order.id());
            scope.orders.add(order).await.unwrap();
        }
        scope.unit_of_work.commit().await.unwrap();

        let second_page = scope.orders.get_all(2, 2).await.unwrap();
        let second_ids: Vec<Uuid> = second_page.iter().map(|d| d.order.id()).collect();
        assert_eq!(second_ids, ids[2..4].to_vec());
        assert_eq!(scope.orders.count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_orders_by_customer() {
        let db = MemoryDatabase::new();
        let first = create_test_customer("a@x.com");
        let second = create_test_customer("b@x.com");
        let product = create_test_product(5);
        seed(&db, &first, &product).await;

        let scope = db.begin();
        scope.customers.add(second.clone()).await.unwrap();
        scope.orders.add(create_test_order(&first, &product, 1)).await.unwrap();
        scope.orders.add(create_test_order(&second, &product, 1)).await.unwrap();
        scope.orders.add(create_test_order(&second, &product, 2)).await.unwrap();
        scope.unit_of_work.commit().await.unwrap();

        let orders = scope.orders.get_by_customer_id(second.id()).await.unwrap();
        assert_eq!(orders.len(), 2);
        assert!(orders.iter().all(|d| d.order.customer_id() == second.id()));
        assert!(scope.orders.get_by_customer_id(Uuid::now_v7()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deleting_customer_cascades_to_orders() {
        let db = MemoryDatabase::new();
        let customer = create_test_customer("a@x.com");
        let product = create_test_product(5);
        seed(&db, &customer, &product).await;

        let scope = db.begin();
        let order = create_test_order(&customer, &product, 1);
        scope.orders.add(order.clone()).await.unwrap();
        scope.unit_of_work.commit().await.unwrap();

        scope.customers.delete(customer.id()).await.unwrap();
        scope.unit_of_work.commit().await.unwrap();

        assert!(scope.orders.get_by_id(order.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_deleting_product_cascades_to_lines() {
        let db = MemoryDatabase::new();
        let customer = create_test_customer("a@x.com");
        let kept = create_test_product(5);
        let dropped = create_test_product(7);
        seed(&db, &customer, &kept).await;

        let scope = db.begin();
        scope.products.add(dropped.clone()).await.unwrap();
        let mut order = create_test_order(&customer, &kept, 1);
        let line = OrderLine::create(order.id(), 2, dropped.id(), &dropped).unwrap();
        order.add_line(line).unwrap();
        scope.orders.add(order.clone()).await.unwrap();
        scope.unit_of_work.commit().await.unwrap();

        scope.products.delete(dropped.id()).await.unwrap();
        scope.unit_of_work.commit().await.unwrap();

        let details = scope.orders.get_with_lines(order.id()).await.unwrap().unwrap();
        assert_eq!(details.order.lines().len(), 1);
        assert_eq!(details.order.lines()[0].product_id(), kept.id());
        assert_eq!(details.order.updated_at(), order.updated_at());
    }

    #[tokio::test]
    async fn test_deleting_absent_rows_is_a_no_op() {
        let db = MemoryDatabase::new();
        let scope = db.begin();

        scope.orders.delete(Uuid::now_v7()).await.unwrap();
        scope.customers.delete(Uuid::now_v7()).await.unwrap();
        scope.products.delete(Uuid::now_v7()).await.unwrap();

        assert!(scope.unit_of_work.commit().await.is_ok());
    }
}
