//! ScyllaDB backend.
//!
//! Reads query the cluster directly. Writes are staged in the scope's
//! change set and sent as one LOGGED batch on commit (see `batch`).

mod batch;
mod rows;
mod schema;

pub use schema::ensure_schema;

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use scylla::client::session::Session;
use scylla::client::session_builder::SessionBuilder;
use uuid::Uuid;

use crate::config::ScyllaConfig;
use crate::domain::customer::{Customer, Email};
use crate::domain::order::{Order, OrderDetails, OrderHeader};
use crate::domain::product::Product;
use crate::utils::retry::{retry_with_backoff, RetryConfig};
use super::changes::{Change, ChangeSet};
use super::errors::StoreError;
use super::traits::{
    page_of, CustomerStore, DataContext, OrderStore, ProductStore, StoreScope, UnitOfWork,
};
use rows::{
    collect_rows, customer_from_row, header_from_row, line_from_row, product_from_row,
    CustomerRow, LineRow, OrderRow, ProductRow, CUSTOMER_COLUMNS, LINE_COLUMNS, ORDER_COLUMNS,
    PRODUCT_COLUMNS,
};

#[derive(Clone)]
pub struct ScyllaDatabase {
    session: Arc<Session>,
}

impl ScyllaDatabase {
    /// Connect with retries, then make sure the schema exists.
    pub async fn connect(config: &ScyllaConfig) -> anyhow::Result<Self> {
        tracing::info!(nodes = ?config.nodes, keyspace = %config.keyspace, "Connecting to ScyllaDB...");

        let session = retry_with_backoff(RetryConfig::startup(config.connect_attempts), |attempt| {
            let builder = SessionBuilder::new().known_nodes(&config.nodes);
            async move {
                tracing::debug!(attempt, "Opening ScyllaDB session");
                builder.build().await
            }
        })
        .await
        .into_result()
        .context("Failed to connect to ScyllaDB")?;

        ensure_schema(&session, &config.keyspace)
            .await
            .context("Failed to prepare schema")?;

        tracing::info!("✅ Connected to ScyllaDB");
        Ok(Self::from_session(Arc::new(session)))
    }

    /// Wrap a session that already uses the right keyspace
    pub fn from_session(session: Arc<Session>) -> Self {
        Self { session }
    }
}

impl DataContext for ScyllaDatabase {
    fn begin(&self) -> StoreScope {
        let scope = ScyllaScope {
            session: self.session.clone(),
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

#[derive(Clone)]
struct ScyllaScope {
    session: Arc<Session>,
    changes: ChangeSet,
}

impl ScyllaScope {
    async fn load_customer(&self, id: Uuid) -> Result<Option<Customer>, StoreError> {
        let result = self
            .session
            .query_unpaged(
                format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?"),
                (id,),
            )
            .await
            .map_err(StoreError::database("Failed to load customer"))?;

        let rows: Vec<CustomerRow> = collect_rows(result, "Failed to read customer")?;
        Ok(rows.into_iter().next().map(customer_from_row))
    }

    async fn load_product(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        let result = self
            .session
            .query_unpaged(
                format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"),
                (id,),
            )
            .await
            .map_err(StoreError::database("Failed to load product"))?;

        let rows: Vec<ProductRow> = collect_rows(result, "Failed to read product")?;
        rows.into_iter().next().map(product_from_row).transpose()
    }

    async fn load_headers(&self, customer_id: Option<Uuid>) -> Result<Vec<OrderHeader>, StoreError> {
        let result = match customer_id {
            Some(customer_id) => {
                self.session
                    .query_unpaged(
                        format!("SELECT {ORDER_COLUMNS} FROM orders WHERE customer_id = ?"),
                        (customer_id,),
                    )
                    .await
            }
            None => {
                self.session
                    .query_unpaged(format!("SELECT {ORDER_COLUMNS} FROM orders"), ())
                    .await
            }
        }
        .map_err(StoreError::database("Failed to load orders"))?;

        let rows: Vec<OrderRow> = collect_rows(result, "Failed to read orders")?;
        let mut headers: Vec<OrderHeader> = rows.into_iter().map(header_from_row).collect();

        // CQL cannot order by a non-clustering column
        headers.sort_by_key(|header| (header.created_at, header.id));
        Ok(headers)
    }

    /// Lines, customer and referenced products of one order
    async fn load_details(&self, header: OrderHeader) -> Result<OrderDetails, StoreError> {
        let result = self
            .session
            .query_unpaged(
                format!("SELECT {LINE_COLUMNS} FROM order_lines WHERE order_id = ?"),
                (header.id,),
            )
            .await
            .map_err(StoreError::database("Failed to load order lines"))?;

        let rows: Vec<LineRow> = collect_rows(result, "Failed to read order lines")?;
        let lines = rows
            .into_iter()
            .map(|row| line_from_row(header.id, row))
            .collect::<Result<Vec<_>, _>>()?;

        let customer = self.load_customer(header.customer_id).await?.ok_or_else(|| {
            StoreError::Corrupt(format!(
                "order {} references missing customer {}",
                header.id, header.customer_id
            ))
        })?;

        let mut products = HashMap::new();
        for line in &lines {
            if products.contains_key(&line.product_id()) {
                continue;
            }
            if let Some(product) = self.load_product(line.product_id()).await? {
                products.insert(product.id(), product);
            }
        }

        Ok(OrderDetails {
            order: Order::restore(header, lines),
            customer,
            products,
        })
    }

    async fn load_all_details(&self, headers: Vec<OrderHeader>) -> Result<Vec<OrderDetails>, StoreError> {
        let mut details = Vec::with_capacity(headers.len());
        for header in headers {
            details.push(self.load_details(header).await?);
        }
        Ok(details)
    }
}

#[async_trait]
impl CustomerStore for ScyllaScope {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Customer>, StoreError> {
        self.load_customer(id).await
    }

    async fn get_all(&self) -> Result<Vec<Customer>, StoreError> {
        let result = self
            .session
            .query_unpaged(format!("SELECT {CUSTOMER_COLUMNS} FROM customers"), ())
            .await
            .map_err(StoreError::database("Failed to list customers"))?;

        let rows: Vec<CustomerRow> = collect_rows(result, "Failed to read customers")?;
        let mut customers: Vec<Customer> = rows.into_iter().map(customer_from_row).collect();
        customers.sort_by_key(Customer::id);
        Ok(customers)
    }

    async fn email_exists(&self, email: &Email) -> Result<bool, StoreError> {
        let result = self
            .session
            .query_unpaged("SELECT id FROM customers WHERE email = ?", (email.as_str(),))
            .await
            .map_err(StoreError::database("Failed to look up email"))?;

        let rows: Vec<(Uuid,)> = collect_rows(result, "Failed to read email lookup")?;
        Ok(!rows.is_empty())
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
impl ProductStore for ScyllaScope {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        self.load_product(id).await
    }

    async fn get_all(&self) -> Result<Vec<Product>, StoreError> {
        let result = self
            .session
            .query_unpaged(format!("SELECT {PRODUCT_COLUMNS} FROM products"), ())
            .await
            .map_err(StoreError::database("Failed to list products"))?;

        let rows: Vec<ProductRow> = collect_rows(result, "Failed to read products")?;
        let mut products = rows
            .into_iter()
            .map(product_from_row)
            .collect::<Result<Vec<_>, _>>()?;
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
impl OrderStore for ScyllaScope {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<OrderHeader>, StoreError> {
        let result = self
            .session
            .query_unpaged(format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"), (id,))
            .await
            .map_err(StoreError::database("Failed to load order"))?;

        let rows: Vec<OrderRow> = collect_rows(result, "Failed to read order")?;
        Ok(rows.into_iter().next().map(header_from_row))
    }

    async fn get_with_lines(&self, id: Uuid) -> Result<Option<OrderDetails>, StoreError> {
        match OrderStore::get_by_id(self, id).await? {
            Some(header) => Ok(Some(self.load_details(header).await?)),
            None => Ok(None),
        }
    }

    async fn get_all(&self, page: usize, page_size: usize) -> Result<Vec<OrderDetails>, StoreError> {
        let headers = page_of(self.load_headers(None).await?, page, page_size);
        self.load_all_details(headers).await
    }

    async fn get_by_customer_id(&self, customer_id: Uuid) -> Result<Vec<OrderDetails>, StoreError> {
        let headers = self.load_headers(Some(customer_id)).await?;
        self.load_all_details(headers).await
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let result = self
            .session
            .query_unpaged("SELECT COUNT(*) FROM orders", ())
            .await
            .map_err(StoreError::database("Failed to count orders"))?;

        let rows: Vec<(i64,)> = collect_rows(result, "Failed to read order count")?;
        Ok(rows.first().map_or(0, |(count,)| *count as usize))
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
impl UnitOfWork for ScyllaScope {
    async fn commit(&self) -> Result<(), StoreError> {
        let changes = self.changes.take()?;
        if changes.is_empty() {
            tracing::debug!("Nothing to commit");
            return Ok(());
        }

        batch::commit(&self.session, changes).await
    }
}
