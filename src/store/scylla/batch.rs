use chrono::Utc;
use scylla::client::session::Session;
use scylla::serialize::row::SerializeRow;
use scylla::statement::batch::Batch;
use uuid::Uuid;

use crate::domain::order::Order;
use crate::store::changes::Change;
use crate::store::errors::StoreError;
use super::rows::collect_rows;

// ============================================================================
// Unit of Work Commit - one LOGGED batch per scope
// ============================================================================
//
// Line rows are written with explicit timestamps: partition deletes at
// `write_ts`, inserts at `write_ts + 1`. Without that, a delete and a
// re-insert in the same batch share a timestamp and the tombstone wins.
//
// ============================================================================

type BoundValues = Box<dyn SerializeRow + Send + Sync>;

struct PendingBatch {
    batch: Batch,
    values: Vec<BoundValues>,
    write_ts: i64,
}

impl PendingBatch {
    fn new() -> Self {
        Self {
            batch: Batch::default(),
            values: Vec::new(),
            write_ts: Utc::now().timestamp_micros(),
        }
    }

    fn push(&mut self, statement: &str, values: BoundValues) {
        self.batch.append_statement(statement);
        self.values.push(values);
    }

    fn delete_order(&mut self, order_id: Uuid) {
        self.push("DELETE FROM orders WHERE id = ?", Box::new((order_id,)));
        self.delete_lines(order_id);
    }

    fn delete_lines(&mut self, order_id: Uuid) {
        self.push(
            "DELETE FROM order_lines USING TIMESTAMP ? WHERE order_id = ?",
            Box::new((self.write_ts, order_id)),
        );
    }

    fn write_order(&mut self, order: &Order) {
        self.push(
            "INSERT INTO orders (id, customer_id, created_at, updated_at) VALUES (?, ?, ?, ?)",
            Box::new((
                order.id(),
                order.customer_id(),
                order.created_at(),
                order.updated_at(),
            )),
        );

        self.delete_lines(order.id());

        for (position, line) in order.lines().iter().enumerate() {
            self.push(
                "INSERT INTO order_lines (order_id, position, id, product_id, quantity, total) \
                 VALUES (?, ?, ?, ?, ?, ?) USING TIMESTAMP ?",
                Box::new((
                    order.id(),
                    position as i32,
                    line.id(),
                    line.product_id(),
                    line.quantity(),
                    line.total().to_string(),
                    self.write_ts + 1,
                )),
            );
        }
    }
}

/// Write every change as one atomic batch. Cascades are resolved with reads
/// before the batch is sent.
pub(super) async fn commit(session: &Session, changes: Vec<Change>) -> Result<(), StoreError> {
    let change_count = changes.len();
    let mut pending = PendingBatch::new();

    for change in changes {
        match change {
            Change::AddCustomer(customer) | Change::UpdateCustomer(customer) => {
                pending.push(
                    "INSERT INTO customers (id, name, email, phone, birth_date) VALUES (?, ?, ?, ?, ?)",
                    Box::new((
                        customer.id(),
                        customer.name().to_string(),
                        customer.email().as_str().to_string(),
                        customer.phone().as_str().to_string(),
                        customer.birth_date(),
                    )),
                );
            }
            Change::DeleteCustomer(customer_id) => {
                let result = session
                    .query_unpaged("SELECT id FROM orders WHERE customer_id = ?", (customer_id,))
                    .await
                    .map_err(StoreError::database("Failed to load customer orders"))?;
                let orders: Vec<(Uuid,)> = collect_rows(result, "Failed to read customer orders")?;

                for (order_id,) in orders {
                    pending.delete_order(order_id);
                }
                pending.push("DELETE FROM customers WHERE id = ?", Box::new((customer_id,)));
            }
            Change::AddProduct(product) | Change::UpdateProduct(product) => {
                pending.push(
                    "INSERT INTO products (id, title, description, slug, price) VALUES (?, ?, ?, ?, ?)",
                    Box::new((
                        product.id(),
                        product.title().to_string(),
                        product.description().to_string(),
                        product.slug().to_string(),
                        product.price().to_string(),
                    )),
                );
            }
            Change::DeleteProduct(product_id) => {
                let result = session
                    .query_unpaged(
                        "SELECT order_id, position FROM order_lines WHERE product_id = ?",
                        (product_id,),
                    )
                    .await
                    .map_err(StoreError::database("Failed to load product lines"))?;
                let lines: Vec<(Uuid, i32)> = collect_rows(result, "Failed to read product lines")?;

                for (order_id, position) in lines {
                    let write_ts = pending.write_ts;
                    pending.push(
                        "DELETE FROM order_lines USING TIMESTAMP ? WHERE order_id = ? AND position = ?",
                        Box::new((write_ts, order_id, position)),
                    );
                }
                pending.push("DELETE FROM products WHERE id = ?", Box::new((product_id,)));
            }
            Change::AddOrder(order) | Change::UpdateOrder(order) => pending.write_order(&order),
            Change::DeleteOrder(order_id) => pending.delete_order(order_id),
        }
    }

    let statement_count = pending.values.len();
    session
        .batch(&pending.batch, pending.values)
        .await
        .map_err(StoreError::database("Failed to commit batch"))?;

    tracing::info!(
        change_count,
        statement_count,
        "✅ Committed changes in one batch"
    );

    Ok(())
}
