use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::application::dto::{
    line_responses, CreateOrderRequest, CreateOrderResponse, DeleteResponse, OrderLineRequest,
    OrderListResponse, OrderQuery, OrderResponse, UpdateOrderRequest, UpdateOrderResponse,
};
use crate::application::errors::{EntityKind, HandlerError};
use crate::domain::order::{Order, OrderLine};
use crate::domain::product::Product;
use crate::metrics::Metrics;
use crate::store::{page_of, DataContext, StoreScope};
use super::{commit, observe};

// ============================================================================
// Order Handler
// ============================================================================
//
// Orchestrates: Request → Customer/Product reads → Order aggregate →
// staged write → one commit → response
//
// Every referenced product is resolved before the aggregate is touched, so
// one unknown product aborts the whole workflow with nothing staged.
//
// ============================================================================

#[derive(Clone)]
pub struct OrderHandler {
    context: Arc<dyn DataContext>,
    metrics: Option<Arc<Metrics>>,
}

impl OrderHandler {
    pub fn new(context: Arc<dyn DataContext>) -> Self {
        Self {
            context,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub async fn create(&self, request: CreateOrderRequest) -> Result<CreateOrderResponse, HandlerError> {
        observe(self.metrics.as_deref(), "create_order", self.create_order(request)).await
    }

    /// Order with customer name, line product titles and total amount
    pub async fn get_by_id(&self, id: Uuid) -> Result<OrderResponse, HandlerError> {
        observe(self.metrics.as_deref(), "get_order", self.get_order(id)).await
    }

    /// One page of orders, optionally only those of one customer
    pub async fn get_all(&self, query: OrderQuery) -> Result<OrderListResponse, HandlerError> {
        observe(self.metrics.as_deref(), "list_orders", self.list_orders(query)).await
    }

    /// Replace every line of an order
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateOrderRequest,
    ) -> Result<UpdateOrderResponse, HandlerError> {
        observe(self.metrics.as_deref(), "update_order", self.update_order(id, request)).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<DeleteResponse, HandlerError> {
        observe(self.metrics.as_deref(), "delete_order", self.delete_order(id)).await
    }

    async fn create_order(&self, request: CreateOrderRequest) -> Result<CreateOrderResponse, HandlerError> {
        let scope = self.context.begin();

        let customer = scope
            .customers
            .get_by_id(request.customer_id)
            .await?
            .ok_or_else(|| HandlerError::not_found(EntityKind::Customer, request.customer_id))?;

        let products = resolve_products(&scope, &request.lines).await?;

        let mut order = Order::create(request.customer_id, &customer, Vec::new())?;
        for line in build_lines(order.id(), &request.lines, &products)? {
            order.add_line(line)?;
        }
        let total_amount = order.total_amount()?;

        scope.orders.add(order.clone()).await?;
        commit(&scope, self.metrics.as_deref()).await?;

        tracing::info!(
            order_id = %order.id(),
            customer_id = %order.customer_id(),
            line_count = order.lines().len(),
            total = %total_amount,
            "✅ Order created"
        );

        let lines = line_responses(&order, |product_id| title_of(&products, product_id));
        Ok(CreateOrderResponse {
            id: order.id(),
            customer_id: order.customer_id(),
            created_at: order.created_at(),
            lines,
        })
    }

    async fn get_order(&self, id: Uuid) -> Result<OrderResponse, HandlerError> {
        let scope = self.context.begin();
        let details = scope
            .orders
            .get_with_lines(id)
            .await?
            .ok_or_else(|| HandlerError::not_found(EntityKind::Order, id))?;

        Ok(OrderResponse::try_from(&details)?)
    }

    async fn list_orders(&self, query: OrderQuery) -> Result<OrderListResponse, HandlerError> {
        let scope = self.context.begin();
        let paging = query.paging();
        let (page, page_size) = (paging.page(), paging.page_size());

        let (orders, total_count) = match query.customer_id {
            Some(customer_id) => {
                let orders = scope.orders.get_by_customer_id(customer_id).await?;
                let total_count = orders.len();
                (page_of(orders, page, page_size), total_count)
            }
            None => {
                let orders = scope.orders.get_all(page, page_size).await?;
                (orders, scope.orders.count().await?)
            }
        };

        let orders = orders
            .iter()
            .map(OrderResponse::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(OrderListResponse {
            orders,
            page,
            page_size,
            total_count,
        })
    }

    async fn update_order(
        &self,
        id: Uuid,
        request: UpdateOrderRequest,
    ) -> Result<UpdateOrderResponse, HandlerError> {
        let scope = self.context.begin();

        let details = scope
            .orders
            .get_with_lines(id)
            .await?
            .ok_or_else(|| HandlerError::not_found(EntityKind::Order, id))?;

        let products = resolve_products(&scope, &request.lines).await?;

        let mut order = details.order;
        let new_lines = build_lines(order.id(), &request.lines, &products)?;
        order.replace_lines(new_lines)?;

        scope.orders.update(order).await?;
        commit(&scope, self.metrics.as_deref()).await?;

        tracing::info!(order_id = %id, line_count = request.lines.len(), "✅ Order lines replaced");

        // Respond with what was persisted, not with the in-memory copy
        let refreshed = scope
            .orders
            .get_with_lines(id)
            .await?
            .ok_or_else(|| HandlerError::not_found(EntityKind::Order, id))?;

        Ok(UpdateOrderResponse::try_from(&refreshed)?)
    }

    async fn delete_order(&self, id: Uuid) -> Result<DeleteResponse, HandlerError> {
        let scope = self.context.begin();
        if scope.orders.get_by_id(id).await?.is_none() {
            return Err(HandlerError::not_found(EntityKind::Order, id));
        }

        scope.orders.delete(id).await?;
        commit(&scope, self.metrics.as_deref()).await?;

        tracing::info!(order_id = %id, "✅ Order deleted");
        Ok(DeleteResponse::deleted("Order"))
    }
}

/// Load every product the lines reference; the first unknown id aborts
async fn resolve_products(
    scope: &StoreScope,
    lines: &[OrderLineRequest],
) -> Result<HashMap<Uuid, Product>, HandlerError> {
    let mut products = HashMap::new();

    for line in lines {
        if products.contains_key(&line.product_id) {
            continue;
        }

        let product = scope
            .products
            .get_by_id(line.product_id)
            .await?
            .ok_or_else(|| HandlerError::not_found(EntityKind::Product, line.product_id))?;
        products.insert(product.id(), product);
    }

    Ok(products)
}

fn build_lines(
    order_id: Uuid,
    requests: &[OrderLineRequest],
    products: &HashMap<Uuid, Product>,
) -> Result<Vec<OrderLine>, HandlerError> {
    requests
        .iter()
        .map(|request| {
            let product = products.get(&request.product_id).ok_or_else(|| {
                HandlerError::Unexpected(format!("product {} was not resolved", request.product_id))
            })?;
            OrderLine::create(order_id, request.quantity, request.product_id, product)
                .map_err(HandlerError::from)
        })
        .collect()
}

fn title_of(products: &HashMap<Uuid, Product>, product_id: Uuid) -> &str {
    products.get(&product_id).map(Product::title).unwrap_or_default()
}

// ============================================================================
// Unit Tests
// ============================================================================
