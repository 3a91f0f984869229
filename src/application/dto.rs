use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::customer::Customer;
use crate::domain::order::{Order, OrderDetails, OrderError};
use crate::domain::product::Product;

// ============================================================================
// Request / Response DTOs (camelCase JSON)
// ============================================================================

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// `?page=&pageSize=` query; missing or zero values fall back to defaults
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl PageQuery {
    /// 1-based page number
    pub fn page(&self) -> usize {
        self.page.filter(|page| *page > 0).unwrap_or(DEFAULT_PAGE)
    }

    pub fn page_size(&self) -> usize {
        self.page_size.filter(|size| *size > 0).unwrap_or(DEFAULT_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

impl DeleteResponse {
    pub fn deleted(what: &str) -> Self {
        Self {
            success: true,
            message: format!("{what} deleted"),
        }
    }
}

// ----------------------------------------------------------------------------
// Customers
// ----------------------------------------------------------------------------

/// Body of both create and update
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub birth_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub birth_date: NaiveDate,
}

impl From<&Customer> for CustomerResponse {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id(),
            name: customer.name().to_string(),
            email: customer.email().as_str().to_string(),
            phone: customer.phone().as_str().to_string(),
            birth_date: customer.birth_date(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerListResponse {
    pub customers: Vec<CustomerResponse>,
    pub page: usize,
    pub page_size: usize,
    pub total_count: usize,
}

// ----------------------------------------------------------------------------
// Products
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub title: String,
    pub description: String,
    pub slug: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub slug: String,
    pub price: Decimal,
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id(),
            title: product.title().to_string(),
            description: product.description().to_string(),
            slug: product.slug().to_string(),
            price: product.price(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListResponse {
    pub products: Vec<ProductResponse>,
    pub page: usize,
    pub page_size: usize,
    pub total_count: usize,
}

// ----------------------------------------------------------------------------
// Orders
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub customer_id: Uuid,
    #[serde(default)]
    pub lines: Vec<OrderLineRequest>,
}

/// Full replacement of an order's lines
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    #[serde(default)]
    pub lines: Vec<OrderLineRequest>,
}

/// `?page=&pageSize=&customerId=`
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuery {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub customer_id: Option<Uuid>,
}

impl OrderQuery {
    pub fn paging(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_title: String,
    pub quantity: i32,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<OrderLineResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub lines: Vec<OrderLineResponse>,
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub lines: Vec<OrderLineResponse>,
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListResponse {
    pub orders: Vec<OrderResponse>,
    pub page: usize,
    pub page_size: usize,
    pub total_count: usize,
}

/// Line projections, titles looked up by product id
pub(crate) fn line_responses<'a, F>(order: &Order, title_of: F) -> Vec<OrderLineResponse>
where
    F: Fn(Uuid) -> &'a str,
{
    order
        .lines()
        .iter()
        .map(|line| OrderLineResponse {
            id: line.id(),
            product_id: line.product_id(),
            product_title: title_of(line.product_id()).to_string(),
            quantity: line.quantity(),
            total: line.total(),
        })
        .collect()
}

impl TryFrom<&OrderDetails> for OrderResponse {
    type Error = OrderError;

    fn try_from(details: &OrderDetails) -> Result<Self, Self::Error> {
        let order = &details.order;
        Ok(Self {
            id: order.id(),
            customer_id: order.customer_id(),
            customer_name: details.customer.name().to_string(),
            created_at: order.created_at(),
            updated_at: order.updated_at(),
            lines: line_responses(order, |product_id| details.product_title(product_id)),
            total_amount: order.total_amount()?,
        })
    }
}

impl TryFrom<&OrderDetails> for UpdateOrderResponse {
    type Error = OrderError;

    fn try_from(details: &OrderDetails) -> Result<Self, Self::Error> {
        let order = &details.order;
        Ok(Self {
            id: order.id(),
            customer_id: order.customer_id(),
            created_at: order.created_at(),
            updated_at: order.updated_at(),
            lines: line_responses(order, |product_id| details.product_title(product_id)),
            total_amount: order.total_amount()?,
        })
    }
}
