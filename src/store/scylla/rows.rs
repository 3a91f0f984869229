use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use scylla::deserialize::row::DeserializeRow;
use scylla::response::query_result::QueryResult;
use uuid::Uuid;

use crate::domain::customer::{Customer, Email, PhoneNumber};
use crate::domain::order::{OrderHeader, OrderLine};
use crate::domain::product::Product;
use crate::store::errors::StoreError;

pub(super) const CUSTOMER_COLUMNS: &str = "id, name, email, phone, birth_date";
pub(super) const PRODUCT_COLUMNS: &str = "id, title, description, slug, price";
pub(super) const ORDER_COLUMNS: &str = "id, customer_id, created_at, updated_at";
pub(super) const LINE_COLUMNS: &str = "id, product_id, quantity, total";

pub(super) type CustomerRow = (Uuid, String, String, String, NaiveDate);
pub(super) type ProductRow = (Uuid, String, String, String, String);
pub(super) type OrderRow = (Uuid, Uuid, DateTime<Utc>, Option<DateTime<Utc>>);
pub(super) type LineRow = (Uuid, Uuid, i32, String);

/// Deserialize every row of a SELECT result
pub(super) fn collect_rows<T>(result: QueryResult, context: &'static str) -> Result<Vec<T>, StoreError>
where
    T: for<'r> DeserializeRow<'r, 'r>,
{
    let rows_result = result
        .into_rows_result()
        .map_err(StoreError::database(context))?;

    rows_result
        .rows::<T>()
        .map_err(StoreError::database(context))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(StoreError::database(context))
}

fn parse_money(raw: &str, column: &str) -> Result<Decimal, StoreError> {
    Decimal::from_str(raw)
        .map_err(|e| StoreError::Corrupt(format!("{column} '{raw}' is not a decimal: {e}")))
}

pub(super) fn customer_from_row(row: CustomerRow) -> Customer {
    let (id, name, email, phone, birth_date) = row;
    Customer::restore(id, name, Email::new(email), PhoneNumber::new(phone), birth_date)
}

pub(super) fn product_from_row(row: ProductRow) -> Result<Product, StoreError> {
    let (id, title, description, slug, price) = row;
    let price = parse_money(&price, "products.price")?;
    Ok(Product::restore(id, title, description, slug, price))
}

pub(super) fn header_from_row(row: OrderRow) -> OrderHeader {
    let (id, customer_id, created_at, updated_at) = row;
    OrderHeader {
        id,
        customer_id,
        created_at,
        updated_at,
    }
}

pub(super) fn line_from_row(order_id: Uuid, row: LineRow) -> Result<OrderLine, StoreError> {
    let (id, product_id, quantity, total) = row;
    let total = parse_money(&total, "order_lines.total")?;
    Ok(OrderLine::restore(id, order_id, product_id, quantity, total))
}
