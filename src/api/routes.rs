use actix_web::{web, HttpResponse, Responder};
use uuid::Uuid;

use crate::application::dto::{
    CreateOrderRequest, CustomerRequest, OrderQuery, PageQuery, ProductRequest,
    UpdateOrderRequest,
};
use crate::application::HandlerError;
use super::AppState;

type ApiResult = Result<HttpResponse, HandlerError>;

pub(super) async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "commerce-orders"
    }))
}

// ----------------------------------------------------------------------------
// Customers
// ----------------------------------------------------------------------------

pub(super) async fn list_customers(state: web::Data<AppState>, query: web::Query<PageQuery>) -> ApiResult {
    let customers = state.customers.get_all(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(customers))
}

pub(super) async fn create_customer(
    state: web::Data<AppState>,
    body: web::Json<CustomerRequest>,
) -> ApiResult {
    let customer = state.customers.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(customer))
}

pub(super) async fn get_customer(state: web::Data<AppState>, id: web::Path<Uuid>) -> ApiResult {
    let customer = state.customers.get_by_id(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(customer))
}

pub(super) async fn update_customer(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    body: web::Json<CustomerRequest>,
) -> ApiResult {
    let customer = state.customers.update(id.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(customer))
}

pub(super) async fn delete_customer(state: web::Data<AppState>, id: web::Path<Uuid>) -> ApiResult {
    let response = state.customers.delete(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

// ----------------------------------------------------------------------------
// Products
// ----------------------------------------------------------------------------

pub(super) async fn list_products(state: web::Data<AppState>, query: web::Query<PageQuery>) -> ApiResult {
    let products = state.products.get_all(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(products))
}

pub(super) async fn create_product(
    state: web::Data<AppState>,
    body: web::Json<ProductRequest>,
) -> ApiResult {
    let product = state.products.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(product))
}

pub(super) async fn get_product(state: web::Data<AppState>, id: web::Path<Uuid>) -> ApiResult {
    let product = state.products.get_by_id(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(product))
}

pub(super) async fn update_product(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    body: web::Json<ProductRequest>,
) -> ApiResult {
    let product = state.products.update(id.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(product))
}

pub(super) async fn delete_product(state: web::Data<AppState>, id: web::Path<Uuid>) -> ApiResult {
    let response = state.products.delete(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

// ----------------------------------------------------------------------------
// Orders
// ----------------------------------------------------------------------------

pub(super) async fn list_orders(state: web::Data<AppState>, query: web::Query<OrderQuery>) -> ApiResult {
    let orders = state.orders.get_all(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(orders))
}

pub(super) async fn create_order(
    state: web::Data<AppState>,
    body: web::Json<CreateOrderRequest>,
) -> ApiResult {
    let order = state.orders.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(order))
}

pub(super) async fn get_order(state: web::Data<AppState>, id: web::Path<Uuid>) -> ApiResult {
    let order = state.orders.get_by_id(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(order))
}

pub(super) async fn update_order(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    body: web::Json<UpdateOrderRequest>,
) -> ApiResult {
    let order = state.orders.update(id.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(order))
}

pub(super) async fn delete_order(state: web::Data<AppState>, id: web::Path<Uuid>) -> ApiResult {
    let response = state.orders.delete(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}
