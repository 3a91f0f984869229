//! HTTP API over the handlers.
//!
//! `/v1/customers`, `/v1/products` and `/v1/orders` each expose list,
//! create, get, update and delete. `HandlerError` maps onto 404/400/409/500
//! with a `{ "error": message }` body.

mod errors;
mod routes;

use std::sync::Arc;

use actix_web::web;

use crate::application::{CustomerHandler, OrderHandler, ProductHandler};
use crate::metrics::Metrics;
use crate::store::DataContext;

/// Handlers shared by every worker
#[derive(Clone)]
pub struct AppState {
    pub customers: CustomerHandler,
    pub products: ProductHandler,
    pub orders: OrderHandler,
}

impl AppState {
    pub fn new(context: Arc<dyn DataContext>, metrics: Option<Arc<Metrics>>) -> Self {
        let mut customers = CustomerHandler::new(context.clone());
        let mut products = ProductHandler::new(context.clone());
        let mut orders = OrderHandler::new(context);

        if let Some(metrics) = metrics {
            customers = customers.with_metrics(metrics.clone());
            products = products.with_metrics(metrics.clone());
            orders = orders.with_metrics(metrics);
        }

        Self {
            customers,
            products,
            orders,
        }
    }
}

/// Register every route; the caller provides `web::Data<AppState>`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(routes::health))
        .service(
            web::scope("/v1/customers")
                .route("", web::get().to(routes::list_customers))
                .route("", web::post().to(routes::create_customer))
                .route("/{id}", web::get().to(routes::get_customer))
                .route("/{id}", web::put().to(routes::update_customer))
                .route("/{id}", web::delete().to(routes::delete_customer)),
        )
        .service(
            web::scope("/v1/products")
                .route("", web::get().to(routes::list_products))
                .route("", web::post().to(routes::create_product))
                .route("/{id}", web::get().to(routes::get_product))
                .route("/{id}", web::put().to(routes::update_product))
                .route("/{id}", web::delete().to(routes::delete_product)),
        )
        .service(
            web::scope("/v1/orders")
                .route("", web::get().to(routes::list_orders))
                .route("", web::post().to(routes::create_order))
                .route("/{id}", web::get().to(routes::get_order))
                .route("/{id}", web::put().to(routes::update_order))
                .route("/{id}", web::delete().to(routes::delete_order)),
        );
}

// ============================================================================
// Unit Tests
// ============================================================================
