use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use commerce_orders::application::dto::{
    CreateOrderRequest, CustomerRequest, OrderLineRequest, OrderQuery, PageQuery,
    ProductRequest, UpdateOrderRequest,
};
use commerce_orders::application::{
    CustomerHandler, EntityKind, HandlerError, OrderHandler, ProductHandler,
};
use commerce_orders::store::{DataContext, MemoryDatabase};

struct Shop {
    customers: CustomerHandler,
    products: ProductHandler,
    orders: OrderHandler,
}

fn shop() -> Shop {
    let context: Arc<dyn DataContext> = Arc::new(MemoryDatabase::new());
    Shop {
        customers: CustomerHandler::new(context.clone()),
        products: ProductHandler::new(context.clone()),
        orders: OrderHandler::new(context),
    }
}

fn customer(name: &str, email: &str) -> CustomerRequest {
    CustomerRequest {
        name: name.to_string(),
        email: email.to_string(),
        phone: "555-0100".to_string(),
        birth_date: NaiveDate::from_ymd_opt(1985, 3, 9).unwrap(),
    }
}

fn product(title: &str, price: Decimal) -> ProductRequest {
    ProductRequest {
        title: title.to_string(),
        description: String::new(),
        slug: title.to_lowercase(),
        price,
    }
}

fn line(product_id: Uuid, quantity: i32) -> OrderLineRequest {
    OrderLineRequest {
        product_id,
        quantity,
    }
}

#[tokio::test]
async fn test_full_order_lifecycle() {
    let shop = shop();
    let ana = shop.customers.create(customer("A", "a@x.com")).await.unwrap();
    let widget = shop.products.create(product("Widget", Decimal::new(1000, 2))).await.unwrap();
    let gizmo = shop.products.create(product("Gizmo", Decimal::new(30050, 2))).await.unwrap();

    // Create
    let created = shop
        .orders
        .create(CreateOrderRequest {
            customer_id: ana.id,
            lines: vec![line(widget.id, 2)],
        })
        .await
        .unwrap();
    assert_eq!(created.customer_id, ana.id);
    assert_eq!(created.lines[0].total, Decimal::new(2000, 2));

    // Replace lines
    let updated = shop
        .orders
        .update(
            created.id,
            UpdateOrderRequest {
                lines: vec![line(widget.id, 1), line(gizmo.id, 3)],
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.lines.len(), 2);
    assert_eq!(updated.total_amount, Decimal::new(91150, 2));

    // Read back
    let fetched = shop.orders.get_by_id(created.id).await.unwrap();
    assert_eq!(fetched.customer_name, "A");
    assert_eq!(fetched.total_amount, updated.total_amount);
    let titles: Vec<&str> = fetched.lines.iter().map(|l| l.product_title.as_str()).collect();
    assert_eq!(titles, vec!["Widget", "Gizmo"]);

    // Delete
    shop.orders.delete(created.id).await.unwrap();
    let remaining = shop.orders.get_all(OrderQuery::default()).await.unwrap();
    assert_eq!(remaining.total_count, 0);
}

#[tokio::test]
async fn test_deleting_a_product_drops_its_lines_from_orders() {
    let shop = shop();
    let ana = shop.customers.create(customer("A", "a@x.com")).await.unwrap();
    let widget = shop.products.create(product("Widget", Decimal::ONE)).await.unwrap();
    let gizmo = shop.products.create(product("Gizmo", Decimal::TWO)).await.unwrap();

    let created = shop
        .orders
        .create(CreateOrderRequest {
            customer_id: ana.id,
            lines: vec![line(widget.id, 1), line(gizmo.id, 1)],
        })
        .await
        .unwrap();

    shop.products.delete(widget.id).await.unwrap();

    let fetched = shop.orders.get_by_id(created.id).await.unwrap();
    assert_eq!(fetched.lines.len(), 1);
    assert_eq!(fetched.lines[0].product_id, gizmo.id);
    assert_eq!(fetched.total_amount, Decimal::TWO);
}

#[tokio::test]
async fn test_rejected_workflows_leave_the_store_unchanged() {
    let shop = shop();
    let ana = shop.customers.create(customer("A", "a@x.com")).await.unwrap();
    let widget = shop.products.create(product("Widget", Decimal::ONE)).await.unwrap();

    let unknown_customer = shop
        .orders
        .create(CreateOrderRequest {
            customer_id: Uuid::now_v7(),
            lines: vec![line(widget.id, 1)],
        })
        .await;
    assert!(matches!(
        unknown_customer,
        Err(HandlerError::NotFound { entity: EntityKind::Customer, .. })
    ));

    let unknown_product = shop
        .orders
        .create(CreateOrderRequest {
            customer_id: ana.id,
            lines: vec![line(widget.id, 1), line(Uuid::now_v7(), 2)],
        })
        .await;
    assert!(matches!(
        unknown_product,
        Err(HandlerError::NotFound { entity: EntityKind::Product, .. })
    ));

    let negative = shop
        .orders
        .create(CreateOrderRequest {
            customer_id: ana.id,
            lines: vec![line(widget.id, -1)],
        })
        .await;
    assert!(matches!(negative, Err(HandlerError::InvalidArgument(_))));

    let orders = shop.orders.get_all(OrderQuery::default()).await.unwrap();
    assert_eq!(orders.total_count, 0);
}

#[tokio::test]
async fn test_deleting_absent_entities_is_not_found() {
    let shop = shop();
    let id = Uuid::now_v7();

    assert!(matches!(
        shop.orders.delete(id).await,
        Err(HandlerError::NotFound { entity: EntityKind::Order, .. })
    ));
    assert!(matches!(
        shop.customers.delete(id).await,
        Err(HandlerError::NotFound { entity: EntityKind::Customer, .. })
    ));
    assert!(matches!(
        shop.products.delete(id).await,
        Err(HandlerError::NotFound { entity: EntityKind::Product, .. })
    ));
}

#[tokio::test]
async fn test_customer_listing_pages() {
    let shop = shop();
    for i in 0..12 {
        shop.customers
            .create(customer("Customer", &format!("c{i}@x.com")))
            .await
            .unwrap();
    }

    let first = shop.customers.get_all(PageQuery::default()).await.unwrap();
    let second = shop
        .customers
        .get_all(PageQuery {
            page: Some(2),
            page_size: Some(10),
        })
        .await
        .unwrap();

    assert_eq!(first.customers.len(), 10);
    assert_eq!(second.customers.len(), 2);
    assert_eq!(first.total_count, 12);
}
