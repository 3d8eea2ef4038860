//! Shared helpers for the repository tests: an in-memory SQLite pool with
//! the real migrations applied, plus direct-insert seeders for rows the test
//! wants to place without going through the repositories under test.

use chrono::{NaiveDate, Utc};
use core_types::{Customer, Customization, Order, OrderStatus, OrderTime, Product};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use uuid::Uuid;

/// A fresh in-memory database with the schema applied. One connection only,
/// since every in-memory connection is its own database.
pub async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");
    pool
}

pub async fn seed_customer(pool: &SqlitePool, name: &str) -> Customer {
    let now = Utc::now();
    let customer = Customer {
        id: Uuid::new_v4(),
        name: name.to_string(),
        mobile_number: "9999999999".to_string(),
        created_at: now,
        updated_at: now,
    };
    sqlx::query(
        "INSERT INTO customers (id, name, mobile_number, created_at, updated_at) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(customer.id)
    .bind(&customer.name)
    .bind(&customer.mobile_number)
    .bind(customer.created_at)
    .bind(customer.updated_at)
    .execute(pool)
    .await
    .expect("seed customer");
    customer
}

pub async fn seed_product(pool: &SqlitePool, name: &str) -> Product {
    let product = Product {
        id: Uuid::new_v4(),
        name: name.to_string(),
    };
    sqlx::query("INSERT INTO products (id, name) VALUES ($1, $2)")
        .bind(product.id)
        .bind(&product.name)
        .execute(pool)
        .await
        .expect("seed product");
    product
}

pub async fn seed_customization(
    pool: &SqlitePool,
    product_id: Uuid,
    description: &str,
    price: f64,
) -> Customization {
    let customization = Customization {
        id: Uuid::new_v4(),
        description: description.to_string(),
        price,
        product_id,
    };
    sqlx::query(
        "INSERT INTO customizations (id, description, price, product_id) VALUES ($1, $2, $3, $4)",
    )
    .bind(customization.id)
    .bind(&customization.description)
    .bind(customization.price)
    .bind(customization.product_id)
    .execute(pool)
    .await
    .expect("seed customization");
    customization
}

/// Inserts a bare order row with the given date, amount, and status. The
/// dashboard tests need arbitrary historical orders without going through
/// `OrderRepository::create`.
pub async fn seed_order(
    pool: &SqlitePool,
    customer_id: Uuid,
    order_date: NaiveDate,
    order_amount: f64,
    order_status: OrderStatus,
) -> Order {
    let now = Utc::now();
    let order = Order {
        id: Uuid::new_v4(),
        customer_id,
        order_time: OrderTime::Morning,
        order_date,
        order_amount,
        order_status,
        total_items: 1,
        created_at: now,
        updated_at: now,
    };
    sqlx::query(
        r#"
        INSERT INTO orders (id, customer_id, order_time, order_date, order_amount, order_status, total_items, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(order.id)
    .bind(order.customer_id)
    .bind(order.order_time)
    .bind(order.order_date)
    .bind(order.order_amount)
    .bind(order.order_status)
    .bind(order.total_items)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(pool)
    .await
    .expect("seed order");
    order
}

pub async fn seed_item(
    pool: &SqlitePool,
    order_id: Uuid,
    product_id: Uuid,
    customization_id: Option<Uuid>,
    quantity: i64,
) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO items (id, order_id, product_id, customization_id, quantity) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(id)
    .bind(order_id)
    .bind(product_id)
    .bind(customization_id)
    .bind(quantity)
    .execute(pool)
    .await
    .expect("seed item");
    id
}
