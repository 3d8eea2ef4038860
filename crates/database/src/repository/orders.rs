use crate::DbError;
use crate::repository::dates::month_window;
use chrono::{DateTime, Datelike, Utc};
use core_types::{Item, NewOrder, Order, OrderStatus, OrderUpdate, OrderWithItems, PaidFilter};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Data access for the `orders` and `items` tables. Orders own their items;
/// every mutation of the item set recomputes the stored totals.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates an order together with its items in one transaction.
    ///
    /// Validates that the customer exists, the item list is non-empty, every
    /// referenced product exists, and every supplied customization id
    /// resolves. The order amount is `sum(customization price x quantity)`;
    /// items without a customization contribute zero to the amount but still
    /// count toward `total_items`.
    pub async fn create(&self, new: &NewOrder) -> Result<OrderWithItems, DbError> {
        if new.items.is_empty() {
            return Err(DbError::Validation(
                "an order must contain at least one item".to_string(),
            ));
        }

        let customer_exists: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE id = $1")
                .bind(new.customer_id)
                .fetch_one(&self.pool)
                .await?;
        if customer_exists == 0 {
            return Err(DbError::NotFound("customer".to_string()));
        }

        let prices = self.resolve_items(&new.items).await?;

        let mut order_amount = 0.0;
        let mut total_items = 0;
        for item in &new.items {
            if let Some(customization_id) = item.customization_id {
                // resolve_items guarantees the id is present
                if let Some(price) = prices.get(&customization_id) {
                    order_amount += price * item.quantity as f64;
                }
            }
            total_items += item.quantity;
        }

        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4(),
            customer_id: new.customer_id,
            order_time: new.order_time,
            order_date: new.order_date,
            order_amount,
            order_status: OrderStatus::Unpaid,
            total_items,
            created_at: now,
            updated_at: now,
        };

        let mut tx = self.pool.begin().await?;
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
        .execute(&mut *tx)
        .await?;

        for item in &new.items {
            insert_item(&mut tx, order.id, item.product_id, item.customization_id, item.quantity)
                .await?;
        }
        tx.commit().await?;

        tracing::info!(order_id = %order.id, customer_id = %order.customer_id, "Created order.");
        self.require(order.id).await
    }

    /// Full read of every order, used by the admin listing.
    pub async fn get_all(&self) -> Result<Vec<OrderWithItems>, DbError> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, customer_id, order_time, order_date, order_amount, order_status, total_items, created_at, updated_at
            FROM orders
            ORDER BY order_date DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        self.attach_details(orders).await
    }

    /// Orders dated within the calendar month `now` falls in.
    pub async fn get_for_month(&self, now: DateTime<Utc>) -> Result<Vec<OrderWithItems>, DbError> {
        let today = now.date_naive();
        let (start, end) = month_window(today.year(), today.month())?;
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, customer_id, order_time, order_date, order_amount, order_status, total_items, created_at, updated_at
            FROM orders
            WHERE order_date >= $1 AND order_date < $2
            ORDER BY order_date DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        self.attach_details(orders).await
    }

    /// One customer's orders, optionally narrowed to a calendar month and a
    /// payment filter. The year defaults to the current one when only a
    /// month is given.
    pub async fn get_for_customer(
        &self,
        customer_id: Uuid,
        month: Option<u32>,
        year: Option<i32>,
        paid: PaidFilter,
        now: DateTime<Utc>,
    ) -> Result<Vec<OrderWithItems>, DbError> {
        let customer_exists: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE id = $1")
                .bind(customer_id)
                .fetch_one(&self.pool)
                .await?;
        if customer_exists == 0 {
            return Err(DbError::NotFound("customer".to_string()));
        }

        let window = match month {
            Some(month) => Some(month_window(year.unwrap_or(now.date_naive().year()), month)?),
            None => None,
        };

        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, customer_id, order_time, order_date, order_amount, order_status, total_items, created_at, updated_at
            FROM orders
            WHERE customer_id = $1
            ORDER BY order_date DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        let orders = orders
            .into_iter()
            .filter(|order| {
                paid.matches(order.order_status)
                    && window
                        .map(|(start, end)| order.order_date >= start && order.order_date < end)
                        .unwrap_or(true)
            })
            .collect();
        self.attach_details(orders).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<OrderWithItems>, DbError> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, customer_id, order_time, order_date, order_amount, order_status, total_items, created_at, updated_at
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        match order {
            Some(order) => Ok(self.attach_details(vec![order]).await?.into_iter().next()),
            None => Ok(None),
        }
    }

    /// Applies a partial update. When a replacement item list is supplied the
    /// existing set is diffed against it: rows whose id is absent from the
    /// incoming list are deleted, incoming lines with a known id are updated
    /// in place, the rest are inserted. The whole diff plus the totals
    /// recompute runs in a single transaction.
    pub async fn update(&self, id: Uuid, update: &OrderUpdate) -> Result<OrderWithItems, DbError> {
        let existing = self.require(id).await?;
        let mut order = existing.order;

        if let Some(items) = &update.items {
            if items.is_empty() {
                return Err(DbError::Validation(
                    "an order must contain at least one item".to_string(),
                ));
            }
            self.resolve_items(items).await?;
        }

        if let Some(order_time) = update.order_time {
            order.order_time = order_time;
        }
        if let Some(order_date) = update.order_date {
            order.order_date = order_date;
        }
        if let Some(order_status) = update.order_status {
            order.order_status = order_status;
        }
        if let Some(order_amount) = update.order_amount {
            order.order_amount = order_amount;
        }
        order.updated_at = Utc::now();

        let mut tx = self.pool.begin().await?;

        if let Some(items) = &update.items {
            let existing_ids: HashSet<Uuid> = existing.items.iter().map(|i| i.id).collect();
            let incoming_ids: HashSet<Uuid> = items.iter().filter_map(|i| i.id).collect();

            for stale in existing.items.iter().filter(|i| !incoming_ids.contains(&i.id)) {
                sqlx::query("DELETE FROM items WHERE id = $1")
                    .bind(stale.id)
                    .execute(&mut *tx)
                    .await?;
            }

            for item in items {
                match item.id {
                    // A known, pre-existing id: update in place.
                    Some(item_id) if existing_ids.contains(&item_id) => {
                        sqlx::query(
                            "UPDATE items SET product_id = $1, customization_id = $2, quantity = $3 WHERE id = $4",
                        )
                        .bind(item.product_id)
                        .bind(item.customization_id)
                        .bind(item.quantity)
                        .bind(item_id)
                        .execute(&mut *tx)
                        .await?;
                    }
                    // No id, or a temporary client-side id: insert as new.
                    _ => {
                        insert_item(&mut tx, id, item.product_id, item.customization_id, item.quantity)
                            .await?;
                    }
                }
            }

            order.total_items = items.iter().map(|i| i.quantity).sum();
        }

        sqlx::query(
            r#"
            UPDATE orders
            SET order_time = $1, order_date = $2, order_amount = $3, order_status = $4, total_items = $5, updated_at = $6
            WHERE id = $7
            "#,
        )
        .bind(order.order_time)
        .bind(order.order_date)
        .bind(order.order_amount)
        .bind(order.order_status)
        .bind(order.total_items)
        .bind(order.updated_at)
        .bind(order.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        self.require(id).await
    }

    /// Deletes an order and its items in one transaction. Deletes are
    /// physical; the items go first so the foreign key is never dangling.
    pub async fn delete(&self, id: Uuid) -> Result<(), DbError> {
        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        if exists == 0 {
            return Err(DbError::NotFound("order".to_string()));
        }

        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM items WHERE order_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    /// Validates every referenced product and customization for a batch of
    /// incoming items and returns the customization price map.
    async fn resolve_items(
        &self,
        items: &[core_types::OrderItemInput],
    ) -> Result<HashMap<Uuid, f64>, DbError> {
        for item in items {
            if item.quantity <= 0 {
                return Err(DbError::Validation(
                    "item quantity must be positive".to_string(),
                ));
            }
            let product_exists: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE id = $1")
                    .bind(item.product_id)
                    .fetch_one(&self.pool)
                    .await?;
            if product_exists == 0 {
                return Err(DbError::NotFound("product".to_string()));
            }
        }

        let mut prices = HashMap::new();
        for item in items {
            let Some(customization_id) = item.customization_id else {
                continue;
            };
            if prices.contains_key(&customization_id) {
                continue;
            }
            let price: Option<f64> =
                sqlx::query_scalar("SELECT price FROM customizations WHERE id = $1")
                    .bind(customization_id)
                    .fetch_optional(&self.pool)
                    .await?;
            match price {
                Some(price) => {
                    prices.insert(customization_id, price);
                }
                None => {
                    return Err(DbError::Validation(format!(
                        "customization {customization_id} does not exist"
                    )));
                }
            }
        }
        Ok(prices)
    }

    async fn require(&self, id: Uuid) -> Result<OrderWithItems, DbError> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::NotFound("order".to_string()))
    }

    /// Joins customer names and item lists onto a page of orders.
    async fn attach_details(&self, orders: Vec<Order>) -> Result<Vec<OrderWithItems>, DbError> {
        let names: Vec<(Uuid, String)> =
            sqlx::query_as("SELECT id, name FROM customers")
                .fetch_all(&self.pool)
                .await?;
        let names: HashMap<Uuid, String> = names.into_iter().collect();

        let order_ids: HashSet<Uuid> = orders.iter().map(|o| o.id).collect();
        let items = sqlx::query_as::<_, Item>(
            "SELECT id, order_id, product_id, customization_id, quantity FROM items",
        )
        .fetch_all(&self.pool)
        .await?;
        let mut by_order: HashMap<Uuid, Vec<Item>> = HashMap::new();
        for item in items {
            if order_ids.contains(&item.order_id) {
                by_order.entry(item.order_id).or_default().push(item);
            }
        }

        Ok(orders
            .into_iter()
            .map(|order| {
                let customer_name = names.get(&order.customer_id).cloned().unwrap_or_default();
                let items = by_order.remove(&order.id).unwrap_or_default();
                OrderWithItems {
                    order,
                    customer_name,
                    items,
                }
            })
            .collect())
    }
}

async fn insert_item(
    tx: &mut Transaction<'_, Sqlite>,
    order_id: Uuid,
    product_id: Uuid,
    customization_id: Option<Uuid>,
    quantity: i64,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO items (id, order_id, product_id, customization_id, quantity) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(Uuid::new_v4())
    .bind(order_id)
    .bind(product_id)
    .bind(customization_id)
    .bind(quantity)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
