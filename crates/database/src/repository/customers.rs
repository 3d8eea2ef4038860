use crate::DbError;
use chrono::Utc;
use core_types::{Customer, CustomerWithOrders, NewCustomer, Order, UpdateCustomer};
use sqlx::SqlitePool;
use std::collections::HashMap;
use uuid::Uuid;

/// Data access for the `customers` table.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: &NewCustomer) -> Result<Customer, DbError> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(DbError::Validation("customer name is required".to_string()));
        }
        if new.mobile_number.trim().is_empty() {
            return Err(DbError::Validation(
                "customer mobile number is required".to_string(),
            ));
        }

        let now = Utc::now();
        let customer = Customer {
            id: Uuid::new_v4(),
            name: name.to_string(),
            mobile_number: new.mobile_number.trim().to_string(),
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
        .execute(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Fetches all customers, each with its full order list, newest orders
    /// first within a customer.
    pub async fn get_all(&self) -> Result<Vec<CustomerWithOrders>, DbError> {
        let customers = sqlx::query_as::<_, Customer>(
            "SELECT id, name, mobile_number, created_at, updated_at FROM customers ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, customer_id, order_time, order_date, order_amount, order_status, total_items, created_at, updated_at
            FROM orders
            ORDER BY order_date DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_customer: HashMap<Uuid, Vec<Order>> = HashMap::new();
        for order in orders {
            by_customer.entry(order.customer_id).or_default().push(order);
        }

        Ok(customers
            .into_iter()
            .map(|customer| {
                let orders = by_customer.remove(&customer.id).unwrap_or_default();
                CustomerWithOrders { customer, orders }
            })
            .collect())
    }

    /// Returns `None` when the row does not exist; callers translate this
    /// into a "not found" response.
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Customer>, DbError> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT id, name, mobile_number, created_at, updated_at FROM customers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(customer)
    }

    pub async fn update(&self, id: Uuid, update: &UpdateCustomer) -> Result<Customer, DbError> {
        let mut customer = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::NotFound("customer".to_string()))?;

        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(DbError::Validation("customer name is required".to_string()));
            }
            customer.name = name.trim().to_string();
        }
        if let Some(mobile_number) = &update.mobile_number {
            customer.mobile_number = mobile_number.trim().to_string();
        }
        customer.updated_at = Utc::now();

        sqlx::query(
            "UPDATE customers SET name = $1, mobile_number = $2, updated_at = $3 WHERE id = $4",
        )
        .bind(&customer.name)
        .bind(&customer.mobile_number)
        .bind(customer.updated_at)
        .bind(customer.id)
        .execute(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Deletes a customer. A customer that still owns orders cannot be
    /// deleted; the conflict embeds the order count.
    pub async fn delete(&self, id: Uuid) -> Result<(), DbError> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::NotFound("customer".to_string()))?;

        let order_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE customer_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        if order_count > 0 {
            return Err(DbError::Conflict(format!(
                "customer has {order_count} order(s) and cannot be deleted"
            )));
        }

        sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
