use crate::DbError;
use crate::repository::dates::{first_day_of_month, month_window};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use core_types::OrderStatus;
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use std::collections::HashMap;
use uuid::Uuid;

/// Aggregation queries behind the dashboard screens.
///
/// "Pending" and "unpaid" are deliberately different: a pending payment is an
/// UNPAID order dated strictly before the first day of the current month,
/// while the unpaid amount counts every UNPAID order regardless of date.
/// Every method that needs the current month takes `now` explicitly so tests
/// control the clock; handlers pass `Utc::now()`.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    pool: SqlitePool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub counts: EntityCounts,
    pub financial: FinancialStats,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityCounts {
    pub products: i64,
    pub customizations: i64,
    pub customers: i64,
    pub orders: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialStats {
    /// Sum over all PAID orders.
    pub earned_amount: f64,
    /// Sum over UNPAID orders dated before the current month.
    pub pending_amount: f64,
    /// Sum over all UNPAID orders.
    pub unpaid_amount: f64,
}

/// One calendar month's accumulated pending amount for a customer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingMonth {
    pub month: String,
    pub year: i32,
    pub amount: f64,
}

/// Like [`PendingMonth`] but also carrying the contributing order ids, for
/// the per-customer detail screen.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingMonthDetail {
    pub month: String,
    pub year: i32,
    pub amount: f64,
    pub order_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPendingSummary {
    pub id: Uuid,
    pub name: String,
    pub pending_months: Vec<PendingMonth>,
    pub total_amount: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPendingDetail {
    pub id: Uuid,
    pub name: String,
    pub pending_months: Vec<PendingMonthDetail>,
    pub total_amount: f64,
}

/// An UNPAID order joined with its customer, the raw material for grouping.
#[derive(Debug, Clone, FromRow)]
struct PendingOrderRow {
    order_id: Uuid,
    customer_id: Uuid,
    customer_name: String,
    order_date: NaiveDate,
    order_amount: f64,
}

impl DashboardRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Entity counts plus the three financial sums.
    pub async fn get_stats(&self, now: DateTime<Utc>) -> Result<DashboardStats, DbError> {
        let month_start = first_day_of_month(now.date_naive());

        let products = self.count("products").await?;
        let customizations = self.count("customizations").await?;
        let customers = self.count("customers").await?;
        let orders = self.count("orders").await?;

        let earned_amount: Option<f64> = sqlx::query_scalar(
            "SELECT SUM(order_amount) FROM orders WHERE order_status = $1",
        )
        .bind(OrderStatus::Paid)
        .fetch_one(&self.pool)
        .await?;

        let pending_amount: Option<f64> = sqlx::query_scalar(
            "SELECT SUM(order_amount) FROM orders WHERE order_status = $1 AND order_date < $2",
        )
        .bind(OrderStatus::Unpaid)
        .bind(month_start)
        .fetch_one(&self.pool)
        .await?;

        let unpaid_amount: Option<f64> = sqlx::query_scalar(
            "SELECT SUM(order_amount) FROM orders WHERE order_status = $1",
        )
        .bind(OrderStatus::Unpaid)
        .fetch_one(&self.pool)
        .await?;

        Ok(DashboardStats {
            counts: EntityCounts {
                products,
                customizations,
                customers,
                orders,
            },
            financial: FinancialStats {
                earned_amount: earned_amount.unwrap_or(0.0),
                pending_amount: pending_amount.unwrap_or(0.0),
                unpaid_amount: unpaid_amount.unwrap_or(0.0),
            },
        })
    }

    /// Every customer holding pending payments, with per-month buckets and a
    /// running total. Customers appear sorted by name; months chronologically.
    pub async fn customers_with_pending_payments(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<CustomerPendingSummary>, DbError> {
        let rows = self.pending_rows(None, now).await?;

        let mut summaries: Vec<CustomerPendingSummary> = Vec::new();
        let mut index: HashMap<Uuid, usize> = HashMap::new();
        for row in rows {
            let i = *index.entry(row.customer_id).or_insert_with(|| {
                summaries.push(CustomerPendingSummary {
                    id: row.customer_id,
                    name: row.customer_name.clone(),
                    pending_months: Vec::new(),
                    total_amount: 0.0,
                });
                summaries.len() - 1
            });
            let summary = &mut summaries[i];

            let month = month_name(row.order_date);
            let year = row.order_date.year();
            match summary
                .pending_months
                .iter_mut()
                .find(|bucket| bucket.month == month && bucket.year == year)
            {
                Some(bucket) => bucket.amount += row.order_amount,
                None => summary.pending_months.push(PendingMonth {
                    month,
                    year,
                    amount: row.order_amount,
                }),
            }
            summary.total_amount += row.order_amount;
        }

        Ok(summaries)
    }

    /// The same month grouping restricted to one customer, with the
    /// contributing order ids collected per month.
    pub async fn customer_pending_payments(
        &self,
        customer_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<CustomerPendingDetail, DbError> {
        let name: Option<String> =
            sqlx::query_scalar("SELECT name FROM customers WHERE id = $1")
                .bind(customer_id)
                .fetch_optional(&self.pool)
                .await?;
        let name = name.ok_or_else(|| DbError::NotFound("customer".to_string()))?;

        let rows = self.pending_rows(Some(customer_id), now).await?;

        let mut detail = CustomerPendingDetail {
            id: customer_id,
            name,
            pending_months: Vec::new(),
            total_amount: 0.0,
        };
        for row in rows {
            let month = month_name(row.order_date);
            let year = row.order_date.year();
            match detail
                .pending_months
                .iter_mut()
                .find(|bucket| bucket.month == month && bucket.year == year)
            {
                Some(bucket) => {
                    bucket.amount += row.order_amount;
                    bucket.order_ids.push(row.order_id);
                }
                None => detail.pending_months.push(PendingMonthDetail {
                    month,
                    year,
                    amount: row.order_amount,
                    order_ids: vec![row.order_id],
                }),
            }
            detail.total_amount += row.order_amount;
        }

        Ok(detail)
    }

    /// Flips every pending order of the customer to PAID. Returns the number
    /// of orders affected. Idempotent: flipped orders no longer match.
    pub async fn mark_all_payments_paid(
        &self,
        customer_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<u64, DbError> {
        self.require_customer(customer_id).await?;
        let month_start = first_day_of_month(now.date_naive());

        let result = sqlx::query(
            r#"
            UPDATE orders SET order_status = $1, updated_at = $2
            WHERE customer_id = $3 AND order_status = $4 AND order_date < $5
            "#,
        )
        .bind(OrderStatus::Paid)
        .bind(Utc::now())
        .bind(customer_id)
        .bind(OrderStatus::Unpaid)
        .bind(month_start)
        .execute(&self.pool)
        .await?;

        let affected = result.rows_affected();
        tracing::info!(%customer_id, affected, "Marked all pending payments as paid.");
        Ok(affected)
    }

    /// Flips the customer's UNPAID orders within the given calendar month to
    /// PAID. Returns the number affected.
    pub async fn mark_month_paid(
        &self,
        customer_id: Uuid,
        year: i32,
        month: u32,
    ) -> Result<u64, DbError> {
        self.set_month_status(customer_id, year, month, OrderStatus::Paid)
            .await
    }

    /// The reverse of [`mark_month_paid`], for correcting mistakes.
    pub async fn mark_month_unpaid(
        &self,
        customer_id: Uuid,
        year: i32,
        month: u32,
    ) -> Result<u64, DbError> {
        self.set_month_status(customer_id, year, month, OrderStatus::Unpaid)
            .await
    }

    async fn set_month_status(
        &self,
        customer_id: Uuid,
        year: i32,
        month: u32,
        to: OrderStatus,
    ) -> Result<u64, DbError> {
        self.require_customer(customer_id).await?;
        let (start, end) = month_window(year, month)?;

        let result = sqlx::query(
            r#"
            UPDATE orders SET order_status = $1, updated_at = $2
            WHERE customer_id = $3 AND order_status = $4 AND order_date >= $5 AND order_date < $6
            "#,
        )
        .bind(to)
        .bind(Utc::now())
        .bind(customer_id)
        .bind(to.opposite())
        .bind(start)
        .bind(end)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// UNPAID orders dated before the current month, joined with customer,
    /// sorted so grouping is deterministic.
    async fn pending_rows(
        &self,
        customer_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<Vec<PendingOrderRow>, DbError> {
        let month_start = first_day_of_month(now.date_naive());
        let rows = match customer_id {
            Some(customer_id) => {
                sqlx::query_as::<_, PendingOrderRow>(
                    r#"
                    SELECT o.id AS order_id, c.id AS customer_id, c.name AS customer_name,
                           o.order_date AS order_date, o.order_amount AS order_amount
                    FROM orders o JOIN customers c ON c.id = o.customer_id
                    WHERE o.order_status = $1 AND o.order_date < $2 AND o.customer_id = $3
                    ORDER BY c.name ASC, o.order_date ASC
                    "#,
                )
                .bind(OrderStatus::Unpaid)
                .bind(month_start)
                .bind(customer_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, PendingOrderRow>(
                    r#"
                    SELECT o.id AS order_id, c.id AS customer_id, c.name AS customer_name,
                           o.order_date AS order_date, o.order_amount AS order_amount
                    FROM orders o JOIN customers c ON c.id = o.customer_id
                    WHERE o.order_status = $1 AND o.order_date < $2
                    ORDER BY c.name ASC, o.order_date ASC
                    "#,
                )
                .bind(OrderStatus::Unpaid)
                .bind(month_start)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    async fn require_customer(&self, customer_id: Uuid) -> Result<(), DbError> {
        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE id = $1")
            .bind(customer_id)
            .fetch_one(&self.pool)
            .await?;
        if exists == 0 {
            return Err(DbError::NotFound("customer".to_string()));
        }
        Ok(())
    }

    async fn count(&self, table: &'static str) -> Result<i64, DbError> {
        // `table` is a compile-time constant, never user input.
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// English calendar month name, the grouping key alongside the year.
fn month_name(date: NaiveDate) -> String {
    date.format("%B").to_string()
}
