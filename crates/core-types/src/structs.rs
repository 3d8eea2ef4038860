use crate::enums::{OrderStatus, OrderTime};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ==============================================================================
// Entities (one struct per table)
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub mobile_number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Customization {
    pub id: Uuid,
    pub description: String,
    pub price: f64,
    pub product_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub order_time: OrderTime,
    pub order_date: NaiveDate,
    /// Derived: sum of customization price x quantity over the order's items.
    pub order_amount: f64,
    pub order_status: OrderStatus,
    /// Derived: sum of quantities over the order's items.
    pub total_items: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One line of an order: a product, an optional customization, a quantity.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub customization_id: Option<Uuid>,
    pub quantity: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct Admin {
    pub id: Uuid,
    pub email: String,
    /// bcrypt hash; never serialized.
    pub password: String,
}

/// What the login endpoint returns: the admin row minus the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    pub id: Uuid,
    pub email: String,
}

impl From<Admin> for AdminProfile {
    fn from(admin: Admin) -> Self {
        AdminProfile {
            id: admin.id,
            email: admin.email,
        }
    }
}

// ==============================================================================
// Joined views (assembled in the repositories, never mapped from a single row)
// ==============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerWithOrders {
    #[serde(flatten)]
    pub customer: Customer,
    pub orders: Vec<Order>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithCustomizations {
    #[serde(flatten)]
    pub product: Product,
    pub customizations: Vec<Customization>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub customer_name: String,
    pub items: Vec<Item>,
}

// ==============================================================================
// Request payloads (the HTTP API's write surface)
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub name: String,
    pub mobile_number: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomer {
    pub name: Option<String>,
    pub mobile_number: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomization {
    pub description: String,
    pub price: f64,
    pub product_id: Uuid,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomization {
    pub description: Option<String>,
    pub price: Option<f64>,
}

/// One incoming order line. `id` is present when the client is editing an
/// existing item; a missing or unknown id means "insert as new".
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    pub id: Option<Uuid>,
    pub product_id: Uuid,
    pub customization_id: Option<Uuid>,
    pub quantity: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub customer_id: Uuid,
    pub order_time: OrderTime,
    pub order_date: NaiveDate,
    pub items: Vec<OrderItemInput>,
}

/// Partial order update. When `items` is present the order's item set is
/// replaced wholesale and `total_items` is recomputed; `order_amount` is only
/// written when the caller supplies it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    pub order_time: Option<OrderTime>,
    pub order_date: Option<NaiveDate>,
    pub order_status: Option<OrderStatus>,
    pub order_amount: Option<f64>,
    pub items: Option<Vec<OrderItemInput>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}
