use serde::{Deserialize, Serialize};

/// The delivery slot an order is placed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum OrderTime {
    Morning,
    Afternoon,
    Evening,
    Night,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Paid,
    Unpaid,
}

impl OrderStatus {
    /// Returns the opposite payment status.
    pub fn opposite(&self) -> Self {
        match self {
            OrderStatus::Paid => OrderStatus::Unpaid,
            OrderStatus::Unpaid => OrderStatus::Paid,
        }
    }
}

/// Payment filter for order listings. The mobile client historically sent
/// the string "BOTH" for the unfiltered case, so we accept it as an alias.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaidFilter {
    #[default]
    #[serde(alias = "BOTH")]
    All,
    Paid,
    Unpaid,
}

impl PaidFilter {
    /// Whether an order with the given status passes this filter.
    pub fn matches(&self, status: OrderStatus) -> bool {
        match self {
            PaidFilter::All => true,
            PaidFilter::Paid => status == OrderStatus::Paid,
            PaidFilter::Unpaid => status == OrderStatus::Unpaid,
        }
    }
}
