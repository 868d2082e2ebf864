use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[allow(dead_code)]
    Pending,
    Completed,
    #[allow(dead_code)]
    Failed,
}

/// A purchase of one project by one user. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub user_id: u64,
    pub project_id: u64,
    pub payment_status: PaymentStatus,
    /// Project price at the moment of purchase.
    pub amount: f64,
    pub transaction_id: String,
    pub timestamp: DateTime<Utc>,
}

/// Payload for creating a new order.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub user_id: u64,
    pub project_id: u64,
    pub payment_status: PaymentStatus,
    pub amount: f64,
    pub transaction_id: String,
}
