use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message sent through the public contact form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ContactCreate {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}
