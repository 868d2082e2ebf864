use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Server-side proof of a successful login. The id is the opaque token
/// handed to the client inside a signed cookie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user_id: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SessionCreate {
    pub user_id: u64,
}

impl Session {
    pub fn is_expired(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        now - self.created_at >= max_age
    }
}
