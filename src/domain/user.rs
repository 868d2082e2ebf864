use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents a registered account, either a buyer or an administrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// What the admin views show of an account. The password hash never
/// leaves the server.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSummary {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}

/// Payload for creating a new user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
}

impl User {
    /// Emails are compared case-insensitively for uniqueness and login.
    pub fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }
}
