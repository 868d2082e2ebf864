use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A listed student project available for purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub price: f64,
    /// Stored name of the archive inside the file store.
    pub file_path: String,
    pub category: String,
    /// Free-text, comma-joined tags such as "Rust, Axum, SQLite".
    pub tech_stack: String,
    pub branch: String,
    pub uploaded_date: DateTime<Utc>,
    pub preview_image: Option<String>,
}

/// Editable catalog fields, shared by project creation and project edits.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectFields {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub tech_stack: String,
    pub branch: String,
}

/// Payload for creating a new project. The archive is already stored.
#[derive(Debug, Clone)]
pub struct ProjectCreate {
    pub fields: ProjectFields,
    pub file_path: String,
    pub preview_image: Option<String>,
}

/// Field updates are unconditional overwrites.
pub type ProjectPatch = ProjectFields;

impl Project {
    pub fn shares_category_or_branch(&self, other: &Project) -> bool {
        self.category == other.category || self.branch == other.branch
    }
}
