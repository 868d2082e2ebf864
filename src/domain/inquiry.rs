use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryStatus {
    #[default]
    New,
    #[allow(dead_code)]
    Contacted,
    #[allow(dead_code)]
    Closed,
}

/// A pre-purchase question about one project.
///
/// `project_id` is a weak reference: the inquiry outlives its project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inquiry {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub project_id: u64,
    pub message: Option<String>,
    pub status: InquiryStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct InquiryCreate {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub project_id: u64,
    pub message: Option<String>,
}
