//! Typed request inputs, validated before they reach a service.

use serde::Deserialize;
use crate::domain::ProjectFields;

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContactInput {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InquiryInput {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Catalog fields of an admin project form.
#[derive(Debug, Clone)]
pub struct ProjectInput {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub tech_stack: String,
    pub branch: String,
}

/// Trims a required field, failing if nothing is left.
pub fn required(field: &str, value: &str) -> Result<String, String> {
    let value = value.trim();
    if value.is_empty() {
        Err(format!("{field} is required"))
    } else {
        Ok(value.to_string())
    }
}

/// Trims an optional field, treating blank as absent.
pub fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub fn email(value: &str) -> Result<String, String> {
    let value = required("email", value)?;
    if value.contains('@') {
        Ok(value)
    } else {
        Err(format!("invalid email: {value}"))
    }
}

pub fn price(value: f64) -> Result<f64, String> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("invalid price: {value}"))
    }
}

impl ProjectInput {
    pub fn validate(self) -> Result<ProjectFields, String> {
        Ok(ProjectFields {
            title: required("title", &self.title)?,
            description: required("description", &self.description)?,
            price: price(self.price)?,
            category: required("category", &self.category)?,
            tech_stack: required("tech_stack", &self.tech_stack)?,
            branch: required("branch", &self.branch)?,
        })
    }
}
