//! The request-facing services. Each takes the request's identity
//! explicitly where authorization matters.

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod engagement;
pub mod fulfillment;
pub mod inputs;

pub use admin::AdminService;
pub use auth::{AuthGate, Identity};
pub use catalog::CatalogService;
pub use engagement::EngagementService;
pub use fulfillment::FulfillmentService;
