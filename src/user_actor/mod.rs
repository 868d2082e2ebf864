//! User records, keyed uniquely by normalized email.

pub mod entity;
pub mod error;

pub use error::*;
