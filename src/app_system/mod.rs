//! System orchestration, startup, and shutdown logic.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod market_system;
pub mod telemetry;

pub use bootstrap::*;
pub use config::*;
pub use error::*;
pub use market_system::*;
pub use telemetry::*;
