//! Typed clients in front of the resource actors.

#[macro_use]
mod macros;

mod user_client;
mod session_client;
mod project_client;
mod order_client;
mod contact_client;
mod inquiry_client;

pub use user_client::*;
pub use session_client::*;
pub use project_client::*;
pub use order_client::*;
pub use contact_client::*;
pub use inquiry_client::*;
