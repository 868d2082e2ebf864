pub mod user;
pub mod project;
pub mod order;
pub mod contact;
pub mod inquiry;
pub mod session;

pub use user::*;
pub use project::*;
pub use order::*;
pub use contact::*;
pub use inquiry::*;
pub use session::*;
