//! Project records, including the file swaps used when an admin replaces
//! an archive or preview image.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
