//! Type definitions

pub mod messages;
pub mod upload;

pub use messages::*;
pub use upload::*;
