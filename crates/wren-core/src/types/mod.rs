//! Core types for wren.

mod memory_kind;
mod message;
mod metadata;
mod request;

pub use memory_kind::*;
pub use message::*;
pub use metadata::*;
pub use request::*;
