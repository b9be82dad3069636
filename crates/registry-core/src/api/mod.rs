//! API boundary helpers: how storage errors look to clients.

pub mod error_response;

pub use self::error_response::{ErrorResponse, ResponseClass};
