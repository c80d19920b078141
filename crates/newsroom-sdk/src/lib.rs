//! Newsroom SDK - Types shared by the Newsroom API handlers
//!
//! This crate provides the request, response and error types that resource
//! handlers use, independent of the HTTP server that hosts them.

pub mod request;
pub mod response;
pub mod error;

pub mod prelude {
    //! Common imports for Newsroom handlers
    pub use crate::request::Request;
    pub use crate::response::Response;
    pub use crate::error::HandlerError;
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::{json, Value as JsonValue};
}

// Re-export key types at crate root
pub use request::Request;
pub use response::Response;
pub use error::HandlerError;
