//! Runtime module - actor-based services and per-request context
//!
//! - Context API for handlers
//! - Actor-based blob store service

pub mod context;
pub mod services;
pub mod actor;

pub use context::{Context, RequestId};
pub use services::Services;
