//! Per-resource facades over [`ApiClient`](crate::client::ApiClient).
//!
//! Each method maps one typed call onto one backend endpoint. None of them
//! hold state or know about the session; that is the client core's job.

pub mod auth;
pub mod categories;
pub mod products;
pub mod stats;

pub use auth::*;
pub use categories::*;
pub use products::*;
pub use stats::*;
