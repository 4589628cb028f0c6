//! Client SDK for the storefront admin backend
//!
//! This SDK provides:
//! - A session store holding the operator's bearer token
//! - An HTTP client core that attaches the token to every request and signs
//!   the operator out when a protected endpoint answers 401
//! - Facades for auth, categories, products and dashboard stats
//! - Client-side validation of product and category forms

pub mod client;
pub mod envelope;
pub mod errors;
pub mod events;
pub mod middleware;
pub mod models;
pub mod pricing;
pub mod services;
pub mod session;
pub mod storage;
pub mod traits;
pub mod transport;
pub mod validation;

pub use client::{AdminClient, ApiClient};
pub use errors::*;
pub use events::{EventBus, SessionEvent};
pub use models::*;
pub use reqwest::StatusCode;
pub use session::{Persistence, SessionStore};
pub use storage::{CookieStorage, MemoryCookieJar, StoredCookie};
pub use traits::*;
pub use transport::{ApiRequest, ApiResponse, MultipartForm, RequestBody, ReqwestTransport};
pub use validation::{Field, ValidationErrors};
