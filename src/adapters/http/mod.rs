//! HTTP adapters - axum routes, middleware and the error envelope.
//!
//! - `notifications` - list / mark-read / mark-all-read
//! - `broadcasting` - private channel authorization
//! - `middleware` - bearer token authentication
//! - `router` - composition of all routes and tower layers

pub mod broadcasting;
pub mod error;
pub mod middleware;
pub mod notifications;
pub mod router;

pub use error::ErrorResponse;
pub use router::{build_router, HttpServices};
