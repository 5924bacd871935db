//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `workforce` - HR records that raise notifications
//! - `notification` - Notification events, read state, and bell presentation rules

pub mod foundation;
pub mod notification;
pub mod workforce;
