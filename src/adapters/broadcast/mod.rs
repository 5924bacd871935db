//! Broadcaster adapters.
//!
//! - `LogBroadcaster` - No broker; logs the envelope
//! - `RedisBroadcaster` - `PUBLISH` to Redis for an external socket server
//! - `InMemoryBroadcaster` - Recording broadcaster for tests
//!
//! The in-process socket hub lives in `adapters::websocket`.

mod in_memory;
mod log;
mod redis;

pub use in_memory::InMemoryBroadcaster;
pub use log::LogBroadcaster;
pub use redis::RedisBroadcaster;
