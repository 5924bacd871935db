//! In-memory broadcaster for testing.
//!
//! Records every published message and can be switched into a failing mode
//! to exercise the best-effort path.
//!
//! # Security Note
//!
//! This adapter is for **testing only**. It uses `.expect()` on lock
//! operations which will panic if locks are poisoned.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crate::domain::notification::BroadcastMessage;
use crate::ports::{BroadcastError, Broadcaster};

/// Recording broadcaster.
///
/// # Example
///
/// ```ignore
/// let broadcaster = Arc::new(InMemoryBroadcaster::new());
/// handler.handle(cmd, metadata).await?;
/// assert_eq!(broadcaster.count_of("LeaveRequested"), 1);
/// ```
#[derive(Default)]
pub struct InMemoryBroadcaster {
    published: RwLock<Vec<BroadcastMessage>>,
    fail: AtomicBool,
}

impl InMemoryBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// A broadcaster whose every publish fails as if the broker were down.
    pub fn failing() -> Self {
        let broadcaster = Self::new();
        broadcaster.set_failing(true);
        broadcaster
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    // === Test Helpers ===

    pub fn published(&self) -> Vec<BroadcastMessage> {
        self.published
            .read()
            .expect("InMemoryBroadcaster: published lock poisoned")
            .clone()
    }

    pub fn count_of(&self, event_name: &str) -> usize {
        self.published()
            .iter()
            .filter(|m| m.event_name == event_name)
            .count()
    }

    pub fn message_count(&self) -> usize {
        self.published
            .read()
            .expect("InMemoryBroadcaster: published lock poisoned")
            .len()
    }

    pub fn clear(&self) {
        self.published
            .write()
            .expect("InMemoryBroadcaster: published write lock poisoned")
            .clear();
    }
}

#[async_trait]
impl Broadcaster for InMemoryBroadcaster {
    async fn broadcast(&self, message: BroadcastMessage) -> Result<usize, BroadcastError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(BroadcastError::Unavailable("simulated broker outage".to_string()));
        }
        self.published
            .write()
            .expect("InMemoryBroadcaster: published write lock poisoned")
            .push(message);
        Ok(1)
    }

    fn name(&self) -> &'static str {
        "in-memory"
    }
}
