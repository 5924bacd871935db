//! Transient messages shown to the user after notification actions.

use std::collections::VecDeque;

use crate::domain::foundation::Timestamp;

/// Oldest toasts are dropped beyond this many.
pub const DEFAULT_TOAST_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    pub raised_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
    capacity: usize,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_TOAST_CAPACITY)
    }
}

impl ToastQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            toasts: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, level: ToastLevel, message: impl Into<String>) {
        if self.toasts.len() == self.capacity {
            self.toasts.pop_front();
        }
        self.toasts.push_back(Toast {
            level,
            message: message.into(),
            raised_at: Timestamp::now(),
        });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Error, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Info, message);
    }

    /// Removes and returns every pending toast, oldest first.
    pub fn drain(&mut self) -> Vec<Toast> {
        self.toasts.drain(..).collect()
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.back()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}
