//! Client-side notification state.
//!
//! Holds the recipient's notifications in arrival order together with their
//! read state. Arrivals (pushes, reloads) and read marks are independent
//! operations: a read mark for a notification that has not arrived yet is
//! parked and applied when it shows up, so both orders converge.

use std::collections::{HashMap, HashSet};

use crate::domain::foundation::{NotificationId, Timestamp};

use super::notification::{Notification, NotificationView};

/// Result of marking a single notification read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    /// Entry transitioned from unread to read.
    Marked,
    /// Entry was already read; nothing changed.
    AlreadyRead,
    /// Entry not in the feed yet; mark applied when it arrives.
    Pending,
}

#[derive(Debug, Default, Clone)]
pub struct NotificationFeed {
    entries: Vec<NotificationView>,
    pending_reads: HashMap<NotificationId, Timestamp>,
}

impl NotificationFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges the server-authoritative list into the feed.
    ///
    /// The server returns newest first. Entries already in the feed keep
    /// their place; entries only the server knows are inserted by
    /// `created_at` among them. Entries missing from the list (pushed while
    /// the request was in flight, or older than its limit) are kept. Read
    /// state only moves from unread to read: a local read is never undone by
    /// a stale list.
    pub fn load(&mut self, views: Vec<NotificationView>) {
        let mut fresh = Vec::with_capacity(views.len());
        let mut seen = HashSet::new();
        for mut view in views {
            if !seen.insert(view.id()) {
                continue;
            }
            match self.entries.iter_mut().find(|entry| entry.id() == view.id()) {
                Some(entry) => {
                    if entry.read_at.is_none() {
                        entry.read_at = view.read_at;
                    }
                }
                None => {
                    if let Some(read_at) = self.pending_reads.remove(&view.id()) {
                        view.read_at.get_or_insert(read_at);
                    }
                    fresh.push(view);
                }
            }
        }
        fresh.sort_by_key(|view| view.notification.created_at);

        let mut fresh = fresh.into_iter().peekable();
        let mut merged = Vec::with_capacity(self.entries.len() + fresh.len());
        for entry in std::mem::take(&mut self.entries) {
            while let Some(view) =
                fresh.next_if(|view| view.notification.created_at < entry.notification.created_at)
            {
                merged.push(view);
            }
            merged.push(entry);
        }
        merged.extend(fresh);
        self.entries = merged;
    }

    /// Appends a pushed notification. Returns false for duplicates.
    pub fn append(&mut self, notification: Notification) -> bool {
        if self.contains(&notification.id) {
            return false;
        }
        let read_at = self.pending_reads.remove(&notification.id);
        self.entries.push(NotificationView {
            notification,
            read_at,
        });
        true
    }

    pub fn mark_read(&mut self, id: NotificationId, at: Timestamp) -> MarkOutcome {
        match self.entries.iter_mut().find(|view| view.id() == id) {
            Some(view) if view.is_read() => MarkOutcome::AlreadyRead,
            Some(view) => {
                view.read_at = Some(at);
                MarkOutcome::Marked
            }
            None => {
                self.pending_reads.entry(id).or_insert(at);
                MarkOutcome::Pending
            }
        }
    }

    /// Applies a confirmed mark-all: marks exactly the `ids` the server
    /// marked. Ids not in the feed yet are parked like single marks. Returns
    /// how many entries changed.
    pub fn mark_all_read<'a>(
        &mut self,
        ids: impl IntoIterator<Item = &'a NotificationId>,
        at: Timestamp,
    ) -> usize {
        ids.into_iter()
            .filter(|id| self.mark_read(**id, at) == MarkOutcome::Marked)
            .count()
    }

    pub fn unread_count(&self) -> usize {
        self.entries.iter().filter(|view| !view.is_read()).count()
    }

    pub fn entries(&self) -> &[NotificationView] {
        &self.entries
    }

    pub fn get(&self, id: &NotificationId) -> Option<&NotificationView> {
        self.entries.iter().find(|view| &view.id() == id)
    }

    pub fn contains(&self, id: &NotificationId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
