//! NotificationCenter - the signed-in user's notification state.
//!
//! Owns the local feed and talks to the server through [`NotificationApi`].
//! Read marks are pessimistic: the feed only changes after the server
//! confirms, and a failed request leaves it untouched and raises an error
//! toast. After a confirmed mark the feed is patched locally instead of
//! being re-fetched.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::domain::foundation::{NotificationId, Timestamp};
use crate::domain::notification::{
    badge_label, BroadcastMessage, MarkOutcome, Notification, NotificationFeed, NotificationView,
};
use crate::ports::{ApiError, NotificationApi};

use super::toasts::{Toast, ToastQueue};

pub const MARK_READ_FAILED: &str = "Failed to mark notification as read";
pub const MARK_ALL_READ_FAILED: &str = "Failed to mark all notifications as read";
pub const MARK_ALL_READ_DONE: &str = "All notifications marked as read";
pub const LOAD_FAILED: &str = "Could not load notifications";

pub struct NotificationCenter {
    api: Arc<dyn NotificationApi>,
    feed: RwLock<NotificationFeed>,
    toasts: Mutex<ToastQueue>,
}

impl NotificationCenter {
    pub fn new(api: Arc<dyn NotificationApi>) -> Self {
        Self {
            api,
            feed: RwLock::new(NotificationFeed::new()),
            toasts: Mutex::new(ToastQueue::default()),
        }
    }

    /// Merges the server's list into the feed. Used on start-up and after a
    /// reconnect to pick up anything missed while offline. Pushes and marks
    /// that land while the request is in flight survive the merge.
    pub async fn refresh(&self) -> Result<usize, ApiError> {
        match self.api.list().await {
            Ok(views) => {
                let mut feed = self.feed.write().await;
                feed.load(views);
                Ok(feed.len())
            }
            Err(e) => {
                tracing::warn!("Notification list request failed: {}", e);
                self.toasts.lock().await.error(LOAD_FAILED);
                Err(e)
            }
        }
    }

    /// Appends a notification pushed over the socket. Returns false for
    /// duplicates, undecodable payloads and pushes without a notification id.
    pub async fn receive(&self, message: &BroadcastMessage) -> bool {
        let Some(id) = message.notification_id else {
            tracing::warn!(
                event_name = %message.event_name,
                "Dropping notification push without an id"
            );
            return false;
        };
        let event = match message.decode_event() {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(
                    event_name = %message.event_name,
                    "Dropping undecodable notification: {}",
                    e
                );
                return false;
            }
        };
        let notification = Notification::reconstitute(id, event, Timestamp::now());
        self.feed.write().await.append(notification)
    }

    /// Marks one notification read once the server confirms.
    ///
    /// Already-read entries are a no-op and issue no request.
    pub async fn mark_read(&self, id: NotificationId) -> Result<MarkOutcome, ApiError> {
        if self
            .feed
            .read()
            .await
            .get(&id)
            .is_some_and(NotificationView::is_read)
        {
            return Ok(MarkOutcome::AlreadyRead);
        }

        match self.api.mark_read(id).await {
            Ok(()) => Ok(self.feed.write().await.mark_read(id, Timestamp::now())),
            Err(e) => {
                tracing::warn!(notification_id = %id, "Mark-read request failed: {}", e);
                self.toasts.lock().await.error(MARK_READ_FAILED);
                Err(e)
            }
        }
    }

    /// Marks everything read in one request. Only the notifications the
    /// server reports as marked are patched locally. Returns how many
    /// entries changed.
    pub async fn mark_all_read(&self) -> Result<usize, ApiError> {
        match self.api.mark_all_read().await {
            Ok(marked) => {
                let changed = self
                    .feed
                    .write()
                    .await
                    .mark_all_read(&marked, Timestamp::now());
                self.toasts.lock().await.success(MARK_ALL_READ_DONE);
                Ok(changed)
            }
            Err(e) => {
                tracing::warn!("Mark-all-read request failed: {}", e);
                self.toasts.lock().await.error(MARK_ALL_READ_FAILED);
                Err(e)
            }
        }
    }

    /// Entries in arrival order.
    pub async fn list(&self) -> Vec<NotificationView> {
        self.feed.read().await.entries().to_vec()
    }

    pub async fn unread_count(&self) -> usize {
        self.feed.read().await.unread_count()
    }

    pub async fn badge(&self) -> Option<String> {
        badge_label(self.unread_count().await)
    }

    pub async fn take_toasts(&self) -> Vec<Toast> {
        self.toasts.lock().await.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::client::ToastLevel;
    use crate::domain::foundation::{EmployeeId, EvaluationId};
    use crate::domain::notification::EvaluationSubmitted;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio::sync::Notify;

    #[derive(Default)]
    struct MockApi {
        listed: std::sync::Mutex<Vec<NotificationView>>,
        marked_by_server: std::sync::Mutex<Vec<NotificationId>>,
        fail: AtomicBool,
        calls: AtomicUsize,
    }

    impl MockApi {
        fn with_list(views: Vec<NotificationView>) -> Self {
            let api = Self::default();
            *api.listed.lock().unwrap() = views;
            api
        }

        fn marks_all(&self, ids: Vec<NotificationId>) {
            *self.marked_by_server.lock().unwrap() = ids;
        }

        fn fail(&self, fail: bool) {
            self.fail.store(fail, Ordering::SeqCst);
        }

        fn result(&self) -> Result<(), ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                Err(ApiError::Transport("connection refused".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl NotificationApi for MockApi {
        async fn list(&self) -> Result<Vec<NotificationView>, ApiError> {
            self.result()?;
            Ok(self.listed.lock().unwrap().clone())
        }

        async fn mark_read(&self, _id: NotificationId) -> Result<(), ApiError> {
            self.result()
        }

        async fn mark_all_read(&self) -> Result<Vec<NotificationId>, ApiError> {
            self.result()?;
            Ok(self.marked_by_server.lock().unwrap().clone())
        }
    }

    /// Holds `list` until the test opens the gate.
    struct GatedApi {
        listed: Vec<NotificationView>,
        entered: Notify,
        gate: Notify,
    }

    impl GatedApi {
        fn new(listed: Vec<NotificationView>) -> Self {
            Self {
                listed,
                entered: Notify::new(),
                gate: Notify::new(),
            }
        }
    }

    #[async_trait]
    impl NotificationApi for GatedApi {
        async fn list(&self) -> Result<Vec<NotificationView>, ApiError> {
            self.entered.notify_one();
            self.gate.notified().await;
            Ok(self.listed.clone())
        }

        async fn mark_read(&self, _id: NotificationId) -> Result<(), ApiError> {
            Ok(())
        }

        async fn mark_all_read(&self) -> Result<Vec<NotificationId>, ApiError> {
            Ok(vec![])
        }
    }

    fn notification(n: i64) -> Notification {
        Notification::record(EvaluationSubmitted {
            evaluation_id: EvaluationId::new(n),
            employee_id: EmployeeId::new(n),
            employee_name: format!("Employee {}", n),
        })
    }

    fn pushed(n: i64) -> (NotificationId, BroadcastMessage) {
        let notification = notification(n);
        let message = BroadcastMessage::for_notification(&notification).unwrap();
        (notification.id, message)
    }

    #[tokio::test]
    async fn marking_keeps_order_and_lowers_count() {
        let center = NotificationCenter::new(Arc::new(MockApi::default()));
        let (n1, m1) = pushed(1);
        let (n2, m2) = pushed(2);
        assert!(center.receive(&m1).await);
        assert!(center.receive(&m2).await);
        assert_eq!(center.unread_count().await, 2);

        assert_eq!(center.mark_read(n1).await.unwrap(), MarkOutcome::Marked);

        let ids: Vec<_> = center.list().await.iter().map(|v| v.id()).collect();
        assert_eq!(ids, vec![n1, n2]);
        assert_eq!(center.unread_count().await, 1);
    }

    #[tokio::test]
    async fn already_read_issues_no_request() {
        let api = Arc::new(MockApi::default());
        let center = NotificationCenter::new(api.clone());
        let (id, message) = pushed(1);
        center.receive(&message).await;

        center.mark_read(id).await.unwrap();
        let second = center.mark_read(id).await.unwrap();

        assert_eq!(second, MarkOutcome::AlreadyRead);
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_mark_leaves_state_and_raises_toast() {
        let api = Arc::new(MockApi::default());
        let center = NotificationCenter::new(api.clone());
        let (id, message) = pushed(1);
        center.receive(&message).await;
        api.fail(true);

        assert!(center.mark_read(id).await.is_err());

        assert_eq!(center.unread_count().await, 1);
        let toasts = center.take_toasts().await;
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].level, ToastLevel::Error);
        assert_eq!(toasts[0].message, MARK_READ_FAILED);
    }

    #[tokio::test]
    async fn mark_all_read_clears_count_and_confirms() {
        let api = Arc::new(MockApi::default());
        let center = NotificationCenter::new(api.clone());
        let mut ids = Vec::new();
        for n in 0..3 {
            let (id, message) = pushed(n);
            center.receive(&message).await;
            ids.push(id);
        }
        api.marks_all(ids);

        assert_eq!(center.mark_all_read().await.unwrap(), 3);

        assert_eq!(center.unread_count().await, 0);
        assert_eq!(center.badge().await, None);
        let toasts = center.take_toasts().await;
        assert_eq!(toasts[0].level, ToastLevel::Success);
    }

    #[tokio::test]
    async fn push_the_server_did_not_mark_stays_unread() {
        let api = Arc::new(MockApi::default());
        let center = NotificationCenter::new(api.clone());
        let (covered, m1) = pushed(1);
        let (late, m2) = pushed(2);
        center.receive(&m1).await;
        center.receive(&m2).await;
        api.marks_all(vec![covered]);

        assert_eq!(center.mark_all_read().await.unwrap(), 1);

        let views = center.list().await;
        let late_view = views.iter().find(|v| v.id() == late).unwrap();
        assert!(!late_view.is_read());
        assert_eq!(center.unread_count().await, 1);
    }

    #[tokio::test]
    async fn failed_mark_all_leaves_everything_unread() {
        let api = Arc::new(MockApi::default());
        let center = NotificationCenter::new(api.clone());
        for n in 0..2 {
            center.receive(&pushed(n).1).await;
        }
        api.fail(true);

        assert!(center.mark_all_read().await.is_err());

        assert_eq!(center.unread_count().await, 2);
        assert_eq!(center.take_toasts().await[0].message, MARK_ALL_READ_FAILED);
    }

    #[tokio::test]
    async fn refresh_loads_server_list_in_arrival_order() {
        let older = notification(1);
        let newer = Notification::reconstitute(
            NotificationId::new(),
            notification(2).event,
            Timestamp::from_datetime(*older.created_at.as_datetime() + chrono::Duration::seconds(5)),
        );
        let mut read = NotificationView::unread(older.clone());
        read.read_at = Some(Timestamp::now());
        let api = MockApi::with_list(vec![NotificationView::unread(newer.clone()), read]);
        let center = NotificationCenter::new(Arc::new(api));

        assert_eq!(center.refresh().await.unwrap(), 2);

        let ids: Vec<_> = center.list().await.iter().map(|v| v.id()).collect();
        assert_eq!(ids, vec![older.id, newer.id]);
        assert_eq!(center.unread_count().await, 1);
    }

    #[tokio::test]
    async fn duplicate_push_is_ignored() {
        let center = NotificationCenter::new(Arc::new(MockApi::default()));
        let (_, message) = pushed(1);

        assert!(center.receive(&message).await);
        assert!(!center.receive(&message).await);
        assert_eq!(center.list().await.len(), 1);
    }

    #[tokio::test]
    async fn push_without_id_is_dropped() {
        let center = NotificationCenter::new(Arc::new(MockApi::default()));
        let (_, mut message) = pushed(1);
        message.notification_id = None;

        assert!(!center.receive(&message).await);
        assert!(center.list().await.is_empty());
    }

    fn earlier(n: i64) -> Notification {
        let notification = notification(n);
        Notification::reconstitute(
            notification.id,
            notification.event,
            Timestamp::from_datetime(
                *notification.created_at.as_datetime() - chrono::Duration::seconds(60),
            ),
        )
    }

    #[tokio::test]
    async fn push_during_refresh_survives() {
        let n1 = earlier(1);
        let (n2, m2) = pushed(2);
        let api = Arc::new(GatedApi::new(vec![NotificationView::unread(n1.clone())]));
        let center = Arc::new(NotificationCenter::new(api.clone()));

        let refreshing = tokio::spawn({
            let center = center.clone();
            async move { center.refresh().await }
        });
        api.entered.notified().await;
        assert!(center.receive(&m2).await);
        api.gate.notify_one();
        refreshing.await.unwrap().unwrap();

        let ids: Vec<_> = center.list().await.iter().map(|v| v.id()).collect();
        assert_eq!(ids, vec![n1.id, n2]);
        assert_eq!(center.unread_count().await, 2);
    }

    #[tokio::test]
    async fn confirmed_read_during_refresh_is_kept() {
        let n1 = notification(1);
        let message = BroadcastMessage::for_notification(&n1).unwrap();
        let api = Arc::new(GatedApi::new(vec![NotificationView::unread(n1.clone())]));
        let center = Arc::new(NotificationCenter::new(api.clone()));
        center.receive(&message).await;

        let refreshing = tokio::spawn({
            let center = center.clone();
            async move { center.refresh().await }
        });
        api.entered.notified().await;
        assert_eq!(center.mark_read(n1.id).await.unwrap(), MarkOutcome::Marked);
        api.gate.notify_one();
        refreshing.await.unwrap().unwrap();

        assert_eq!(center.list().await.len(), 1);
        assert_eq!(center.unread_count().await, 0);
    }

    #[tokio::test]
    async fn badge_caps_large_counts() {
        let center = NotificationCenter::new(Arc::new(MockApi::default()));
        for n in 0..150 {
            center.receive(&pushed(n).1).await;
        }
        assert_eq!(center.badge().await.as_deref(), Some("99+"));
    }
}
