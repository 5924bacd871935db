//! NotificationBell - presentation state for the bell and its dropdown.
//!
//! Holds nothing but the open/closed flag and the title table; every item
//! and count comes from the [`NotificationCenter`] at render time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::domain::foundation::{NotificationId, Timestamp};
use crate::domain::notification::{badge_label, MarkOutcome, NotificationKind, TitleTable};
use crate::ports::ApiError;

use super::notification_center::NotificationCenter;

/// One row in the dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BellItem {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub title: String,
    pub summary: String,
    pub read: bool,
    pub received_at: Timestamp,
}

/// Snapshot of everything the bell needs to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BellView {
    /// `None` hides the badge.
    pub badge: Option<String>,
    pub unread_count: usize,
    pub open: bool,
    pub items: Vec<BellItem>,
}

pub struct NotificationBell {
    center: Arc<NotificationCenter>,
    titles: TitleTable,
    open: AtomicBool,
}

impl NotificationBell {
    pub fn new(center: Arc<NotificationCenter>, titles: TitleTable) -> Self {
        Self {
            center,
            titles,
            open: AtomicBool::new(false),
        }
    }

    /// Flips the dropdown and returns the new state.
    pub fn toggle(&self) -> bool {
        !self.open.fetch_xor(true, Ordering::SeqCst)
    }

    pub fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    pub async fn render(&self) -> BellView {
        let entries = self.center.list().await;
        let unread_count = entries.iter().filter(|view| !view.is_read()).count();
        let items = entries
            .into_iter()
            .map(|view| {
                let kind = view.notification.kind();
                BellItem {
                    id: view.id(),
                    kind,
                    title: self.titles.title(kind).to_string(),
                    summary: view.notification.event.summary(),
                    read: view.is_read(),
                    received_at: view.notification.created_at,
                }
            })
            .collect();

        BellView {
            badge: badge_label(unread_count),
            unread_count,
            open: self.is_open(),
            items,
        }
    }

    pub async fn click_item(&self, id: NotificationId) -> Result<MarkOutcome, ApiError> {
        self.center.mark_read(id).await
    }

    pub async fn mark_all(&self) -> Result<usize, ApiError> {
        self.center.mark_all_read().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{AbsenceId, EmployeeId, ReturnWorkId};
    use crate::domain::notification::{
        AbsenceRequested, BroadcastMessage, Notification, NotificationView, ReturnWorkRequested,
    };
    use crate::ports::NotificationApi;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    struct AcceptingApi;

    #[async_trait]
    impl NotificationApi for AcceptingApi {
        async fn list(&self) -> Result<Vec<NotificationView>, ApiError> {
            Ok(vec![])
        }

        async fn mark_read(&self, _id: NotificationId) -> Result<(), ApiError> {
            Ok(())
        }

        async fn mark_all_read(&self) -> Result<Vec<NotificationId>, ApiError> {
            Ok(vec![])
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    async fn seeded_center() -> (Arc<NotificationCenter>, NotificationId, NotificationId) {
        let center = Arc::new(NotificationCenter::new(Arc::new(AcceptingApi)));
        let absence = Notification::record(AbsenceRequested {
            absence_id: AbsenceId::new(1),
            employee_id: EmployeeId::new(1),
            employee_name: "Ana Ruiz".to_string(),
            absence_type: "Sick".to_string(),
            from_date: date(2),
            to_date: date(3),
        });
        let back = Notification::record(ReturnWorkRequested {
            return_work_id: ReturnWorkId::new(1),
            employee_id: EmployeeId::new(1),
            employee_name: "Ana Ruiz".to_string(),
            employee_id_number: None,
            department: None,
            return_date: date(4),
            absence_type: "Sick".to_string(),
            reason: "Recovered".to_string(),
            return_date_reported: date(3),
        });
        for notification in [&absence, &back] {
            center
                .receive(&BroadcastMessage::for_notification(notification).unwrap())
                .await;
        }
        (center, absence.id, back.id)
    }

    #[tokio::test]
    async fn render_uses_titles_for_every_kind() {
        let (center, _, _) = seeded_center().await;
        let bell = NotificationBell::new(center, TitleTable::default());

        let view = bell.render().await;

        let titles: Vec<_> = view.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Absence Request Update", "Return to Work Update"]);
        assert_eq!(view.badge.as_deref(), Some("2"));
        assert!(!view.open);
    }

    #[tokio::test]
    async fn overrides_replace_default_titles() {
        let (center, _, _) = seeded_center().await;
        let overrides = HashMap::from([(
            "return_work_request".to_string(),
            "Back at Work".to_string(),
        )]);
        let bell = NotificationBell::new(center, TitleTable::with_overrides(&overrides).unwrap());

        let view = bell.render().await;

        assert_eq!(view.items[1].title, "Back at Work");
    }

    #[tokio::test]
    async fn click_marks_item_read() {
        let (center, absence, _) = seeded_center().await;
        let bell = NotificationBell::new(center, TitleTable::default());

        assert_eq!(bell.click_item(absence).await.unwrap(), MarkOutcome::Marked);

        let view = bell.render().await;
        assert!(view.items[0].read);
        assert!(!view.items[1].read);
        assert_eq!(view.unread_count, 1);
    }

    #[tokio::test]
    async fn toggle_flips_open_state() {
        let (center, _, _) = seeded_center().await;
        let bell = NotificationBell::new(center, TitleTable::default());

        assert!(bell.toggle());
        assert!(bell.render().await.open);
        assert!(!bell.toggle());
        bell.toggle();
        bell.close();
        assert!(!bell.is_open());
    }

    #[tokio::test]
    async fn empty_bell_hides_badge() {
        let bell = NotificationBell::new(
            Arc::new(NotificationCenter::new(Arc::new(AcceptingApi))),
            TitleTable::default(),
        );

        let view = bell.render().await;

        assert!(view.badge.is_none());
        assert!(view.items.is_empty());
    }
}
