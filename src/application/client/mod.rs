//! Client-side notification flow.
//!
//! ```text
//! NotificationSocket ──push──▶ LiveNotifications ──▶ NotificationCenter ◀── NotificationBell
//!                                                        │                      (render, click)
//!                                                        ▼
//!                                                 NotificationApi (list, mark-read)
//! ```

mod bell;
mod live_updates;
mod notification_center;
mod toasts;

pub use bell::{BellItem, BellView, NotificationBell};
pub use live_updates::LiveNotifications;
pub use notification_center::{
    NotificationCenter, LOAD_FAILED, MARK_ALL_READ_DONE, MARK_ALL_READ_FAILED, MARK_READ_FAILED,
};
pub use toasts::{Toast, ToastLevel, ToastQueue, DEFAULT_TOAST_CAPACITY};
