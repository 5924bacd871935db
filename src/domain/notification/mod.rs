//! Notification domain module.
//!
//! Covers the typed event payloads raised by HR workflows, the wire envelope
//! used on the `notifications` channel, per-recipient read state, and the
//! presentation rules for the notification bell.
//!
//! # Events
//!
//! - `LeaveRequested` - a leave request was filed
//! - `AbsenceRequested` - an absence request was filed
//! - `ReturnWorkRequested` - an employee reported a return to work
//! - `EvaluationSubmitted` - an evaluation was submitted

mod badge;
mod broadcast;
mod errors;
mod event;
mod feed;
#[allow(clippy::module_inception)]
mod notification;
mod producer;
mod titles;

pub use badge::{badge_label, BADGE_CEILING};
pub use broadcast::{BroadcastMessage, NOTIFICATIONS_CHANNEL};
pub use errors::NotificationError;
pub use event::{
    AbsenceRequested, EvaluationSubmitted, LeaveRequested, NotificationEvent, NotificationKind,
    ReturnWorkRequested, UNKNOWN_EMPLOYEE,
};
pub use feed::{MarkOutcome, NotificationFeed};
pub use notification::{Notification, NotificationView};
pub use producer::NotificationSource;
pub use titles::{default_title, TitleTable};
