//! RaiseNotificationHandler - Turns a freshly created workforce record into
//! a published notification.
//!
//! Called by the HR workflows right after their own write succeeds. The
//! employee name is looked up here; a missing employee or a failing
//! directory yields the placeholder name instead of an error.

use std::sync::Arc;

use crate::domain::foundation::CommandMetadata;
use crate::domain::notification::{NotificationError, NotificationSource};
use crate::ports::EmployeeDirectory;

use super::publish_notification::{PublishNotificationHandler, PublishNotificationResult};

pub struct RaiseNotificationHandler {
    directory: Arc<dyn EmployeeDirectory>,
    publisher: Arc<PublishNotificationHandler>,
}

impl RaiseNotificationHandler {
    pub fn new(
        directory: Arc<dyn EmployeeDirectory>,
        publisher: Arc<PublishNotificationHandler>,
    ) -> Self {
        Self {
            directory,
            publisher,
        }
    }

    pub async fn handle<S>(
        &self,
        source: &S,
        metadata: CommandMetadata,
    ) -> Result<PublishNotificationResult, NotificationError>
    where
        S: NotificationSource + ?Sized,
    {
        let employee_id = source.employee_id();

        // 1. Resolve the employee name
        let employee = match self.directory.find(employee_id).await {
            Ok(Some(employee)) => Some(employee),
            Ok(None) => {
                tracing::debug!(%employee_id, "Employee not found, using placeholder name");
                None
            }
            Err(e) => {
                tracing::warn!(%employee_id, "Employee lookup failed, using placeholder name: {}", e);
                None
            }
        };

        // 2. Build and publish
        let event = source.to_event(employee.as_ref());
        self.publisher.publish(event, metadata).await
    }
}
