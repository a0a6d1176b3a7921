//! Notification entity model and insert DTO.

use gigline_core::types::{ProjectId, RecordId, Timestamp, UserId};
use gigline_core::NotificationKind;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notifications` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: RecordId,
    pub user_id: UserId,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    #[sqlx(try_from = "String")]
    pub kind: NotificationKind,
    /// Id of the project the notification is about.
    pub related_id: ProjectId,
    pub read: bool,
    pub created_at: Timestamp,
}

/// DTO for inserting a notification. New rows are always unread.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: UserId,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub related_id: ProjectId,
}
