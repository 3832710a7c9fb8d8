use crate::model::team_member::MemberId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;
use utoipa::ToSchema;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    #[schema(example = "New timesheet")]
    pub title: String,
    #[schema(example = "Paul Martin - S02 (40h)")]
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    #[schema(example = "/app/manager/approvals")]
    pub link: Option<String>,
    /// Member whose action produced the notification.
    pub from: Option<MemberId>,
    /// Member the notification is addressed to. Other members of the role
    /// do not see it.
    pub to: Option<MemberId>,
}

/// Caller-supplied part of a notification; id, read flag and timestamp
/// are assigned by the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationPayload {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
    pub from: Option<MemberId>,
    pub to: Option<MemberId>,
}

impl NotificationPayload {
    pub fn new(kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            link: None,
            from: None,
            to: None,
        }
    }

    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn sent_by(mut self, member: MemberId) -> Self {
        self.from = Some(member);
        self
    }

    pub fn about(mut self, member: MemberId) -> Self {
        self.to = Some(member);
        self
    }
}
