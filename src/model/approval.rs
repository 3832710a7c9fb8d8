use crate::model::leave_request::LeaveType;
use crate::model::team_member::MemberId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ApprovalKind {
    Timesheet,
    Leave,
}

/// What the queue entry points back to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ApprovalSubject {
    Timesheet {
        week_label: String,
        /// Monday of the submitted week.
        week_start: NaiveDate,
        dates: Vec<NaiveDate>,
    },
    Leave {
        request_id: Uuid,
        leave_type: LeaveType,
    },
}

/// Requester details copied at submission time so the queue renders
/// without joining back to the team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RequesterSnapshot {
    pub id: MemberId,
    #[schema(example = "Paul Martin")]
    pub name: String,
    #[schema(example = "Consultant Senior")]
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ApprovalItem {
    pub id: Uuid,
    pub requester: RequesterSnapshot,
    pub subject: ApprovalSubject,
    #[schema(example = "S02")]
    pub period: String,
    pub hours: Option<f64>,
    pub days: Option<f64>,
    pub note: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl ApprovalItem {
    pub fn kind(&self) -> ApprovalKind {
        match self.subject {
            ApprovalSubject::Timesheet { .. } => ApprovalKind::Timesheet,
            ApprovalSubject::Leave { .. } => ApprovalKind::Leave,
        }
    }

    /// Same requester, label and calendar week. Labels repeat every year.
    pub fn is_week(&self, requester: MemberId, week_label: &str, week_start: NaiveDate) -> bool {
        self.requester.id == requester
            && matches!(
                &self.subject,
                ApprovalSubject::Timesheet { week_label: w, week_start: s, .. }
                    if w == week_label && *s == week_start
            )
    }

    pub fn is_leave(&self, request_id: Uuid) -> bool {
        matches!(&self.subject, ApprovalSubject::Leave { request_id: r, .. } if *r == request_id)
    }
}
