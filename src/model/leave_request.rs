use crate::model::team_member::MemberId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveType {
    Paid,
    Rtt,
    Sick,
    Unpaid,
    Maternity,
    Paternity,
}

impl LeaveType {
    pub fn label(&self) -> &str {
        match self {
            LeaveType::Paid => "Paid leave",
            LeaveType::Rtt => "RTT",
            LeaveType::Sick => "Sick leave",
            LeaveType::Unpaid => "Unpaid leave",
            LeaveType::Maternity => "Maternity leave",
            LeaveType::Paternity => "Paternity leave",
        }
    }

    /// Only paid leave and RTT draw from a finite balance.
    pub fn draws_balance(&self) -> bool {
        matches!(self, LeaveType::Paid | LeaveType::Rtt)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HalfDayPeriod {
    Morning,
    Afternoon,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

/// What a requester asks for. The day count is never part of it; the
/// engine derives it from the range and the half-day flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LeaveDraft {
    #[schema(example = "paid")]
    pub leave_type: LeaveType,
    #[schema(example = "2026-02-09")]
    pub start_date: NaiveDate,
    #[schema(example = "2026-02-11")]
    pub end_date: NaiveDate,
    #[serde(default)]
    pub half_day: Option<HalfDayPeriod>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LeaveRequest {
    pub id: Uuid,
    pub requester: MemberId,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub half_day: Option<HalfDayPeriod>,
    /// Business days, or 0.5 for a half day.
    pub days: f64,
    pub reason: Option<String>,
    pub status: LeaveStatus,
    pub reject_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}
