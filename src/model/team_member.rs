use crate::model::role::Role;
use crate::model::timesheet::EntryStatus;
use chrono::NaiveDate;
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
    From, ToSchema,
)]
#[serde(transparent)]
pub struct MemberId(pub u64);

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, StrumDisplay, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MemberStatus {
    Active,
    Late,
    OnLeave,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": 2,
        "name": "Paul Martin",
        "email": "paul.martin@kokbif.com",
        "title": "Consultant Senior",
        "role": "consultant",
        "level": 12,
        "xp": 2350,
        "streak": 12,
        "status": "active",
        "project": "BGL - Sprint 12",
        "timesheet_status": "submitted",
        "last_entry": null
    })
)]
pub struct TeamMember {
    pub id: MemberId,
    pub name: String,
    pub email: String,
    pub title: String,
    pub role: Role,
    pub level: u32,
    pub xp: u32,
    pub streak: u32,
    pub status: MemberStatus,
    pub project: Option<String>,
    /// Status of the member's most recent timesheet cycle.
    pub timesheet_status: EntryStatus,
    /// Latest date the member recorded hours for.
    pub last_entry: Option<NaiveDate>,
}

impl TeamMember {
    pub fn new(id: u64, name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id: MemberId(id),
            name: name.into(),
            email: email.into(),
            title: String::new(),
            role,
            level: 1,
            xp: 0,
            streak: 0,
            status: MemberStatus::Active,
            project: None,
            timesheet_status: EntryStatus::Empty,
            last_entry: None,
        }
    }
}
