use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EntryStatus {
    #[default]
    Empty,
    Draft,
    Submitted,
    Approved,
    Rejected,
}

/// Hours booked against one project on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Allocation {
    #[schema(example = "bgl-sprint")]
    pub project_id: String,
    #[schema(example = 8.0)]
    pub hours: f64,
}

impl Allocation {
    pub fn new(project_id: impl Into<String>, hours: f64) -> Self {
        Self {
            project_id: project_id.into(),
            hours,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "date": "2026-01-05",
    "allocations": [{ "project_id": "bgl-sprint", "hours": 8.0 }],
    "note": null,
    "status": "draft",
    "reject_reason": null
}))]
pub struct TimesheetEntry {
    pub date: NaiveDate,
    pub allocations: Vec<Allocation>,
    pub note: Option<String>,
    pub status: EntryStatus,
    pub reject_reason: Option<String>,
}

impl TimesheetEntry {
    /// Reported total for the day; always the sum of the allocations.
    pub fn total_hours(&self) -> f64 {
        self.allocations.iter().map(|a| a.hours).sum()
    }
}
