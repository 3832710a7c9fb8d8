use crate::api::{SharedWorkflow, lock};
use crate::auth::AuthUser;
use crate::engine::calendar;
use crate::model::{Allocation, TimesheetEntry};
use crate::query::{self, ActivityReport};
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct SaveEntry {
    pub allocations: Vec<Allocation>,
    #[schema(example = "Sprint review")]
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RangeFilter {
    /// First day of the range (inclusive)
    #[param(example = "2026-01-05", value_type = String)]
    pub from: NaiveDate,
    /// Last day of the range (inclusive)
    #[param(example = "2026-01-09", value_type = String)]
    pub to: NaiveDate,
    /// Member to look at, managers only; defaults to the caller
    pub member_id: Option<u64>,
}

#[derive(Deserialize, ToSchema)]
pub struct SubmitWeek {
    #[schema(example = json!(["2026-01-05", "2026-01-06"]))]
    pub dates: Vec<NaiveDate>,
    /// Defaults to the ISO week label of the first date, e.g. `S02`
    #[schema(example = "S02")]
    pub week_label: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct CopyWeek {
    #[schema(example = "2026-01-12", format = "date", value_type = String)]
    pub week_start: NaiveDate,
}

/* =========================
Save one day
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/timesheet/{date}",
    params(
        ("date" = String, Path, description = "Day to record, e.g. 2026-01-05")
    ),
    request_body(content = SaveEntry, content_type = "application/json"),
    responses(
        (status = 200, description = "Entry saved as draft", body = Object, example = json!({
            "message": "Entry saved",
            "entry": { "date": "2026-01-05", "status": "draft" }
        })),
        (status = 400, description = "Invalid allocations"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Unknown member")
    ),
    tag = "Timesheet"
)]
pub async fn save_entry(
    auth: AuthUser,
    state: web::Data<SharedWorkflow>,
    path: web::Path<NaiveDate>,
    payload: web::Json<SaveEntry>,
) -> actix_web::Result<impl Responder> {
    let date = path.into_inner();
    let SaveEntry { allocations, note } = payload.into_inner();

    let mut wf = lock(&state)?;
    let outcome = wf.save_entry(auth.member_id, date, allocations, note)?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Entry saved",
        "entry": wf.store().entry(auth.member_id, date),
        "xp": outcome.xp_granted(),
        "events": outcome.events
    })))
}

/* =========================
List entries in a range
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/timesheet",
    params(RangeFilter),
    responses(
        (status = 200, description = "Entries in the range, oldest first", body = [TimesheetEntry]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Timesheet"
)]
pub async fn list_entries(
    auth: AuthUser,
    state: web::Data<SharedWorkflow>,
    filter: web::Query<RangeFilter>,
) -> actix_web::Result<impl Responder> {
    let member = auth.target(filter.member_id)?;

    let wf = lock(&state)?;
    let entries: Vec<&TimesheetEntry> = wf
        .store()
        .entries_between(member, filter.from, filter.to)
        .collect();

    Ok(HttpResponse::Ok().json(entries))
}

/* =========================
Submit a week
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/timesheet/submit",
    request_body(content = SubmitWeek, content_type = "application/json"),
    responses(
        (status = 200, description = "Week submitted for approval", body = Object, example = json!({
            "message": "Week submitted",
            "approval_id": "1b4e28ba-2fa1-11d2-883f-0016d3cca427"
        })),
        (status = 400, description = "Nothing to submit"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "No draft left in the week")
    ),
    tag = "Timesheet"
)]
pub async fn submit_week(
    auth: AuthUser,
    state: web::Data<SharedWorkflow>,
    payload: web::Json<SubmitWeek>,
) -> actix_web::Result<impl Responder> {
    let SubmitWeek { dates, week_label } = payload.into_inner();

    let mut wf = lock(&state)?;
    let label = week_label.unwrap_or_else(|| {
        let first = dates.iter().min().copied().unwrap_or_else(|| wf.today());
        calendar::week_label(first)
    });
    let outcome = wf.submit_week(auth.member_id, &dates, &label)?;

    let message = if outcome.is_noop() {
        "Week already pending"
    } else {
        "Week submitted"
    };
    Ok(HttpResponse::Ok().json(json!({
        "message": message,
        "week_label": label,
        "approval_id": outcome.queued_approval(),
        "xp": outcome.xp_granted(),
        "events": outcome.events
    })))
}

/* =========================
Copy the previous week
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/timesheet/copy-previous",
    request_body(content = CopyWeek, content_type = "application/json"),
    responses(
        (status = 200, description = "Previous week copied into drafts", body = Object),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Nothing to copy")
    ),
    tag = "Timesheet"
)]
pub async fn copy_previous_week(
    auth: AuthUser,
    state: web::Data<SharedWorkflow>,
    payload: web::Json<CopyWeek>,
) -> actix_web::Result<impl Responder> {
    let mut wf = lock(&state)?;
    let outcome = wf.copy_previous_week(auth.member_id, payload.week_start)?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Previous week copied",
        "xp": outcome.xp_granted(),
        "events": outcome.events
    })))
}

/* =========================
Activity report export
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/timesheet/export",
    params(RangeFilter),
    responses(
        (status = 200, description = "Activity report data", body = ActivityReport),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Unknown member")
    ),
    tag = "Timesheet"
)]
pub async fn export_report(
    auth: AuthUser,
    state: web::Data<SharedWorkflow>,
    filter: web::Query<RangeFilter>,
) -> actix_web::Result<impl Responder> {
    let member = auth.target(filter.member_id)?;

    let wf = lock(&state)?;
    match query::activity_report(wf.store(), member, filter.from, filter.to) {
        Some(report) => Ok(HttpResponse::Ok().json(report)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Member not found"
        }))),
    }
}
