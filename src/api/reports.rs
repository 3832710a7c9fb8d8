use crate::api::{SharedWorkflow, lock};
use crate::auth::AuthUser;
use crate::config::Config;
use crate::engine::{WorkflowError, calendar};
use crate::model::TeamMember;
use crate::query::{self, PendingSummary, TeamLeave, TeamStats, WeekCompletion};
use actix_web::{HttpResponse, Responder, web};
use chrono::{Days, NaiveDate};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WeekFilter {
    /// Any day of the week; defaults to today
    #[param(example = "2026-01-05", value_type = Option<String>)]
    pub week_start: Option<NaiveDate>,
    /// Member to look at, managers only; defaults to the caller
    pub member_id: Option<u64>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CalendarFilter {
    /// First day shown; defaults to today
    #[param(example = "2026-02-01", value_type = Option<String>)]
    pub from: Option<NaiveDate>,
    /// Last day shown; defaults to 30 days after `from`
    #[param(example = "2026-02-28", value_type = Option<String>)]
    pub to: Option<NaiveDate>,
}

/// Team overview for the manager dashboard
#[utoipa::path(
    get,
    path = "/api/v1/reports/team",
    responses(
        (status = 200, description = "Team statistics", body = TeamStats),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Reports"
)]
pub async fn team_stats(
    auth: AuthUser,
    state: web::Data<SharedWorkflow>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager()?;

    let wf = lock(&state)?;
    let stats = query::team_stats(wf.store().team(), wf.today(), config.late_after_days);

    Ok(HttpResponse::Ok().json(stats))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/leaderboard",
    responses(
        (status = 200, description = "Members ranked by streak, level and xp", body = [TeamMember]),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Reports"
)]
pub async fn leaderboard(
    _auth: AuthUser,
    state: web::Data<SharedWorkflow>,
) -> actix_web::Result<impl Responder> {
    let wf = lock(&state)?;
    let ranked = query::leaderboard(wf.store().team());

    Ok(HttpResponse::Ok().json(ranked))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/pending",
    responses(
        (status = 200, description = "Queue size by kind", body = PendingSummary),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Reports"
)]
pub async fn pending_summary(
    auth: AuthUser,
    state: web::Data<SharedWorkflow>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager()?;

    let wf = lock(&state)?;
    Ok(HttpResponse::Ok().json(query::pending_summary(wf.store())))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/week",
    params(WeekFilter),
    responses(
        (status = 200, description = "Completed weekdays of the week", body = WeekCompletion),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Reports"
)]
pub async fn week_completion(
    auth: AuthUser,
    state: web::Data<SharedWorkflow>,
    filter: web::Query<WeekFilter>,
) -> actix_web::Result<impl Responder> {
    let member = auth.target(filter.member_id)?;

    let wf = lock(&state)?;
    let week_start = calendar::week_start(filter.week_start.unwrap_or_else(|| wf.today()));
    let completion = query::week_completion(wf.store(), member, week_start);

    Ok(HttpResponse::Ok().json(json!({
        "week_start": week_start,
        "week_label": calendar::week_label(week_start),
        "completed": completion.completed,
        "total": completion.total,
        "ratio": completion.ratio()
    })))
}

/// Team leave calendar: approved and pending requests in a date range
#[utoipa::path(
    get,
    path = "/api/v1/reports/leaves",
    params(CalendarFilter),
    responses(
        (status = 200, description = "Leave overlapping the range", body = [TeamLeave]),
        (status = 400, description = "Range ends before it starts"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Reports"
)]
pub async fn team_leaves(
    auth: AuthUser,
    state: web::Data<SharedWorkflow>,
    filter: web::Query<CalendarFilter>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager()?;

    let wf = lock(&state)?;
    let from = filter.from.unwrap_or_else(|| wf.today());
    let to = filter.to.unwrap_or(from + Days::new(30));
    if to < from {
        return Err(WorkflowError::InvalidDateRange(format!("{to} is before {from}")).into());
    }

    Ok(HttpResponse::Ok().json(query::team_leaves(wf.store(), from, to)))
}
