use crate::api::{SharedWorkflow, lock};
use crate::auth::AuthUser;
use crate::model::{MemberId, Project, TeamMember};
use actix_web::{HttpResponse, Responder, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/api/v1/team",
    responses(
        (status = 200, description = "Team members", body = [TeamMember]),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Team"
)]
pub async fn list_team(
    _auth: AuthUser,
    state: web::Data<SharedWorkflow>,
) -> actix_web::Result<impl Responder> {
    let wf = lock(&state)?;
    Ok(HttpResponse::Ok().json(wf.store().team()))
}

#[utoipa::path(
    get,
    path = "/api/v1/projects",
    responses(
        (status = 200, description = "Project catalog", body = [Project]),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Team"
)]
pub async fn list_projects(
    _auth: AuthUser,
    state: web::Data<SharedWorkflow>,
) -> actix_web::Result<impl Responder> {
    let wf = lock(&state)?;
    Ok(HttpResponse::Ok().json(wf.store().projects()))
}

/* =========================
Remind a member (Manager)
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/team/{member_id}/remind",
    params(
        ("member_id" = u64, Path, description = "Member to remind")
    ),
    responses(
        (status = 200, description = "Reminder sent", body = Object, example = json!({
            "message": "Reminder sent"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Unknown member")
    ),
    tag = "Team"
)]
pub async fn send_reminder(
    auth: AuthUser,
    state: web::Data<SharedWorkflow>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager()?;
    let member = MemberId(path.into_inner());

    let mut wf = lock(&state)?;
    let outcome = wf.send_reminder(auth.member_id, member)?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Reminder sent",
        "events": outcome.events
    })))
}
