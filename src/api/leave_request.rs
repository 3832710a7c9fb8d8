use crate::api::{SharedWorkflow, lock};
use crate::auth::AuthUser;
use crate::model::{LeaveDraft, LeaveRequest, LeaveStatus, Role};
use crate::query;
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;
use uuid::Uuid;

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeaveFilter {
    /// Filter by requester. Managers without a filter see everyone.
    #[param(example = 2)]
    pub member_id: Option<u64>,
    /// Filter by leave status
    #[param(example = "pending")]
    pub status: Option<LeaveStatus>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MemberFilter {
    /// Member to look at, managers only; defaults to the caller
    pub member_id: Option<u64>,
}

/* =========================
Create leave request
========================= */
/// Swagger doc for create_leave endpoint
#[utoipa::path(
    post,
    path = "/api/v1/leave",
    request_body(
        content = LeaveDraft,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Leave request submitted successfully",
         body = Object,
         example = json!({
            "message": "Leave request submitted",
            "status": "pending",
            "days": 3.0
         })
        ),
        (status = 400, description = "Invalid range or zero working days"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Unknown member")
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    state: web::Data<SharedWorkflow>,
    payload: web::Json<LeaveDraft>,
) -> actix_web::Result<impl Responder> {
    let mut wf = lock(&state)?;
    let outcome = wf.request_leave(auth.member_id, payload.into_inner())?;

    let request = wf.store().leave_requests_of(auth.member_id).next();
    Ok(HttpResponse::Ok().json(json!({
        "message": "Leave request submitted",
        "status": LeaveStatus::Pending,
        "id": request.map(|r| r.id),
        "days": request.map(|r| r.days),
        "approval_id": outcome.queued_approval(),
        "events": outcome.events
    })))
}

/// Lists leave requests, newest first
#[utoipa::path(
    get,
    path = "/api/v1/leave",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Leave requests", body = [LeaveRequest]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    state: web::Data<SharedWorkflow>,
    filter: web::Query<LeaveFilter>,
) -> actix_web::Result<impl Responder> {
    let member = match (auth.role, filter.member_id) {
        (Role::Manager, None) => None,
        (_, requested) => Some(auth.target(requested)?),
    };

    let wf = lock(&state)?;
    let requests: Vec<&LeaveRequest> = wf
        .store()
        .leave_requests()
        .iter()
        .filter(|r| member.is_none_or(|m| r.requester == m))
        .filter(|r| filter.status.is_none_or(|s| r.status == s))
        .collect();

    Ok(HttpResponse::Ok().json(requests))
}

/* =========================
Cancel a pending request
========================= */
#[utoipa::path(
    delete,
    path = "/api/v1/leave/{leave_id}",
    params(
        ("leave_id" = Uuid, Path, description = "ID of the leave request to cancel")
    ),
    responses(
        (status = 200, description = "Leave request cancelled", body = Object, example = json!({
            "message": "Leave request cancelled"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Leave request not found, or filed by someone else"),
        (status = 409, description = "Leave request already processed")
    ),
    tag = "Leave"
)]
pub async fn cancel_leave(
    auth: AuthUser,
    state: web::Data<SharedWorkflow>,
    path: web::Path<Uuid>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();

    let mut wf = lock(&state)?;
    let outcome = wf.cancel_leave_request(auth.member_id, leave_id)?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Leave request cancelled",
        "events": outcome.events
    })))
}

/// Remaining balance plus days still waiting for a decision
#[utoipa::path(
    get,
    path = "/api/v1/leave/balance",
    params(MemberFilter),
    responses(
        (status = 200, description = "Leave balance", body = Object, example = json!({
            "balance": { "paid": 18.0, "paid_total": 26.0, "rtt": 5.0, "rtt_total": 10.0 },
            "pending_days": 3.0
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Unknown member")
    ),
    tag = "Leave"
)]
pub async fn leave_balance(
    auth: AuthUser,
    state: web::Data<SharedWorkflow>,
    filter: web::Query<MemberFilter>,
) -> actix_web::Result<impl Responder> {
    let member = auth.target(filter.member_id)?;

    let wf = lock(&state)?;
    let Some(balance) = wf.store().balance(member) else {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Member not found"
        })));
    };

    Ok(HttpResponse::Ok().json(json!({
        "balance": balance,
        "pending_days": query::pending_leave_days(wf.store(), member)
    })))
}
