use crate::api::{SharedWorkflow, lock};
use crate::auth::AuthUser;
use crate::engine::ApprovalResult;
use crate::model::{ApprovalItem, ApprovalKind};
use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ApprovalFilter {
    /// Only items of this kind
    #[param(example = "timesheet")]
    pub kind: Option<ApprovalKind>,
}

#[derive(Deserialize, ToSchema)]
pub struct RejectPayload {
    #[schema(example = "Coverage conflict")]
    pub reason: String,
}

#[derive(Deserialize, ToSchema)]
pub struct ApproveAllPayload {
    /// Items to approve; the whole queue when omitted
    pub ids: Option<Vec<Uuid>>,
}

#[derive(Serialize, ToSchema)]
pub struct BulkResult {
    pub id: Uuid,
    /// `approved`, `already_resolved` or `failed`
    #[schema(example = "approved")]
    pub status: String,
    pub error: Option<String>,
}

impl From<ApprovalResult> for BulkResult {
    fn from(r: ApprovalResult) -> Self {
        let (status, error) = match r.result {
            Ok(Some(_)) => ("approved", None),
            Ok(None) => ("already_resolved", None),
            Err(e) => ("failed", Some(e.to_string())),
        };
        Self {
            id: r.id,
            status: status.to_string(),
            error,
        }
    }
}

/// Pending approval queue, newest first
#[utoipa::path(
    get,
    path = "/api/v1/approvals",
    params(ApprovalFilter),
    responses(
        (status = 200, description = "Pending items", body = [ApprovalItem]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Approvals"
)]
pub async fn list_approvals(
    auth: AuthUser,
    state: web::Data<SharedWorkflow>,
    filter: web::Query<ApprovalFilter>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager()?;

    let wf = lock(&state)?;
    let items: Vec<&ApprovalItem> = wf
        .store()
        .approvals()
        .iter()
        .filter(|i| filter.kind.is_none_or(|k| i.kind() == k))
        .collect();

    Ok(HttpResponse::Ok().json(items))
}

/* =========================
Approve one item (Manager)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/approvals/{approval_id}/approve",
    params(
        ("approval_id" = Uuid, Path, description = "ID of the queued item to approve")
    ),
    responses(
        (status = 200, description = "Item approved, or already resolved", body = Object, example = json!({
            "message": "Approved"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Item no longer resolvable")
    ),
    tag = "Approvals"
)]
pub async fn approve(
    auth: AuthUser,
    state: web::Data<SharedWorkflow>,
    path: web::Path<Uuid>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager()?;
    let approval_id = path.into_inner();

    let mut wf = lock(&state)?;
    let body = match wf.approve_item(auth.member_id, approval_id)? {
        Some(outcome) => json!({ "message": "Approved", "events": outcome.events }),
        None => json!({ "message": "Already resolved" }),
    };

    Ok(HttpResponse::Ok().json(body))
}

/* =========================
Reject one item (Manager)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/approvals/{approval_id}/reject",
    params(
        ("approval_id" = Uuid, Path, description = "ID of the queued item to reject")
    ),
    request_body(content = RejectPayload, content_type = "application/json"),
    responses(
        (status = 200, description = "Item rejected, or already resolved", body = Object, example = json!({
            "message": "Rejected"
        })),
        (status = 400, description = "Missing reason"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Approvals"
)]
pub async fn reject(
    auth: AuthUser,
    state: web::Data<SharedWorkflow>,
    path: web::Path<Uuid>,
    payload: web::Json<RejectPayload>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager()?;
    let approval_id = path.into_inner();

    let mut wf = lock(&state)?;
    let body = match wf.reject_item(auth.member_id, approval_id, &payload.reason)? {
        Some(outcome) => json!({ "message": "Rejected", "events": outcome.events }),
        None => json!({ "message": "Already resolved" }),
    };

    Ok(HttpResponse::Ok().json(body))
}

/// Approves several items; failures do not stop the batch
#[utoipa::path(
    post,
    path = "/api/v1/approvals/approve-all",
    request_body(content = ApproveAllPayload, content_type = "application/json"),
    responses(
        (status = 200, description = "Per-item results", body = [BulkResult]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Approvals"
)]
pub async fn approve_all(
    auth: AuthUser,
    state: web::Data<SharedWorkflow>,
    payload: web::Json<ApproveAllPayload>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager()?;

    let mut wf = lock(&state)?;
    let ids = match payload.into_inner().ids {
        Some(ids) => ids,
        None => wf.store().approvals().iter().map(|i| i.id).collect(),
    };
    let results: Vec<BulkResult> = wf
        .approve_all(auth.member_id, &ids)
        .into_iter()
        .map(BulkResult::from)
        .collect();

    Ok(HttpResponse::Ok().json(results))
}
