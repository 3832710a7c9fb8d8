use crate::api::{SharedWorkflow, lock};
use crate::auth::AuthUser;
use crate::model::Notification;
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InboxFilter {
    /// Only unread notifications
    #[serde(default)]
    pub unread: bool,
    /// Acknowledge the pulse while reading the inbox
    #[serde(default)]
    pub ack: bool,
}

/// Inbox of the caller's role, newest first. Consultants only see
/// notifications addressed to everyone or to themselves.
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    params(InboxFilter),
    responses(
        (status = 200, description = "Notifications with unread count and pulse flag", body = Object, example = json!({
            "notifications": [],
            "unread": 0,
            "pulse": false
        })),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Notifications"
)]
pub async fn list_notifications(
    auth: AuthUser,
    state: web::Data<SharedWorkflow>,
    filter: web::Query<InboxFilter>,
) -> actix_web::Result<impl Responder> {
    let mut wf = lock(&state)?;
    let pulse = wf.dispatcher().is_pulsing(auth.role);
    if filter.ack {
        wf.acknowledge_pulse(auth.role);
    }

    let inbox = wf.dispatcher();
    let notifications: Vec<&Notification> = inbox
        .notifications_for(auth.role, auth.member_id)
        .filter(|n| !filter.unread || !n.read)
        .collect();

    Ok(HttpResponse::Ok().json(json!({
        "notifications": notifications,
        "unread": inbox.unread_count_for(auth.role, auth.member_id),
        "pulse": pulse
    })))
}

#[utoipa::path(
    put,
    path = "/api/v1/notifications/{notification_id}/read",
    params(
        ("notification_id" = u64, Path, description = "ID of the notification to mark read")
    ),
    responses(
        (status = 200, description = "Marked read", body = Object, example = json!({
            "message": "Notification marked read",
            "unread": 2
        })),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Notification not found")
    ),
    tag = "Notifications"
)]
pub async fn mark_read(
    auth: AuthUser,
    state: web::Data<SharedWorkflow>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let notification_id = path.into_inner();

    let mut wf = lock(&state)?;
    let visible = wf
        .dispatcher()
        .notifications_for(auth.role, auth.member_id)
        .any(|n| n.id == notification_id);
    if !visible {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Notification not found"
        })));
    }
    wf.mark_read_for(auth.role, auth.member_id, notification_id);

    Ok(HttpResponse::Ok().json(json!({
        "message": "Notification marked read",
        "unread": wf.dispatcher().unread_count_for(auth.role, auth.member_id)
    })))
}

#[utoipa::path(
    put,
    path = "/api/v1/notifications/read-all",
    responses(
        (status = 200, description = "Every notification the caller can see marked read", body = Object, example = json!({
            "message": "All notifications marked read",
            "updated": 3
        })),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Notifications"
)]
pub async fn mark_all_read(
    auth: AuthUser,
    state: web::Data<SharedWorkflow>,
) -> actix_web::Result<impl Responder> {
    let mut wf = lock(&state)?;
    let updated = wf.mark_all_read_for(auth.role, auth.member_id);

    Ok(HttpResponse::Ok().json(json!({
        "message": "All notifications marked read",
        "updated": updated
    })))
}
