use crate::model::{MemberId, Role};
use actix_web::{FromRequest, HttpRequest, dev::Payload, error::ErrorUnauthorized};
use futures::future::{Ready, ready};
use std::str::FromStr;

pub const USER_ID_HEADER: &str = "X-User-Id";
pub const USER_ROLE_HEADER: &str = "X-User-Role";

/// Identity forwarded by the upstream auth gateway. The service trusts
/// these headers; it does not verify credentials itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub member_id: MemberId,
    pub role: Role,
}

fn header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers()
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let member_id = match header(req, USER_ID_HEADER).and_then(|v| v.parse::<u64>().ok()) {
            Some(id) => MemberId(id),
            None => return ready(Err(ErrorUnauthorized("Missing or invalid X-User-Id"))),
        };

        let role = match header(req, USER_ROLE_HEADER)
            .and_then(|v| Role::from_str(&v.to_lowercase()).ok())
        {
            Some(r) => r,
            None => return ready(Err(ErrorUnauthorized("Missing or invalid X-User-Role"))),
        };

        ready(Ok(AuthUser { member_id, role }))
    }
}

impl AuthUser {
    pub fn require_manager(&self) -> actix_web::Result<()> {
        if self.role == Role::Manager {
            Ok(())
        } else {
            Err(actix_web::error::ErrorForbidden("Manager only"))
        }
    }

    /// Member whose data a request targets: managers may look at anyone,
    /// consultants only at themselves.
    pub fn target(&self, requested: Option<u64>) -> actix_web::Result<MemberId> {
        match requested.map(MemberId) {
            None => Ok(self.member_id),
            Some(id) if id == self.member_id || self.role == Role::Manager => Ok(id),
            Some(_) => Err(actix_web::error::ErrorForbidden("Manager only")),
        }
    }
}
