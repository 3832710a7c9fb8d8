pub mod approvals;
pub mod error;
pub mod leave_request;
pub mod notifications;
pub mod reports;
pub mod team;
pub mod timesheet;

use crate::engine::Workflow;
use actix_web::{error::ErrorInternalServerError, web};
use std::sync::{Mutex, MutexGuard};

/// The session state shared by every worker.
pub type SharedWorkflow = Mutex<Workflow>;

pub(crate) fn lock(state: &web::Data<SharedWorkflow>) -> actix_web::Result<MutexGuard<'_, Workflow>> {
    state.lock().map_err(|e| {
        tracing::error!(error = %e, "workflow state poisoned");
        ErrorInternalServerError("Internal Server Error")
    })
}
