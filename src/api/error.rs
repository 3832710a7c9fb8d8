use crate::engine::WorkflowError;
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;

impl ResponseError for WorkflowError {
    fn status_code(&self) -> StatusCode {
        match self {
            WorkflowError::NotFound(_) => StatusCode::NOT_FOUND,
            WorkflowError::InvalidState(_) => StatusCode::CONFLICT,
            WorkflowError::EmptyWeek(_)
            | WorkflowError::ZeroDays { .. }
            | WorkflowError::MissingReason
            | WorkflowError::InvalidEntry(_)
            | WorkflowError::InvalidDateRange(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.kind(),
            "message": self.to_string()
        }))
    }
}
