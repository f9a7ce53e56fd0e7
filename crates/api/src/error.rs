use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sched_core::{ProblemError, SolveError, ValidationError};

/// Maps domain errors onto HTTP status codes: malformed/inconsistent input is
/// a client error (400), a structurally valid but unschedulable instance is
/// 422, and a conflict during solving (e.g. cancellation racing completion)
/// is 409.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unprocessable(String),
    Conflict(String),
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<ProblemError> for ApiError {
    fn from(e: ProblemError) -> Self {
        ApiError::Unprocessable(e.to_string())
    }
}

impl From<SolveError> for ApiError {
    fn from(e: SolveError) -> Self {
        match e {
            SolveError::Infeasible => ApiError::Unprocessable(e.to_string()),
            SolveError::Cancelled => ApiError::Conflict(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };
        (status, message).into_response()
    }
}
