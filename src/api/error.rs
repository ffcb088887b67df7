//! Mapping of service errors onto HTTP responses

use super::dto::ApiResponse;
use crate::error::TicketDeskError;
use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Error returned by HTTP handlers
///
/// Wraps [`TicketDeskError`] and renders it in the response envelope with
/// a status code chosen by error kind.
#[derive(Debug)]
pub struct ApiError(pub TicketDeskError);

impl ApiError {
    /// HTTP status for the wrapped error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            TicketDeskError::Validation(_) => StatusCode::BAD_REQUEST,
            TicketDeskError::NotFound { .. } => StatusCode::NOT_FOUND,
            TicketDeskError::InvalidState { .. } | TicketDeskError::NothingToCancel => {
                StatusCode::CONFLICT
            },
            TicketDeskError::Storage(_) | TicketDeskError::Config(_) | TicketDeskError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }
}

impl From<TicketDeskError> for ApiError {
    fn from(err: TicketDeskError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(TicketDeskError::validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(TicketDeskError::validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status.is_server_error() {
            tracing::error!(status = %status, error = %self.0, "Request failed");
            "Internal server error".to_string()
        } else {
            tracing::debug!(status = %status, error = %self.0, "Request rejected");
            self.0.to_string()
        };

        (status, Json(ApiResponse::error(message))).into_response()
    }
}
