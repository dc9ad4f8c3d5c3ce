use axum::{
    Json,
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::core::error::ServiceError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("{0}")]
    InvalidPath(#[from] PathRejection),
    #[error("Incorrectly formulated enquiries. Please check your spelling and try again.")]
    RouteNotFound,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Service(ServiceError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Service(ServiceError::Fetch(e)) if e.is_no_data() => StatusCode::NOT_FOUND,
            ApiError::Service(ServiceError::Fetch(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Service(ServiceError::Aggregation(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InvalidPath(_) => StatusCode::BAD_REQUEST,
            ApiError::RouteNotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self, "Rate query failed");
        }
        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
