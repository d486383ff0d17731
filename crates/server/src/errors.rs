use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use models::errors::ModelError;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{error, warn};

use crate::metrics;

/// Failure of an account endpoint. Rendered as a plain-text body.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn account_not_found(id: i64) -> Self {
        Self::NotFound(format!("Account not found with id: {}", id))
    }

    pub fn no_name_match(name: &str) -> Self {
        Self::NotFound(format!("No accounts found with name: {}", name))
    }

    /// Update and delete report every service failure as 500 with the raw
    /// message, a missing id included.
    pub fn from_mutation(e: ServiceError) -> Self {
        Self::Internal(e.to_string())
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::NotFound(msg) => ApiError::NotFound(msg),
            ServiceError::Validation(msg) => ApiError::Validation(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<ModelError> for ApiError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => ApiError::Validation(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let msg = self.to_string();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %msg, "request failed");
        } else {
            warn!(status = status.as_u16(), error = %msg, "request rejected");
        }
        metrics::record_error(status);
        (status, msg).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("storage unavailable: {0}")]
    Storage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_not_found_maps_to_404_with_service_message() {
        let api: ApiError = ServiceError::account_not_found(3).into();
        assert_eq!(api.status(), StatusCode::NOT_FOUND);
        assert_eq!(api.to_string(), "Account not found with id 3");
    }

    #[test]
    fn mutation_failures_are_internal_even_when_not_found() {
        let api = ApiError::from_mutation(ServiceError::account_not_found(20));
        assert_eq!(api.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.to_string(), "Account not found with id 20");
    }

    #[test]
    fn validation_messages_are_prefixed() {
        let api: ApiError = ModelError::Validation("firstName must not be null".into()).into();
        assert_eq!(api.status(), StatusCode::BAD_REQUEST);
        assert_eq!(api.to_string(), "Validation error: firstName must not be null");

        let api: ApiError = ServiceError::Validation("lastName must not be blank".into()).into();
        assert_eq!(api, ApiError::Validation("lastName must not be blank".into()));
    }

    #[test]
    fn storage_errors_are_internal() {
        let api: ApiError = ServiceError::Db("connection reset".into()).into();
        assert_eq!(api, ApiError::Internal("database error: connection reset".into()));
    }

    #[test]
    fn lookup_messages_name_the_identifier() {
        assert_eq!(ApiError::account_not_found(10).to_string(), "Account not found with id: 10");
        assert_eq!(
            ApiError::no_name_match("NonExistentName").to_string(),
            "No accounts found with name: NonExistentName"
        );
    }
}
