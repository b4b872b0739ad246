use axum::{Json, http::StatusCode, response::IntoResponse};
use turnstile_common::views::ApiErrorResponse;
use turnstile_db::storage::StoreError;
use thiserror::Error;

use crate::auth::AuthError;

pub const INVALID_INPUT_MESSAGE: &str = "Empty password or username or invalid username";
pub const SIGNUP_FAILED_MESSAGE: &str = "Failed to add a new user";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid password or username";
const MALFORMED_BODY_MESSAGE: &str = "Request body is not valid JSON for this endpoint.";
const UNAUTHORIZED_MESSAGE: &str = "You are not authenticated to perform this action.";
const INTERNAL_MESSAGE: &str = "Something went wrong on our end. Please try again later.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Malformed request body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedBody(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Auth(ae) => match ae {
                AuthError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                AuthError::DuplicateUser(_) => StatusCode::CONFLICT,
                AuthError::InvalidCredentials => StatusCode::FORBIDDEN,
                AuthError::MissingCredentials => StatusCode::UNAUTHORIZED,
                AuthError::StoreUnavailable(_)
                | AuthError::Token(_)
                | AuthError::Password(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::MalformedBody(_) => "InvalidInput",
            Self::Unauthorized(_) => "Unauthorized",
            Self::Auth(ae) => match ae {
                AuthError::InvalidInput(_) => "InvalidInput",
                AuthError::DuplicateUser(_) => "DuplicateUser",
                AuthError::InvalidCredentials => "InvalidCredentials",
                AuthError::MissingCredentials => "Unauthorized",
                AuthError::StoreUnavailable(_) => "StoreUnavailable",
                AuthError::Token(_) | AuthError::Password(_) => "InternalError",
            },
            Self::Storage(_) => "StoreUnavailable",
        }
    }

    fn message(&self) -> &'static str {
        match self {
            Self::MalformedBody(_) => MALFORMED_BODY_MESSAGE,
            Self::Unauthorized(_) => UNAUTHORIZED_MESSAGE,
            Self::Auth(ae) => match ae {
                AuthError::InvalidInput(_) => INVALID_INPUT_MESSAGE,
                AuthError::DuplicateUser(_) => SIGNUP_FAILED_MESSAGE,
                AuthError::InvalidCredentials => INVALID_CREDENTIALS_MESSAGE,
                AuthError::MissingCredentials => UNAUTHORIZED_MESSAGE,
                AuthError::StoreUnavailable(_)
                | AuthError::Token(_)
                | AuthError::Password(_) => INTERNAL_MESSAGE,
            },
            Self::Storage(_) => INTERNAL_MESSAGE,
        }
    }
}

impl From<ApiError> for ApiErrorResponse {
    fn from(err: ApiError) -> Self {
        ApiErrorResponse {
            code: Some(err.code().into()),
            message: err.message().into(),

            #[cfg(debug_assertions)]
            details: Some(err.to_string()),

            #[cfg(not(debug_assertions))]
            details: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status_code = self.status_code();

        if status_code.is_server_error() {
            tracing::error!("Error returned by handler: {self}");
        } else {
            tracing::info!(status = status_code.as_u16(), "Request rejected: {self}");
        }

        (status_code, Json(ApiErrorResponse::from(self))).into_response()
    }
}
