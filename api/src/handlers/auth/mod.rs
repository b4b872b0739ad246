use axum::{Json, body::Bytes, extract::State};
use tracing::info;
use turnstile_common::{
    params::{LoginParams, SignupParams},
    views::{ApiErrorResponse, SIGNUP_SUCCESS_MESSAGE, WhoAmI},
};

use crate::{auth::Auth, context::ApiContext, error::ApiError};


/// Register a new user.
///
/// The body is parsed by hand rather than through `Json<T>` so that a
/// missing or wrong `Content-Type` is accepted and malformed JSON becomes a
/// 400 instead of an extractor rejection.
#[utoipa::path(
    post,
    path = "/signup",
    tags = ["auth"],
    request_body(content = SignupParams, content_type = "application/json"),
    responses(
        (status = 200, description = "User added", body = String),
        (status = 400, description = "Empty password or username or invalid username", body = ApiErrorResponse),
        (status = 409, description = "Username already registered", body = ApiErrorResponse),
        (status = 500, description = "Credential store unavailable", body = ApiErrorResponse),
    )
)]
pub async fn signup(
    State(ctx): State<ApiContext>,
    body: Bytes,
) -> Result<Json<&'static str>, ApiError> {
    info!("Received one signup request");

    let params: SignupParams = serde_json::from_slice(&body)?;
    ctx.auth.signup(params).await?;

    Ok(Json(SIGNUP_SUCCESS_MESSAGE))
}

/// Exchange a username and password for a signed token valid for 24 hours.
#[utoipa::path(
    post,
    path = "/login",
    tags = ["auth"],
    request_body(content = LoginParams, content_type = "application/json"),
    responses(
        (status = 200, description = "Signed token", body = String),
        (status = 400, description = "Malformed request body", body = ApiErrorResponse),
        (status = 403, description = "Invalid password or username", body = ApiErrorResponse),
        (status = 500, description = "Credential store unavailable", body = ApiErrorResponse),
    )
)]
pub async fn login(
    State(ctx): State<ApiContext>,
    body: Bytes,
) -> Result<Json<String>, ApiError> {
    info!("Received one login request");

    let params: LoginParams = serde_json::from_slice(&body)?;
    let issued = ctx.auth.login(params).await?;

    Ok(Json(issued.token))
}

#[utoipa::path(
    get,
    path = "/whoami",
    tags = ["auth"],
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Identity asserted by the bearer token", body = WhoAmI),
        (status = 401, description = "Missing, invalid or expired token", body = ApiErrorResponse),
    )
)]
pub async fn whoami(Auth(claims): Auth) -> Result<Json<WhoAmI>, ApiError> {
    let expires_at = claims
        .expires_at()
        .ok_or_else(|| ApiError::Unauthorized("token expiry out of range".into()))?;

    Ok(Json(WhoAmI {
        username: claims.username,
        expires_at,
    }))
}
