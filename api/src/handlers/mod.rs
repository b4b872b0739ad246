use axum::{Json, extract::State};
use turnstile_common::views::ApiErrorResponse;

use crate::{context::ApiContext, error::ApiError};

pub mod auth;

#[utoipa::path(
    get,
    path = "/health",
    tags = ["health"],
    responses(
        (status = 200, description = "Credential store reachable", body = String),
        (status = 500, description = "Credential store unreachable", body = ApiErrorResponse),
    )
)]
pub async fn health_check(State(ctx): State<ApiContext>) -> Result<Json<&'static str>, ApiError> {
    ctx.auth.ping().await?;
    Ok(Json("Healthy"))
}
