use std::future::{Future, ready};

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};

use super::{error::AuthError, token::Claims};
use crate::{context::ApiContext, error::ApiError};

const BEARER_PREFIX: &str = "Bearer ";

/// Extractor that REQUIRES a valid bearer token.
///
/// Returns 401 Unauthorized if the `Authorization` header is missing, not a
/// bearer token, or fails signature/expiry checks.
///
/// ```rust,ignore
/// pub async fn whoami(Auth(claims): Auth) -> Json<WhoAmI> {
///     // claims.username is the authenticated user
/// }
/// ```
pub struct Auth(pub Claims);

impl FromRequestParts<ApiContext> for Auth {
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &ApiContext,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let result = bearer_token(&parts.headers)
            .ok_or(AuthError::MissingCredentials)
            .and_then(|token| state.auth.verify_token(token))
            .map(Auth)
            .map_err(|e| ApiError::Unauthorized(e.to_string()));

        ready(result)
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
