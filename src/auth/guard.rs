//! Request Guard
//! Mission: Protect API endpoints with JWT validation

use crate::auth::{api::AuthState, models::CurrentUser};
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Header carrying the access token on protected routes.
pub const TOKEN_HEADER: &str = "x-access-token";

/// Extracting `CurrentUser` performs the full guard: token presence,
/// signature + expiry validation, and resolution to a live user row.
///
/// A token whose subject has since been deleted is rejected like any other
/// invalid token; handlers never see a dangling identity.
#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthState::from_ref(state);

        let token = parts
            .headers
            .get(TOKEN_HEADER)
            .and_then(|h| h.to_str().ok())
            .ok_or(AuthError::MissingToken)?;

        let claims = auth
            .jwt_handler
            .validate_token(token)
            .map_err(|_| AuthError::InvalidToken)?;

        let user = auth
            .user_store
            .get_by_public_id(&claims.public_id)
            .map_err(|_| AuthError::InvalidToken)?
            .ok_or(AuthError::InvalidToken)?;

        Ok(CurrentUser::from(user))
    }
}

/// Auth error types
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Token is missing"),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Token is invalid"),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
