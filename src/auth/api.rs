//! Authentication API Endpoints
//! Mission: Provide login and user management endpoints

use crate::auth::{
    jwt::JwtHandler,
    models::{
        CreateUserRequest, CurrentUser, LoginResponse, UpdateUserRequest, UserResponse,
    },
    user_store::UserStore,
};
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

/// Shared auth state
#[derive(Clone)]
pub struct AuthState {
    pub user_store: Arc<UserStore>,
    pub jwt_handler: Arc<JwtHandler>,
}

impl AuthState {
    pub fn new(user_store: Arc<UserStore>, jwt_handler: Arc<JwtHandler>) -> Self {
        Self {
            user_store,
            jwt_handler,
        }
    }
}

/// Login endpoint - GET /login
///
/// Credentials arrive via HTTP Basic auth. Unknown user, missing header, and
/// wrong password all produce the same 401 so login failures leak nothing.
pub async fn login(
    State(state): State<AuthState>,
    headers: HeaderMap,
) -> Result<Json<LoginResponse>, AuthApiError> {
    let (name, password) =
        basic_credentials(&headers).ok_or(AuthApiError::InvalidCredentials)?;

    info!("🔐 Login attempt: {}", name);

    let valid = state
        .user_store
        .verify_password(&name, &password)
        .map_err(|_| AuthApiError::InternalError)?;

    if !valid {
        warn!("❌ Failed login attempt: {}", name);
        return Err(AuthApiError::InvalidCredentials);
    }

    let user = state
        .user_store
        .get_by_name(&name)
        .map_err(|_| AuthApiError::InternalError)?
        .ok_or(AuthApiError::InvalidCredentials)?;

    let (token, expires_in) = state
        .jwt_handler
        .generate_token(&user)
        .map_err(|_| AuthApiError::InternalError)?;

    info!("✅ Login successful: {}", user.name);

    Ok(Json(LoginResponse { token, expires_in }))
}

/// Parse an HTTP Basic Authorization header into (name, password).
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = STANDARD.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (name, password) = decoded.split_once(':')?;
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), password.to_string()))
}

/// List all users - GET /users (Admin only)
pub async fn list_users(
    current_user: CurrentUser,
    State(state): State<AuthState>,
) -> Result<Json<Vec<UserResponse>>, AuthApiError> {
    require_admin(&current_user)?;

    let users = state
        .user_store
        .list_users()
        .map_err(|_| AuthApiError::InternalError)?;

    let response: Vec<UserResponse> = users.iter().map(UserResponse::from_user).collect();

    Ok(Json(response))
}

/// Get one user - GET /users/:public_id (Admin only)
pub async fn get_user(
    current_user: CurrentUser,
    State(state): State<AuthState>,
    Path(public_id): Path<String>,
) -> Result<Json<UserResponse>, AuthApiError> {
    require_admin(&current_user)?;

    let user = state
        .user_store
        .get_by_public_id(&public_id)
        .map_err(|_| AuthApiError::InternalError)?
        .ok_or(AuthApiError::UserNotFound)?;

    Ok(Json(UserResponse::from_user(&user)))
}

/// Sign up - POST /users (open, no token required)
///
/// New accounts are always non-admin; administration stays with the seeded
/// admin until an admin promotes someone via PUT /users/:public_id.
pub async fn create_user(
    State(state): State<AuthState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AuthApiError> {
    let user = state
        .user_store
        .create_user(&payload.name, &payload.password, false)
        .map_err(|e| {
            warn!("Failed to create user: {}", e);
            if UserStore::is_unique_violation(&e) {
                AuthApiError::NameTaken
            } else {
                AuthApiError::InternalError
            }
        })?;

    info!("✅ User created: {}", user.name);

    Ok((StatusCode::CREATED, Json(UserResponse::from_user(&user))))
}

/// Update a user's name and admin flag - PUT /users/:public_id (Admin only)
pub async fn update_user(
    current_user: CurrentUser,
    State(state): State<AuthState>,
    Path(public_id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AuthApiError> {
    require_admin(&current_user)?;

    let updated = state
        .user_store
        .update_user(&public_id, &payload.name, payload.admin)
        .map_err(|e| {
            warn!("Failed to update user {}: {}", public_id, e);
            if UserStore::is_unique_violation(&e) {
                AuthApiError::NameTaken
            } else {
                AuthApiError::InternalError
            }
        })?
        .ok_or(AuthApiError::UserNotFound)?;

    Ok(Json(UserResponse::from_user(&updated)))
}

/// Delete user - DELETE /users/:public_id (Admin only)
pub async fn delete_user(
    current_user: CurrentUser,
    State(state): State<AuthState>,
    Path(public_id): Path<String>,
) -> Result<Json<serde_json::Value>, AuthApiError> {
    require_admin(&current_user)?;

    let deleted = state
        .user_store
        .delete_user(&public_id)
        .map_err(|_| AuthApiError::InternalError)?;

    if !deleted {
        return Err(AuthApiError::UserNotFound);
    }

    info!("🗑️  User deleted: {}", public_id);

    Ok(Json(json!({ "message": "Deleted" })))
}

fn require_admin(user: &CurrentUser) -> Result<(), AuthApiError> {
    if user.admin {
        Ok(())
    } else {
        Err(AuthApiError::Forbidden)
    }
}

/// Auth API errors
#[derive(Debug)]
pub enum AuthApiError {
    InvalidCredentials,
    Forbidden,
    UserNotFound,
    NameTaken,
    InternalError,
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let challenge = matches!(self, AuthApiError::InvalidCredentials);

        let (status, message) = match self {
            AuthApiError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Could not verify"),
            AuthApiError::Forbidden => (StatusCode::FORBIDDEN, "Cannot perform that function"),
            AuthApiError::UserNotFound => (StatusCode::NOT_FOUND, "No user found"),
            AuthApiError::NameTaken => (StatusCode::CONFLICT, "Name already taken"),
            AuthApiError::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let mut response = (status, Json(json!({ "message": message }))).into_response();

        if challenge {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Basic realm=\"Login required\""),
            );
        }

        response
    }
}
