use axum::{
    Json,
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, RegisterRequest, UserDto};
use crate::entities::users::UserRole;
use crate::services::auth_service::{AuthError, Claims, RegisterParams};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserDto,
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmailTaken => Self::Conflict("Email is already registered".to_string()),
            AuthError::InvalidCredentials => Self::Unauthorized("Invalid credentials".to_string()),
            AuthError::Validation(msg) => Self::validation(msg),
            AuthError::Database(msg) | AuthError::Internal(msg) => Self::internal(msg),
        }
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Authentication middleware. Every protected route expects an
/// `Authorization: Bearer <jwt>` header; the decoded claims are stored
/// in request extensions for handlers to pick up.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers)
        .ok_or_else(|| ApiError::unauthorized("Missing bearer token"))?;

    let claims = decode_token(&token, state.config().auth.jwt_secret.as_bytes())?;

    tracing::Span::current().record("user_id", claims.sub);
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

/// Extract the token from an `Authorization: Bearer` header
fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    if let Some(auth_header) = headers.get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        return Some(token.trim().to_string());
    }

    None
}

fn decode_token(token: &str, secret: &[u8]) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::unauthorized("Invalid or expired token"))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/register
/// Create an account and sign it in
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    if payload.email.is_empty() {
        return Err(ApiError::validation("Email is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let outcome = state
        .auth_service()
        .register(RegisterParams {
            name: payload.name,
            email: payload.email,
            password: payload.password,
            role: payload.role,
            patient_code_to_link: payload.patient_code,
        })
        .await?;

    Ok(Json(ApiResponse::success(AuthResponse {
        token: outcome.token,
        user: UserDto::from(outcome.user),
    })))
}

/// POST /auth/login
/// Authenticate with email and password, returns a bearer token
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    if payload.email.is_empty() {
        return Err(ApiError::validation("Email is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let outcome = state
        .auth_service()
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(ApiResponse::success(AuthResponse {
        token: outcome.token,
        user: UserDto::from(outcome.user),
    })))
}

// ============================================================================
// Helpers
// ============================================================================

/// Reject callers whose token carries the wrong role
pub fn require_role(claims: &Claims, role: UserRole) -> Result<(), ApiError> {
    if claims.role == role {
        return Ok(());
    }

    let message = match role {
        UserRole::Caregiver => "Caregiver access required",
        UserRole::Patient => "Patient access required",
    };
    Err(ApiError::forbidden(message))
}
