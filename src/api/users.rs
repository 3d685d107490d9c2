use axum::{Extension, Json, extract::State};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::require_role;
use super::{ApiError, ApiResponse, AppState, UserDto};
use crate::entities::users::UserRole;
use crate::services::auth_service::Claims;
use crate::services::user_service::UserError;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkPatientRequest {
    pub patient_code: String,
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::CodeNotFound => {
                Self::NotFound("No patient found for that code".to_string())
            }
            UserError::AlreadyLinked => Self::Conflict("Patient is already linked".to_string()),
            UserError::NotFound => Self::NotFound("User not found".to_string()),
            UserError::Validation(msg) => Self::validation(msg),
            UserError::Database(msg) | UserError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// POST /users/link-patient
/// Link the calling caregiver to a patient by their code
pub async fn link_patient(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<LinkPatientRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    require_role(&claims, UserRole::Caregiver)?;

    let patient = state
        .user_service()
        .link_patient(claims.sub, &payload.patient_code)
        .await?;

    Ok(Json(ApiResponse::success(UserDto::from(patient))))
}

/// GET /users/patients
/// All patients linked to the calling caregiver
pub async fn linked_patients(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, ApiError> {
    require_role(&claims, UserRole::Caregiver)?;

    let patients = state.user_service().linked_patients(claims.sub).await?;

    let dtos: Vec<UserDto> = patients.into_iter().map(UserDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

/// GET /users/me
/// Profile of the calling account
pub async fn me(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = state.user_service().profile(claims.sub).await?;

    Ok(Json(ApiResponse::success(UserDto::from(user))))
}
