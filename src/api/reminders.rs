use axum::{
    Extension, Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::auth::require_role;
use super::{ApiError, ApiResponse, AppState};
use crate::db::{CaregiverReminderRow, Reminder};
use crate::entities::users::UserRole;
use crate::services::auth_service::Claims;
use crate::services::reminder_service::{
    DueReminder, NewReminderParams, ReminderError, Urgency,
};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReminderRequest {
    pub patient_id: i32,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub scheduled_time: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDto {
    pub id: i32,
    pub patient_id: i32,
    pub caregiver_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub scheduled_time: DateTime<Utc>,
    pub is_active: bool,
    pub patient_acknowledged: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Reminder> for ReminderDto {
    fn from(reminder: Reminder) -> Self {
        Self {
            id: reminder.id,
            patient_id: reminder.patient_id,
            caregiver_id: reminder.caregiver_id,
            title: reminder.title,
            description: reminder.description,
            scheduled_time: reminder.scheduled_time,
            is_active: reminder.is_active,
            patient_acknowledged: reminder.patient_acknowledged,
            created_at: reminder.created_at,
        }
    }
}

/// A due reminder as the patient sees it, tagged urgent or stale
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveReminderDto {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub scheduled_time: DateTime<Utc>,
    pub urgency: Urgency,
}

impl From<DueReminder> for ActiveReminderDto {
    fn from(due: DueReminder) -> Self {
        Self {
            id: due.reminder.id,
            title: due.reminder.title,
            description: due.reminder.description,
            scheduled_time: due.reminder.scheduled_time,
            urgency: due.urgency,
        }
    }
}

/// A caregiver dashboard row with the patient's name
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaregiverReminderDto {
    pub id: i32,
    pub patient_id: i32,
    pub patient_name: String,
    pub title: String,
    pub description: Option<String>,
    pub scheduled_time: DateTime<Utc>,
    pub is_active: bool,
    pub patient_acknowledged: bool,
    pub created_at: DateTime<Utc>,
}

impl From<CaregiverReminderRow> for CaregiverReminderDto {
    fn from(row: CaregiverReminderRow) -> Self {
        Self {
            id: row.id,
            patient_id: row.patient_id,
            patient_name: row.patient_name,
            title: row.title,
            description: row.description,
            scheduled_time: row.scheduled_time,
            is_active: row.is_active,
            patient_acknowledged: row.patient_acknowledged,
            created_at: row.created_at,
        }
    }
}

impl From<ReminderError> for ApiError {
    fn from(err: ReminderError) -> Self {
        match err {
            ReminderError::PatientNotLinked => {
                Self::Forbidden("Patient is not linked to this caregiver".to_string())
            }
            ReminderError::NotFound => Self::NotFound("Reminder not found".to_string()),
            ReminderError::Validation(msg) => Self::validation(msg),
            ReminderError::Database(msg) | ReminderError::Internal(msg) => Self::internal(msg),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /reminders
/// Schedule a reminder for a linked patient
pub async fn create_reminder(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateReminderRequest>,
) -> Result<Json<ApiResponse<ReminderDto>>, ApiError> {
    require_role(&claims, UserRole::Caregiver)?;

    let reminder = state
        .reminder_service()
        .create(
            claims.sub,
            NewReminderParams {
                patient_id: payload.patient_id,
                title: payload.title,
                description: payload.description,
                scheduled_time: payload.scheduled_time,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(ReminderDto::from(reminder))))
}

/// GET /reminders/active
/// Due reminders for the calling patient, oldest first
pub async fn active_reminders(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<Vec<ActiveReminderDto>>>, ApiError> {
    require_role(&claims, UserRole::Patient)?;

    let due = state
        .reminder_service()
        .active_for_patient(claims.sub)
        .await?;

    let dtos: Vec<ActiveReminderDto> = due.into_iter().map(ActiveReminderDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

/// PATCH /reminders/{id}/acknowledge
/// Confirm a reminder as done. Repeats are accepted and land in the
/// same acknowledged state.
pub async fn acknowledge_reminder(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ReminderDto>>, ApiError> {
    require_role(&claims, UserRole::Patient)?;

    let reminder = state.reminder_service().acknowledge(claims.sub, id).await?;

    Ok(Json(ApiResponse::success(ReminderDto::from(reminder))))
}

/// GET /reminders/caregiver
/// Everything the calling caregiver has scheduled, newest first
pub async fn caregiver_reminders(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<Vec<CaregiverReminderDto>>>, ApiError> {
    require_role(&claims, UserRole::Caregiver)?;

    let rows = state
        .reminder_service()
        .list_for_caregiver(claims.sub)
        .await?;

    let dtos: Vec<CaregiverReminderDto> =
        rows.into_iter().map(CaregiverReminderDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

/// DELETE /reminders/{id}
/// Remove a reminder the calling caregiver owns
pub async fn delete_reminder(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    require_role(&claims, UserRole::Caregiver)?;

    state.reminder_service().delete(claims.sub, id).await?;

    Ok(Json(ApiResponse::success(())))
}
