use axum::{
    Extension, Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::auth::require_role;
use super::{ApiError, ApiResponse, AppState};
use crate::db::{EvaluationResult, Question};
use crate::entities::users::UserRole;
use crate::services::auth_service::Claims;
use crate::services::evaluation_service::EvaluationError;

// ============================================================================
// Request/Response Types
// ============================================================================

/// One multiple-choice question. The correct option ships with the
/// question because the client grades the quiz locally and reports
/// only the totals back.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDto {
    pub id: i32,
    pub question_text: String,
    pub option1: String,
    pub option2: String,
    pub option3: String,
    pub option4: String,
    pub correct_option: i32,
    pub category: String,
}

impl From<Question> for QuestionDto {
    fn from(question: Question) -> Self {
        Self {
            id: question.id,
            question_text: question.question_text,
            option1: question.option1,
            option2: question.option2,
            option3: question.option3,
            option4: question.option4,
            correct_option: question.correct_option,
            category: question.category,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitEvaluationRequest {
    pub score: i32,
    pub total_questions: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResultDto {
    pub id: i32,
    pub patient_id: i32,
    pub score: i32,
    pub total_questions: i32,
    pub completed_at: DateTime<Utc>,
}

impl From<EvaluationResult> for EvaluationResultDto {
    fn from(result: EvaluationResult) -> Self {
        Self {
            id: result.id,
            patient_id: result.patient_id,
            score: result.score,
            total_questions: result.total_questions,
            completed_at: result.completed_at,
        }
    }
}

impl From<EvaluationError> for ApiError {
    fn from(err: EvaluationError) -> Self {
        match err {
            EvaluationError::PatientNotLinked => {
                Self::Forbidden("Patient is not linked to this caregiver".to_string())
            }
            EvaluationError::Validation(msg) => Self::validation(msg),
            EvaluationError::Database(msg) | EvaluationError::Internal(msg) => Self::internal(msg),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /evaluations/questions
/// A fresh random draw from the question bank
pub async fn questions(
    State(state): State<Arc<AppState>>,
    Extension(_claims): Extension<Claims>,
) -> Result<Json<ApiResponse<Vec<QuestionDto>>>, ApiError> {
    let questions = state.evaluation_service().draw_questions().await?;

    let dtos: Vec<QuestionDto> = questions.into_iter().map(QuestionDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

/// POST /evaluations/submit
/// Record a self-graded quiz result for the calling patient
pub async fn submit(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SubmitEvaluationRequest>,
) -> Result<Json<ApiResponse<EvaluationResultDto>>, ApiError> {
    require_role(&claims, UserRole::Patient)?;

    let result = state
        .evaluation_service()
        .submit(claims.sub, payload.score, payload.total_questions)
        .await?;

    Ok(Json(ApiResponse::success(EvaluationResultDto::from(
        result,
    ))))
}

/// GET /evaluations/history/me/monthly
/// The calling patient's results for the current calendar month
pub async fn monthly_history(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<Vec<EvaluationResultDto>>>, ApiError> {
    require_role(&claims, UserRole::Patient)?;

    let results = state
        .evaluation_service()
        .monthly_history(claims.sub)
        .await?;

    let dtos: Vec<EvaluationResultDto> =
        results.into_iter().map(EvaluationResultDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

/// GET /evaluations/history/caregiver/{patient_id}
/// Full history of a linked patient, for the caregiver dashboard
pub async fn caregiver_history(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(patient_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<EvaluationResultDto>>>, ApiError> {
    require_role(&claims, UserRole::Caregiver)?;

    let results = state
        .evaluation_service()
        .history_for_caregiver(claims.sub, patient_id)
        .await?;

    let dtos: Vec<EvaluationResultDto> =
        results.into_iter().map(EvaluationResultDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}
