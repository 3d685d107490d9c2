//! Domain service for cognitive evaluations.
//!
//! Draws question sets, records self-graded results, and serves the
//! score history patients and caregivers chart over time.

use thiserror::Error;

use crate::db::{EvaluationResult, Question};

/// Errors specific to evaluation operations.
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("Patient is not linked to this caregiver")]
    PatientNotLinked,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for EvaluationError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for EvaluationError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for evaluations.
#[async_trait::async_trait]
pub trait EvaluationService: Send + Sync {
    /// A fresh random draw from the question bank.
    async fn draw_questions(&self) -> Result<Vec<Question>, EvaluationError>;

    /// Records a completed quiz. The client grades itself and reports
    /// only the totals.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::Validation`] when the score falls
    /// outside `0..=total_questions`.
    async fn submit(
        &self,
        patient_id: i32,
        score: i32,
        total_questions: i32,
    ) -> Result<EvaluationResult, EvaluationError>;

    /// The calling patient's results for the current calendar month,
    /// oldest first.
    async fn monthly_history(
        &self,
        patient_id: i32,
    ) -> Result<Vec<EvaluationResult>, EvaluationError>;

    /// Full result history of a linked patient, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::PatientNotLinked`] when the caregiver
    /// has no link to the patient.
    async fn history_for_caregiver(
        &self,
        caregiver_id: i32,
        patient_id: i32,
    ) -> Result<Vec<EvaluationResult>, EvaluationError>;
}
