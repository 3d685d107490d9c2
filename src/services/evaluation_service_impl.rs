//! `SeaORM` implementation of the `EvaluationService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, TimeZone, Utc};

use crate::clock::Clock;
use crate::config::Config;
use crate::db::{EvaluationResult, Question, Store};
use crate::services::evaluation_service::{EvaluationError, EvaluationService};

pub struct SeaOrmEvaluationService {
    store: Store,
    clock: Arc<dyn Clock>,
    questions_per_draw: u64,
}

impl SeaOrmEvaluationService {
    #[must_use]
    pub fn new(store: Store, clock: Arc<dyn Clock>, config: &Config) -> Self {
        Self {
            store,
            clock,
            questions_per_draw: config.evaluations.questions_per_draw,
        }
    }
}

#[async_trait]
impl EvaluationService for SeaOrmEvaluationService {
    async fn draw_questions(&self) -> Result<Vec<Question>, EvaluationError> {
        Ok(self.store.random_questions(self.questions_per_draw).await?)
    }

    async fn submit(
        &self,
        patient_id: i32,
        score: i32,
        total_questions: i32,
    ) -> Result<EvaluationResult, EvaluationError> {
        if total_questions <= 0 {
            return Err(EvaluationError::Validation(
                "Total questions must be positive".to_string(),
            ));
        }

        if score < 0 || score > total_questions {
            return Err(EvaluationError::Validation(
                "Score must be between 0 and the total questions".to_string(),
            ));
        }

        let now = self.clock.now();
        let result = self
            .store
            .insert_evaluation_result(patient_id, score, total_questions, now)
            .await?;

        Ok(result)
    }

    async fn monthly_history(
        &self,
        patient_id: i32,
    ) -> Result<Vec<EvaluationResult>, EvaluationError> {
        let now = self.clock.now();
        let month_start = Utc
            .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
            .single()
            .ok_or_else(|| {
                EvaluationError::Internal("Failed to compute month start".to_string())
            })?;

        Ok(self
            .store
            .evaluation_results_since(patient_id, month_start)
            .await?)
    }

    async fn history_for_caregiver(
        &self,
        caregiver_id: i32,
        patient_id: i32,
    ) -> Result<Vec<EvaluationResult>, EvaluationError> {
        let linked = self
            .store
            .caregiver_link_exists(caregiver_id, patient_id)
            .await?;
        if !linked {
            return Err(EvaluationError::PatientNotLinked);
        }

        Ok(self.store.evaluation_results_for_patient(patient_id).await?)
    }
}
