use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder, QuerySelect,
    Set,
};

use crate::entities::{evaluation_results, prelude::*, questions};

/// Repository for quiz questions and evaluation results
pub struct EvaluationRepository {
    conn: DatabaseConnection,
}

impl EvaluationRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Draw a random subset of the question bank
    pub async fn random_questions(&self, limit: u64) -> Result<Vec<questions::Model>> {
        let rows = Questions::find()
            .order_by(Expr::cust("RANDOM()"), Order::Asc)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to query question bank")?;

        Ok(rows)
    }

    pub async fn insert_result(
        &self,
        patient_id: i32,
        score: i32,
        total_questions: i32,
        completed_at: DateTime<Utc>,
    ) -> Result<evaluation_results::Model> {
        let active = evaluation_results::ActiveModel {
            patient_id: Set(patient_id),
            score: Set(score),
            total_questions: Set(total_questions),
            completed_at: Set(completed_at),
            ..Default::default()
        };

        let res = EvaluationResults::insert(active)
            .exec(&self.conn)
            .await
            .context("Failed to insert evaluation result")?;

        Ok(evaluation_results::Model {
            id: res.last_insert_id,
            patient_id,
            score,
            total_questions,
            completed_at,
        })
    }

    /// Results for a patient completed at or after `start`, oldest first
    pub async fn results_since(
        &self,
        patient_id: i32,
        start: DateTime<Utc>,
    ) -> Result<Vec<evaluation_results::Model>> {
        let rows = EvaluationResults::find()
            .filter(evaluation_results::Column::PatientId.eq(patient_id))
            .filter(evaluation_results::Column::CompletedAt.gte(start))
            .order_by_asc(evaluation_results::Column::CompletedAt)
            .all(&self.conn)
            .await
            .context("Failed to query evaluation results")?;

        Ok(rows)
    }

    /// Full result history for a patient, oldest first
    pub async fn results_for_patient(
        &self,
        patient_id: i32,
    ) -> Result<Vec<evaluation_results::Model>> {
        let rows = EvaluationResults::find()
            .filter(evaluation_results::Column::PatientId.eq(patient_id))
            .order_by_asc(evaluation_results::Column::CompletedAt)
            .all(&self.conn)
            .await
            .context("Failed to query evaluation history")?;

        Ok(rows)
    }
}
