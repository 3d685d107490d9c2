//! `SeaORM` implementation of the `UserService` trait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::clock::Clock;
use crate::db::{Store, User};
use crate::services::user_service::{UserError, UserService};

pub struct SeaOrmUserService {
    store: Store,
    clock: Arc<dyn Clock>,
}

impl SeaOrmUserService {
    #[must_use]
    pub fn new(store: Store, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}

#[async_trait]
impl UserService for SeaOrmUserService {
    async fn link_patient(&self, caregiver_id: i32, code: &str) -> Result<User, UserError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(UserError::Validation(
                "Patient code cannot be empty".to_string(),
            ));
        }

        let patient = self
            .store
            .get_user_by_patient_code(code)
            .await?
            .ok_or(UserError::CodeNotFound)?;

        let now = self.clock.now();
        let inserted = self
            .store
            .create_caregiver_link(caregiver_id, patient.id, now)
            .await?;

        if !inserted {
            return Err(UserError::AlreadyLinked);
        }

        Ok(patient)
    }

    async fn linked_patients(&self, caregiver_id: i32) -> Result<Vec<User>, UserError> {
        Ok(self.store.linked_patients(caregiver_id).await?)
    }

    async fn profile(&self, user_id: i32) -> Result<User, UserError> {
        self.store
            .get_user_by_id(user_id)
            .await?
            .ok_or(UserError::NotFound)
    }
}
