//! `SeaORM` implementation of the `ReminderService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::TimeDelta;

use crate::clock::Clock;
use crate::db::{CaregiverReminderRow, NewReminder, Reminder, Store};
use crate::services::reminder_service::{
    DueReminder, NewReminderParams, ReminderError, ReminderService, classify_urgency,
};

/// Clock drift between the caregiver's device and the server should not
/// reject an "immediately due" reminder, so creation tolerates times up
/// to a minute behind.
const PAST_TOLERANCE: TimeDelta = TimeDelta::seconds(60);

pub struct SeaOrmReminderService {
    store: Store,
    clock: Arc<dyn Clock>,
}

impl SeaOrmReminderService {
    #[must_use]
    pub fn new(store: Store, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}

#[async_trait]
impl ReminderService for SeaOrmReminderService {
    async fn create(
        &self,
        caregiver_id: i32,
        params: NewReminderParams,
    ) -> Result<Reminder, ReminderError> {
        if params.title.trim().is_empty() {
            return Err(ReminderError::Validation(
                "Title cannot be empty".to_string(),
            ));
        }

        let now = self.clock.now();
        if params.scheduled_time < now - PAST_TOLERANCE {
            return Err(ReminderError::Validation(
                "Cannot schedule a reminder in the past".to_string(),
            ));
        }

        let linked = self
            .store
            .caregiver_link_exists(caregiver_id, params.patient_id)
            .await?;
        if !linked {
            return Err(ReminderError::PatientNotLinked);
        }

        let reminder = self
            .store
            .create_reminder(
                NewReminder {
                    patient_id: params.patient_id,
                    caregiver_id,
                    title: params.title.trim().to_string(),
                    description: params.description,
                    scheduled_time: params.scheduled_time,
                },
                now,
            )
            .await?;

        Ok(reminder)
    }

    async fn active_for_patient(
        &self,
        patient_id: i32,
    ) -> Result<Vec<DueReminder>, ReminderError> {
        let now = self.clock.now();
        let rows = self
            .store
            .active_reminders_for_patient(patient_id, now)
            .await?;

        Ok(rows
            .into_iter()
            .map(|reminder| DueReminder {
                urgency: classify_urgency(reminder.scheduled_time, now),
                reminder,
            })
            .collect())
    }

    async fn acknowledge(
        &self,
        patient_id: i32,
        reminder_id: i32,
    ) -> Result<Reminder, ReminderError> {
        self.store
            .acknowledge_reminder(reminder_id, patient_id)
            .await?
            .ok_or(ReminderError::NotFound)
    }

    async fn list_for_caregiver(
        &self,
        caregiver_id: i32,
    ) -> Result<Vec<CaregiverReminderRow>, ReminderError> {
        Ok(self.store.reminders_for_caregiver(caregiver_id).await?)
    }

    async fn delete(&self, caregiver_id: i32, reminder_id: i32) -> Result<(), ReminderError> {
        let deleted = self.store.delete_reminder(reminder_id, caregiver_id).await?;
        if !deleted {
            return Err(ReminderError::NotFound);
        }

        Ok(())
    }
}
