//! Domain service for the reminder lifecycle.
//!
//! Caregivers schedule reminders; patients see them once the scheduled
//! time passes and confirm them. A reminder only ever moves from
//! pending to acknowledged, and an unconfirmed one never expires.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::db::Reminder;

/// Errors specific to reminder operations.
#[derive(Debug, Error)]
pub enum ReminderError {
    #[error("Patient is not linked to this caregiver")]
    PatientNotLinked,

    #[error("Reminder not found")]
    NotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for ReminderError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ReminderError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// How far past due a reminder is, from the patient's point of view.
/// Recently due items get the louder treatment; older ones stay listed
/// but are presented as missed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Urgent,
    Stale,
}

/// A due reminder stays urgent for this long before it counts as missed.
const URGENT_WINDOW: TimeDelta = TimeDelta::minutes(5);

#[must_use]
pub fn classify_urgency(scheduled_time: DateTime<Utc>, now: DateTime<Utc>) -> Urgency {
    if now.signed_duration_since(scheduled_time) > URGENT_WINDOW {
        Urgency::Stale
    } else {
        Urgency::Urgent
    }
}

/// A pending reminder whose scheduled time has passed.
#[derive(Debug, Clone)]
pub struct DueReminder {
    pub reminder: Reminder,
    pub urgency: Urgency,
}

/// Fields accepted when scheduling a reminder.
#[derive(Debug, Clone)]
pub struct NewReminderParams {
    pub patient_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub scheduled_time: DateTime<Utc>,
}

/// Domain service trait for reminders.
#[async_trait::async_trait]
pub trait ReminderService: Send + Sync {
    /// Schedules a reminder for a linked patient.
    ///
    /// # Errors
    ///
    /// Returns [`ReminderError::PatientNotLinked`] when the caregiver has
    /// no link to the patient, and [`ReminderError::Validation`] for an
    /// empty title or a scheduled time in the past.
    async fn create(
        &self,
        caregiver_id: i32,
        params: NewReminderParams,
    ) -> Result<Reminder, ReminderError>;

    /// Pending reminders that are due right now, oldest first, each
    /// classified by how long it has been waiting.
    async fn active_for_patient(&self, patient_id: i32)
    -> Result<Vec<DueReminder>, ReminderError>;

    /// Confirms a reminder. Safe to repeat: the reminder lands in the
    /// same acknowledged state every time.
    ///
    /// # Errors
    ///
    /// Returns [`ReminderError::NotFound`] when the reminder does not
    /// exist or belongs to a different patient.
    async fn acknowledge(&self, patient_id: i32, reminder_id: i32)
    -> Result<Reminder, ReminderError>;

    /// Everything the caregiver has scheduled, newest first, with the
    /// patient's name for display.
    async fn list_for_caregiver(
        &self,
        caregiver_id: i32,
    ) -> Result<Vec<crate::db::CaregiverReminderRow>, ReminderError>;

    /// Removes a reminder the caregiver owns.
    ///
    /// # Errors
    ///
    /// Returns [`ReminderError::NotFound`] when the reminder does not
    /// exist or was created by a different caregiver.
    async fn delete(&self, caregiver_id: i32, reminder_id: i32) -> Result<(), ReminderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn just_due_is_urgent() {
        let now = Utc::now();
        let scheduled = now - TimeDelta::seconds(30);
        assert_eq!(classify_urgency(scheduled, now), Urgency::Urgent);
    }

    #[test]
    fn exactly_five_minutes_is_still_urgent() {
        let now = Utc::now();
        let scheduled = now - TimeDelta::minutes(5);
        assert_eq!(classify_urgency(scheduled, now), Urgency::Urgent);
    }

    #[test]
    fn past_five_minutes_is_stale() {
        let now = Utc::now();
        let scheduled = now - TimeDelta::minutes(5) - TimeDelta::seconds(1);
        assert_eq!(classify_urgency(scheduled, now), Urgency::Stale);
    }

    #[test]
    fn stale_never_flips_back() {
        let now = Utc::now();
        let scheduled = now - TimeDelta::hours(12);
        assert_eq!(classify_urgency(scheduled, now), Urgency::Stale);
    }
}
