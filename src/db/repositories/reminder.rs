use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

use crate::entities::{prelude::*, reminders, users};

/// Repository for reminder lifecycle operations
pub struct ReminderRepository {
    conn: DatabaseConnection,
}

impl ReminderRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    // ========================================================================
    // Reminder Operations
    // ========================================================================

    pub async fn create(
        &self,
        new: NewReminder,
        now: DateTime<Utc>,
    ) -> Result<reminders::Model> {
        let active = reminders::ActiveModel {
            patient_id: Set(new.patient_id),
            caregiver_id: Set(new.caregiver_id),
            title: Set(new.title.clone()),
            description: Set(new.description.clone()),
            scheduled_time: Set(new.scheduled_time),
            is_active: Set(true),
            patient_acknowledged: Set(false),
            created_at: Set(now),
            ..Default::default()
        };

        let res = Reminders::insert(active)
            .exec(&self.conn)
            .await
            .context("Failed to insert reminder")?;

        Ok(reminders::Model {
            id: res.last_insert_id,
            patient_id: new.patient_id,
            caregiver_id: new.caregiver_id,
            title: new.title,
            description: new.description,
            scheduled_time: new.scheduled_time,
            is_active: true,
            patient_acknowledged: false,
            created_at: now,
        })
    }

    /// Pending reminders whose scheduled time has passed, oldest first.
    /// There is no upper bound: an unacknowledged reminder stays listed
    /// until the patient confirms it.
    pub async fn active_for_patient(
        &self,
        patient_id: i32,
        now: DateTime<Utc>,
    ) -> Result<Vec<reminders::Model>> {
        let rows = Reminders::find()
            .filter(reminders::Column::PatientId.eq(patient_id))
            .filter(reminders::Column::IsActive.eq(true))
            .filter(reminders::Column::PatientAcknowledged.eq(false))
            .filter(reminders::Column::ScheduledTime.lte(now))
            .order_by_asc(reminders::Column::ScheduledTime)
            .all(&self.conn)
            .await
            .context("Failed to query active reminders")?;

        Ok(rows)
    }

    /// Mark a reminder confirmed. Scoped to the owning patient; returns
    /// None when no such reminder belongs to them. The update is written
    /// on every call, so repeats land in the same state.
    pub async fn acknowledge(
        &self,
        id: i32,
        patient_id: i32,
    ) -> Result<Option<reminders::Model>> {
        let reminder = Reminders::find()
            .filter(reminders::Column::Id.eq(id))
            .filter(reminders::Column::PatientId.eq(patient_id))
            .one(&self.conn)
            .await
            .context("Failed to query reminder for acknowledgement")?;

        let Some(reminder) = reminder else {
            return Ok(None);
        };

        let mut active: reminders::ActiveModel = reminder.into();
        active.is_active = Set(false);
        active.patient_acknowledged = Set(true);
        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to update reminder acknowledgement")?;

        Ok(Some(updated))
    }

    /// Every reminder a caregiver created, newest scheduled first, with
    /// the patient's name joined in for display.
    pub async fn list_for_caregiver(
        &self,
        caregiver_id: i32,
    ) -> Result<Vec<CaregiverReminderRow>> {
        let rows = Reminders::find()
            .select_only()
            .column(reminders::Column::Id)
            .column(reminders::Column::PatientId)
            .column(reminders::Column::Title)
            .column(reminders::Column::Description)
            .column(reminders::Column::ScheduledTime)
            .column(reminders::Column::IsActive)
            .column(reminders::Column::PatientAcknowledged)
            .column(reminders::Column::CreatedAt)
            .column_as(users::Column::Name, "patient_name")
            .join(JoinType::InnerJoin, reminders::Relation::Patient.def())
            .filter(reminders::Column::CaregiverId.eq(caregiver_id))
            .order_by_desc(reminders::Column::ScheduledTime)
            .into_model::<CaregiverReminderRow>()
            .all(&self.conn)
            .await
            .context("Failed to query caregiver reminders")?;

        Ok(rows)
    }

    /// Delete a reminder the caregiver owns. Returns false when the id
    /// does not exist or belongs to another caregiver.
    pub async fn delete(&self, id: i32, caregiver_id: i32) -> Result<bool> {
        let result = Reminders::delete_many()
            .filter(reminders::Column::Id.eq(id))
            .filter(reminders::Column::CaregiverId.eq(caregiver_id))
            .exec(&self.conn)
            .await
            .context("Failed to delete reminder")?;

        Ok(result.rows_affected > 0)
    }
}

// ============================================================================
// Data Types
// ============================================================================

/// Fields needed to insert a new reminder
#[derive(Debug, Clone)]
pub struct NewReminder {
    pub patient_id: i32,
    pub caregiver_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub scheduled_time: DateTime<Utc>,
}

/// Caregiver dashboard row joining the patient's display name
#[derive(Debug, Clone, FromQueryResult)]
pub struct CaregiverReminderRow {
    pub id: i32,
    pub patient_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub scheduled_time: DateTime<Utc>,
    pub is_active: bool,
    pub patient_acknowledged: bool,
    pub created_at: DateTime<Utc>,
    pub patient_name: String,
}
