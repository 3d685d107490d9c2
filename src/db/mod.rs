use anyhow::Result;
use chrono::{DateTime, Utc};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;

pub mod migrator;
pub mod repositories;

pub use crate::entities::evaluation_results::Model as EvaluationResult;
pub use crate::entities::messages::Model as Message;
pub use crate::entities::questions::Model as Question;
pub use crate::entities::reminders::Model as Reminder;
pub use repositories::reminder::{CaregiverReminderRow, NewReminder};
pub use repositories::user::{NewUser, User};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.starts_with(":memory:") && !db_url.starts_with("sqlite::memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    // ========== User Repository Methods ==========

    #[must_use]
    pub fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    pub async fn create_user(
        &self,
        new_user: NewUser,
        security: &SecurityConfig,
        now: DateTime<Utc>,
    ) -> Result<User> {
        self.user_repo().create(new_user, security, now).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_patient_code(&self, code: &str) -> Result<Option<User>> {
        self.user_repo().get_by_patient_code(code).await
    }

    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<Option<User>> {
        self.user_repo().verify_credentials(email, password).await
    }

    pub async fn create_caregiver_link(
        &self,
        caregiver_id: i32,
        patient_id: i32,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        self.user_repo()
            .create_link(caregiver_id, patient_id, now)
            .await
    }

    pub async fn caregiver_link_exists(&self, caregiver_id: i32, patient_id: i32) -> Result<bool> {
        self.user_repo().link_exists(caregiver_id, patient_id).await
    }

    pub async fn linked_patients(&self, caregiver_id: i32) -> Result<Vec<User>> {
        self.user_repo().linked_patients(caregiver_id).await
    }

    // ========== Reminder Repository Methods ==========

    fn reminder_repo(&self) -> repositories::reminder::ReminderRepository {
        repositories::reminder::ReminderRepository::new(self.conn.clone())
    }

    pub async fn create_reminder(&self, new: NewReminder, now: DateTime<Utc>) -> Result<Reminder> {
        self.reminder_repo().create(new, now).await
    }

    pub async fn active_reminders_for_patient(
        &self,
        patient_id: i32,
        now: DateTime<Utc>,
    ) -> Result<Vec<Reminder>> {
        self.reminder_repo()
            .active_for_patient(patient_id, now)
            .await
    }

    pub async fn acknowledge_reminder(
        &self,
        id: i32,
        patient_id: i32,
    ) -> Result<Option<Reminder>> {
        self.reminder_repo().acknowledge(id, patient_id).await
    }

    pub async fn reminders_for_caregiver(
        &self,
        caregiver_id: i32,
    ) -> Result<Vec<CaregiverReminderRow>> {
        self.reminder_repo().list_for_caregiver(caregiver_id).await
    }

    pub async fn delete_reminder(&self, id: i32, caregiver_id: i32) -> Result<bool> {
        self.reminder_repo().delete(id, caregiver_id).await
    }

    // ========== Evaluation Repository Methods ==========

    fn evaluation_repo(&self) -> repositories::evaluation::EvaluationRepository {
        repositories::evaluation::EvaluationRepository::new(self.conn.clone())
    }

    pub async fn random_questions(&self, limit: u64) -> Result<Vec<Question>> {
        self.evaluation_repo().random_questions(limit).await
    }

    pub async fn insert_evaluation_result(
        &self,
        patient_id: i32,
        score: i32,
        total_questions: i32,
        completed_at: DateTime<Utc>,
    ) -> Result<EvaluationResult> {
        self.evaluation_repo()
            .insert_result(patient_id, score, total_questions, completed_at)
            .await
    }

    pub async fn evaluation_results_since(
        &self,
        patient_id: i32,
        start: DateTime<Utc>,
    ) -> Result<Vec<EvaluationResult>> {
        self.evaluation_repo()
            .results_since(patient_id, start)
            .await
    }

    pub async fn evaluation_results_for_patient(
        &self,
        patient_id: i32,
    ) -> Result<Vec<EvaluationResult>> {
        self.evaluation_repo().results_for_patient(patient_id).await
    }

    // ========== Message Repository Methods ==========

    fn message_repo(&self) -> repositories::message::MessageRepository {
        repositories::message::MessageRepository::new(self.conn.clone())
    }

    pub async fn insert_message(
        &self,
        sender_id: i32,
        receiver_id: i32,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<Message> {
        self.message_repo()
            .insert(sender_id, receiver_id, content, now)
            .await
    }

    pub async fn conversation(&self, user_a: i32, user_b: i32) -> Result<Vec<Message>> {
        self.message_repo().conversation(user_a, user_b).await
    }
}
