//! Domain service for profiles and caregiver-patient links.

use thiserror::Error;

use crate::db::User;

/// Errors specific to user and linking operations.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("No patient found for that code")]
    CodeNotFound,

    #[error("Patient is already linked")]
    AlreadyLinked,

    #[error("User not found")]
    NotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for UserError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for UserError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for users.
#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    /// Links the calling caregiver to the patient carrying `code`.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::CodeNotFound`] when no patient carries the code
    /// and [`UserError::AlreadyLinked`] when the pair is already linked.
    async fn link_patient(&self, caregiver_id: i32, code: &str) -> Result<User, UserError>;

    /// All patients linked to a caregiver, ordered by name.
    async fn linked_patients(&self, caregiver_id: i32) -> Result<Vec<User>, UserError>;

    /// Profile of the calling account.
    async fn profile(&self, user_id: i32) -> Result<User, UserError>;
}
