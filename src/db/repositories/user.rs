use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tokio::task;

use crate::config::SecurityConfig;
use crate::entities::users::UserRole;
use crate::entities::{caregiver_patients, prelude::*, users};

/// User data returned from repository (without sensitive password hash)
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub patient_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            role: model.role,
            patient_code: model.patient_code,
            created_at: model.created_at,
        }
    }
}

/// Fields needed to insert a new account. The password arrives in
/// plaintext and is hashed inside the repository.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub patient_code: Option<String>,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Insert a new account, hashing the password with the given security params.
    /// Note: This uses `spawn_blocking` because Argon2 hashing is CPU-intensive
    /// and would block the async runtime if run directly.
    pub async fn create(
        &self,
        new_user: NewUser,
        security: &SecurityConfig,
        now: DateTime<Utc>,
    ) -> Result<User> {
        let password = new_user.password;
        let security = security.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, Some(&security)))
            .await
            .context("Password hashing task panicked")??;

        let active = users::ActiveModel {
            name: Set(new_user.name.clone()),
            email: Set(new_user.email.clone()),
            password_hash: Set(password_hash),
            role: Set(new_user.role),
            patient_code: Set(new_user.patient_code.clone()),
            created_at: Set(now),
            ..Default::default()
        };

        let res = Users::insert(active)
            .exec(&self.conn)
            .await
            .context("Failed to insert user")?;

        Ok(User {
            id: res.last_insert_id,
            name: new_user.name,
            email: new_user.email,
            role: new_user.role,
            patient_code: new_user.patient_code,
            created_at: now,
        })
    }

    /// Get user by email
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")?;

        Ok(user.map(User::from))
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> Result<Option<User>> {
        let user = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(User::from))
    }

    /// Get the patient account carrying a link code
    pub async fn get_by_patient_code(&self, code: &str) -> Result<Option<User>> {
        let user = Users::find()
            .filter(users::Column::PatientCode.eq(code))
            .one(&self.conn)
            .await
            .context("Failed to query user by patient code")?;

        Ok(user.map(User::from))
    }

    /// Verify credentials and return the account when the password matches.
    /// Note: This uses `spawn_blocking` because Argon2 verification is
    /// CPU-intensive and would block the async runtime if run directly.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<Option<User>> {
        let user = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user for password verification")?;

        let Some(user) = user else {
            return Ok(None);
        };

        let password_hash = user.password_hash.clone();
        let password = password.to_string();

        // Run CPU-intensive password verification in a blocking task
        let is_valid = task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&password_hash)
                .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

            let argon2 = Argon2::default();
            Ok::<bool, anyhow::Error>(
                argon2
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok(),
            )
        })
        .await
        .context("Password verification task panicked")??;

        Ok(is_valid.then(|| User::from(user)))
    }

    /// Link a caregiver to a patient. Returns false when the pair is
    /// already linked (the insert hits the composite key and is skipped).
    pub async fn create_link(
        &self,
        caregiver_id: i32,
        patient_id: i32,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let link = caregiver_patients::ActiveModel {
            caregiver_id: Set(caregiver_id),
            patient_id: Set(patient_id),
            created_at: Set(now),
        };

        let result = CaregiverPatients::insert(link)
            .on_conflict(
                OnConflict::columns([
                    caregiver_patients::Column::CaregiverId,
                    caregiver_patients::Column::PatientId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec(&self.conn)
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(DbErr::RecordNotInserted) => Ok(false),
            Err(err) => Err(err).context("Failed to insert caregiver link"),
        }
    }

    /// Check whether a caregiver is linked to a patient
    pub async fn link_exists(&self, caregiver_id: i32, patient_id: i32) -> Result<bool> {
        let link = CaregiverPatients::find_by_id((caregiver_id, patient_id))
            .one(&self.conn)
            .await
            .context("Failed to query caregiver link")?;

        Ok(link.is_some())
    }

    /// All patients linked to a caregiver, ordered by name
    pub async fn linked_patients(&self, caregiver_id: i32) -> Result<Vec<User>> {
        let links = CaregiverPatients::find()
            .filter(caregiver_patients::Column::CaregiverId.eq(caregiver_id))
            .all(&self.conn)
            .await
            .context("Failed to query caregiver links")?;

        let patient_ids: Vec<i32> = links.into_iter().map(|link| link.patient_id).collect();
        if patient_ids.is_empty() {
            return Ok(Vec::new());
        }

        let patients = Users::find()
            .filter(users::Column::Id.is_in(patient_ids))
            .order_by_asc(users::Column::Name)
            .all(&self.conn)
            .await
            .context("Failed to query linked patients")?;

        Ok(patients.into_iter().map(User::from).collect())
    }
}

/// Hash a password using Argon2id with optional custom params.
/// If config is None, uses default (high memory) params.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None, // output length (use default)
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Generate a short uppercase code a caregiver can type to link a patient
#[must_use]
pub fn generate_patient_code() -> String {
    let raw = uuid::Uuid::new_v4().simple().to_string();
    raw[..8].to_uppercase()
}
