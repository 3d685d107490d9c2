//! `SeaORM` implementation of the `AuthService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::TimeDelta;
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::warn;

use crate::clock::Clock;
use crate::config::Config;
use crate::db::repositories::user::generate_patient_code;
use crate::db::{NewUser, Store, User};
use crate::entities::users::UserRole;
use crate::services::auth_service::{
    AuthError, AuthService, Claims, LoginOutcome, RegisterParams,
};

pub struct SeaOrmAuthService {
    store: Store,
    clock: Arc<dyn Clock>,
    security: crate::config::SecurityConfig,
    jwt_secret: String,
    token_ttl_hours: i64,
}

impl SeaOrmAuthService {
    #[must_use]
    pub fn new(store: Store, clock: Arc<dyn Clock>, config: &Config) -> Self {
        Self {
            store,
            clock,
            security: config.security.clone(),
            jwt_secret: config.auth.jwt_secret.clone(),
            token_ttl_hours: config.auth.token_ttl_hours,
        }
    }

    fn sign_token(&self, user: &User) -> Result<String, AuthError> {
        let now = self.clock.now();
        let expires = now + TimeDelta::hours(self.token_ttl_hours);

        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp() as usize,
            exp: expires.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::Internal(format!("Failed to sign token: {e}")))
    }

    /// Best-effort link from a freshly registered caregiver to the
    /// patient whose code they supplied. Never fails the registration.
    async fn try_link_patient(&self, caregiver_id: i32, code: &str) {
        let patient = match self.store.get_user_by_patient_code(code).await {
            Ok(Some(patient)) => patient,
            Ok(None) => {
                warn!("Registration link skipped: no patient with code {code}");
                return;
            }
            Err(err) => {
                warn!("Registration link skipped: {err}");
                return;
            }
        };

        let now = self.clock.now();
        if let Err(err) = self
            .store
            .create_caregiver_link(caregiver_id, patient.id, now)
            .await
        {
            warn!("Registration link skipped: {err}");
        }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(&self, params: RegisterParams) -> Result<LoginOutcome, AuthError> {
        if params.name.trim().is_empty() {
            return Err(AuthError::Validation("Name cannot be empty".to_string()));
        }

        if !params.email.contains('@') {
            return Err(AuthError::Validation(
                "Email address is not valid".to_string(),
            ));
        }

        if params.password.len() < 8 {
            return Err(AuthError::Validation(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        if self.store.get_user_by_email(&params.email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let patient_code = if params.role == UserRole::Patient {
            let mut code = generate_patient_code();
            while self.store.get_user_by_patient_code(&code).await?.is_some() {
                code = generate_patient_code();
            }
            Some(code)
        } else {
            None
        };

        let now = self.clock.now();
        let user = self
            .store
            .create_user(
                NewUser {
                    name: params.name.trim().to_string(),
                    email: params.email,
                    password: params.password,
                    role: params.role,
                    patient_code,
                },
                &self.security,
                now,
            )
            .await?;

        if user.role == UserRole::Caregiver {
            if let Some(code) = params.patient_code_to_link.as_deref() {
                if !code.trim().is_empty() {
                    self.try_link_patient(user.id, code.trim()).await;
                }
            }
        }

        let token = self.sign_token(&user)?;
        Ok(LoginOutcome { token, user })
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let user = self
            .store
            .verify_credentials(email, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let token = self.sign_token(&user)?;
        Ok(LoginOutcome { token, user })
    }
}
