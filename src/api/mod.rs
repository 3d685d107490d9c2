use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, patch, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::clock::Clock;
use crate::config::Config;
use crate::state::SharedState;

pub mod auth;
pub mod chat;
mod error;
pub mod evaluations;
pub mod reminders;
mod types;
pub mod users;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn crate::services::AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn user_service(&self) -> &Arc<dyn crate::services::UserService> {
        &self.shared.user_service
    }

    #[must_use]
    pub fn reminder_service(&self) -> &Arc<dyn crate::services::ReminderService> {
        &self.shared.reminder_service
    }

    #[must_use]
    pub fn evaluation_service(&self) -> &Arc<dyn crate::services::EvaluationService> {
        &self.shared.evaluation_service
    }

    #[must_use]
    pub fn chat_service(&self) -> &Arc<dyn crate::services::ChatService> {
        &self.shared.chat_service
    }
}

#[must_use]
pub fn create_app_state(shared: Arc<SharedState>) -> Arc<AppState> {
    Arc::new(AppState { shared })
}

pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared))
}

/// Same as [`create_app_state_from_config`] but with an injected clock,
/// so tests can move time.
pub async fn create_app_state_with_clock(
    config: Config,
    clock: Arc<dyn Clock>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::with_clock(config, clock).await?);
    Ok(create_app_state(shared))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();

    let protected_routes = create_protected_router(state.clone());

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .merge(protected_routes)
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .with_state(state)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/link-patient", post(users::link_patient))
        .route("/users/patients", get(users::linked_patients))
        .route("/users/me", get(users::me))
        .route("/evaluations/questions", get(evaluations::questions))
        .route("/evaluations/submit", post(evaluations::submit))
        .route(
            "/evaluations/history/me/monthly",
            get(evaluations::monthly_history),
        )
        .route(
            "/evaluations/history/caregiver/{patient_id}",
            get(evaluations::caregiver_history),
        )
        .route("/reminders", post(reminders::create_reminder))
        .route("/reminders/active", get(reminders::active_reminders))
        .route(
            "/reminders/{id}/acknowledge",
            patch(reminders::acknowledge_reminder),
        )
        .route("/reminders/caregiver", get(reminders::caregiver_reminders))
        .route("/reminders/{id}", delete(reminders::delete_reminder))
        .route("/chat", post(chat::send_message))
        .route("/chat", get(chat::conversation))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
