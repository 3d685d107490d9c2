use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, ChatService, EvaluationService, ReminderService, SeaOrmAuthService,
    SeaOrmChatService, SeaOrmEvaluationService, SeaOrmReminderService, SeaOrmUserService,
    UserService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub clock: Arc<dyn Clock>,

    pub auth_service: Arc<dyn AuthService>,

    pub user_service: Arc<dyn UserService>,

    pub reminder_service: Arc<dyn ReminderService>,

    pub evaluation_service: Arc<dyn EvaluationService>,

    pub chat_service: Arc<dyn ChatService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock)).await
    }

    /// Tests swap in a manual clock here to drive the reminder window
    /// and the history month boundary.
    pub async fn with_clock(config: Config, clock: Arc<dyn Clock>) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let auth_service = Arc::new(SeaOrmAuthService::new(store.clone(), clock.clone(), &config))
            as Arc<dyn AuthService + Send + Sync + 'static>;

        let user_service = Arc::new(SeaOrmUserService::new(store.clone(), clock.clone()))
            as Arc<dyn UserService + Send + Sync + 'static>;

        let reminder_service = Arc::new(SeaOrmReminderService::new(store.clone(), clock.clone()))
            as Arc<dyn ReminderService + Send + Sync + 'static>;

        let evaluation_service = Arc::new(SeaOrmEvaluationService::new(
            store.clone(),
            clock.clone(),
            &config,
        )) as Arc<dyn EvaluationService + Send + Sync + 'static>;

        let chat_service = Arc::new(SeaOrmChatService::new(store.clone(), clock.clone()))
            as Arc<dyn ChatService + Send + Sync + 'static>;

        Ok(Self {
            config: Arc::new(config),
            store,
            clock,
            auth_service,
            user_service,
            reminder_service,
            evaluation_service,
            chat_service,
        })
    }
}
