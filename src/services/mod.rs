pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, Claims, LoginOutcome, RegisterParams};
pub use auth_service_impl::SeaOrmAuthService;

pub mod user_service;
pub mod user_service_impl;
pub use user_service::{UserError, UserService};
pub use user_service_impl::SeaOrmUserService;

pub mod reminder_service;
pub mod reminder_service_impl;
pub use reminder_service::{
    DueReminder, NewReminderParams, ReminderError, ReminderService, Urgency, classify_urgency,
};
pub use reminder_service_impl::SeaOrmReminderService;

pub mod evaluation_service;
pub mod evaluation_service_impl;
pub use evaluation_service::{EvaluationError, EvaluationService};
pub use evaluation_service_impl::SeaOrmEvaluationService;

pub mod chat_service;
pub mod chat_service_impl;
pub use chat_service::{ChatError, ChatService};
pub use chat_service_impl::SeaOrmChatService;
