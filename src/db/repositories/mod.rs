pub mod evaluation;
pub mod message;
pub mod reminder;
pub mod user;
