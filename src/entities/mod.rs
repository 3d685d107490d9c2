pub mod prelude;

pub mod caregiver_patients;
pub mod evaluation_results;
pub mod messages;
pub mod questions;
pub mod reminders;
pub mod users;
