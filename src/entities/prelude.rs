pub use super::caregiver_patients::Entity as CaregiverPatients;
pub use super::evaluation_results::Entity as EvaluationResults;
pub use super::messages::Entity as Messages;
pub use super::questions::Entity as Questions;
pub use super::reminders::Entity as Reminders;
pub use super::users::Entity as Users;
