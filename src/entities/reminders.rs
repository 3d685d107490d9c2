use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "reminders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub patient_id: i32,

    pub caregiver_id: i32,

    pub title: String,

    pub description: Option<String>,

    /// When the reminder becomes due. Stored in UTC; the active window
    /// starts here and never closes until the patient acknowledges.
    pub scheduled_time: DateTimeUtc,

    pub is_active: bool,

    pub patient_acknowledged: bool,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::PatientId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Patient,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CaregiverId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Caregiver,
}

impl ActiveModelBehavior for ActiveModel {}
