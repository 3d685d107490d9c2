use sea_orm::entity::prelude::*;

/// Join table between a caregiver account and the patients it watches.
/// The composite key makes a duplicate link a constraint violation
/// instead of a second row.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "caregiver_patients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub caregiver_id: i32,

    #[sea_orm(primary_key, auto_increment = false)]
    pub patient_id: i32,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CaregiverId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Caregiver,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::PatientId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Patient,
}

impl ActiveModelBehavior for ActiveModel {}
