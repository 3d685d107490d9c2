use sea_orm::entity::prelude::*;

/// Bank of multiple-choice questions the evaluation endpoint draws from.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub question_text: String,

    pub option1: String,

    pub option2: String,

    pub option3: String,

    pub option4: String,

    /// 1-based index into the options above.
    pub correct_option: i32,

    pub category: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
