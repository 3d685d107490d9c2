use crate::entities::prelude::*;
use crate::entities::questions;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Starter bank of multiple-choice questions. Options are 1-based in
/// `correct_option`, matching what clients send back on submit.
const QUESTION_BANK: [(&str, &str, &str, &str, &str, i32, &str); 12] = [
    (
        "What day of the week comes after Saturday?",
        "Friday",
        "Sunday",
        "Monday",
        "Thursday",
        2,
        "orientation",
    ),
    (
        "Which season usually comes after winter?",
        "Spring",
        "Autumn",
        "Summer",
        "None of these",
        1,
        "orientation",
    ),
    (
        "If you have 3 apples and eat one, how many are left?",
        "1",
        "2",
        "3",
        "4",
        2,
        "logic",
    ),
    (
        "Which of these is used to tell time?",
        "Spoon",
        "Clock",
        "Pillow",
        "Shoe",
        2,
        "attention",
    ),
    (
        "What number comes next: 2, 4, 6?",
        "7",
        "8",
        "9",
        "10",
        2,
        "logic",
    ),
    (
        "Which month has 28 or 29 days?",
        "March",
        "February",
        "June",
        "August",
        2,
        "memory",
    ),
    (
        "What do you use an umbrella for?",
        "Rain",
        "Cooking",
        "Reading",
        "Sleeping",
        1,
        "memory",
    ),
    (
        "Which of these animals barks?",
        "Cat",
        "Dog",
        "Bird",
        "Fish",
        2,
        "memory",
    ),
    (
        "How many minutes are in one hour?",
        "30",
        "45",
        "60",
        "90",
        3,
        "memory",
    ),
    (
        "Which meal is usually eaten in the morning?",
        "Dinner",
        "Lunch",
        "Breakfast",
        "Dessert",
        3,
        "orientation",
    ),
    (
        "If today is Monday, what day was yesterday?",
        "Sunday",
        "Tuesday",
        "Saturday",
        "Wednesday",
        1,
        "orientation",
    ),
    (
        "Which of these numbers is the largest?",
        "12",
        "21",
        "8",
        "17",
        2,
        "attention",
    ),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = sea_orm_migration::sea_query::Query::insert()
            .into_table(Questions)
            .columns([
                questions::Column::QuestionText,
                questions::Column::Option1,
                questions::Column::Option2,
                questions::Column::Option3,
                questions::Column::Option4,
                questions::Column::CorrectOption,
                questions::Column::Category,
            ])
            .to_owned();

        for (text, option1, option2, option3, option4, correct, category) in QUESTION_BANK {
            insert.values_panic([
                text.into(),
                option1.into(),
                option2.into(),
                option3.into(),
                option4.into(),
                correct.into(),
                category.into(),
            ]);
        }

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(
                sea_orm_migration::sea_query::Query::delete()
                    .from_table(Questions)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
