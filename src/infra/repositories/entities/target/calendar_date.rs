//! Calendar dimension row keyed by date.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::CalendarDay;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "calendar_dates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub date: Date,
    pub year: i32,
    pub month: i32,
    pub day: i32,
    /// ISO weekday, Monday = 1 .. Sunday = 7
    pub weekday: i32,
    pub is_weekend: bool,
    pub is_holiday: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<CalendarDay> for ActiveModel {
    fn from(day: CalendarDay) -> Self {
        ActiveModel {
            date: Set(day.date),
            year: Set(day.year),
            month: Set(day.month as i32),
            day: Set(day.day as i32),
            weekday: Set(day.weekday as i32),
            is_weekend: Set(day.is_weekend),
            is_holiday: Set(day.is_holiday),
        }
    }
}
