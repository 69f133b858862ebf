//! Monthly roster container of one team.

use chrono::Datelike;
use sea_orm::entity::prelude::*;

use domain::PeriodKey;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "roster_periods")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub team_id: i32,
    pub period_start_date: Date,
    pub period_end_date: Date,
    pub period_type: String,
    pub status: String,
    pub created_by: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn key(&self) -> PeriodKey {
        PeriodKey {
            team_id: self.team_id,
            year: self.period_start_date.year(),
            month: self.period_start_date.month(),
        }
    }
}
