//! Employee migrated from a legacy user (emp_code = username).

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub emp_code: String,
    pub full_name: String,
    pub team_id: Option<i32>,
    pub position_id: Option<i32>,
    pub status: String,
    pub phone: Option<String>,
    pub hire_date: Option<Date>,
    /// Free-form JSON attributes, untouched by the migration
    pub attributes: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
