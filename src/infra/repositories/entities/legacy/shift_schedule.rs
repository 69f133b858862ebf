//! Legacy schedule header: one employee, one store, one date.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "shift_schedules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Legacy user id
    pub employee_id: i32,
    pub store_id: i32,
    pub date: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
