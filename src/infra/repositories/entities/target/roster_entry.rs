//! Canonical roster entry: one employee, one day, one shift or leave code.

use sea_orm::entity::prelude::*;

use domain::{DomainResult, ShiftAssignment};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "roster_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub roster_period_id: i32,
    pub employee_id: i32,
    pub work_date: Date,
    pub shift_base_id: Option<i32>,
    pub leave_code: Option<String>,
    pub start_time_override: Option<Time>,
    pub end_time_override: Option<Time>,
    /// Distinct legacy codes collapsed into this entry
    pub note: Option<String>,
    pub attributes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn assignment(&self) -> DomainResult<ShiftAssignment> {
        ShiftAssignment::from_columns(self.shift_base_id, self.leave_code.clone())
    }
}
