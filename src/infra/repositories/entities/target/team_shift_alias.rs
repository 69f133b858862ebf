//! Team-scoped alias of a shift base or leave code.

use sea_orm::entity::prelude::*;

use domain::{DomainResult, ShiftAssignment};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "team_shift_aliases")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub team_id: i32,
    /// Set for WORK aliases; exclusive with `leave_code`
    pub shift_base_id: Option<i32>,
    /// Set for OFF / LEAVE aliases; exclusive with `shift_base_id`
    pub leave_code: Option<String>,
    pub alias_code: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn assignment(&self) -> DomainResult<ShiftAssignment> {
        ShiftAssignment::from_columns(self.shift_base_id, self.leave_code.clone())
    }
}
