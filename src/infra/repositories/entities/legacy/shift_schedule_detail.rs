//! Legacy schedule detail: one shift code worked under a schedule.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "shift_schedule_details")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub schedule_id: i32,
    pub shift_code_id: i32,
    pub work_unit: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::shift_schedule::Entity",
        from = "Column::ScheduleId",
        to = "super::shift_schedule::Column::Id"
    )]
    Schedule,
    #[sea_orm(
        belongs_to = "super::shift_code::Entity",
        from = "Column::ShiftCodeId",
        to = "super::shift_code::Column::Id"
    )]
    ShiftCode,
}

impl Related<super::shift_schedule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Schedule.def()
    }
}

impl Related<super::shift_code::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShiftCode.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
