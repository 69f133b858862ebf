//! Legacy ("main") schema entities. Read-only to the migration.

pub mod holiday;
pub mod role;
pub mod shift_code;
pub mod shift_schedule;
pub mod shift_schedule_detail;
pub mod store;
pub mod user;
pub mod user_role;
