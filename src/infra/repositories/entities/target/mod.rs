//! Roster ("target") schema entities written by the migration.
//!
//! Every table is matched by a natural key; see the unique indexes in
//! `infra::db::migrations`.

pub mod calendar_date;
pub mod department;
pub mod employee;
pub mod holiday;
pub mod location;
pub mod position;
pub mod roster_entry;
pub mod roster_period;
pub mod shift_base;
pub mod team;
pub mod team_shift_alias;
