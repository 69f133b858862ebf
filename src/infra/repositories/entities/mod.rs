//! SeaORM entity definitions
//!
//! `legacy` maps the read-only "main" schema, `target` the roster schema the
//! pipeline writes.

pub mod legacy;
pub mod target;
