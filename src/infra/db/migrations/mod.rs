//! Target schema migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20250810_000001_create_roster_schema;
mod m20250810_000002_add_roster_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250810_000001_create_roster_schema::Migration),
            Box::new(m20250810_000002_add_roster_indexes::Migration),
        ]
    }
}
