//! Infrastructure layer - database access for both schemas
//!
//! - Connections and target schema migrations
//! - sea-orm entities of the legacy and roster schemas
//! - Batched reader over legacy tables
//! - Unit of Work for transactional write batches

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::BatchedReader;
pub use unit_of_work::{Persistence, TransactionContext, TxFuture, UnitOfWork};
