//! Repository layer - data access over the legacy and roster schemas

pub mod entities;
mod source_reader;

pub use source_reader::BatchedReader;
