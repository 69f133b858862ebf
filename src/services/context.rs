//! State shared by every phase of one run.

use sea_orm::DatabaseConnection;
use tokio_util::sync::CancellationToken;

use crate::config::BatchSettings;
use crate::errors::{AppError, AppResult};
use crate::infra::Persistence;

pub(crate) struct RunContext<'a> {
    /// Legacy schema, read-only
    pub source: &'a DatabaseConnection,
    pub target: &'a Persistence,
    pub batch: BatchSettings,
    pub overwrite: bool,
    pub cancel: &'a CancellationToken,
}

impl RunContext<'_> {
    /// Stop at a batch boundary once cancellation was requested
    pub fn check_cancelled(&self) -> AppResult<()> {
        if self.cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }
        Ok(())
    }

    pub fn page_size(&self) -> u64 {
        self.batch.batch_size
    }

    pub fn chunk_size(&self) -> usize {
        self.batch.write_chunk_size
    }
}

/// Split `rows` into owned chunks of at most `size` rows
pub(crate) fn chunked<T>(rows: Vec<T>, size: usize) -> Vec<Vec<T>> {
    let size = size.max(1);
    let mut chunks = Vec::new();
    let mut rows = rows.into_iter().peekable();
    while rows.peek().is_some() {
        chunks.push(rows.by_ref().take(size).collect());
    }
    chunks
}
