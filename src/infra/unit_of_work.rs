//! Unit of Work for the target schema.
//!
//! Every write batch of the pipeline runs through [`UnitOfWork::transaction`]:
//! the batch is committed as one durable unit or rolled back as a whole, so a
//! failed or cancelled run never leaves a half-written batch behind.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    IntoActiveModel, TransactionTrait,
};

use crate::errors::{AppError, AppResult};

/// Boxed body of a transaction, borrowing the transaction for `'a`
pub type TxFuture<'a, T> =
    std::pin::Pin<Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>>;

/// Transaction management over the target schema.
///
/// Not mockable directly due to generic methods; pipeline tests run against
/// an in-memory database instead.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Execute a closure within a transaction.
    ///
    /// The transaction is committed on success or rolled back on error.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Write access to the target schema inside one transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// The underlying transaction, for natural-key re-queries
    pub fn conn(&self) -> &'a DatabaseTransaction {
        self.txn
    }

    /// Insert `rows` in statements of at most `chunk_size` rows.
    ///
    /// Returns the number of rows handed to the database.
    pub async fn insert_chunked<A>(&self, rows: Vec<A>, chunk_size: usize) -> AppResult<u64>
    where
        A: ActiveModelTrait + Send,
        <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    {
        let chunk_size = chunk_size.max(1);
        let mut written = 0u64;
        let mut rows = rows.into_iter().peekable();

        while rows.peek().is_some() {
            let chunk: Vec<A> = rows.by_ref().take(chunk_size).collect();
            written += chunk.len() as u64;
            <A::Entity as EntityTrait>::insert_many(chunk)
                .exec_without_returning(self.txn)
                .await?;
        }

        Ok(written)
    }

    /// Apply partial updates one row at a time (only set fields are written).
    pub async fn update_each<A>(&self, rows: Vec<A>) -> AppResult<u64>
    where
        A: ActiveModelTrait + ActiveModelBehavior + Send,
        <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    {
        let mut written = 0u64;
        for row in rows {
            row.update(self.txn).await?;
            written += 1;
        }
        Ok(written)
    }
}

/// Concrete implementation of UnitOfWork
#[derive(Clone)]
pub struct Persistence {
    db: DatabaseConnection,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Connection for reads outside of a write batch
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self.db.begin().await.map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Simpler API for executing transactional operations.
///
/// The body may only capture owned values; it runs inside `async move`.
/// Requires [`UnitOfWork`] in scope.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
