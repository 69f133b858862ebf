//! Page-at-a-time reader over a legacy query.

use sea_orm::{ConnectionTrait, Paginator, SelectorTrait};
use tokio_util::sync::CancellationToken;

use crate::errors::{AppError, AppResult};

/// Lazily walks a paginated query one page at a time.
///
/// The query must carry a total order (e.g. `ORDER BY id`) for pages to be
/// stable. Only the current page is ever held in memory, and cancellation is
/// checked before each page is fetched.
pub struct BatchedReader<'db, C, S>
where
    C: ConnectionTrait,
    S: SelectorTrait + 'db,
{
    paginator: Paginator<'db, C, S>,
    page_size: u64,
    next_page: u64,
    exhausted: bool,
    cancel: CancellationToken,
}

impl<'db, C, S> BatchedReader<'db, C, S>
where
    C: ConnectionTrait,
    S: SelectorTrait + 'db,
{
    /// `paginator` must have been built with the same `page_size`.
    pub fn new(paginator: Paginator<'db, C, S>, page_size: u64, cancel: CancellationToken) -> Self {
        Self {
            paginator,
            page_size,
            next_page: 0,
            exhausted: false,
            cancel,
        }
    }

    /// Resume from a zero-based page offset
    pub fn starting_at(mut self, page: u64) -> Self {
        self.next_page = page;
        self
    }

    /// Zero-based index of the page the next call will fetch
    pub fn next_page(&self) -> u64 {
        self.next_page
    }

    /// Fetch the next page, or `None` once the query is exhausted.
    pub async fn next_batch(&mut self) -> AppResult<Option<Vec<S::Item>>> {
        if self.exhausted {
            return Ok(None);
        }
        if self.cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        let rows = self.paginator.fetch_page(self.next_page).await?;
        if rows.is_empty() {
            self.exhausted = true;
            return Ok(None);
        }

        self.next_page += 1;
        if (rows.len() as u64) < self.page_size {
            self.exhausted = true;
        }
        Ok(Some(rows))
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{
        ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait,
        PaginatorTrait, QueryOrder, Schema, Set,
    };

    use super::*;
    use crate::infra::repositories::entities::legacy::store;

    async fn seeded_stores(count: i32) -> DatabaseConnection {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(options).await.unwrap();
        let schema = Schema::new(db.get_database_backend());
        db.execute(db.get_database_backend().build(&schema.create_table_from_entity(store::Entity)))
            .await
            .unwrap();

        let rows = (1..=count).map(|id| store::ActiveModel {
            id: Set(id),
            name: Set(format!("Store {}", id)),
            address: Set(None),
            phone: Set(None),
        });
        store::Entity::insert_many(rows)
            .exec_without_returning(&db)
            .await
            .unwrap();
        db
    }

    #[tokio::test]
    async fn test_pages_through_whole_table_in_order() {
        let db = seeded_stores(5).await;
        let paginator = store::Entity::find()
            .order_by_asc(store::Column::Id)
            .paginate(&db, 2);
        let mut reader = BatchedReader::new(paginator, 2, CancellationToken::new());

        let mut sizes = Vec::new();
        let mut ids = Vec::new();
        while let Some(batch) = reader.next_batch().await.unwrap() {
            sizes.push(batch.len());
            ids.extend(batch.into_iter().map(|s| s.id));
        }

        assert_eq!(sizes, vec![2, 2, 1]);
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert!(reader.next_batch().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_resumes_from_page_offset() {
        let db = seeded_stores(5).await;
        let paginator = store::Entity::find()
            .order_by_asc(store::Column::Id)
            .paginate(&db, 2);
        let mut reader = BatchedReader::new(paginator, 2, CancellationToken::new()).starting_at(1);

        let batch = reader.next_batch().await.unwrap().unwrap();
        assert_eq!(batch.iter().map(|s| s.id).collect::<Vec<_>>(), vec![3, 4]);
        assert_eq!(reader.next_page(), 2);
    }

    #[tokio::test]
    async fn test_cancelled_before_first_page() {
        let db = seeded_stores(3).await;
        let cancel = CancellationToken::new();
        cancel.cancel();

        let paginator = store::Entity::find()
            .order_by_asc(store::Column::Id)
            .paginate(&db, 2);
        let mut reader = BatchedReader::new(paginator, 2, cancel);

        assert!(matches!(reader.next_batch().await, Err(AppError::Cancelled)));
    }
}
