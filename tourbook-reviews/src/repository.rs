use tourbook::db::Handle;
use tourbook_catalog::TargetRef;

use crate::entity::{Review, ReviewScope};

#[async_trait::async_trait]
pub trait ReviewRepository<DB>:
    tourbook::db::BaseRepository<Review, DB>
where
    DB: sqlx::Database,
    for<'e> &'e mut DB::Connection: sqlx::Executor<'e, Database = DB>,
{
    /// Newest first (`id DESC`).
    async fn find_page(
        &self,
        h: &mut Handle<DB>,
        scope: ReviewScope,
        skip: i64,
        take: i64,
    ) -> tourbook::Result<Vec<Review>>;

    async fn count(
        &self,
        h: &mut Handle<DB>,
        scope: ReviewScope,
    ) -> tourbook::Result<i64>;

    async fn find_by_target(
        &self,
        h: &mut Handle<DB>,
        target: TargetRef,
        scope: ReviewScope,
    ) -> tourbook::Result<Vec<Review>>;
}
