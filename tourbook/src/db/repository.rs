/// Row-level CRUD every table-backed repository offers. Listing and filtering
/// live on the entity-specific traits built on top of this one.
#[async_trait::async_trait]
pub trait BaseRepository<T, DB>
where
    DB: sqlx::Database,
    for<'e> &'e mut DB::Connection: sqlx::Executor<'e, Database = DB>,
{
    /// Inserts `entity`; the id and timestamps it carries are ignored and the
    /// stored row is returned.
    async fn create(
        &self,
        h: &mut crate::db::Handle<DB>,
        entity: T,
    ) -> crate::Result<T>;

    async fn find_by_id(
        &self,
        h: &mut crate::db::Handle<DB>,
        id: i64,
    ) -> crate::Result<Option<T>>;

    async fn update(
        &self,
        h: &mut crate::db::Handle<DB>,
        entity: T,
    ) -> crate::Result<T>;

    async fn delete(
        &self,
        h: &mut crate::db::Handle<DB>,
        id: i64,
    ) -> crate::Result<()>;
}
