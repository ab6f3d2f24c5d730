/// What repositories run their statements on. Each statement checks a
/// connection out of the shared pool; nothing spans calls.
pub struct Handle<DB: sqlx::Database> {
    pool: sqlx::Pool<DB>,
}

impl<DB: sqlx::Database> Handle<DB> {
    pub fn new(pool: sqlx::Pool<DB>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &sqlx::Pool<DB> {
        &self.pool
    }
}

pub trait AsExecutor {
    type Executor<'h>: sqlx::Executor<'h>
    where
        Self: 'h;

    fn as_executor<'h>(&'h mut self) -> Self::Executor<'h>;
}

impl<DB> AsExecutor for Handle<DB>
where
    DB: sqlx::Database,
    for<'e> &'e mut DB::Connection: sqlx::Executor<'e, Database = DB>,
{
    type Executor<'h>
        = &'h sqlx::Pool<DB>
    where
        Self: 'h;

    fn as_executor<'h>(&'h mut self) -> Self::Executor<'h> {
        &self.pool
    }
}
