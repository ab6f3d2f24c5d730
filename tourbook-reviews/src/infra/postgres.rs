use std::sync::LazyLock;

use tourbook::db::{AppDbDriver, AppDbHandle, AsExecutor, BaseRepository};
use tourbook_catalog::{TargetIds, TargetKind, TargetRef};

use crate::{
    entity::{Review, ReviewRow, ReviewScope},
    repository::ReviewRepository,
};

static REVIEW_COLUMNS: LazyLock<String> = LazyLock::new(|| {
    let fks = TargetKind::ALL.map(TargetKind::fk_column).join(", ");
    format!("id, rating, comment, is_active, {fks}, created_at, updated_at")
});

static INSERT_REVIEW: LazyLock<String> = LazyLock::new(|| {
    let fks = TargetKind::ALL.map(TargetKind::fk_column).join(", ");
    let params = (4..4 + TargetKind::ALL.len())
        .map(|i| format!("${i}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO reviews (rating, comment, is_active, {fks}) \
         VALUES ($1, $2, $3, {params}) RETURNING {}",
        REVIEW_COLUMNS.as_str()
    )
});

fn scope_filter(scope: ReviewScope) -> &'static str {
    match scope {
        ReviewScope::Active => "is_active",
        ReviewScope::All => "TRUE",
    }
}

pub struct PostgresReviewRepository;

#[async_trait::async_trait]
impl BaseRepository<Review, AppDbDriver> for PostgresReviewRepository {
    async fn create(
        &self,
        h: &mut AppDbHandle,
        entity: Review,
    ) -> tourbook::Result<Review> {
        let targets = entity.target.map(TargetIds::from).unwrap_or_default();
        let mut query = sqlx::query_as::<_, ReviewRow>(INSERT_REVIEW.as_str())
            .bind(entity.rating)
            .bind(entity.comment)
            .bind(entity.is_active);
        for kind in TargetKind::ALL {
            query = query.bind(targets.get(kind));
        }
        let row = query
            .fetch_one(h.as_executor())
            .await
            .map_err(tourbook::db::map_err)?;
        Ok(row.into())
    }

    async fn find_by_id(
        &self,
        h: &mut AppDbHandle,
        id: i64,
    ) -> tourbook::Result<Option<Review>> {
        let sql =
            format!("SELECT {} FROM reviews WHERE id = $1", REVIEW_COLUMNS.as_str());
        let row: Option<ReviewRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(h.as_executor())
            .await
            .map_err(tourbook::db::map_err)?;
        Ok(row.map(Review::from))
    }

    async fn update(
        &self,
        h: &mut AppDbHandle,
        entity: Review,
    ) -> tourbook::Result<Review> {
        // target columns are never reassigned
        let sql = format!(
            "UPDATE reviews SET rating = $1, comment = $2, is_active = $3, \
             updated_at = now() WHERE id = $4 RETURNING {}",
            REVIEW_COLUMNS.as_str()
        );
        let row: Option<ReviewRow> = sqlx::query_as(&sql)
            .bind(entity.rating)
            .bind(entity.comment)
            .bind(entity.is_active)
            .bind(entity.id)
            .fetch_optional(h.as_executor())
            .await
            .map_err(tourbook::db::map_err)?;
        row.map(Review::from)
            .ok_or_else(|| tourbook::Error::not_found("Review not found"))
    }

    async fn delete(
        &self,
        h: &mut AppDbHandle,
        id: i64,
    ) -> tourbook::Result<()> {
        sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(h.as_executor())
            .await
            .map_err(tourbook::db::map_err)?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ReviewRepository<AppDbDriver> for PostgresReviewRepository {
    async fn find_page(
        &self,
        h: &mut AppDbHandle,
        scope: ReviewScope,
        skip: i64,
        take: i64,
    ) -> tourbook::Result<Vec<Review>> {
        let sql = format!(
            "SELECT {} FROM reviews WHERE {} ORDER BY id DESC OFFSET $1 LIMIT $2",
            REVIEW_COLUMNS.as_str(),
            scope_filter(scope)
        );
        let rows: Vec<ReviewRow> = sqlx::query_as(&sql)
            .bind(skip)
            .bind(take)
            .fetch_all(h.as_executor())
            .await
            .map_err(tourbook::db::map_err)?;
        Ok(rows.into_iter().map(Review::from).collect())
    }

    async fn count(
        &self,
        h: &mut AppDbHandle,
        scope: ReviewScope,
    ) -> tourbook::Result<i64> {
        let sql =
            format!("SELECT COUNT(*) FROM reviews WHERE {}", scope_filter(scope));
        sqlx::query_scalar(&sql)
            .fetch_one(h.as_executor())
            .await
            .map_err(tourbook::db::map_err)
    }

    async fn find_by_target(
        &self,
        h: &mut AppDbHandle,
        target: TargetRef,
        scope: ReviewScope,
    ) -> tourbook::Result<Vec<Review>> {
        let sql = format!(
            "SELECT {} FROM reviews WHERE {} = $1 AND {} ORDER BY id DESC",
            REVIEW_COLUMNS.as_str(),
            target.kind.fk_column(),
            scope_filter(scope)
        );
        let rows: Vec<ReviewRow> = sqlx::query_as(&sql)
            .bind(target.id)
            .fetch_all(h.as_executor())
            .await
            .map_err(tourbook::db::map_err)?;
        Ok(rows.into_iter().map(Review::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tourbook::db::Handle;

    async fn setup_db() -> sqlx::PgPool {
        let url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set for postgres tests");
        let pool = sqlx::PgPool::connect(&url)
            .await
            .expect("Failed to connect to Postgres");
        sqlx::migrate!("../migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");
        pool
    }

    #[test]
    fn test_insert_binds_every_target_column() {
        assert!(INSERT_REVIEW.contains("surrounding_id"));
        assert!(INSERT_REVIEW.contains("$12"));
        assert!(!INSERT_REVIEW.contains("$13"));
    }

    #[tokio::test]
    #[ignore]
    async fn test_review_repository_crud() -> tourbook::Result<()> {
        let pool = setup_db().await;
        let mut handle = Handle::new(pool);
        let repo = PostgresReviewRepository;

        let tour_id: i64 =
            sqlx::query_scalar("INSERT INTO tours (name) VALUES ('Geghard') RETURNING id")
                .fetch_one(handle.as_executor())
                .await
                .map_err(tourbook::db::map_err)?;
        let tour = TargetRef::new(TargetKind::Tour, tour_id);

        let created = repo
            .create(
                &mut handle,
                Review {
                    id: 0,
                    rating: 4,
                    comment: "Worth the drive".into(),
                    is_active: true,
                    target: Some(tour),
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                },
            )
            .await?;
        assert_eq!(created.target, Some(tour));

        let found = repo.find_by_id(&mut handle, created.id).await?.unwrap();
        assert_eq!(found.comment, "Worth the drive");

        let mut hidden = found;
        hidden.is_active = false;
        let hidden = repo.update(&mut handle, hidden).await?;
        assert!(!hidden.is_active);
        assert_eq!(hidden.target, Some(tour));

        let active = repo.find_by_target(&mut handle, tour, ReviewScope::Active).await?;
        assert!(active.iter().all(|r| r.id != created.id));
        let all = repo.find_by_target(&mut handle, tour, ReviewScope::All).await?;
        assert!(all.iter().any(|r| r.id == created.id));

        assert!(repo.count(&mut handle, ReviewScope::All).await? >= 1);

        repo.delete(&mut handle, created.id).await?;
        assert!(repo.find_by_id(&mut handle, created.id).await?.is_none());
        Ok(())
    }
}
