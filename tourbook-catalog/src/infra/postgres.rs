use std::sync::LazyLock;

use tourbook::db::{AppDbHandle, AsExecutor};

use crate::{
    entity::{Image, ImageRow, Target, TargetKind, TargetRef, TargetRow},
    repository::{ImageRepository, NewImage, TargetRepository},
};

static IMAGE_COLUMNS: LazyLock<String> = LazyLock::new(|| {
    let fks = TargetKind::ALL.map(TargetKind::fk_column).join(", ");
    format!("id, url, {fks}, created_at")
});

pub struct PostgresTargetRepository;

#[async_trait::async_trait]
impl TargetRepository for PostgresTargetRepository {
    async fn find_by_id(
        &self,
        h: &mut AppDbHandle,
        target: TargetRef,
    ) -> tourbook::Result<Option<Target>> {
        let sql = format!(
            "SELECT id, name, created_at, updated_at FROM {} WHERE id = $1",
            target.kind.table()
        );
        let row: Option<TargetRow> = sqlx::query_as(&sql)
            .bind(target.id)
            .fetch_optional(h.as_executor())
            .await
            .map_err(tourbook::db::map_err)?;
        Ok(row.map(|row| Target::from_row(target.kind, row)))
    }

    async fn delete(
        &self,
        h: &mut AppDbHandle,
        target: TargetRef,
    ) -> tourbook::Result<()> {
        let sql = format!("DELETE FROM {} WHERE id = $1", target.kind.table());
        sqlx::query(&sql)
            .bind(target.id)
            .execute(h.as_executor())
            .await
            .map_err(tourbook::db::map_err)?;
        Ok(())
    }
}

pub struct PostgresImageRepository;

#[async_trait::async_trait]
impl ImageRepository for PostgresImageRepository {
    async fn create(
        &self,
        h: &mut AppDbHandle,
        image: NewImage,
    ) -> tourbook::Result<Image> {
        let sql = format!(
            "INSERT INTO images (url, {}) VALUES ($1, $2) RETURNING {}",
            image.target.kind.fk_column(),
            IMAGE_COLUMNS.as_str()
        );
        let row: ImageRow = sqlx::query_as(&sql)
            .bind(image.url)
            .bind(image.target.id)
            .fetch_one(h.as_executor())
            .await
            .map_err(tourbook::db::map_err)?;
        row.try_into()
    }

    async fn find_by_target(
        &self,
        h: &mut AppDbHandle,
        target: TargetRef,
    ) -> tourbook::Result<Vec<Image>> {
        let sql = format!(
            "SELECT {} FROM images WHERE {} = $1 ORDER BY id",
            IMAGE_COLUMNS.as_str(),
            target.kind.fk_column()
        );
        let rows: Vec<ImageRow> = sqlx::query_as(&sql)
            .bind(target.id)
            .fetch_all(h.as_executor())
            .await
            .map_err(tourbook::db::map_err)?;
        rows.into_iter().map(Image::try_from).collect()
    }

    async fn delete(
        &self,
        h: &mut AppDbHandle,
        id: i64,
    ) -> tourbook::Result<()> {
        sqlx::query("DELETE FROM images WHERE id = $1")
            .bind(id)
            .execute(h.as_executor())
            .await
            .map_err(tourbook::db::map_err)?;
        Ok(())
    }
}
