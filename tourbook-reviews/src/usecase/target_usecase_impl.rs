use std::sync::Arc;

use futures::future::try_join_all;
use tourbook::db::{AppDbDriver, AppDbPool, BaseRepository, Handle};
use tourbook_catalog::{
    Target, TargetRef,
    repository::{ImageRepository, TargetRepository},
};

use crate::{
    entity::ReviewScope,
    rating::RatingSummary,
    repository::ReviewRepository,
    usecase::{RemoveTargetUsecase, RemovedTarget, TargetOverview, TargetOverviewUsecase},
};

pub struct TargetUsecaseImpl<T, I, R>
where
    T: TargetRepository,
    I: ImageRepository,
    R: ReviewRepository<AppDbDriver> + Sync + Send,
{
    pub pool: AppDbPool,
    pub targets: Arc<T>,
    pub images: Arc<I>,
    pub reviews: Arc<R>,
}

impl<T, I, R> TargetUsecaseImpl<T, I, R>
where
    T: TargetRepository,
    I: ImageRepository,
    R: ReviewRepository<AppDbDriver> + Sync + Send,
{
    pub fn new(
        pool: AppDbPool,
        targets: Arc<T>,
        images: Arc<I>,
        reviews: Arc<R>,
    ) -> Self {
        Self {
            pool,
            targets,
            images,
            reviews,
        }
    }

    async fn find_target(&self, target: TargetRef) -> tourbook::Result<Target> {
        let mut handle = Handle::new(self.pool.clone());
        self.targets
            .find_by_id(&mut handle, target)
            .await?
            .ok_or_else(|| {
                tracing::debug!(%target, "target lookup missed");
                target.kind.not_found()
            })
    }
}

#[async_trait::async_trait]
impl<T, I, R> RemoveTargetUsecase for TargetUsecaseImpl<T, I, R>
where
    T: TargetRepository,
    I: ImageRepository,
    R: ReviewRepository<AppDbDriver> + Sync + Send,
{
    async fn execute(&self, target: TargetRef) -> tourbook::Result<RemovedTarget> {
        let found = self.find_target(target).await?;

        let mut handle = Handle::new(self.pool.clone());
        let images = self.images.find_by_target(&mut handle, target).await?;
        try_join_all(images.iter().map(|image| async move {
            let mut handle = Handle::new(self.pool.clone());
            self.images.delete(&mut handle, image.id).await
        }))
        .await?;

        let reviews = self
            .reviews
            .find_by_target(&mut handle, target, ReviewScope::All)
            .await?;
        try_join_all(reviews.iter().map(|review| async move {
            let mut handle = Handle::new(self.pool.clone());
            self.reviews.delete(&mut handle, review.id).await
        }))
        .await?;

        self.targets.delete(&mut handle, target).await?;
        tracing::info!(
            %target,
            images = images.len(),
            reviews = reviews.len(),
            "target removed"
        );
        Ok(RemovedTarget {
            target: found,
            images_removed: images.len(),
            reviews_removed: reviews.len(),
        })
    }
}

#[async_trait::async_trait]
impl<T, I, R> TargetOverviewUsecase for TargetUsecaseImpl<T, I, R>
where
    T: TargetRepository,
    I: ImageRepository,
    R: ReviewRepository<AppDbDriver> + Sync + Send,
{
    async fn execute(&self, target: TargetRef) -> tourbook::Result<TargetOverview> {
        let found = self.find_target(target).await?;

        let mut handle = Handle::new(self.pool.clone());
        let images = self.images.find_by_target(&mut handle, target).await?;
        let reviews = self
            .reviews
            .find_by_target(&mut handle, target, ReviewScope::Active)
            .await?;
        Ok(TargetOverview {
            target: found,
            images,
            rating: RatingSummary::from_ratings(reviews.iter().map(|r| r.rating)),
        })
    }
}
