use std::sync::Arc;

use chrono::Utc;
use tourbook::db::{AppDbDriver, AppDbPool, BaseRepository, Handle};
use tourbook::page::{Page, PageRequest, Pagination};
use tourbook_catalog::{TargetRef, service::TargetResolver};

use crate::{
    entity::{Review, ReviewScope, validate_rating},
    rating::RatingSummary,
    repository::ReviewRepository,
    service::{CreateReviewCommand, ReviewService, TargetReviews, UpdateReviewCommand},
};

fn review_not_found(id: i64) -> tourbook::Error {
    tracing::debug!(review_id = id, "review lookup missed");
    tourbook::Error::not_found("Review not found")
}

pub struct ReviewServiceImpl<R, T>
where
    R: ReviewRepository<AppDbDriver> + Sync + Send,
    T: TargetResolver,
{
    pub pool: AppDbPool,
    pub repo: Arc<R>,
    pub resolver: Arc<T>,
}

impl<R, T> ReviewServiceImpl<R, T>
where
    R: ReviewRepository<AppDbDriver> + Sync + Send,
    T: TargetResolver,
{
    pub fn new(pool: AppDbPool, repo: Arc<R>, resolver: Arc<T>) -> Self {
        Self {
            pool,
            repo,
            resolver,
        }
    }

    fn handle(&self) -> Handle<AppDbDriver> {
        Handle::new(self.pool.clone())
    }

    async fn find_existing(&self, id: i64) -> tourbook::Result<Review> {
        self.repo
            .find_by_id(&mut self.handle(), id)
            .await?
            .ok_or_else(|| review_not_found(id))
    }
}

#[async_trait::async_trait]
impl<R, T> ReviewService for ReviewServiceImpl<R, T>
where
    R: ReviewRepository<AppDbDriver> + Sync + Send,
    T: TargetResolver,
{
    async fn create(&self, command: CreateReviewCommand) -> tourbook::Result<Review> {
        validate_rating(command.rating)?;
        let target: TargetRef = command.targets.single()?;

        // lookup and insert are separate round trips; a target deleted in
        // between is rejected by the foreign key
        let resolved = self
            .resolver
            .resolve(target)
            .await?
            .ok_or_else(|| {
                tracing::debug!(%target, "review target missing");
                target.kind.not_found()
            })?;

        let now = Utc::now();
        let review = self
            .repo
            .create(
                &mut self.handle(),
                Review {
                    id: 0,
                    rating: command.rating,
                    comment: command.comment,
                    is_active: command.is_active.unwrap_or(true),
                    target: Some(resolved.target_ref()),
                    created_at: now,
                    updated_at: now,
                },
            )
            .await?;
        tracing::info!(review_id = review.id, %target, "review created");
        Ok(review)
    }

    async fn find_all(&self, page: PageRequest) -> tourbook::Result<Page<Review>> {
        let mut handle = self.handle();
        let items = self
            .repo
            .find_page(&mut handle, ReviewScope::Active, page.skip(), page.take())
            .await?;
        let total = self.repo.count(&mut handle, ReviewScope::Active).await?;
        Ok(Page {
            items,
            pagination: Pagination::new(page, total),
        })
    }

    async fn find_all_for_admin(
        &self,
        page: PageRequest,
    ) -> tourbook::Result<Page<Review>> {
        let items = self
            .repo
            .find_page(&mut self.handle(), ReviewScope::All, page.skip(), page.take())
            .await?;
        let total = items.len() as i64;
        Ok(Page {
            items,
            pagination: Pagination::new(page, total),
        })
    }

    async fn find_target_reviews(
        &self,
        target: TargetRef,
    ) -> tourbook::Result<TargetReviews> {
        let reviews = self
            .repo
            .find_by_target(&mut self.handle(), target, ReviewScope::Active)
            .await?;
        let summary = RatingSummary::from_ratings(reviews.iter().map(|r| r.rating));
        Ok(TargetReviews { reviews, summary })
    }

    async fn activate(&self, id: i64) -> tourbook::Result<Review> {
        let mut review = self.find_existing(id).await?;
        review.is_active = true;
        let review = self.repo.update(&mut self.handle(), review).await?;
        tracing::info!(review_id = id, "review activated");
        Ok(review)
    }

    async fn update(
        &self,
        id: i64,
        command: UpdateReviewCommand,
    ) -> tourbook::Result<Review> {
        let mut review = self.find_existing(id).await?;
        if let Some(rating) = command.rating {
            validate_rating(rating)?;
            review.rating = rating;
        }
        if let Some(comment) = command.comment {
            review.comment = comment;
        }
        if let Some(is_active) = command.is_active {
            review.is_active = is_active;
        }
        self.repo.update(&mut self.handle(), review).await
    }

    async fn remove(&self, id: i64) -> tourbook::Result<()> {
        let review = self.find_existing(id).await?;
        self.repo.delete(&mut self.handle(), review.id).await?;
        tracing::info!(review_id = id, "review removed");
        Ok(())
    }
}
