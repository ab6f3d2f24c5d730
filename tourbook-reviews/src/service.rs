use tourbook::page::{Page, PageRequest};
use tourbook_catalog::{TargetIds, TargetRef};

use crate::{entity::Review, rating::RatingSummary};

pub struct CreateReviewCommand {
    pub rating: i32,
    pub comment: String,
    /// Defaults to active; moderated callers pass `Some(false)`.
    pub is_active: Option<bool>,
    pub targets: TargetIds,
}

/// Fields left `None` keep their stored value.
#[derive(Debug, Default)]
pub struct UpdateReviewCommand {
    pub rating: Option<i32>,
    pub comment: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct TargetReviews {
    pub reviews: Vec<Review>,
    pub summary: RatingSummary,
}

#[async_trait::async_trait]
pub trait ReviewService: Sync + Send {
    /// Attaches a new review to the one target named in `targets`.
    async fn create(&self, command: CreateReviewCommand) -> tourbook::Result<Review>;

    /// Active reviews, newest first, with a true total.
    async fn find_all(&self, page: PageRequest) -> tourbook::Result<Page<Review>>;

    /// Every review regardless of visibility. `total` counts the returned
    /// page only, not the whole table.
    async fn find_all_for_admin(
        &self,
        page: PageRequest,
    ) -> tourbook::Result<Page<Review>>;

    /// All active reviews of one target plus their rating summary.
    async fn find_target_reviews(
        &self,
        target: TargetRef,
    ) -> tourbook::Result<TargetReviews>;

    async fn activate(&self, id: i64) -> tourbook::Result<Review>;

    async fn update(
        &self,
        id: i64,
        command: UpdateReviewCommand,
    ) -> tourbook::Result<Review>;

    /// Deletes the review row only.
    async fn remove(&self, id: i64) -> tourbook::Result<()>;
}

mod review_service_impl;
pub use review_service_impl::*;
