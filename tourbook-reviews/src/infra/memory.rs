use chrono::Utc;
use tokio::sync::Mutex;
use tourbook::db::{AppDbDriver, AppDbHandle, BaseRepository};
use tourbook_catalog::TargetRef;

use crate::{
    entity::{Review, ReviewScope},
    repository::ReviewRepository,
};

/// Process-local review store. Ignores the database handle; used by unit
/// tests and local demos.
#[derive(Default)]
pub struct MemoryReviewRepository {
    state: Mutex<ReviewState>,
}

#[derive(Default)]
struct ReviewState {
    next_id: i64,
    rows: Vec<Review>,
}

impl MemoryReviewRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait::async_trait]
impl BaseRepository<Review, AppDbDriver> for MemoryReviewRepository {
    async fn create(
        &self,
        _h: &mut AppDbHandle,
        entity: Review,
    ) -> tourbook::Result<Review> {
        let mut state = self.state.lock().await;
        state.next_id += 1;
        let now = Utc::now();
        let review = Review {
            id: state.next_id,
            created_at: now,
            updated_at: now,
            ..entity
        };
        state.rows.push(review.clone());
        Ok(review)
    }

    async fn find_by_id(
        &self,
        _h: &mut AppDbHandle,
        id: i64,
    ) -> tourbook::Result<Option<Review>> {
        let state = self.state.lock().await;
        Ok(state.rows.iter().find(|r| r.id == id).cloned())
    }

    async fn update(
        &self,
        _h: &mut AppDbHandle,
        entity: Review,
    ) -> tourbook::Result<Review> {
        let mut state = self.state.lock().await;
        let row = state
            .rows
            .iter_mut()
            .find(|r| r.id == entity.id)
            .ok_or_else(|| tourbook::Error::not_found("Review not found"))?;
        row.rating = entity.rating;
        row.comment = entity.comment;
        row.is_active = entity.is_active;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(
        &self,
        _h: &mut AppDbHandle,
        id: i64,
    ) -> tourbook::Result<()> {
        self.state.lock().await.rows.retain(|r| r.id != id);
        Ok(())
    }
}

#[async_trait::async_trait]
impl ReviewRepository<AppDbDriver> for MemoryReviewRepository {
    async fn find_page(
        &self,
        _h: &mut AppDbHandle,
        scope: ReviewScope,
        skip: i64,
        take: i64,
    ) -> tourbook::Result<Vec<Review>> {
        let state = self.state.lock().await;
        Ok(state
            .rows
            .iter()
            .rev()
            .filter(|r| scope.admits(r))
            .skip(usize::try_from(skip).unwrap_or(0))
            .take(usize::try_from(take).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn count(
        &self,
        _h: &mut AppDbHandle,
        scope: ReviewScope,
    ) -> tourbook::Result<i64> {
        let state = self.state.lock().await;
        let n = state.rows.iter().filter(|r| scope.admits(r)).count();
        Ok(n as i64)
    }

    async fn find_by_target(
        &self,
        _h: &mut AppDbHandle,
        target: TargetRef,
        scope: ReviewScope,
    ) -> tourbook::Result<Vec<Review>> {
        let state = self.state.lock().await;
        Ok(state
            .rows
            .iter()
            .rev()
            .filter(|r| r.target == Some(target) && scope.admits(r))
            .cloned()
            .collect())
    }
}
