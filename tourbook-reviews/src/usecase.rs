use serde::Serialize;
use tourbook_catalog::{Image, Target, TargetRef};

use crate::rating::RatingSummary;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovedTarget {
    pub target: Target,
    pub images_removed: usize,
    pub reviews_removed: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetOverview {
    pub target: Target,
    pub images: Vec<Image>,
    pub rating: RatingSummary,
}

/// Deletes a target together with its images and reviews. Every delete is its
/// own statement; a failure part way leaves earlier deletes in place.
#[async_trait::async_trait]
pub trait RemoveTargetUsecase: Sync + Send {
    async fn execute(&self, target: TargetRef) -> tourbook::Result<RemovedTarget>;
}

#[async_trait::async_trait]
pub trait TargetOverviewUsecase: Sync + Send {
    async fn execute(&self, target: TargetRef) -> tourbook::Result<TargetOverview>;
}

mod target_usecase_impl;
pub use target_usecase_impl::*;
