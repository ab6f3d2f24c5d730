//! HTTP surface for reviews and the catalog routes that need review data.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use serde::Deserialize;
use tourbook::{
    config::PaginationConfig,
    http::Payload,
    page::{PageQuery, PageRequest},
};
use tourbook_catalog::{
    Image, TargetIds, TargetKind, TargetRef,
    service::{AddImageCommand, CatalogService},
};

use crate::{
    entity::Review,
    rating::RatingSummary,
    service::{CreateReviewCommand, ReviewService, UpdateReviewCommand},
    usecase::{RemoveTargetUsecase, RemovedTarget, TargetOverview, TargetOverviewUsecase},
};

#[derive(Clone)]
pub struct AppState {
    pub reviews: Arc<dyn ReviewService>,
    pub catalog: Arc<dyn CatalogService>,
    pub remove_target: Arc<dyn RemoveTargetUsecase>,
    pub target_overview: Arc<dyn TargetOverviewUsecase>,
    pub pagination: PaginationConfig,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/reviews", post(create_review).get(list_reviews))
        .route("/reviews/admin", get(list_reviews_for_admin))
        .route("/reviews/targets/{kind}/{id}", get(target_reviews))
        .route("/reviews/{id}", patch(update_review).delete(remove_review))
        .route("/reviews/{id}/activate", patch(activate_review))
        .route("/catalog/{kind}/{id}", get(target_overview).delete(remove_target))
        .route("/catalog/{kind}/{id}/images", get(list_images).post(add_image))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub rating: i32,
    pub comment: String,
    pub is_active: Option<bool>,
    #[serde(flatten)]
    pub targets: TargetIds,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewRequest {
    pub rating: Option<i32>,
    pub comment: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct AddImageRequest {
    pub url: String,
}

fn target_ref(kind: &str, id: i64) -> tourbook::Result<TargetRef> {
    Ok(TargetRef::new(kind.parse::<TargetKind>()?, id))
}

async fn create_review(
    State(state): State<AppState>,
    Json(req): Json<CreateReviewRequest>,
) -> tourbook::Result<Payload<Review>> {
    let review = state
        .reviews
        .create(CreateReviewCommand {
            rating: req.rating,
            comment: req.comment,
            is_active: req.is_active,
            targets: req.targets,
        })
        .await?;
    Ok(Payload::created("Review created successfully", review))
}

async fn list_reviews(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> tourbook::Result<Payload<Vec<Review>>> {
    let page = PageRequest::from_query(query, &state.pagination)?;
    let page = state.reviews.find_all(page).await?;
    Ok(Payload::ok("Reviews found successfully", page.items)
        .with_pagination(page.pagination))
}

async fn list_reviews_for_admin(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> tourbook::Result<Payload<Vec<Review>>> {
    let page = PageRequest::from_query(query, &state.pagination)?;
    let page = state.reviews.find_all_for_admin(page).await?;
    Ok(Payload::ok("Reviews found successfully", page.items)
        .with_pagination(page.pagination))
}

async fn target_reviews(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, i64)>,
) -> tourbook::Result<Payload<Vec<Review>, RatingSummary>> {
    let target = target_ref(&kind, id)?;
    let found = state.reviews.find_target_reviews(target).await?;
    Ok(Payload::ok("Reviews found successfully", found.reviews).with_meta(found.summary))
}

async fn update_review(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateReviewRequest>,
) -> tourbook::Result<Payload<Review>> {
    let review = state
        .reviews
        .update(
            id,
            UpdateReviewCommand {
                rating: req.rating,
                comment: req.comment,
                is_active: req.is_active,
            },
        )
        .await?;
    Ok(Payload::ok("Review updated successfully", review))
}

async fn activate_review(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> tourbook::Result<Payload<Review>> {
    let review = state.reviews.activate(id).await?;
    Ok(Payload::ok("Review activated successfully", review))
}

async fn remove_review(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> tourbook::Result<Payload> {
    state.reviews.remove(id).await?;
    Ok(Payload::message(StatusCode::OK, "Review deleted successfully"))
}

async fn target_overview(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, i64)>,
) -> tourbook::Result<Payload<TargetOverview>> {
    let target = target_ref(&kind, id)?;
    let overview = state.target_overview.execute(target).await?;
    Ok(Payload::ok(
        format!("{} found successfully", target.kind.label()),
        overview,
    ))
}

async fn remove_target(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, i64)>,
) -> tourbook::Result<Payload<RemovedTarget>> {
    let target = target_ref(&kind, id)?;
    let removed = state.remove_target.execute(target).await?;
    Ok(Payload::ok(
        format!("{} deleted successfully", target.kind.label()),
        removed,
    ))
}

async fn list_images(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, i64)>,
) -> tourbook::Result<Payload<Vec<Image>>> {
    let target = target_ref(&kind, id)?;
    let images = state.catalog.list_images(target).await?;
    Ok(Payload::ok("Images found successfully", images))
}

async fn add_image(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, i64)>,
    Json(req): Json<AddImageRequest>,
) -> tourbook::Result<Payload<Image>> {
    let target = target_ref(&kind, id)?;
    let image = state
        .catalog
        .add_image(AddImageCommand {
            target,
            url: req.url,
        })
        .await?;
    Ok(Payload::created("Image added successfully", image))
}
