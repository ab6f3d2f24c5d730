use std::sync::Arc;

use tourbook::http::middleware::{RequestTraceLayer, response_mapper_layer};
use tourbook_catalog::{
    infra::{PostgresImageRepository, PostgresTargetRepository},
    service::CatalogServiceImpl,
};
use tourbook_reviews::{
    api::{self, AppState},
    infra::PostgresReviewRepository,
    service::ReviewServiceImpl,
    usecase::TargetUsecaseImpl,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = tourbook::config::AppConfig::new(tourbook::util::config_dir())?;
    tourbook::trace::init(&config.trace)?;
    tracing::debug!(?config, "app config");

    let pool = tourbook::db::connect(&config.database).await?;
    if config.database.run_migrations {
        sqlx::migrate!("../migrations").run(&pool).await?;
        tracing::info!("migrations applied");
    }

    let targets = Arc::new(PostgresTargetRepository);
    let images = Arc::new(PostgresImageRepository);
    let reviews = Arc::new(PostgresReviewRepository);

    let catalog = Arc::new(CatalogServiceImpl::new(
        pool.clone(),
        targets.clone(),
        images.clone(),
    ));
    let target_usecase = Arc::new(TargetUsecaseImpl::new(
        pool.clone(),
        targets,
        images,
        reviews.clone(),
    ));
    let state = AppState {
        reviews: Arc::new(ReviewServiceImpl::new(pool, reviews, catalog.clone())),
        catalog,
        remove_target: target_usecase.clone(),
        target_overview: target_usecase,
        pagination: config.pagination,
    };

    let router = api::router(state)
        .layer(axum::middleware::from_fn(response_mapper_layer))
        .layer(RequestTraceLayer);

    tourbook::http::run(router, &config.server).await?;
    Ok(())
}
