use crate::entity::{Image, Target, TargetRef};

pub struct AddImageCommand {
    pub target: TargetRef,
    pub url: String,
}

/// Existence check used before anything is attached to a target.
#[async_trait::async_trait]
pub trait TargetResolver: Sync + Send {
    async fn resolve(&self, target: TargetRef) -> tourbook::Result<Option<Target>>;
}

#[async_trait::async_trait]
pub trait CatalogService: Sync + Send {
    /// Fails with `NotFound("<Kind> not found")` when the row is absent.
    async fn find_target(&self, target: TargetRef) -> tourbook::Result<Target>;

    async fn add_image(&self, command: AddImageCommand) -> tourbook::Result<Image>;

    async fn list_images(&self, target: TargetRef) -> tourbook::Result<Vec<Image>>;
}

mod catalog_service_impl;
pub use catalog_service_impl::*;
