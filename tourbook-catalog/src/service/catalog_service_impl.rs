use std::sync::Arc;

use tourbook::db::{AppDbPool, Handle};

use crate::{
    entity::{Image, Target, TargetRef},
    repository::{ImageRepository, NewImage, TargetRepository},
    service::{AddImageCommand, CatalogService, TargetResolver},
};

pub struct CatalogServiceImpl<T: TargetRepository, I: ImageRepository> {
    pub pool: AppDbPool,
    pub targets: Arc<T>,
    pub images: Arc<I>,
}

impl<T: TargetRepository, I: ImageRepository> CatalogServiceImpl<T, I> {
    pub fn new(pool: AppDbPool, targets: Arc<T>, images: Arc<I>) -> Self {
        Self {
            pool,
            targets,
            images,
        }
    }
}

#[async_trait::async_trait]
impl<T: TargetRepository, I: ImageRepository> TargetResolver
    for CatalogServiceImpl<T, I>
{
    async fn resolve(&self, target: TargetRef) -> tourbook::Result<Option<Target>> {
        let mut handle = Handle::new(self.pool.clone());
        self.targets.find_by_id(&mut handle, target).await
    }
}

#[async_trait::async_trait]
impl<T: TargetRepository, I: ImageRepository> CatalogService
    for CatalogServiceImpl<T, I>
{
    async fn find_target(&self, target: TargetRef) -> tourbook::Result<Target> {
        self.resolve(target).await?.ok_or_else(|| {
            tracing::debug!(%target, "target lookup missed");
            target.kind.not_found()
        })
    }

    async fn add_image(&self, command: AddImageCommand) -> tourbook::Result<Image> {
        let url = command.url.trim();
        if url.is_empty() {
            return Err(tourbook::Error::validation("image url must not be empty"));
        }
        let target = self.find_target(command.target).await?;

        let mut handle = Handle::new(self.pool.clone());
        let image = self
            .images
            .create(
                &mut handle,
                NewImage {
                    url: url.to_string(),
                    target: target.target_ref(),
                },
            )
            .await?;
        tracing::info!(image_id = image.id, target = %image.target, "image added");
        Ok(image)
    }

    async fn list_images(&self, target: TargetRef) -> tourbook::Result<Vec<Image>> {
        let target = self.find_target(target).await?;
        let mut handle = Handle::new(self.pool.clone());
        self.images.find_by_target(&mut handle, target.target_ref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TargetKind, infra::MemoryCatalog};

    fn service(
        catalog: &Arc<MemoryCatalog>,
    ) -> CatalogServiceImpl<MemoryCatalog, MemoryCatalog> {
        let pool = tourbook::db::connect_lazy("postgres://localhost/tourbook_test")
            .expect("lazy pool");
        CatalogServiceImpl::new(pool, catalog.clone(), catalog.clone())
    }

    #[tokio::test]
    async fn test_resolve_every_kind() -> tourbook::Result<()> {
        let catalog = Arc::new(MemoryCatalog::new());
        let service = service(&catalog);

        for kind in TargetKind::ALL {
            let target = catalog.insert_target(kind, kind.label()).await;
            let resolved = service.resolve(target.target_ref()).await?;
            assert_eq!(resolved, Some(target));
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_find_target_not_found_names_kind() {
        let catalog = Arc::new(MemoryCatalog::new());
        let service = service(&catalog);

        let err = service
            .find_target(TargetRef::new(TargetKind::FoodAndDrink, 42))
            .await
            .unwrap_err();
        let tourbook::Error::NotFound(message) = err else {
            panic!("expected not found, got {err:?}");
        };
        assert_eq!(message, "Food and drink not found");
    }

    #[tokio::test]
    async fn test_same_id_different_kind_is_distinct() {
        let catalog = Arc::new(MemoryCatalog::new());
        let service = service(&catalog);

        let tour = catalog.insert_target(TargetKind::Tour, "Garni").await;
        let as_car = TargetRef::new(TargetKind::Car, tour.id);
        assert!(service.resolve(as_car).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_and_list_images() -> tourbook::Result<()> {
        let catalog = Arc::new(MemoryCatalog::new());
        let service = service(&catalog);
        let hotel = catalog.insert_target(TargetKind::Hotel, "Tufenkian").await;

        let image = service
            .add_image(AddImageCommand {
                target: hotel.target_ref(),
                url: "  https://cdn.example/a.jpg ".into(),
            })
            .await?;
        assert_eq!(image.url, "https://cdn.example/a.jpg");
        assert_eq!(image.target, hotel.target_ref());

        let images = service.list_images(hotel.target_ref()).await?;
        assert_eq!(images, vec![image]);
        Ok(())
    }

    #[tokio::test]
    async fn test_add_image_rejects_empty_url_and_missing_target() {
        let catalog = Arc::new(MemoryCatalog::new());
        let service = service(&catalog);
        let mice = catalog.insert_target(TargetKind::Mice, "Expo hall").await;

        let err = service
            .add_image(AddImageCommand {
                target: mice.target_ref(),
                url: "   ".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, tourbook::Error::Validation(_)));

        let err = service
            .add_image(AddImageCommand {
                target: TargetRef::new(TargetKind::Mice, 999),
                url: "https://cdn.example/b.jpg".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, tourbook::Error::NotFound(_)));
        assert_eq!(catalog.image_count().await, 0);
    }
}
