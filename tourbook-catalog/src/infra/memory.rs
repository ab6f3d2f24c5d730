use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::Mutex;
use tourbook::db::AppDbHandle;

use crate::{
    entity::{Image, Target, TargetKind, TargetRef},
    repository::{ImageRepository, NewImage, TargetRepository},
};

/// Process-local catalog store. Ignores the database handle; used by unit
/// tests and local demos.
#[derive(Default)]
pub struct MemoryCatalog {
    state: Mutex<CatalogState>,
}

#[derive(Default)]
struct CatalogState {
    next_id: i64,
    targets: HashMap<TargetRef, Target>,
    images: Vec<Image>,
}

impl CatalogState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_target(&self, kind: TargetKind, name: &str) -> Target {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let target = Target {
            kind,
            id: state.next_id(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        state.targets.insert(target.target_ref(), target.clone());
        target
    }

    pub async fn image_count(&self) -> usize {
        self.state.lock().await.images.len()
    }
}

#[async_trait::async_trait]
impl TargetRepository for MemoryCatalog {
    async fn find_by_id(
        &self,
        _h: &mut AppDbHandle,
        target: TargetRef,
    ) -> tourbook::Result<Option<Target>> {
        Ok(self.state.lock().await.targets.get(&target).cloned())
    }

    async fn delete(
        &self,
        _h: &mut AppDbHandle,
        target: TargetRef,
    ) -> tourbook::Result<()> {
        self.state.lock().await.targets.remove(&target);
        Ok(())
    }
}

#[async_trait::async_trait]
impl ImageRepository for MemoryCatalog {
    async fn create(
        &self,
        _h: &mut AppDbHandle,
        image: NewImage,
    ) -> tourbook::Result<Image> {
        let mut state = self.state.lock().await;
        let image = Image {
            id: state.next_id(),
            url: image.url,
            target: image.target,
            created_at: Utc::now(),
        };
        state.images.push(image.clone());
        Ok(image)
    }

    async fn find_by_target(
        &self,
        _h: &mut AppDbHandle,
        target: TargetRef,
    ) -> tourbook::Result<Vec<Image>> {
        Ok(self
            .state
            .lock()
            .await
            .images
            .iter()
            .filter(|image| image.target == target)
            .cloned()
            .collect())
    }

    async fn delete(
        &self,
        _h: &mut AppDbHandle,
        id: i64,
    ) -> tourbook::Result<()> {
        self.state.lock().await.images.retain(|image| image.id != id);
        Ok(())
    }
}
