use crate::entity::{Image, Target, TargetRef};
use tourbook::db::AppDbHandle;

/// Lookup and removal over the nine target tables.
#[async_trait::async_trait]
pub trait TargetRepository: Sync + Send {
    async fn find_by_id(
        &self,
        h: &mut AppDbHandle,
        target: TargetRef,
    ) -> tourbook::Result<Option<Target>>;

    async fn delete(
        &self,
        h: &mut AppDbHandle,
        target: TargetRef,
    ) -> tourbook::Result<()>;
}

pub struct NewImage {
    pub url: String,
    pub target: TargetRef,
}

#[async_trait::async_trait]
pub trait ImageRepository: Sync + Send {
    async fn create(
        &self,
        h: &mut AppDbHandle,
        image: NewImage,
    ) -> tourbook::Result<Image>;

    async fn find_by_target(
        &self,
        h: &mut AppDbHandle,
        target: TargetRef,
    ) -> tourbook::Result<Vec<Image>>;

    async fn delete(
        &self,
        h: &mut AppDbHandle,
        id: i64,
    ) -> tourbook::Result<()>;
}
