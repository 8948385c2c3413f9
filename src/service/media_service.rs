use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, instrument};

use crate::config::MediaConfig;
use crate::dto::media_dto::MediaView;
use crate::repository::media_repo::MediaRepository;
use crate::util::error::ServiceError;

/// Read side of the media library, used by the editor's media picker.
#[async_trait]
pub trait MediaService: Send + Sync {
    async fn list_media(&self) -> Result<Vec<MediaView>, ServiceError>;
}

pub struct MediaServiceImpl {
    pub media_repo: Arc<dyn MediaRepository>,
    pub config: MediaConfig,
}

impl MediaServiceImpl {
    pub fn new(media_repo: Arc<dyn MediaRepository>, config: MediaConfig) -> Self {
        MediaServiceImpl { media_repo, config }
    }
}

#[async_trait]
impl MediaService for MediaServiceImpl {
    #[instrument(skip(self))]
    async fn list_media(&self) -> Result<Vec<MediaView>, ServiceError> {
        let items = self.media_repo.list().await.map_err(|e| {
            error!("Failed to list media: {e}");
            ServiceError::from(e)
        })?;
        Ok(items.into_iter().map(|item| MediaView::new(item, &self.config)).collect())
    }
}
