use crate::config::mongo_conf::MongoConfig;
use crate::model::media::MediaItem;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::doc;
use futures::stream::StreamExt;
use mongodb::options::FindOptions;
use tracing::error;

#[async_trait]
pub trait MediaRepository: Send + Sync {
    /// Newest first.
    async fn list(&self) -> RepositoryResult<Vec<MediaItem>>;
}

pub struct MongoMediaRepository {
    collection: mongodb::Collection<MediaItem>,
}

impl MongoMediaRepository {
    pub fn new(db: &mongodb::Database, config: &MongoConfig) -> Self {
        MongoMediaRepository { collection: db.collection::<MediaItem>(&config.media_collection) }
    }
}

#[async_trait]
impl MediaRepository for MongoMediaRepository {
    #[tracing::instrument(skip(self))]
    async fn list(&self) -> RepositoryResult<Vec<MediaItem>> {
        let options = FindOptions::builder().sort(doc! { "created_at": -1, "_id": -1 }).build();
        let mut cursor = self.collection.find(None, options).await.map_err(|e| {
            error!("Failed to list media: {}", e);
            RepositoryError::database(format!("Failed to list media: {}", e))
        })?;

        let mut items = Vec::new();
        while let Some(item) = cursor.next().await {
            items.push(item.map_err(|e| RepositoryError::serialization(format!("Failed to deserialize media item: {}", e)))?);
        }
        Ok(items)
    }
}
