use crate::config::mongo_conf::MongoConfig;
use crate::model::settings::SiteSetting;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use futures::stream::StreamExt;
use tracing::{error, info};

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn list_all(&self) -> RepositoryResult<Vec<SiteSetting>>;
}

pub struct MongoSettingsRepository {
    collection: mongodb::Collection<SiteSetting>,
}

impl MongoSettingsRepository {
    pub fn new(db: &mongodb::Database, config: &MongoConfig) -> Self {
        MongoSettingsRepository { collection: db.collection::<SiteSetting>(&config.settings_collection) }
    }
}

#[async_trait]
impl SettingsRepository for MongoSettingsRepository {
    #[tracing::instrument(skip(self))]
    async fn list_all(&self) -> RepositoryResult<Vec<SiteSetting>> {
        let mut cursor = self.collection.find(None, None).await.map_err(|e| {
            error!("Failed to fetch site settings: {}", e);
            RepositoryError::database(format!("Failed to fetch site settings: {}", e))
        })?;

        let mut settings = Vec::new();
        while let Some(setting) = cursor.next().await {
            settings.push(setting.map_err(|e| RepositoryError::serialization(format!("Failed to deserialize setting: {}", e)))?);
        }
        info!("Fetched {} site settings", settings.len());
        Ok(settings)
    }
}
