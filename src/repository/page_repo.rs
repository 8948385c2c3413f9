use crate::config::mongo_conf::MongoConfig;
use crate::model::page::Page;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::doc;
use futures::stream::StreamExt;
use mongodb::options::{FindOptions, ReplaceOptions};
use tracing::{debug, error, info};

/// Content-by-slug store. Writes replace the whole document.
#[async_trait]
pub trait PageRepository: Send + Sync {
    async fn find_by_slug(&self, slug: &str) -> RepositoryResult<Option<Page>>;
    /// Inserts or fully replaces the page with the same slug.
    async fn save(&self, page: Page) -> RepositoryResult<Page>;
    async fn list(&self) -> RepositoryResult<Vec<Page>>;
}

pub struct MongoPageRepository {
    collection: mongodb::Collection<Page>,
}

impl MongoPageRepository {
    pub fn new(db: &mongodb::Database, config: &MongoConfig) -> Self {
        MongoPageRepository { collection: db.collection::<Page>(&config.page_collection) }
    }
}

#[async_trait]
impl PageRepository for MongoPageRepository {
    #[tracing::instrument(skip(self))]
    async fn find_by_slug(&self, slug: &str) -> RepositoryResult<Option<Page>> {
        let page = self.collection.find_one(doc! { "slug": slug }, None).await.map_err(|e| {
            error!("Failed to fetch page {}: {}", slug, e);
            RepositoryError::database(format!("Failed to fetch page {}: {}", slug, e))
        })?;
        debug!(found = page.is_some(), "Page lookup finished");
        Ok(page)
    }

    #[tracing::instrument(skip(self, page), fields(slug = %page.slug))]
    async fn save(&self, page: Page) -> RepositoryResult<Page> {
        let mut replacement = page;
        replacement.id = None;
        replacement.updated_at = Some(chrono::Local::now().to_rfc3339());

        let options = ReplaceOptions::builder().upsert(true).build();
        let result = self
            .collection
            .replace_one(doc! { "slug": &replacement.slug }, &replacement, options)
            .await
            .map_err(|e| {
                error!("Failed to save page: {}", e);
                RepositoryError::database(format!("Failed to save page: {}", e))
            })?;

        if let Some(id) = result.upserted_id.as_ref().and_then(|id| id.as_object_id()) {
            replacement.id = Some(id);
        }
        info!(matched = result.matched_count, upserted = result.upserted_id.is_some(), "Page saved");
        Ok(replacement)
    }

    #[tracing::instrument(skip(self))]
    async fn list(&self) -> RepositoryResult<Vec<Page>> {
        let options = FindOptions::builder().sort(doc! { "slug": 1 }).build();
        let mut cursor = self.collection.find(None, options).await.map_err(|e| {
            error!("Failed to list pages: {}", e);
            RepositoryError::database(format!("Failed to list pages: {}", e))
        })?;

        let mut pages = Vec::new();
        while let Some(page) = cursor.next().await {
            pages.push(page.map_err(|e| RepositoryError::serialization(format!("Failed to deserialize page: {}", e)))?);
        }
        Ok(pages)
    }
}
