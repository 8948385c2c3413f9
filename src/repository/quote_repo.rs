use crate::config::mongo_conf::MongoConfig;
use crate::model::quote::QuoteSubmission;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures::stream::StreamExt;
use mongodb::options::FindOptions;
use tracing::{error, info};

/// Append-only store of quote submissions.
#[async_trait]
pub trait QuoteRepository: Send + Sync {
    async fn create(&self, submission: QuoteSubmission) -> RepositoryResult<QuoteSubmission>;
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<QuoteSubmission>;
    /// Newest first. `page` starts at 1.
    async fn list(&self, page: u32, limit: u32) -> RepositoryResult<Vec<QuoteSubmission>>;
    async fn count(&self) -> RepositoryResult<u64>;
}

pub struct MongoQuoteRepository {
    collection: mongodb::Collection<QuoteSubmission>,
}

impl MongoQuoteRepository {
    pub fn new(db: &mongodb::Database, config: &MongoConfig) -> Self {
        MongoQuoteRepository { collection: db.collection::<QuoteSubmission>(&config.quote_collection) }
    }
}

#[async_trait]
impl QuoteRepository for MongoQuoteRepository {
    #[tracing::instrument(skip(self, submission), fields(service = %submission.service))]
    async fn create(&self, submission: QuoteSubmission) -> RepositoryResult<QuoteSubmission> {
        info!("Storing quote submission");
        let mut stored = submission;
        stored.id = Some(ObjectId::new());
        stored.created_at = Some(chrono::Local::now().to_rfc3339());

        match self.collection.insert_one(&stored, None).await {
            Ok(_) => {
                info!(id = ?stored.id, "Quote submission stored");
                Ok(stored)
            }
            Err(e) => {
                error!("Failed to store quote submission: {}", e);
                Err(RepositoryError::database(format!("Failed to store quote submission: {}", e)))
            }
        }
    }

    #[tracing::instrument(skip(self, id), fields(id = %id))]
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<QuoteSubmission> {
        match self.collection.find_one(doc! { "_id": id }, None).await {
            Ok(Some(submission)) => Ok(submission),
            Ok(None) => {
                error!("Quote submission not found for ID: {}", id);
                Err(RepositoryError::not_found(format!("Quote submission not found for ID: {}", id)))
            }
            Err(e) => {
                error!("Failed to fetch quote submission: {}", e);
                Err(RepositoryError::database(format!("Failed to fetch quote submission: {}", e)))
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn list(&self, page: u32, limit: u32) -> RepositoryResult<Vec<QuoteSubmission>> {
        let skip = u64::from(page.saturating_sub(1)) * u64::from(limit);
        let options = FindOptions::builder().sort(doc! { "_id": -1 }).skip(skip).limit(i64::from(limit)).build();

        let mut cursor = self.collection.find(None, options).await.map_err(|e| {
            error!("Failed to list quote submissions: {}", e);
            RepositoryError::database(format!("Failed to list quote submissions: {}", e))
        })?;

        let mut submissions = Vec::new();
        while let Some(submission) = cursor.next().await {
            match submission {
                Ok(s) => submissions.push(s),
                Err(e) => {
                    error!("Failed to deserialize quote submission: {}", e);
                    return Err(RepositoryError::serialization(format!("Failed to deserialize quote submission: {}", e)));
                }
            }
        }
        info!("Fetched {} quote submissions", submissions.len());
        Ok(submissions)
    }

    #[tracing::instrument(skip(self))]
    async fn count(&self) -> RepositoryResult<u64> {
        self.collection.count_documents(None, None).await.map_err(|e| {
            error!("Failed to count quote submissions: {}", e);
            RepositoryError::database(format!("Failed to count quote submissions: {}", e))
        })
    }
}
