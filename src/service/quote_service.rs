use async_trait::async_trait;
use bson::oid::ObjectId;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::config::QuoteConfig;
use crate::dto::quote_dto::{QuoteDetailView, QuoteListResponse, QuoteSummary};
use crate::model::quote::QuoteSubmission;
use crate::quote::submission::{QuoteSubmitter, SubmissionOutcome};
use crate::quote::validation::validate_submission;
use crate::quote::wizard::DEFAULT_FAILURE_MESSAGE;
use crate::repository::quote_repo::QuoteRepository;
use crate::util::error::ServiceError;

#[async_trait]
pub trait QuoteService: Send + Sync {
    /// Validates and stores a finished quote.
    async fn submit_quote(&self, submission: QuoteSubmission) -> Result<QuoteSubmission, ServiceError>;
    async fn list_quotes(&self, page: u32, limit: u32) -> Result<QuoteListResponse, ServiceError>;
    async fn get_quote(&self, id: ObjectId) -> Result<QuoteDetailView, ServiceError>;
    fn confirmation_path(&self) -> &str;
}

pub struct QuoteServiceImpl {
    pub quote_repo: Arc<dyn QuoteRepository>,
    pub config: QuoteConfig,
}

impl QuoteServiceImpl {
    pub fn new(quote_repo: Arc<dyn QuoteRepository>, config: QuoteConfig) -> Self {
        QuoteServiceImpl { quote_repo, config }
    }
}

#[async_trait]
impl QuoteService for QuoteServiceImpl {
    #[instrument(skip(self, submission), fields(service = %submission.service, mode = ?self.config.validation_mode))]
    async fn submit_quote(&self, submission: QuoteSubmission) -> Result<QuoteSubmission, ServiceError> {
        info!("Validating quote submission");
        let issues = validate_submission(&submission, self.config.validation_mode);
        if !issues.is_empty() {
            warn!(count = issues.len(), "Quote submission rejected");
            return Err(ServiceError::Validation { message: DEFAULT_FAILURE_MESSAGE.to_string(), issues });
        }

        let res = self.quote_repo.create(submission).await;
        match &res {
            Ok(stored) => info!(id = ?stored.id, "Quote submission stored"),
            Err(e) => error!("Failed to store quote submission: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self))]
    async fn list_quotes(&self, page: u32, limit: u32) -> Result<QuoteListResponse, ServiceError> {
        let items = self.quote_repo.list(page, limit).await.map_err(|e| {
            error!("Failed to list quotes: {e}");
            ServiceError::from(e)
        })?;
        let total = self.quote_repo.count().await.map_err(ServiceError::from)?;
        info!("Fetched {} of {} quotes", items.len(), total);
        Ok(QuoteListResponse { items: items.iter().map(QuoteSummary::from).collect(), total, page, limit })
    }

    #[instrument(skip(self, id), fields(id = %id))]
    async fn get_quote(&self, id: ObjectId) -> Result<QuoteDetailView, ServiceError> {
        match self.quote_repo.get_by_id(id).await {
            Ok(submission) => Ok(QuoteDetailView::from(&submission)),
            Err(e) => {
                error!("Failed to fetch quote: {e}");
                Err(ServiceError::from(e))
            }
        }
    }

    fn confirmation_path(&self) -> &str {
        &self.config.confirmation_path
    }
}

#[async_trait]
impl QuoteSubmitter for QuoteServiceImpl {
    async fn submit(&self, submission: QuoteSubmission) -> SubmissionOutcome {
        match self.submit_quote(submission).await {
            Ok(_) => SubmissionOutcome::accepted(self.config.confirmation_path.clone()),
            Err(ServiceError::Validation { message, issues }) => SubmissionOutcome::rejected(message, issues),
            Err(e) => {
                error!("Quote submission failed: {e}");
                SubmissionOutcome::failed("We could not save your request. Please try again.")
            }
        }
    }
}
