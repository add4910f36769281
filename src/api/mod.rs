pub mod http;
pub mod retry;

use async_trait::async_trait;

use crate::error::AppError;
use crate::model::{
    AnalyticsSummary, Email, EmailId, EmailUpdate, KnowledgeItem, NewKnowledgeItem,
    StatusResponse,
};

/// The triage backend as seen by the dashboard.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Backend: Send + Sync {
    async fn list_emails(&self, limit: u32) -> Result<Vec<Email>, AppError>;

    async fn update_email(&self, id: EmailId, update: EmailUpdate) -> Result<Email, AppError>;

    /// Sends the stored reply for `id` to the original sender.
    async fn dispatch_response(&self, id: EmailId) -> Result<StatusResponse, AppError>;

    /// `None` when the backend has no summary to offer.
    async fn analytics(&self) -> Result<Option<AnalyticsSummary>, AppError>;

    async fn list_knowledge(&self) -> Result<Vec<KnowledgeItem>, AppError>;

    async fn create_knowledge(&self, item: NewKnowledgeItem) -> Result<KnowledgeItem, AppError>;

    /// Asks the backend to pull and classify new mail. The caller must list
    /// emails again afterwards.
    async fn fetch_and_process(&self) -> Result<StatusResponse, AppError>;
}
