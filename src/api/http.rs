use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;

use super::retry::RetryPolicy;
use super::Backend;
use crate::config::Config;
use crate::error::AppError;
use crate::model::{
    AnalyticsSummary, Email, EmailId, EmailUpdate, KnowledgeItem, NewKnowledgeItem,
    StatusResponse,
};

const KNOWLEDGE_PAGE: u32 = 100;

/// JSON-over-HTTP client for the triage backend.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base: Url,
    retry: RetryPolicy,
}

impl HttpBackend {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;
        Ok(Self {
            client,
            base: config.api_base.clone(),
            retry: RetryPolicy::default(),
        })
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn url(&self, path: &str) -> Result<Url, AppError> {
        Ok(self.base.join(path)?)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let url = self.url(path)?;
        let (url, client) = (&url, &self.client);
        self.retry
            .run(path, move || async move {
                execute(client.get(url.clone()).query(query)).await
            })
            .await
    }
}

async fn execute<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, AppError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::from_status(status.as_u16(), &body));
    }
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| AppError::Decode(e.to_string()))
}

#[async_trait]
impl Backend for HttpBackend {
    async fn list_emails(&self, limit: u32) -> Result<Vec<Email>, AppError> {
        let emails: Vec<Email> = self
            .get_json("emails/", &[("skip", "0".into()), ("limit", limit.to_string())])
            .await?;
        debug!("Listed {} emails", emails.len());
        Ok(emails)
    }

    async fn update_email(&self, id: EmailId, update: EmailUpdate) -> Result<Email, AppError> {
        let url = self.url(&format!("emails/{id}"))?;
        info!("Saving response for email {}", id);
        execute(self.client.put(url).json(&update)).await
    }

    async fn dispatch_response(&self, id: EmailId) -> Result<StatusResponse, AppError> {
        let url = self.url(&format!("emails/{id}/send-response"))?;
        info!("Dispatching response for email {}", id);
        execute(self.client.post(url)).await
    }

    async fn analytics(&self) -> Result<Option<AnalyticsSummary>, AppError> {
        self.get_json("analytics/", &[]).await
    }

    async fn list_knowledge(&self) -> Result<Vec<KnowledgeItem>, AppError> {
        self.get_json(
            "knowledge-base/",
            &[("skip", "0".into()), ("limit", KNOWLEDGE_PAGE.to_string())],
        )
        .await
    }

    async fn create_knowledge(&self, item: NewKnowledgeItem) -> Result<KnowledgeItem, AppError> {
        let url = self.url("knowledge-base/")?;
        info!("Creating knowledge base item '{}'", item.title);
        execute(self.client.post(url).json(&item)).await
    }

    async fn fetch_and_process(&self) -> Result<StatusResponse, AppError> {
        let url = self.url("fetch-emails/")?;
        info!("Triggering fetch and process");
        execute(self.client.post(url)).await
    }
}
