//! HTTP access to the promotions service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Promotion, PromotionId},
    error::ApiError,
    protocol::{HealthStatus, PromotionPayload, SearchQuery},
};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::ServiceError;

pub const DEFAULT_RESOURCE_PATH: &str = "/promotions";
const JSON_CONTENT_TYPE: &str = "application/json";

#[async_trait]
pub trait PromotionService: Send + Sync {
    async fn create(&self, payload: &PromotionPayload) -> Result<Promotion, ServiceError>;
    async fn update(
        &self,
        id: &PromotionId,
        payload: &PromotionPayload,
    ) -> Result<Promotion, ServiceError>;
    async fn retrieve(&self, id: &PromotionId) -> Result<Promotion, ServiceError>;
    async fn delete(&self, id: &PromotionId) -> Result<(), ServiceError>;
    async fn search(&self, query: SearchQuery) -> Result<Vec<Promotion>, ServiceError>;
    async fn set_active(&self, id: &PromotionId, active: bool) -> Result<Promotion, ServiceError>;
    async fn health(&self) -> Result<HealthStatus, ServiceError>;
}

#[derive(Debug, Clone)]
pub struct ServiceOptions {
    pub server_url: String,
    pub resource_path: String,
    pub request_timeout: Option<Duration>,
}

impl ServiceOptions {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            resource_path: DEFAULT_RESOURCE_PATH.to_string(),
            request_timeout: None,
        }
    }
}

#[derive(Debug)]
pub struct HttpPromotionService {
    http: Client,
    server_url: String,
    collection_url: String,
}

impl HttpPromotionService {
    pub fn new(options: ServiceOptions) -> Result<Self, ServiceError> {
        let base = Url::parse(&options.server_url).map_err(|source| ServiceError::InvalidUrl {
            url: options.server_url.clone(),
            source,
        })?;
        let server_url = base.as_str().trim_end_matches('/').to_string();
        let resource_path = options.resource_path.trim_matches('/');
        let collection_url = format!("{server_url}/{resource_path}");

        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            server_url,
            collection_url,
        })
    }

    pub fn collection_url(&self) -> &str {
        &self.collection_url
    }

    fn item_url(&self, id: &PromotionId) -> String {
        format!("{}/{}", self.collection_url, id)
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        debug!(%method, %url, "promotions request");
        self.http
            .request(method, url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
    let response = check_status(response).await?;
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

async fn check_status(response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    let body = response.bytes().await?;
    let message = serde_json::from_slice::<ApiError>(&body)
        .ok()
        .map(|err| err.message);
    warn!(%status, %url, ?message, "promotions service reported a failure");
    Err(ServiceError::Server { status, message })
}

#[async_trait]
impl PromotionService for HttpPromotionService {
    async fn create(&self, payload: &PromotionPayload) -> Result<Promotion, ServiceError> {
        let response = self
            .request(Method::POST, self.collection_url.clone())
            .json(payload)
            .send()
            .await?;
        let created: Promotion = decode(response).await?;
        info!(id = ?created.id, name = %created.name, "promotion created");
        Ok(created)
    }

    async fn update(
        &self,
        id: &PromotionId,
        payload: &PromotionPayload,
    ) -> Result<Promotion, ServiceError> {
        let response = self
            .request(Method::PUT, self.item_url(id))
            .json(payload)
            .send()
            .await?;
        let updated: Promotion = decode(response).await?;
        info!(%id, "promotion updated");
        Ok(updated)
    }

    async fn retrieve(&self, id: &PromotionId) -> Result<Promotion, ServiceError> {
        let response = self.request(Method::GET, self.item_url(id)).send().await?;
        decode(response).await
    }

    async fn delete(&self, id: &PromotionId) -> Result<(), ServiceError> {
        let response = self
            .request(Method::DELETE, self.item_url(id))
            .send()
            .await?;
        check_status(response).await?;
        info!(%id, "promotion deleted");
        Ok(())
    }

    async fn search(&self, query: SearchQuery) -> Result<Vec<Promotion>, ServiceError> {
        let url = format!("{}?{}", self.collection_url, query.to_query_string());
        let response = self.request(Method::GET, url).send().await?;
        let listing: Vec<Promotion> = decode(response).await?;
        info!(
            active_only = query.active_only,
            count = listing.len(),
            "promotion search complete"
        );
        Ok(listing)
    }

    async fn set_active(&self, id: &PromotionId, active: bool) -> Result<Promotion, ServiceError> {
        let method = if active { Method::PUT } else { Method::DELETE };
        let url = format!("{}/activate", self.item_url(id));
        let response = self.request(method, url).send().await?;
        let toggled: Promotion = decode(response).await?;
        info!(%id, active, "promotion activation changed");
        Ok(toggled)
    }

    async fn health(&self) -> Result<HealthStatus, ServiceError> {
        let url = format!("{}/health", self.server_url);
        let response = self.request(Method::GET, url).send().await?;
        decode(response).await
    }
}

#[cfg(test)]
#[path = "tests/service_tests.rs"]
mod tests;
