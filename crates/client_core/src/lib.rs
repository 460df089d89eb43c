use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::Client;
use tokio::runtime::Handle;
use tracing::{info, warn};
use url::Url;

pub mod carousel;
pub mod chat;
pub mod config;
pub mod error;
pub mod markdown;
pub mod resource;
pub mod view;

pub use carousel::{CarouselController, CarouselError};
pub use chat::{ChatPhase, ChatSession, ChatTransport, HttpChatTransport, SubmitRejected};
pub use config::{load_settings, Endpoints, Settings};
pub use error::{ChatError, ConfigError, FetchError};
pub use resource::{
    CertificatesResource, LoadTask, ProfileResource, ProjectsResource, RemoteResource, Resource,
    SkillsResource, TimelineResource,
};

/// HTTP access to the portfolio API.
///
/// Cheap to clone; clones share one connection pool and one cookie store, so
/// every request carries the same credentials.
#[derive(Clone)]
pub struct PortfolioClient {
    http: Client,
    endpoints: Arc<Endpoints>,
}

impl PortfolioClient {
    pub fn new(endpoints: Endpoints) -> Result<Self> {
        let http = Client::builder()
            .cookie_store(true)
            .build()
            .context("failed to build http client")?;
        Ok(Self::with_http(http, endpoints))
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let endpoints = settings
            .endpoints()
            .context("invalid endpoint configuration")?;
        Self::new(endpoints)
    }

    pub fn with_http(http: Client, endpoints: Endpoints) -> Self {
        Self {
            http,
            endpoints: Arc::new(endpoints),
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn chat_transport(&self) -> HttpChatTransport {
        HttpChatTransport::new(self.http.clone(), self.endpoints.chat.clone())
    }

    /// One GET against the resource's endpoint. Never retries.
    pub async fn load<R: Resource>(&self) -> RemoteResource<R::Output> {
        let url = R::endpoint(&self.endpoints);
        match self.fetch::<R>(url).await {
            Ok(value) => {
                info!(
                    resource = R::NAME,
                    items = R::item_count(&value),
                    "resource loaded"
                );
                RemoteResource::Loaded(value)
            }
            Err(err) => {
                if err.is_malformed() {
                    warn!(resource = R::NAME, endpoint = %url, "malformed resource response: {err}");
                } else {
                    warn!(resource = R::NAME, endpoint = %url, "resource load failed: {err}");
                }
                RemoteResource::Errored(err)
            }
        }
    }

    pub fn spawn_load<R: Resource>(&self, runtime: &Handle) -> LoadTask<R::Output> {
        let client = self.clone();
        LoadTask::spawn(runtime, async move { client.load::<R>().await })
    }

    async fn fetch<R: Resource>(&self, url: &Url) -> Result<R::Output, FetchError> {
        let res = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(FetchError::transport)?;
        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }
        let body = res.bytes().await.map_err(FetchError::transport)?;
        let envelope: R::Envelope = serde_json::from_slice(&body)?;
        Ok(R::extract(envelope)?)
    }

    /// Raw bytes of an image reference (avatar, banner, certificate).
    pub async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let url = Url::parse(url).map_err(|err| FetchError::Malformed(err.to_string()))?;
        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(FetchError::transport)?;
        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }
        let bytes = res.bytes().await.map_err(FetchError::transport)?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "tests/chat_tests.rs"]
mod chat_tests;
