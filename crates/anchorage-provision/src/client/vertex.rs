//! Vertex AI Vector Search control-plane client.
//!
//! Speaks the `v1` REST surface for indexes, index endpoints and
//! long-running operations. Every request carries the configured bearer
//! token and passes through a [`RateLimiter`]; non-success responses are
//! turned into [`ProvisionError::Http`] with the API's own message.
//!
//! [`RateLimiter`]: crate::resilience::RateLimiter

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use anchorage_core::model::{
    DeployIndexRequest, IndexEndpoint, IndexEndpointName, IndexName, NewIndex, NewIndexEndpoint,
    Operation, OperationName, VectorIndex,
};
use anchorage_core::DisplayNameFilter;

use crate::client::ControlPlane;
use crate::config::Config;
use crate::error::{ProvisionError, ProvisionResult};
use crate::resilience::RateLimiter;

const USER_AGENT: &str = concat!("anchorage/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// List response pages (private)
// ---------------------------------------------------------------------------

trait Page: DeserializeOwned {
    type Item;

    fn into_parts(self) -> (Vec<Self::Item>, Option<String>);
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListIndexesResponse {
    #[serde(default)]
    indexes: Vec<VectorIndex>,
    #[serde(default)]
    next_page_token: Option<String>,
}

impl Page for ListIndexesResponse {
    type Item = VectorIndex;

    fn into_parts(self) -> (Vec<VectorIndex>, Option<String>) {
        (self.indexes, self.next_page_token)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListIndexEndpointsResponse {
    #[serde(default)]
    index_endpoints: Vec<IndexEndpoint>,
    #[serde(default)]
    next_page_token: Option<String>,
}

impl Page for ListIndexEndpointsResponse {
    type Item = IndexEndpoint;

    fn into_parts(self) -> (Vec<IndexEndpoint>, Option<String>) {
        (self.index_endpoints, self.next_page_token)
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// REST client for one project and region of the control plane.
#[derive(Debug, Clone)]
pub struct VertexClient {
    http: Client,
    base_url: String,
    project: String,
    location: String,
    access_token: Option<String>,
    rate_limiter: RateLimiter,
}

impl VertexClient {
    /// Create a client for `project` in `location`, addressing `base_url`
    /// (for example `https://us-central1-aiplatform.googleapis.com`).
    ///
    /// # Errors
    /// Returns an error if the project or location is empty, or the HTTP
    /// client cannot be created.
    pub fn new(
        base_url: impl Into<String>,
        project: impl Into<String>,
        location: impl Into<String>,
    ) -> ProvisionResult<Self> {
        let project = project.into();
        let location = location.into();
        if project.trim().is_empty() {
            return Err(ProvisionError::Config("project is not set".to_string()));
        }
        if location.trim().is_empty() {
            return Err(ProvisionError::Config("location is not set".to_string()));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            project,
            location,
            access_token: None,
            rate_limiter: RateLimiter::new(5),
        })
    }

    /// Create a client from loaded configuration.
    pub fn from_config(config: &Config) -> ProvisionResult<Self> {
        let project = config.project.clone().ok_or_else(|| {
            ProvisionError::Config(
                "project is not set (use --project, ANCHORAGE_PROJECT or the config file)"
                    .to_string(),
            )
        })?;

        let mut client = Self::new(config.api_base_url(), project, config.location.clone())?
            .with_rate_limit(config.requests_per_second);
        if let Some(token) = &config.access_token {
            client = client.with_access_token(token.clone());
        }
        Ok(client)
    }

    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_rate_limit(mut self, requests_per_second: u32) -> Self {
        self.rate_limiter = RateLimiter::new(requests_per_second);
        self
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// `projects/{project}/locations/{location}`
    fn parent(&self) -> String {
        format!("projects/{}/locations/{}", self.project, self.location)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ProvisionResult<T> {
        self.rate_limiter.acquire().await;

        let response = self.authorize(request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ProvisionError::from_response(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| ProvisionError::Parse {
            message: e.to_string(),
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ProvisionResult<T> {
        log::debug!("GET {}", path);
        self.send(self.http.get(self.url(path))).await
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ProvisionResult<T> {
        log::debug!("POST {}", path);
        self.send(self.http.post(self.url(path)).json(body)).await
    }

    /// Fetch every page of a filtered list call, preserving listing order.
    async fn list_all<P: Page>(
        &self,
        collection: &str,
        filter: &DisplayNameFilter,
    ) -> ProvisionResult<Vec<P::Item>> {
        let url = self.url(&format!("{}/{}", self.parent(), collection));
        let filter = filter.to_string();
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.http.get(&url).query(&[("filter", filter.as_str())]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            log::debug!("GET {}/{} ({})", self.parent(), collection, filter);
            let page: P = self.send(request).await?;
            let (mut batch, next) = page.into_parts();
            items.append(&mut batch);

            match next {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(items)
    }
}

#[async_trait]
impl ControlPlane for VertexClient {
    async fn list_indexes(&self, filter: &DisplayNameFilter) -> ProvisionResult<Vec<VectorIndex>> {
        self.list_all::<ListIndexesResponse>("indexes", filter)
            .await
    }

    async fn get_index(&self, name: &IndexName) -> ProvisionResult<VectorIndex> {
        self.get(name.as_str()).await
    }

    async fn create_index(&self, index: &NewIndex) -> ProvisionResult<Operation> {
        self.post(&format!("{}/indexes", self.parent()), index)
            .await
    }

    async fn list_index_endpoints(
        &self,
        filter: &DisplayNameFilter,
    ) -> ProvisionResult<Vec<IndexEndpoint>> {
        self.list_all::<ListIndexEndpointsResponse>("indexEndpoints", filter)
            .await
    }

    async fn get_index_endpoint(&self, name: &IndexEndpointName) -> ProvisionResult<IndexEndpoint> {
        self.get(name.as_str()).await
    }

    async fn create_index_endpoint(
        &self,
        endpoint: &NewIndexEndpoint,
    ) -> ProvisionResult<Operation> {
        self.post(&format!("{}/indexEndpoints", self.parent()), endpoint)
            .await
    }

    async fn deploy_index(
        &self,
        endpoint: &IndexEndpointName,
        request: &DeployIndexRequest,
    ) -> ProvisionResult<Operation> {
        self.post(&format!("{endpoint}:deployIndex"), request)
            .await
    }

    async fn get_operation(&self, name: &OperationName) -> ProvisionResult<Operation> {
        self.get(name.as_str()).await
    }
}
