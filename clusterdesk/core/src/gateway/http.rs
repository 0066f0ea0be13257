use async_trait::async_trait;
use clusterdesk_proto::prelude::*;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{ClusterGateway, Endpoint};
use crate::config::{ClientConfig, CONFIG};
use crate::error::{GatewayError, Result};

/// Gateway backed by the cluster REST API.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpGateway {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(config.timeout);
        let client = builder.build()?;
        Ok(Self { client, config })
    }

    /// Gateway configured from the `CLUSTERDESK_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(CONFIG.clone())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send one request and return the body of a 2xx response.
    async fn send(
        &self,
        endpoint: Endpoint,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<String> {
        let url = self.config.url(&endpoint.path());
        let mut request = self.client.request(endpoint.method(), &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(GatewayError::from_response(status.as_u16(), &text));
        }
        Ok(text)
    }

    /// GET with bounded retries on transport and 5xx failures.
    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        query: &[(&str, String)],
    ) -> Result<T> {
        let attempts = if endpoint.is_retry_safe() {
            self.config.get_retries.saturating_add(1)
        } else {
            1
        };
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.send(endpoint, query, None).await {
                Ok(text) => return Self::parse_json(&text),
                Err(err) if err.is_retryable() && attempt < attempts => {
                    log::warn!(
                        "GET {} failed (attempt {attempt}/{attempts}), retrying: {err}",
                        endpoint.path()
                    );
                }
                Err(err) => {
                    log::warn!("GET {} failed: {err}", endpoint.path());
                    return Err(err);
                }
            }
        }
    }

    /// Send a mutation exactly once.
    async fn mutate(&self, endpoint: Endpoint, body: Option<Value>) -> Result<String> {
        match self.send(endpoint, &[], body).await {
            Ok(text) => {
                log::info!("{} {} succeeded", endpoint.method(), endpoint.path());
                Ok(text)
            }
            Err(err) => {
                log::warn!("{} {} failed: {err}", endpoint.method(), endpoint.path());
                Err(err)
            }
        }
    }

    fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T> {
        serde_json::from_str(text).map_err(|e| GatewayError::Json(e.to_string()))
    }

    fn parse_cluster(text: &str) -> Result<Cluster> {
        Self::parse_json::<ClusterEnvelope>(text).map(ClusterEnvelope::into_inner)
    }
}

#[async_trait(?Send)]
impl ClusterGateway for HttpGateway {
    async fn list_countries(&self) -> Result<Vec<LocationNode>> {
        let resp: CountriesResponse = self.fetch(Endpoint::Countries, &[]).await?;
        Ok(resp.countries)
    }

    async fn list_states(&self, country_id: LocationId) -> Result<Vec<LocationNode>> {
        let resp: StatesResponse = self.fetch(Endpoint::States(country_id), &[]).await?;
        Ok(resp.states)
    }

    async fn list_cities(&self, state_id: LocationId) -> Result<Vec<LocationNode>> {
        let resp: CitiesResponse = self.fetch(Endpoint::Cities(state_id), &[]).await?;
        Ok(resp.cities)
    }

    async fn list_clusters(&self, page: u64, filters: &FilterCriteria) -> Result<ClusterPage> {
        self.fetch(Endpoint::ListClusters, &filters.query_pairs(page)).await
    }

    async fn show_cluster(&self, id: ClusterId) -> Result<Cluster> {
        let env: ClusterEnvelope = self.fetch(Endpoint::ShowCluster(id), &[]).await?;
        Ok(env.into_inner())
    }

    async fn create_cluster(&self, draft: &ClusterDraft) -> Result<Cluster> {
        let body = serde_json::to_value(draft)?;
        let text = self.mutate(Endpoint::CreateCluster, Some(body)).await?;
        Self::parse_cluster(&text)
    }

    async fn update_cluster(&self, id: ClusterId, patch: &ClusterPatch) -> Result<Cluster> {
        let body = serde_json::to_value(patch)?;
        let text = self.mutate(Endpoint::UpdateCluster(id), Some(body)).await?;
        Self::parse_cluster(&text)
    }

    async fn soft_delete_cluster(&self, id: ClusterId) -> Result<()> {
        self.mutate(Endpoint::SoftDeleteCluster(id), None).await?;
        Ok(())
    }

    async fn restore_cluster(&self, id: ClusterId) -> Result<()> {
        self.mutate(Endpoint::RestoreCluster(id), None).await?;
        Ok(())
    }
}
