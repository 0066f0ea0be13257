//! Remote data gateway: one async operation per backend resource.
//!
//! [`HttpGateway`](http::HttpGateway) talks to the REST backend and
//! [`CachedGateway`](cache::CachedGateway) memoises location lists in front
//! of any other gateway.

pub mod cache;
pub mod http;

use async_trait::async_trait;
use clusterdesk_proto::prelude::*;
use reqwest::Method;

use crate::error::{GatewayError, Result};
use cache::CacheKey;

#[async_trait(?Send)]
pub trait ClusterGateway {
    async fn list_countries(&self) -> Result<Vec<LocationNode>>;

    async fn list_states(&self, country_id: LocationId) -> Result<Vec<LocationNode>>;

    async fn list_cities(&self, state_id: LocationId) -> Result<Vec<LocationNode>>;

    async fn list_clusters(&self, page: u64, filters: &FilterCriteria) -> Result<ClusterPage>;

    async fn show_cluster(&self, id: ClusterId) -> Result<Cluster>;

    async fn create_cluster(&self, draft: &ClusterDraft) -> Result<Cluster>;

    async fn update_cluster(&self, id: ClusterId, patch: &ClusterPatch) -> Result<Cluster>;

    /// Marks `deleted_at`; the record stays listed.
    async fn soft_delete_cluster(&self, id: ClusterId) -> Result<()>;

    /// Clears `deleted_at`.
    async fn restore_cluster(&self, id: ClusterId) -> Result<()>;

    /// States of an optional country; fails fast without a request when unset.
    async fn list_states_for(&self, country_id: Option<LocationId>) -> Result<Vec<LocationNode>> {
        match country_id {
            Some(id) => self.list_states(id).await,
            None => Err(GatewayError::MissingParent("country")),
        }
    }

    /// Forget cached location lists. Gateways without a cache ignore this.
    fn invalidate_locations(&self, _keys: &[CacheKey]) {}

    /// Cities of an optional state; fails fast without a request when unset.
    async fn list_cities_for(&self, state_id: Option<LocationId>) -> Result<Vec<LocationNode>> {
        match state_id {
            Some(id) => self.list_cities(id).await,
            None => Err(GatewayError::MissingParent("state")),
        }
    }
}

/// Method and path of every backend operation, kept in one table so a
/// deployment that expects different verbs only changes this match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Countries,
    States(LocationId),
    Cities(LocationId),
    ListClusters,
    ShowCluster(ClusterId),
    CreateCluster,
    UpdateCluster(ClusterId),
    SoftDeleteCluster(ClusterId),
    RestoreCluster(ClusterId),
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::Countries
            | Endpoint::States(_)
            | Endpoint::Cities(_)
            | Endpoint::ListClusters
            | Endpoint::ShowCluster(_) => Method::GET,
            Endpoint::CreateCluster | Endpoint::RestoreCluster(_) => Method::POST,
            Endpoint::UpdateCluster(_) => Method::PUT,
            Endpoint::SoftDeleteCluster(_) => Method::DELETE,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Endpoint::Countries => "/countries".to_string(),
            Endpoint::States(country) => format!("/states/{country}"),
            Endpoint::Cities(state) => format!("/cities/{state}"),
            Endpoint::ListClusters => "/clusters/list".to_string(),
            Endpoint::ShowCluster(id) => format!("/clusters/show/{id}"),
            Endpoint::CreateCluster => "/clusters/create".to_string(),
            Endpoint::UpdateCluster(id) => format!("/clusters/update/{id}"),
            Endpoint::SoftDeleteCluster(id) => format!("/clusters/soft-delete/{id}"),
            Endpoint::RestoreCluster(id) => format!("/clusters/restore/{id}"),
        }
    }

    /// Safe to retry: reads only. Mutations are never resent.
    pub fn is_retry_safe(&self) -> bool {
        self.method() == Method::GET
    }
}
