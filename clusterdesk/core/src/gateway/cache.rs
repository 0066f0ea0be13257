use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use clusterdesk_proto::prelude::*;

use super::ClusterGateway;
use crate::error::Result;

/// Parameter key of a cached location list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Countries,
    States(LocationId),
    Cities(LocationId),
}

type Store = Arc<RwLock<HashMap<CacheKey, Vec<LocationNode>>>>;

/// Memoises location lists per [`CacheKey`] in front of another gateway.
///
/// Clones share one store, so every view of the app sees the same cache.
/// Cluster reads and all mutations pass straight through: cluster pages must
/// always reflect server state after a change. Failed fetches are not stored.
/// Entries are evicted through [`ClusterGateway::invalidate_locations`] once
/// their parent is deselected, so the store only holds the lists in use.
#[derive(Debug, Clone)]
pub struct CachedGateway<G> {
    inner: G,
    store: Store,
}

impl<G> CachedGateway<G> {
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            store: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }

    pub fn get(&self, key: &CacheKey) -> Option<Vec<LocationNode>> {
        self.store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn is_cached(&self, key: &CacheKey) -> bool {
        self.store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    /// Drop one entry. Returns whether it was present.
    pub fn invalidate(&self, key: &CacheKey) -> bool {
        self.store
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .is_some()
    }

    pub fn clear(&self) {
        self.store
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    async fn through<F>(&self, key: CacheKey, fetch: F) -> Result<Vec<LocationNode>>
    where
        F: Future<Output = Result<Vec<LocationNode>>>,
    {
        if let Some(hit) = self.get(&key) {
            log::debug!("cache hit for {key:?}");
            return Ok(hit);
        }
        let nodes = fetch.await?;
        self.store
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, nodes.clone());
        Ok(nodes)
    }
}

#[async_trait(?Send)]
impl<G: ClusterGateway> ClusterGateway for CachedGateway<G> {
    async fn list_countries(&self) -> Result<Vec<LocationNode>> {
        self.through(CacheKey::Countries, self.inner.list_countries())
            .await
    }

    async fn list_states(&self, country_id: LocationId) -> Result<Vec<LocationNode>> {
        self.through(
            CacheKey::States(country_id),
            self.inner.list_states(country_id),
        )
        .await
    }

    async fn list_cities(&self, state_id: LocationId) -> Result<Vec<LocationNode>> {
        self.through(CacheKey::Cities(state_id), self.inner.list_cities(state_id))
            .await
    }

    async fn list_clusters(&self, page: u64, filters: &FilterCriteria) -> Result<ClusterPage> {
        self.inner.list_clusters(page, filters).await
    }

    fn invalidate_locations(&self, keys: &[CacheKey]) {
        for key in keys {
            if self.invalidate(key) {
                log::debug!("evicted {key:?}");
            }
        }
        self.inner.invalidate_locations(keys);
    }

    async fn show_cluster(&self, id: ClusterId) -> Result<Cluster> {
        self.inner.show_cluster(id).await
    }

    async fn create_cluster(&self, draft: &ClusterDraft) -> Result<Cluster> {
        self.inner.create_cluster(draft).await
    }

    async fn update_cluster(&self, id: ClusterId, patch: &ClusterPatch) -> Result<Cluster> {
        self.inner.update_cluster(id, patch).await
    }

    async fn soft_delete_cluster(&self, id: ClusterId) -> Result<()> {
        self.inner.soft_delete_cluster(id).await
    }

    async fn restore_cluster(&self, id: ClusterId) -> Result<()> {
        self.inner.restore_cluster(id).await
    }
}
