use serde::{Deserialize, Serialize};

use crate::dto::cluster::Cluster;

/// List filters. Empty fields do not constrain.
///
/// `cluster_name` is a case-insensitive substring match; the location names
/// must match exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub cluster_name: String,
    #[serde(default)]
    pub country_name: String,
    #[serde(default)]
    pub state_name: String,
    #[serde(default)]
    pub city_name: String,
}

/// A partial edit of [`FilterCriteria`]; `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub cluster_name: Option<String>,
    pub country_name: Option<String>,
    pub state_name: Option<String>,
    pub city_name: Option<String>,
}

impl FilterPatch {
    pub fn cluster_name(mut self, v: impl Into<String>) -> Self {
        self.cluster_name = Some(v.into());
        self
    }

    pub fn country_name(mut self, v: impl Into<String>) -> Self {
        self.country_name = Some(v.into());
        self
    }

    pub fn state_name(mut self, v: impl Into<String>) -> Self {
        self.state_name = Some(v.into());
        self
    }

    pub fn city_name(mut self, v: impl Into<String>) -> Self {
        self.city_name = Some(v.into());
        self
    }
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.cluster_name.is_empty()
            && self.country_name.is_empty()
            && self.state_name.is_empty()
            && self.city_name.is_empty()
    }

    pub fn merge(&mut self, patch: FilterPatch) {
        if let Some(v) = patch.cluster_name {
            self.cluster_name = v;
        }
        if let Some(v) = patch.country_name {
            self.country_name = v;
        }
        if let Some(v) = patch.state_name {
            self.state_name = v;
        }
        if let Some(v) = patch.city_name {
            self.city_name = v;
        }
    }

    pub fn matches(&self, cluster: &Cluster) -> bool {
        if !self.country_name.is_empty() && cluster.country_name != self.country_name {
            return false;
        }
        if !self.cluster_name.is_empty()
            && !cluster
                .name
                .to_lowercase()
                .contains(&self.cluster_name.to_lowercase())
        {
            return false;
        }
        if !self.state_name.is_empty() && cluster.state_name != self.state_name {
            return false;
        }
        if !self.city_name.is_empty() && cluster.city_name != self.city_name {
            return false;
        }
        true
    }

    /// Keep only the rows that match, preserving order.
    pub fn apply(&self, clusters: &[Cluster]) -> Vec<Cluster> {
        clusters
            .iter()
            .filter(|c| self.matches(c))
            .cloned()
            .collect()
    }

    /// Query string pairs for `GET /clusters/list`.
    pub fn query_pairs(&self, page: u64) -> Vec<(&'static str, String)> {
        vec![
            ("page", page.to_string()),
            ("cluster_name", self.cluster_name.clone()),
            ("country_name", self.country_name.clone()),
            ("state_name", self.state_name.clone()),
            ("city_name", self.city_name.clone()),
        ]
    }
}
