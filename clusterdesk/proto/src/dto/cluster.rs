use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::de::{int_or_string, null_as_empty, opt_int_or_string, text_or_number};
use crate::dto::location::LocationId;

pub type ClusterId = i64;

/// Rows per page served by `GET /clusters/list`.
pub const PAGE_SIZE: u64 = 10;

/// Coordinate sent for every new cluster until device geolocation exists.
pub const DEFAULT_COORDINATE: &str = "0";

/// Number of pages needed to show `total` rows, `page_size` at a time.
pub fn total_pages(total: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// A geo-tagged cluster record. `deleted_at` set means soft-deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    #[serde(deserialize_with = "int_or_string")]
    pub id: ClusterId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "opt_int_or_string")]
    pub country_id: Option<LocationId>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub country_name: String,
    #[serde(default, deserialize_with = "opt_int_or_string")]
    pub state_id: Option<LocationId>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub state_name: String,
    #[serde(default, deserialize_with = "opt_int_or_string")]
    pub city_id: Option<LocationId>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub city_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub location: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub latitude: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub longitude: String,
    #[serde(default)]
    pub deleted_at: Option<String>,
}

impl Cluster {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Text for the status column: the deletion timestamp, or `"active"`.
    pub fn status_label(&self) -> String {
        match &self.deleted_at {
            Some(ts) => ts.clone(),
            None => "active".to_string(),
        }
    }

    /// Parse `deleted_at` as RFC 3339 or the `YYYY-MM-DD HH:MM:SS` form
    /// used by SQL backends.
    pub fn deleted_at_utc(&self) -> Option<DateTime<Utc>> {
        let raw = self.deleted_at.as_deref()?;
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

/// Body of `POST /clusters/create`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterDraft {
    pub name: String,
    pub email: String,
    pub country_id: LocationId,
    pub state_id: LocationId,
    pub city_id: LocationId,
    pub location: String,
    pub latitude: String,
    pub longitude: String,
}

/// Partial update sent to `/clusters/update/{id}`. Absent fields are left
/// untouched by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_id: Option<LocationId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_id: Option<LocationId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_id: Option<LocationId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<String>,
}

impl ClusterPatch {
    pub fn is_empty(&self) -> bool {
        *self == ClusterPatch::default()
    }
}

/// Pre-fill an edit dialog with a cluster's current editable values.
impl From<&Cluster> for ClusterPatch {
    fn from(c: &Cluster) -> Self {
        Self {
            name: Some(c.name.clone()),
            email: Some(c.email.clone()),
            country_id: c.country_id,
            country_name: Some(c.country_name.clone()),
            state_id: c.state_id,
            state_name: Some(c.state_name.clone()),
            city_id: c.city_id,
            city_name: Some(c.city_name.clone()),
            location: Some(c.location.clone()),
            latitude: None,
            longitude: None,
        }
    }
}

/// A single cluster in a response body. Backends answer either with the bare
/// record or wrap it under `data` or `cluster`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ClusterEnvelope {
    Bare(Cluster),
    Data { data: Cluster },
    Named { cluster: Cluster },
}

impl ClusterEnvelope {
    pub fn into_inner(self) -> Cluster {
        match self {
            ClusterEnvelope::Bare(c) => c,
            ClusterEnvelope::Data { data } => data,
            ClusterEnvelope::Named { cluster } => cluster,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PageMeta {
    #[serde(default)]
    total: Option<u64>,
}

/// Wire shape of `GET /clusters/list`; some deployments report the total at
/// the top level, others under `meta`.
#[derive(Debug, Clone, Default, Deserialize)]
struct ClusterListResponse {
    #[serde(default)]
    data: Vec<Cluster>,
    #[serde(default)]
    total: Option<u64>,
    #[serde(default)]
    meta: Option<PageMeta>,
}

/// One page of clusters plus the server-reported total row count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "ClusterListResponse")]
pub struct ClusterPage {
    pub data: Vec<Cluster>,
    pub total: u64,
}

impl From<ClusterListResponse> for ClusterPage {
    fn from(raw: ClusterListResponse) -> Self {
        let total = raw
            .total
            .or_else(|| raw.meta.and_then(|m| m.total))
            .unwrap_or(raw.data.len() as u64);
        Self {
            data: raw.data,
            total,
        }
    }
}

impl ClusterPage {
    pub fn total_pages(&self) -> u64 {
        total_pages(self.total, PAGE_SIZE)
    }
}
