pub mod de;
pub mod dto;

pub mod prelude {
    // --- Location hierarchy ---
    pub use crate::dto::location::{
        CitiesResponse, CountriesResponse, LocationId, LocationNode, StatesResponse,
    };

    // --- Clusters ---
    pub use crate::dto::cluster::{
        total_pages, Cluster, ClusterDraft, ClusterEnvelope, ClusterId, ClusterPage, ClusterPatch,
        DEFAULT_COORDINATE, PAGE_SIZE,
    };

    // --- Filtering ---
    pub use crate::dto::filter::{FilterCriteria, FilterPatch};

    // --- Error bodies ---
    pub use crate::dto::error::{ErrorBody, FieldMessages};
}
