pub mod cascade;
pub mod config;
pub mod error;
pub mod form;
pub mod gateway;
pub mod list;

pub use cascade::{Applied, FetchTicket, ListKind, LocationCascade, LocationOptions, Slot};
pub use config::ClientConfig;
pub use error::{CascadeError, ErrorKind, FormError, FormField, GatewayError, ListError, Result};
pub use form::{ClusterForm, SubmitOutcome};
pub use gateway::cache::{CacheKey, CachedGateway};
pub use gateway::http::HttpGateway;
pub use gateway::{ClusterGateway, Endpoint};
pub use list::{ClusterList, EditSession, Mutation, MutationTicket, PageRequest};
