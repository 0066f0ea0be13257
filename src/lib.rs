//! Cluster administration client.
//!
//! Re-exports the gateway and controllers from `clusterdesk-core` and the wire
//! types from `clusterdesk-proto`, plus the process-level setup native
//! callers need.

use anyhow::{Context, Result};

pub use clusterdesk_core::*;
pub use clusterdesk_proto::prelude as proto;

pub const ENV_CLUSTERDESK_LOGLEVEL: &str = "CLUSTERDESK_LOGLEVEL";

/// Initialise `env_logger` from `CLUSTERDESK_LOGLEVEL`. Safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::try_init_from_env(
        env_logger::Env::new().filter(ENV_CLUSTERDESK_LOGLEVEL),
    );
}

/// Set up logging and build the cached HTTP gateway from the `CLUSTERDESK_*`
/// environment variables.
pub fn connect() -> Result<CachedGateway<HttpGateway>> {
    init_logging();
    let gateway = HttpGateway::from_env().context("failed to build HTTP client")?;
    log::info!("using cluster API at {}", gateway.config().api_base);
    Ok(CachedGateway::new(gateway))
}
