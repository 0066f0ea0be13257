use clusterdesk_core::{CachedGateway, ClientConfig, HttpGateway};

use crate::utils::error::{AppError, Result};

/// Gateway shared by every page through the Dioxus context.
pub type Gateway = CachedGateway<HttpGateway>;

const API_PATH: &str = "/api";

/// Origin of the page serving the frontend.
fn get_origin() -> Result<String> {
    web_sys::window()
        .ok_or_else(|| AppError::Browser("No window object".to_string()))?
        .location()
        .origin()
        .map_err(|_| AppError::Browser("Failed to get origin".to_string()))
}

/// API base baked in at build time, or `<origin>/api`.
fn api_base() -> Result<String> {
    match option_env!("CLUSTERDESK_API_BASE") {
        Some(base) => Ok(base.to_string()),
        None => Ok(format!("{}{}", get_origin()?, API_PATH)),
    }
}

pub fn build_gateway() -> Result<Gateway> {
    let config = ClientConfig::default().with_api_base(api_base()?);
    log::info!("cluster API at {}", config.api_base);
    Ok(CachedGateway::new(HttpGateway::new(config)?))
}
