use clusterdesk_core::GatewayError;
use thiserror::Error;

/// Failures while bringing the frontend up.
#[derive(Error, Debug, Clone)]
pub enum AppError {
    #[error("Browser error: {0}")]
    Browser(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

pub type Result<T> = std::result::Result<T, AppError>;
