pub mod cluster;
pub mod error;
pub mod filter;
pub mod location;
