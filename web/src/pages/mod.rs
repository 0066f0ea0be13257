pub mod clusters;
pub mod new_cluster;
