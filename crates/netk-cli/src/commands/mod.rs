//! Command implementations.

pub mod analyze;
pub mod config;
pub mod distances;
pub mod length;
pub mod sample;

pub use self::analyze::execute_analyze;
pub use self::config::execute_config;
pub use self::distances::execute_distances;
pub use self::length::execute_length;
pub use self::sample::execute_sample;

use crate::error::Result;
use netk_network::RoadNetwork;
use std::path::Path;

/// Load a network file.
fn load_network(path: &Path) -> Result<RoadNetwork> {
    let network = RoadNetwork::from_file(path)?;
    tracing::info!(
        "Loaded network {}: {} nodes, {} edges",
        path.display(),
        network.node_count(),
        network.edge_count()
    );
    Ok(network)
}
