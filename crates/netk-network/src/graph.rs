//! Undirected road network graph

use crate::model::NetworkDefinition;
use crate::NetworkError;
use netk_domain::{NetworkLength, Point};
use std::collections::HashMap;

/// Default snap tolerance, in network units
pub const DEFAULT_SNAP_TOLERANCE: f64 = 25.0;

/// An undirected edge between two node indices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// Index of one end node
    pub from: usize,
    /// Index of the other end node
    pub to: usize,
    /// Travel length along the edge
    pub length: f64,
}

/// In-memory road network
///
/// Edges are straight segments between node coordinates; an edge's travel
/// length may differ from its drawn length, in which case positions along it
/// are scaled proportionally.
#[derive(Debug, Clone)]
pub struct RoadNetwork {
    pub(crate) nodes: Vec<Point>,
    pub(crate) node_ids: Vec<u64>,
    pub(crate) edges: Vec<Edge>,
    /// Per node: `(neighbor, edge length)`
    pub(crate) adjacency: Vec<Vec<(usize, f64)>>,
    pub(crate) snap_tolerance: f64,
    total_length: f64,
}

impl RoadNetwork {
    /// Build a network from a definition
    ///
    /// # Examples
    ///
    /// ```
    /// use netk_network::{NetworkDefinition, RoadNetwork};
    ///
    /// let def = NetworkDefinition::from_json_str(r#"{
    ///     "nodes": [{"id": 1, "x": 0.0, "y": 0.0}, {"id": 2, "x": 300.0, "y": 400.0}],
    ///     "edges": [{"from": 1, "to": 2}]
    /// }"#).unwrap();
    /// let network = RoadNetwork::from_definition(&def).unwrap();
    /// assert_eq!(network.total_length(), 500.0);
    /// ```
    pub fn from_definition(definition: &NetworkDefinition) -> Result<Self, NetworkError> {
        let mut index_of: HashMap<u64, usize> = HashMap::with_capacity(definition.nodes.len());
        let mut nodes = Vec::with_capacity(definition.nodes.len());
        let mut node_ids = Vec::with_capacity(definition.nodes.len());

        for node in &definition.nodes {
            if !node.x.is_finite() || !node.y.is_finite() {
                return Err(NetworkError::InvalidNetwork(format!(
                    "node {} has non-finite coordinates",
                    node.id
                )));
            }
            if index_of.insert(node.id, nodes.len()).is_some() {
                return Err(NetworkError::InvalidNetwork(format!(
                    "duplicate node id {}",
                    node.id
                )));
            }
            nodes.push(Point::new(node.x, node.y));
            node_ids.push(node.id);
        }

        let mut edges = Vec::with_capacity(definition.edges.len());
        let mut adjacency = vec![Vec::new(); nodes.len()];

        for record in &definition.edges {
            let lookup = |id: u64| {
                index_of.get(&id).copied().ok_or_else(|| {
                    NetworkError::InvalidNetwork(format!("edge references unknown node {}", id))
                })
            };
            let from = lookup(record.from)?;
            let to = lookup(record.to)?;
            if from == to {
                return Err(NetworkError::InvalidNetwork(format!(
                    "self-loop on node {}",
                    record.from
                )));
            }

            let length = record
                .length
                .unwrap_or_else(|| nodes[from].euclidean_distance(&nodes[to]));
            if !length.is_finite() || length <= 0.0 {
                return Err(NetworkError::InvalidNetwork(format!(
                    "edge {} -> {} has non-positive length {}",
                    record.from, record.to, length
                )));
            }

            adjacency[from].push((to, length));
            adjacency[to].push((from, length));
            edges.push(Edge { from, to, length });
        }

        let total_length = edges.iter().map(|e| e.length).sum();

        tracing::debug!(
            "Built road network: {} nodes, {} edges, total length {}",
            nodes.len(),
            edges.len(),
            total_length
        );

        Ok(Self {
            nodes,
            node_ids,
            edges,
            adjacency,
            snap_tolerance: DEFAULT_SNAP_TOLERANCE,
            total_length,
        })
    }

    /// Load and build a network from a JSON or TOML file
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, NetworkError> {
        Self::from_definition(&NetworkDefinition::from_file(path)?)
    }

    /// Use a different snap tolerance
    pub fn with_snap_tolerance(mut self, tolerance: f64) -> Result<Self, NetworkError> {
        crate::snap::check_tolerance(tolerance)?;
        self.snap_tolerance = tolerance;
        Ok(self)
    }

    /// Current snap tolerance
    pub fn snap_tolerance(&self) -> f64 {
        self.snap_tolerance
    }

    /// Sum of all edge lengths
    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    /// Total length as a domain value
    pub fn length(&self) -> Result<NetworkLength, NetworkError> {
        Ok(NetworkLength::new(self.total_length)?)
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges in definition order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Caller-assigned id of a node index
    pub fn node_id(&self, index: usize) -> Option<u64> {
        self.node_ids.get(index).copied()
    }
}
