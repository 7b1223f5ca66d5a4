//! Topology persistence.
//!
//! # Format
//!
//! ```json
//! {
//!   "nodes": [ { "id": 1, "position": { "x": 0.0, "y": 0.0 }, "name": "", "kind": "", "metadata": {} } ],
//!   "edges": [ { "id": 10, "from": 1, "to": 2, "distance": 5.0, "directed": false, "risk": 0.1 } ],
//!   "penalty_factor": 50.0
//! }
//! ```
//!
//! Each edge carries its last resolved risk; cost is not stored and is
//! rederived on import, so an exported network reimports with identical
//! costs.  Floats round-trip exactly (`serde_json` `float_roundtrip`).

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::model::{Edge, Node};
use crate::network::check_penalty;
use crate::{NetworkResult, WeightedRoadNetwork};

/// Complete, self-contained copy of a network's topology and risk state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub nodes:          Vec<Node>,
    pub edges:          Vec<Edge>,
    pub penalty_factor: f64,
}

impl NetworkSnapshot {
    pub fn to_json(&self) -> NetworkResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> NetworkResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save_json(&self, path: &Path) -> NetworkResult<()> {
        let mut out = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut out, self)?;
        out.flush()?;
        Ok(())
    }

    pub fn load_json(path: &Path) -> NetworkResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

impl WeightedRoadNetwork {
    /// Capture nodes, edges (with their current risk), and the penalty
    /// factor, in ascending id order.
    pub fn export_snapshot(&self) -> NetworkSnapshot {
        NetworkSnapshot {
            nodes:          self.nodes().cloned().collect(),
            edges:          self.edges().cloned().collect(),
            penalty_factor: self.penalty_factor(),
        }
    }

    /// Build a fresh network from `snapshot`, running every add-time check.
    pub fn from_snapshot(snapshot: &NetworkSnapshot) -> NetworkResult<Self> {
        check_penalty(snapshot.penalty_factor)?;
        let mut network = WeightedRoadNetwork::new(snapshot.penalty_factor)?;
        for node in &snapshot.nodes {
            network.add_node(node.clone())?;
        }
        for edge in &snapshot.edges {
            network.add_edge(edge.clone())?;
        }
        debug!(
            "imported network snapshot: {} nodes, {} edges",
            network.node_count(),
            network.edge_count()
        );
        Ok(network)
    }

    /// Replace this network's entire contents with `snapshot`.
    ///
    /// The replacement is built on the side first; if the snapshot is
    /// rejected, `self` is unchanged.
    pub fn import_snapshot(&mut self, snapshot: &NetworkSnapshot) -> NetworkResult<()> {
        *self = Self::from_snapshot(snapshot)?;
        Ok(())
    }
}
