//! Qubit connectivity.
//!
//! A [`CouplingMap`] is an undirected graph over physical qubits. Two-qubit
//! gates are only allowed between adjacent qubits; the map answers that
//! question and checks whole circuits against it.

use petgraph::algo::dijkstra;
use petgraph::graphmap::UnGraphMap;
use serde::{Deserialize, Serialize};

use qcloud_ir::Circuit;

use crate::error::{IbmError, IbmResult};

/// Undirected qubit connectivity graph.
#[derive(Debug, Clone, Default)]
pub struct CouplingMap {
    graph: UnGraphMap<u32, ()>,
}

impl CouplingMap {
    /// Build a map from qubit pairs. Reversed and repeated pairs collapse
    /// into one edge.
    pub fn from_edges(edges: impl IntoIterator<Item = (u32, u32)>) -> Self {
        let mut graph = UnGraphMap::new();
        for (a, b) in edges {
            graph.add_edge(a, b, ());
        }
        Self { graph }
    }

    /// A chain `0 - 1 - ... - (n-1)`.
    pub fn linear(num_qubits: u32) -> Self {
        let mut map = Self::from_edges((1..num_qubits).map(|q| (q - 1, q)));
        if num_qubits == 1 {
            map.graph.add_node(0);
        }
        map
    }

    /// Number of qubits that appear in the map.
    pub fn num_qubits(&self) -> usize {
        self.graph.node_count()
    }

    /// Edges with the smaller qubit first, sorted.
    pub fn edges(&self) -> Vec<(u32, u32)> {
        let mut edges: Vec<(u32, u32)> = self
            .graph
            .all_edges()
            .map(|(a, b, _)| (a.min(b), a.max(b)))
            .collect();
        edges.sort_unstable();
        edges
    }

    /// Whether `a` and `b` share an edge.
    pub fn is_connected(&self, a: u32, b: u32) -> bool {
        self.graph.contains_edge(a, b)
    }

    /// Shortest path length between two qubits, if they are linked at all.
    pub fn distance(&self, a: u32, b: u32) -> Option<usize> {
        if !self.graph.contains_node(a) || !self.graph.contains_node(b) {
            return None;
        }
        dijkstra(&self.graph, a, Some(b), |_| 1usize).get(&b).copied()
    }

    /// Fail on the first two-qubit gate whose qubits are not adjacent.
    ///
    /// Gates on three or more qubits must have every pair adjacent.
    pub fn check_circuit(&self, circuit: &Circuit) -> IbmResult<()> {
        for (position, gate) in circuit.gates() {
            let qubits = gate.qubits();
            for (i, a) in qubits.iter().enumerate() {
                for b in &qubits[i + 1..] {
                    if !self.is_connected(a.0, b.0) {
                        return Err(IbmError::Uncoupled {
                            gate: gate.name().to_string(),
                            position,
                            a: a.0,
                            b: b.0,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

impl Serialize for CouplingMap {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.edges()
            .into_iter()
            .map(|(a, b)| [a, b])
            .collect::<Vec<_>>()
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CouplingMap {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pairs = Vec::<[u32; 2]>::deserialize(deserializer)?;
        Ok(Self::from_edges(pairs.into_iter().map(|[a, b]| (a, b))))
    }
}
