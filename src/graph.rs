//! Contact networks.
//!
//! A `Graph` maps each node to the list of its neighbors. Nodes are identified by a string key
//! on the way in and are assigned dense indices (`NodeId`) in order of first appearance, so that
//! per-node state can be kept in plain vectors. Each node also carries a display label, which is
//! its key unless given otherwise and need not be unique. Neighbor lists keep the order in which the
//! neighbors were supplied; this is the enumeration order the epidemic step scans them in.
//!
//! Graphs are built once, before a simulation, and are only ever borrowed immutably by it.

use std::ops::Range;

use crate::error::SisError;
use crate::hashing::HashMap;

/// Dense index of a node in a [`Graph`].
pub type NodeId = usize;

/// The underlying storage type representing the adjacency list
type AdjacencyList = Vec<NodeId>;

#[derive(Debug, Clone, Default)]
pub struct Graph {
    labels: Vec<String>,
    // node key -> id
    ids: HashMap<String, NodeId>,
    adjacency_lists: Vec<AdjacencyList>,
}

impl Graph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from a mapping of node label to neighbor labels.
    ///
    /// Every neighbor must itself be a key of the mapping. The mapping is taken as given: an
    /// undirected graph must list each edge under both of its endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`SisError::UnknownNode`] if a neighbor is not a key of the mapping and
    /// [`SisError::CannotMakeEdgeToSelf`] if a node lists itself.
    pub fn from_adjacency<I, N, S>(adjacency: I) -> Result<Self, SisError>
    where
        I: IntoIterator<Item = (S, N)>,
        N: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries: Vec<(S, N)> = adjacency.into_iter().collect();
        let mut graph = Graph::new();
        for (label, _) in &entries {
            graph.add_node(label.as_ref());
        }

        for (label, neighbors) in entries {
            let node = graph.ids[label.as_ref()];
            for neighbor in neighbors {
                let neighbor = neighbor.as_ref();
                let neighbor_id = graph
                    .node_id(neighbor)
                    .ok_or_else(|| SisError::UnknownNode(neighbor.to_string()))?;
                if neighbor_id == node {
                    return Err(SisError::CannotMakeEdgeToSelf(neighbor.to_string()));
                }
                graph.adjacency_lists[node].push(neighbor_id);
            }
        }
        Ok(graph)
    }

    /// Builds an undirected graph from a list of edges. Nodes are created on first appearance
    /// and repeated edges are merged.
    ///
    /// # Errors
    ///
    /// Returns [`SisError::CannotMakeEdgeToSelf`] for a self-loop.
    pub fn from_edges<I, S>(edges: I) -> Result<Self, SisError>
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        let mut graph = Graph::new();
        for (source, target) in edges {
            let source = graph.add_node(source.as_ref());
            let target = graph.add_node(target.as_ref());
            graph.add_edge(source, target)?;
        }
        Ok(graph)
    }

    /// Returns the id of the node keyed by `label`, adding the node if it does not exist.
    pub fn add_node(&mut self, label: &str) -> NodeId {
        self.add_labelled_node(label, label)
    }

    /// Returns the id of the node with the given key, adding it with `label` if it does not
    /// exist. Several nodes may share a label; the label of an existing node is left unchanged.
    pub fn add_labelled_node(&mut self, key: &str, label: &str) -> NodeId {
        if let Some(&id) = self.ids.get(key) {
            return id;
        }
        let id = self.labels.len();
        self.labels.push(label.to_string());
        self.ids.insert(key.to_string(), id);
        self.adjacency_lists.push(AdjacencyList::new());
        id
    }

    /// Inserts an undirected edge between `source` and `target`. Returns `false` if the edge
    /// already existed.
    ///
    /// # Errors
    ///
    /// Returns [`SisError::CannotMakeEdgeToSelf`] if `source == target`.
    ///
    /// # Panics
    ///
    /// Panics if either id was not returned by [`Graph::add_node`].
    pub fn add_edge(&mut self, source: NodeId, target: NodeId) -> Result<bool, SisError> {
        if source == target {
            return Err(SisError::CannotMakeEdgeToSelf(self.labels[source].clone()));
        }
        if self.adjacency_lists[source].contains(&target) {
            return Ok(false);
        }
        self.adjacency_lists[source].push(target);
        self.adjacency_lists[target].push(source);
        Ok(true)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterates over all node ids in index order.
    #[must_use]
    pub fn nodes(&self) -> Range<NodeId> {
        0..self.labels.len()
    }

    /// The neighbors of `node` in enumeration order.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a node of this graph.
    #[must_use]
    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        &self.adjacency_lists[node]
    }

    #[must_use]
    pub fn degree(&self, node: NodeId) -> usize {
        self.adjacency_lists[node].len()
    }

    #[must_use]
    pub fn label(&self, node: NodeId) -> &str {
        &self.labels[node]
    }

    /// Looks a node up by its key.
    #[must_use]
    pub fn node_id(&self, key: &str) -> Option<NodeId> {
        self.ids.get(key).copied()
    }

    /// The mean number of neighbors per node, or `0.0` for an empty graph.
    #[must_use]
    pub fn mean_degree(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let total: usize = self.adjacency_lists.iter().map(Vec::len).sum();
        total as f64 / self.node_count() as f64
    }
}
