//! The epidemic state of a single trial.
//!
//! Each node is either susceptible or infected. The state keeps a per-node status lookup together
//! with the set of infected and the set of susceptible nodes. The two sets partition the node set
//! after every operation. The state is owned by one trial and is separate from the graph it is
//! stepped over, so any number of trials can share one `&Graph`.

use indexmap::IndexSet;
use log::trace;
use rand::Rng;

use crate::graph::{Graph, NodeId};
use crate::parameters::InfectionRule;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InfectionStatus {
    Susceptible,
    Infected,
}

#[derive(Clone, Debug)]
pub struct EpidemicState {
    infection_status_lookup: Vec<InfectionStatus>,
    infected_nodes: IndexSet<NodeId>,
    susceptible_nodes: IndexSet<NodeId>,
}

impl EpidemicState {
    /// Creates a state for `node_count` nodes, all susceptible.
    #[must_use]
    pub fn new(node_count: usize) -> Self {
        EpidemicState {
            infection_status_lookup: vec![InfectionStatus::Susceptible; node_count],
            infected_nodes: IndexSet::with_capacity(node_count),
            susceptible_nodes: (0..node_count).collect(),
        }
    }

    /// Resets every node independently: a node is infected if a uniform draw from `[0, 1)` is
    /// below `p0`, susceptible otherwise. Nodes are drawn in index order.
    pub fn initialize<R: Rng>(&mut self, p0: f64, rng: &mut R) {
        trace!("initializing epidemic state (p0={p0})");
        self.infected_nodes.clear();
        self.susceptible_nodes.clear();
        for node in 0..self.infection_status_lookup.len() {
            let status = if rng.random::<f64>() < p0 {
                self.infected_nodes.insert(node);
                InfectionStatus::Infected
            } else {
                self.susceptible_nodes.insert(node);
                InfectionStatus::Susceptible
            };
            self.infection_status_lookup[node] = status;
        }
    }

    /// Advances the state by one synchronous step and returns the new prevalence.
    ///
    /// Infected nodes recover with probability `mu`. Susceptible nodes scan their neighbors in
    /// the pre-step state and are infected according to `rule`. Every decision reads the state
    /// from before the step; the new assignment replaces it once all decisions are made.
    ///
    /// # Panics
    ///
    /// Panics if the state was not built for a graph with `graph.node_count()` nodes.
    pub fn step<R: Rng>(
        &mut self,
        graph: &Graph,
        beta: f64,
        mu: f64,
        rule: InfectionRule,
        rng: &mut R,
    ) -> f64 {
        assert_eq!(
            graph.node_count(),
            self.node_count(),
            "epidemic state does not match the graph it is stepped over"
        );

        let mut next_infected = IndexSet::with_capacity(self.node_count());
        let mut next_susceptible = IndexSet::with_capacity(self.node_count());

        for &node in &self.infected_nodes {
            if rng.random::<f64>() < mu {
                next_susceptible.insert(node);
            } else {
                next_infected.insert(node);
            }
        }

        for &node in &self.susceptible_nodes {
            let infected = match rule {
                InfectionRule::Sequential => self.sequential_infection(graph, node, beta, rng),
                InfectionRule::Exact => self.exact_infection(graph, node, beta, rng),
            };
            if infected {
                next_infected.insert(node);
            } else {
                next_susceptible.insert(node);
            }
        }

        for &node in &next_infected {
            self.infection_status_lookup[node] = InfectionStatus::Infected;
        }
        for &node in &next_susceptible {
            self.infection_status_lookup[node] = InfectionStatus::Susceptible;
        }
        self.infected_nodes = next_infected;
        self.susceptible_nodes = next_susceptible;

        self.prevalence()
    }

    fn sequential_infection<R: Rng>(
        &self,
        graph: &Graph,
        node: NodeId,
        beta: f64,
        rng: &mut R,
    ) -> bool {
        graph
            .neighbors(node)
            .iter()
            .filter(|&&neighbor| self.is_infected(neighbor))
            .any(|_| rng.random::<f64>() < beta)
    }

    fn exact_infection<R: Rng>(
        &self,
        graph: &Graph,
        node: NodeId,
        beta: f64,
        rng: &mut R,
    ) -> bool {
        let infected_neighbors = graph
            .neighbors(node)
            .iter()
            .filter(|&&neighbor| self.is_infected(neighbor))
            .count();
        if infected_neighbors == 0 {
            return false;
        }
        rng.random::<f64>() < InfectionRule::exact_probability(beta, infected_neighbors)
    }

    /// Sets the status of a single node, keeping the infected and susceptible sets in sync.
    pub fn set_status(&mut self, node: NodeId, status: InfectionStatus) {
        match status {
            InfectionStatus::Susceptible => {
                self.infected_nodes.shift_remove(&node);
                self.susceptible_nodes.insert(node);
            }
            InfectionStatus::Infected => {
                self.susceptible_nodes.shift_remove(&node);
                self.infected_nodes.insert(node);
            }
        }
        self.infection_status_lookup[node] = status;
    }

    #[must_use]
    pub fn status(&self, node: NodeId) -> InfectionStatus {
        self.infection_status_lookup[node]
    }

    #[must_use]
    pub fn is_infected(&self, node: NodeId) -> bool {
        self.infection_status_lookup[node] == InfectionStatus::Infected
    }

    #[must_use]
    pub fn infected(&self) -> &IndexSet<NodeId> {
        &self.infected_nodes
    }

    #[must_use]
    pub fn susceptible(&self) -> &IndexSet<NodeId> {
        &self.susceptible_nodes
    }

    #[must_use]
    pub fn infected_count(&self) -> usize {
        self.infected_nodes.len()
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.infection_status_lookup.len()
    }

    /// Fraction of nodes currently infected; `0.0` when there are no nodes.
    #[must_use]
    pub fn prevalence(&self) -> f64 {
        if self.node_count() == 0 {
            return 0.0;
        }
        self.infected_count() as f64 / self.node_count() as f64
    }

    /// Returns true if the infected and susceptible sets are disjoint, cover every node, and
    /// agree with the status lookup.
    #[must_use]
    pub fn check_partition(&self) -> bool {
        self.infected_nodes.len() + self.susceptible_nodes.len() == self.node_count()
            && self
                .infection_status_lookup
                .iter()
                .enumerate()
                .all(|(node, status)| match status {
                    InfectionStatus::Infected => {
                        self.infected_nodes.contains(&node)
                            && !self.susceptible_nodes.contains(&node)
                    }
                    InfectionStatus::Susceptible => {
                        self.susceptible_nodes.contains(&node)
                            && !self.infected_nodes.contains(&node)
                    }
                })
    }
}
