//! Monte Carlo simulation of SIS epidemics on contact networks
//!
//! In the SIS (Susceptible-Infected-Susceptible) model every node of a network is either
//! susceptible or infected, and recovery confers no immunity. Time is discrete. In each step an
//! infected node recovers with probability μ, and a susceptible node is infected by each infected
//! neighbor with probability β. All nodes are updated synchronously from the same snapshot.
//!
//! The crate estimates the stationary prevalence, the fraction of infected nodes once the
//! dependence on the initial condition has died out, as a function of β and μ:
//! * [`graph`] holds the immutable network the process runs on.
//! * [`state`] holds the per-trial S/I assignment and advances it by one step.
//! * [`monte_carlo`] repeats independent trials, discards the transient prefix of each one and
//!   averages the rest.
//! * [`sweep`] runs the engine over a grid of (μ, β) values.
//!
//! Loading graphs from edge lists and Pajek files ([`loader`]), writing CSV reports
//! ([`report`]) and the command line runner ([`runner`]) sit around the simulator and are not
//! needed to use it:
//!
//! ```rust
//! use netsis::graph::Graph;
//! use netsis::monte_carlo::MonteCarlo;
//! use netsis::parameters::ParametersBuilder;
//! use netsis::random::rng_from_seed;
//!
//! let graph = Graph::from_edges([("a", "b"), ("b", "c"), ("c", "d"), ("d", "a")]).unwrap();
//! let parameters = ParametersBuilder::default()
//!     .beta(0.6)
//!     .mu(0.2)
//!     .p0(0.5)
//!     .rep(20)
//!     .t_max(200)
//!     .t_trans(150)
//!     .build()
//!     .unwrap();
//! let result = MonteCarlo::new(&graph, parameters)
//!     .run(&mut rng_from_seed(42))
//!     .unwrap();
//! assert_eq!(result.last_trial.len(), 200);
//! ```
pub mod error;
pub mod graph;
pub mod hashing;
pub mod loader;
pub mod log;
pub mod monte_carlo;
pub mod parameters;
pub mod random;
pub mod report;
pub mod runner;
pub mod state;
pub mod sweep;

pub use error::SisError;
pub use graph::{Graph, NodeId};
pub use monte_carlo::{MonteCarlo, RunResult};
pub use parameters::{InfectionRule, Parameters, ParametersBuilder};
pub use state::{EpidemicState, InfectionStatus};
pub use sweep::{run_sweep, Execution, SweepConfig, SweepOutcome};

// Re-exports for convenience
pub use rand;
