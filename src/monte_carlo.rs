//! The Monte Carlo engine.
//!
//! One [`MonteCarlo`] estimates the stationary prevalence of the SIS process for one graph and
//! one set of [`Parameters`]. Each trial starts from a fresh random initial condition, records
//! the prevalence for `t_max` time points, and contributes the mean of the points at or after
//! `t_trans`. The run result is the mean of those trial estimates together with the full series
//! of the last trial.
//!
//! The engine holds no random state. [`MonteCarlo::run`] draws everything from the generator it
//! is handed; [`MonteCarlo::run_seeded`] and [`MonteCarlo::run_parallel`] derive one generator
//! per trial from a base seed and produce identical results.

use log::{debug, trace};
use rand::Rng;
use rayon::prelude::*;

use crate::error::SisError;
use crate::graph::Graph;
use crate::parameters::Parameters;
use crate::random::trial_rng;
use crate::state::EpidemicState;

#[derive(Clone, Debug, PartialEq)]
pub struct RunResult {
    /// Mean over trials of each trial's mean prevalence in `[t_trans, t_max)`.
    pub mean_prevalence: f64,
    /// The prevalence series of the final trial, `t_max` points long.
    pub last_trial: Vec<f64>,
}

pub struct MonteCarlo<'a> {
    graph: &'a Graph,
    parameters: Parameters,
}

impl<'a> MonteCarlo<'a> {
    #[must_use]
    pub fn new(graph: &'a Graph, parameters: Parameters) -> Self {
        MonteCarlo { graph, parameters }
    }

    #[must_use]
    pub fn graph(&self) -> &'a Graph {
        self.graph
    }

    #[must_use]
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Replaces the parameters, keeping the graph. Used to move to the next point of a sweep.
    pub fn set_parameters(&mut self, parameters: Parameters) {
        self.parameters = parameters;
    }

    /// Runs all trials in order, drawing from `rng`.
    ///
    /// # Errors
    ///
    /// Returns the error of [`Parameters::validate`] before drawing any random number.
    pub fn run<R: Rng>(&self, rng: &mut R) -> Result<RunResult, SisError> {
        self.parameters.validate()?;
        debug!(
            "running {} trials (beta={}, mu={}, p0={}, t_max={}, t_trans={})",
            self.parameters.rep,
            self.parameters.beta,
            self.parameters.mu,
            self.parameters.p0,
            self.parameters.t_max,
            self.parameters.t_trans
        );

        let mut state = EpidemicState::new(self.graph.node_count());
        let mut series = Vec::with_capacity(self.parameters.t_max);
        let mut sum = 0.0;
        for trial in 0..self.parameters.rep {
            series.clear();
            self.run_trial(&mut state, &mut series, rng);
            let estimate = self.stationary_mean(&series);
            trace!("trial {trial} stationary prevalence {estimate}");
            sum += estimate;
        }

        Ok(RunResult {
            mean_prevalence: sum / self.parameters.rep as f64,
            last_trial: series,
        })
    }

    /// Runs all trials in order, trial `i` drawing from its own generator derived from
    /// `base_seed` and `i`.
    ///
    /// # Errors
    ///
    /// Returns the error of [`Parameters::validate`] before running any trial.
    pub fn run_seeded(&self, base_seed: u64) -> Result<RunResult, SisError> {
        self.parameters.validate()?;
        let mut state = EpidemicState::new(self.graph.node_count());
        let mut series = Vec::with_capacity(self.parameters.t_max);
        let mut sum = 0.0;
        for trial in 0..self.parameters.rep {
            series.clear();
            let mut rng = trial_rng(base_seed, trial);
            self.run_trial(&mut state, &mut series, &mut rng);
            sum += self.stationary_mean(&series);
        }

        Ok(RunResult {
            mean_prevalence: sum / self.parameters.rep as f64,
            last_trial: series,
        })
    }

    /// Runs the trials of [`MonteCarlo::run_seeded`] on the rayon thread pool. Trial estimates
    /// are summed in trial order, so the result is bit-identical to the sequential one.
    ///
    /// # Errors
    ///
    /// Returns the error of [`Parameters::validate`] before running any trial.
    pub fn run_parallel(&self, base_seed: u64) -> Result<RunResult, SisError> {
        self.parameters.validate()?;
        let last = self.parameters.rep - 1;
        let trials: Vec<(f64, Option<Vec<f64>>)> = (0..self.parameters.rep)
            .into_par_iter()
            .map(|trial| {
                let mut state = EpidemicState::new(self.graph.node_count());
                let mut series = Vec::with_capacity(self.parameters.t_max);
                let mut rng = trial_rng(base_seed, trial);
                self.run_trial(&mut state, &mut series, &mut rng);
                let estimate = self.stationary_mean(&series);
                (estimate, (trial == last).then_some(series))
            })
            .collect();

        let mut sum = 0.0;
        let mut last_trial = Vec::new();
        for (estimate, series) in trials {
            sum += estimate;
            if let Some(series) = series {
                last_trial = series;
            }
        }

        Ok(RunResult {
            mean_prevalence: sum / self.parameters.rep as f64,
            last_trial,
        })
    }

    /// One trial: `series[0]` is the prevalence of the initial condition and each of the
    /// following `t_max - 1` points is the prevalence after one more step.
    fn run_trial<R: Rng>(&self, state: &mut EpidemicState, series: &mut Vec<f64>, rng: &mut R) {
        let Parameters {
            beta,
            mu,
            p0,
            t_max,
            infection_rule,
            ..
        } = self.parameters;

        state.initialize(p0, rng);
        series.push(state.prevalence());
        for _ in 1..t_max {
            series.push(state.step(self.graph, beta, mu, infection_rule, rng));
        }
    }

    fn stationary_mean(&self, series: &[f64]) -> f64 {
        let window = &series[self.parameters.t_trans..];
        debug_assert_eq!(window.len(), self.parameters.stationary_window());
        window.iter().sum::<f64>() / self.parameters.stationary_window() as f64
    }
}
