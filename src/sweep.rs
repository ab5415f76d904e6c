//! Parameter sweeps over μ and β.
//!
//! A sweep runs the Monte Carlo engine once for every combination of a recovery probability in
//! `mu_values` and an infection probability on the β grid, on one graph. It produces the
//! prevalence-versus-β curve for each μ and, for the points selected by `series_mu` and
//! `series_betas`, the illustrative time series of the last trial.

use std::path::Path;
use std::time::{Duration, Instant};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::SisError;
use crate::graph::Graph;
use crate::monte_carlo::MonteCarlo;
use crate::parameters::{InfectionRule, Parameters};
use crate::random::stream_seed;

// Grid values closer than this are the same β.
const BETA_TOLERANCE: f64 = 1e-9;

/// Evenly spaced β values from `start` to `stop`, both included.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BetaGrid {
    pub start: f64,
    pub stop: f64,
    pub steps: usize,
}

impl Default for BetaGrid {
    fn default() -> Self {
        BetaGrid {
            start: 0.0,
            stop: 1.0,
            steps: 51,
        }
    }
}

impl BetaGrid {
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        match self.steps {
            0 => Vec::new(),
            1 => vec![self.start],
            steps => {
                let increment = (self.stop - self.start) / (steps - 1) as f64;
                (0..steps)
                    .map(|i| self.start + increment * i as f64)
                    .collect()
            }
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    pub mu_values: Vec<f64>,
    pub beta: BetaGrid,
    pub p0: f64,
    pub rep: usize,
    pub t_max: usize,
    pub t_trans: usize,
    pub infection_rule: InfectionRule,
    /// The μ whose points keep their time series. `None` keeps no series.
    pub series_mu: Option<f64>,
    pub series_betas: Vec<f64>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig {
            mu_values: vec![0.1, 0.5, 0.9],
            beta: BetaGrid::default(),
            p0: 0.2,
            rep: 10,
            t_max: 1000,
            t_trans: 900,
            infection_rule: InfectionRule::Sequential,
            series_mu: Some(0.5),
            series_betas: vec![0.1, 0.2, 0.3, 0.5, 0.7, 0.9],
        }
    }
}

impl SweepConfig {
    /// Reads a sweep configuration from a JSON file. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or describes an invalid
    /// sweep (see [`SweepConfig::validate`]).
    pub fn from_json_file(path: &Path) -> Result<Self, SisError> {
        let data = std::fs::read_to_string(path)?;
        let config: SweepConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// The engine parameters of the point `(mu, beta)`.
    #[must_use]
    pub fn parameters(&self, mu: f64, beta: f64) -> Parameters {
        Parameters {
            beta,
            mu,
            p0: self.p0,
            rep: self.rep,
            t_max: self.t_max,
            t_trans: self.t_trans,
            infection_rule: self.infection_rule,
        }
    }

    /// Checks every point of the sweep before any of them runs.
    ///
    /// # Errors
    ///
    /// Returns [`SisError::InvalidConfiguration`] for an empty μ list or β grid and the error of
    /// [`Parameters::validate`] for the first invalid point.
    pub fn validate(&self) -> Result<(), SisError> {
        if self.mu_values.is_empty() {
            return Err(SisError::InvalidConfiguration(
                "mu_values must not be empty".to_string(),
            ));
        }
        let betas = self.beta.values();
        if betas.is_empty() {
            return Err(SisError::InvalidConfiguration(
                "the beta grid must have at least one step".to_string(),
            ));
        }
        for &mu in &self.mu_values {
            for &beta in &betas {
                self.parameters(mu, beta).validate()?;
            }
        }
        Ok(())
    }

    fn keeps_series(&self, mu: f64, beta: f64) -> bool {
        self.series_mu
            .is_some_and(|series_mu| (series_mu - mu).abs() < BETA_TOLERANCE)
            && self
                .series_betas
                .iter()
                .any(|&b| (b - beta).abs() < BETA_TOLERANCE)
    }
}

/// How the trials of each sweep point are executed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Execution {
    #[default]
    Sequential,
    Parallel,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SweepPoint {
    pub mu: f64,
    pub beta: f64,
    pub mean_prevalence: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SeriesRecord {
    pub mu: f64,
    pub beta: f64,
    pub series: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SweepOutcome {
    pub graph: String,
    /// One point per (μ, β), μ-major in the order of `mu_values`.
    pub points: Vec<SweepPoint>,
    pub series: Vec<SeriesRecord>,
    pub elapsed: Duration,
}

impl SweepOutcome {
    /// The prevalence-versus-β curve for `mu`.
    pub fn curve(&self, mu: f64) -> impl Iterator<Item = &SweepPoint> {
        self.points
            .iter()
            .filter(move |point| (point.mu - mu).abs() < BETA_TOLERANCE)
    }
}

/// Runs every point of `config` on `graph`. Each point is seeded from `base_seed`, the graph
/// name and its (μ, β), so a point's result does not depend on which other points are swept.
///
/// # Errors
///
/// Returns the error of [`SweepConfig::validate`] before running any point.
pub fn run_sweep(
    config: &SweepConfig,
    graph_name: &str,
    graph: &Graph,
    base_seed: u64,
    execution: Execution,
) -> Result<SweepOutcome, SisError> {
    config.validate()?;
    info!(
        "sweeping {graph_name} ({} nodes, mean degree {:.2})",
        graph.node_count(),
        graph.mean_degree()
    );

    let betas = config.beta.values();
    let start = Instant::now();
    let mut engine = MonteCarlo::new(graph, Parameters::default());
    let mut points = Vec::with_capacity(config.mu_values.len() * betas.len());
    let mut series = Vec::new();

    for &mu in &config.mu_values {
        let mu_start = Instant::now();
        for &beta in &betas {
            let point_start = Instant::now();
            engine.set_parameters(config.parameters(mu, beta));
            let seed = stream_seed(base_seed, &format!("{graph_name}/mu={mu}/beta={beta}"));
            let result = match execution {
                Execution::Sequential => engine.run_seeded(seed)?,
                Execution::Parallel => engine.run_parallel(seed)?,
            };
            debug!(
                "mu: {mu}, beta: {beta:.2}, average_p: {:.4}, time: {}",
                result.mean_prevalence,
                humantime::format_duration(point_start.elapsed())
            );

            if config.keeps_series(mu, beta) {
                series.push(SeriesRecord {
                    mu,
                    beta,
                    series: result.last_trial,
                });
            }
            points.push(SweepPoint {
                mu,
                beta,
                mean_prevalence: result.mean_prevalence,
            });
        }
        info!(
            "{graph_name}: mu={mu} done in {}",
            humantime::format_duration(round_to_millis(mu_start.elapsed()))
        );
    }

    Ok(SweepOutcome {
        graph: graph_name.to_string(),
        points,
        series,
        elapsed: start.elapsed(),
    })
}

fn round_to_millis(duration: Duration) -> Duration {
    Duration::from_millis(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}
