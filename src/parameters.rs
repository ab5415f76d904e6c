use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::SisError;

/// How a susceptible node with infected neighbors decides whether it becomes infected.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InfectionRule {
    /// One Bernoulli(β) draw per infected neighbor, in enumeration order, stopping at the first
    /// success. This is an order-dependent approximation of "at least one neighbor transmits".
    #[default]
    Sequential,
    /// A single draw with probability `1 - (1 - β)^k` for `k` infected neighbors.
    Exact,
}

impl InfectionRule {
    /// Probability that a susceptible node with `infected_neighbors` infected neighbors is
    /// infected during one step under the exact rule.
    #[must_use]
    pub fn exact_probability(beta: f64, infected_neighbors: usize) -> f64 {
        let k = i32::try_from(infected_neighbors).unwrap_or(i32::MAX);
        1.0 - (1.0 - beta).powi(k)
    }
}

/// The configuration of one Monte Carlo run.
///
/// Use [`ParametersBuilder`] to get validated parameters; values deserialized or written as a
/// struct literal are validated again when the run starts.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Builder)]
#[builder(build_fn(private, name = "build_unchecked"))]
pub struct Parameters {
    /// Probability that one infected neighbor transmits during a step.
    #[builder(default = "0.0")]
    pub beta: f64,

    /// Probability that an infected node recovers during a step.
    #[builder(default = "0.0")]
    pub mu: f64,

    /// Probability that a node is infected in the initial condition of a trial.
    #[builder(default = "0.2")]
    pub p0: f64,

    /// Number of independent trials.
    #[builder(default = "10")]
    pub rep: usize,

    /// Length of each trial's prevalence series.
    #[builder(default = "1000")]
    pub t_max: usize,

    /// Number of leading steps of each trial excluded from the stationary average.
    #[builder(default = "900")]
    pub t_trans: usize,

    #[builder(default)]
    #[serde(default)]
    pub infection_rule: InfectionRule,
}

impl ParametersBuilder {
    /// Builds the parameters and validates them.
    ///
    /// # Errors
    ///
    /// Returns [`SisError::OutOfRangeParameter`] or [`SisError::InvalidConfiguration`] as
    /// described in [`Parameters::validate`].
    pub fn build(&self) -> Result<Parameters, SisError> {
        let parameters = self
            .build_unchecked()
            .map_err(|e| SisError::InvalidConfiguration(e.to_string()))?;
        parameters.validate()?;
        Ok(parameters)
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            beta: 0.0,
            mu: 0.0,
            p0: 0.2,
            rep: 10,
            t_max: 1000,
            t_trans: 900,
            infection_rule: InfectionRule::Sequential,
        }
    }
}

impl Parameters {
    /// Checks that the probabilities lie in `[0, 1]` and that every trial has a non-empty
    /// stationary window.
    ///
    /// # Errors
    ///
    /// * [`SisError::OutOfRangeParameter`] if `beta`, `mu` or `p0` is outside `[0, 1]` or NaN.
    /// * [`SisError::InvalidConfiguration`] if `rep == 0`, `t_max == 0` or `t_trans >= t_max`.
    pub fn validate(&self) -> Result<(), SisError> {
        for (name, value) in [("beta", self.beta), ("mu", self.mu), ("p0", self.p0)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SisError::OutOfRangeParameter { name, value });
            }
        }
        if self.rep == 0 {
            return Err(SisError::InvalidConfiguration(
                "rep must be at least 1".to_string(),
            ));
        }
        if self.t_max == 0 {
            return Err(SisError::InvalidConfiguration(
                "t_max must be at least 1".to_string(),
            ));
        }
        if self.t_trans >= self.t_max {
            return Err(SisError::InvalidConfiguration(format!(
                "t_trans ({}) must be smaller than t_max ({})",
                self.t_trans, self.t_max
            )));
        }
        Ok(())
    }

    /// Number of steps averaged in each trial.
    #[must_use]
    pub fn stationary_window(&self) -> usize {
        self.t_max.saturating_sub(self.t_trans)
    }
}
