//! Solver configuration.

use crate::{TaError, TaResult};

/// Tolerances and iteration caps for bush equilibration.
///
/// Typically built by the assignment driver (or deserialized with the `serde`
/// feature) and handed to each bush.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EquilibriumConfig {
    /// Target gap between the costliest used path and the cheapest path to
    /// each destination.  Default: `1e-6`.
    pub accuracy: f64,

    /// Bush edges carrying at most this much flow count as unused.  Unused
    /// edges do not contribute to max distances and may be reversed.
    /// Default: `1e-12`.
    pub flow_epsilon: f64,

    /// Upper bound on destination scans within one equilibration call.
    pub max_equilibration_passes: usize,

    /// Upper bound on equilibrate/restructure rounds within one `fix` call.
    pub max_restructure_rounds: usize,
}

impl Default for EquilibriumConfig {
    fn default() -> Self {
        Self {
            accuracy: 1e-6,
            flow_epsilon: 1e-12,
            max_equilibration_passes: 10_000,
            max_restructure_rounds: 1_000,
        }
    }
}

impl EquilibriumConfig {
    /// Default configuration with a different target gap.
    pub fn with_accuracy(accuracy: f64) -> Self {
        Self { accuracy, ..Self::default() }
    }

    /// Reject values the solver cannot work with.
    pub fn validate(&self) -> TaResult<()> {
        if !self.accuracy.is_finite() || self.accuracy < 0.0 {
            return Err(TaError::Config(format!(
                "accuracy must be finite and non-negative, got {}",
                self.accuracy
            )));
        }
        if !self.flow_epsilon.is_finite() || self.flow_epsilon < 0.0 {
            return Err(TaError::Config(format!(
                "flow_epsilon must be finite and non-negative, got {}",
                self.flow_epsilon
            )));
        }
        if self.max_equilibration_passes == 0 {
            return Err(TaError::Config("max_equilibration_passes must be at least 1".into()));
        }
        if self.max_restructure_rounds == 0 {
            return Err(TaError::Config("max_restructure_rounds must be at least 1".into()));
        }
        Ok(())
    }
}
