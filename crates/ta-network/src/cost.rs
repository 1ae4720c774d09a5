//! Link performance functions.
//!
//! An arc's length (travel cost) is a non-decreasing function of the total
//! flow on it.  The derivative feeds the Newton-style step size used when a
//! bush shifts flow between two path segments.

/// Cost of traversing an arc as a function of its flow.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CostFunction {
    /// Flow-independent cost.
    Constant(f64),

    /// `free + slope * flow`.
    Linear { free: f64, slope: f64 },

    /// Bureau of Public Roads curve:
    /// `free_flow * (1 + alpha * (flow / capacity) ^ beta)`.
    Bpr { free_flow: f64, capacity: f64, alpha: f64, beta: f64 },
}

impl CostFunction {
    /// The common BPR parameterisation (`alpha = 0.15`, `beta = 4`).
    pub fn bpr(free_flow: f64, capacity: f64) -> Self {
        CostFunction::Bpr { free_flow, capacity, alpha: 0.15, beta: 4.0 }
    }

    /// Arc length at `flow`.  Negative flow is treated as zero.
    #[inline]
    pub fn cost(&self, flow: f64) -> f64 {
        let x = flow.max(0.0);
        match *self {
            CostFunction::Constant(c) => c,
            CostFunction::Linear { free, slope } => free + slope * x,
            CostFunction::Bpr { free_flow, capacity, alpha, beta } => {
                free_flow * (1.0 + alpha * (x / capacity).powf(beta))
            }
        }
    }

    /// d(cost)/d(flow) at `flow`.
    #[inline]
    pub fn derivative(&self, flow: f64) -> f64 {
        let x = flow.max(0.0);
        match *self {
            CostFunction::Constant(_) => 0.0,
            CostFunction::Linear { slope, .. } => slope,
            CostFunction::Bpr { free_flow, capacity, alpha, beta } => {
                if beta == 0.0 {
                    return 0.0;
                }
                // x^(beta-1) at x = 0 is 1 for beta = 1 and 0 above it;
                // validate() rejects 0 < beta < 1.
                let ratio_pow = if x > 0.0 {
                    (x / capacity).powf(beta - 1.0)
                } else if beta == 1.0 {
                    1.0
                } else {
                    0.0
                };
                free_flow * alpha * beta * ratio_pow / capacity
            }
        }
    }

    /// Check that the function yields finite, non-negative, non-decreasing
    /// costs.  Returns a human-readable reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        let finite_non_negative = |name: &str, v: f64| {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(format!("{name} must be finite and non-negative, got {v}"))
            }
        };
        match *self {
            CostFunction::Constant(c) => finite_non_negative("cost", c),
            CostFunction::Linear { free, slope } => {
                finite_non_negative("free", free)?;
                finite_non_negative("slope", slope)
            }
            CostFunction::Bpr { free_flow, capacity, alpha, beta } => {
                finite_non_negative("free_flow", free_flow)?;
                finite_non_negative("alpha", alpha)?;
                finite_non_negative("beta", beta)?;
                // Slope is unbounded at zero flow for 0 < beta < 1.
                if beta > 0.0 && beta < 1.0 {
                    return Err(format!("beta must be 0 or at least 1, got {beta}"));
                }
                if capacity.is_finite() && capacity > 0.0 {
                    Ok(())
                } else {
                    Err(format!("capacity must be finite and positive, got {capacity}"))
                }
            }
        }
    }
}
