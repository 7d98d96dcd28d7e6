//! Inflow disturbance profiles.

use crate::error::{SimError, SimResult};
use lf_core::Real;
use serde::{Deserialize, Serialize};

/// One breakpoint of a piecewise-constant inflow table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepPoint {
    /// Time the flow takes effect (seconds).
    pub t_s: Real,
    pub flow: Real,
}

/// Inflow to the first tank of a cascade as a function of time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InflowProfile {
    /// Fixed inflow.
    Constant { flow: Real },
    /// `pulse_flow` for the first `pulse_s` seconds of every `period_s`, `base_flow` otherwise.
    Pulse {
        base_flow: Real,
        pulse_flow: Real,
        period_s: Real,
        pulse_s: Real,
    },
    /// Piecewise-constant table. Before the first point the first flow applies.
    Steps { points: Vec<StepPoint> },
}

impl Default for InflowProfile {
    /// 115 gpm for 3 h out of every 12 h, 100 gpm otherwise.
    fn default() -> Self {
        InflowProfile::Pulse {
            base_flow: 100.0,
            pulse_flow: 115.0,
            period_s: 12.0 * 3600.0,
            pulse_s: 3.0 * 3600.0,
        }
    }
}

impl InflowProfile {
    /// Inflow at time `t_s` (seconds).
    pub fn inflow_at(&self, t_s: Real) -> Real {
        match self {
            InflowProfile::Constant { flow } => *flow,
            InflowProfile::Pulse {
                base_flow,
                pulse_flow,
                period_s,
                pulse_s,
            } => {
                if t_s.rem_euclid(*period_s) < *pulse_s {
                    *pulse_flow
                } else {
                    *base_flow
                }
            }
            InflowProfile::Steps { points } => {
                let idx = points.partition_point(|p| p.t_s <= t_s);
                points
                    .get(idx.saturating_sub(1))
                    .map_or(0.0, |p| p.flow)
            }
        }
    }

    pub fn validate(&self) -> SimResult<()> {
        match self {
            InflowProfile::Constant { flow } => {
                if !flow.is_finite() {
                    return Err(SimError::InvalidArg {
                        what: "constant inflow must be finite",
                    });
                }
            }
            InflowProfile::Pulse {
                base_flow,
                pulse_flow,
                period_s,
                pulse_s,
            } => {
                if !base_flow.is_finite() || !pulse_flow.is_finite() {
                    return Err(SimError::InvalidArg {
                        what: "pulse flows must be finite",
                    });
                }
                if !period_s.is_finite() || *period_s <= 0.0 {
                    return Err(SimError::InvalidArg {
                        what: "pulse period must be positive",
                    });
                }
                if !(0.0..=*period_s).contains(pulse_s) {
                    return Err(SimError::InvalidArg {
                        what: "pulse duration must lie within the period",
                    });
                }
            }
            InflowProfile::Steps { points } => {
                if points.is_empty() {
                    return Err(SimError::InvalidArg {
                        what: "step profile needs at least one point",
                    });
                }
                if points
                    .iter()
                    .any(|p| !p.t_s.is_finite() || !p.flow.is_finite())
                {
                    return Err(SimError::InvalidArg {
                        what: "step profile points must be finite",
                    });
                }
                if points.windows(2).any(|w| w[1].t_s < w[0].t_s) {
                    return Err(SimError::InvalidArg {
                        what: "step profile times must be non-decreasing",
                    });
                }
            }
        }
        Ok(())
    }
}
