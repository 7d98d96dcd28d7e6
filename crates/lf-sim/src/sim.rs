//! Fixed-step run loop for tank cascades.

use crate::cascade::TankCascade;
use crate::error::{SimError, SimResult};
use crate::profile::InflowProfile;
use crate::record::CascadeRecord;
use lf_controls::StepScheme;
use lf_core::Real;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Options for cascade runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimOptions {
    /// Fixed time step (seconds)
    pub dt: Real,
    /// Final simulation time (seconds)
    pub t_end: Real,
    /// Maximum number of steps (safety limit)
    pub max_steps: usize,
    /// Record every N-th step (decimation)
    pub record_every: usize,
    /// Integration scheme (default: implicit)
    pub scheme: StepScheme,
}

impl Default for SimOptions {
    /// Half-second steps over three 12 h disturbance cycles.
    fn default() -> Self {
        Self {
            dt: 0.5,
            t_end: 3.0 * 12.0 * 3600.0,
            max_steps: 10_000_000,
            record_every: 1,
            scheme: StepScheme::default(),
        }
    }
}

impl SimOptions {
    pub fn validate(&self) -> SimResult<()> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "dt must be positive",
            });
        }
        if !self.t_end.is_finite() || self.t_end < 0.0 {
            return Err(SimError::InvalidArg {
                what: "t_end must be non-negative",
            });
        }
        if self.max_steps == 0 {
            return Err(SimError::InvalidArg {
                what: "max_steps must be positive",
            });
        }
        if self.record_every == 0 {
            return Err(SimError::InvalidArg {
                what: "record_every must be positive",
            });
        }
        Ok(())
    }

    /// Number of steps a run takes: `floor(t_end / dt)`.
    pub fn step_count(&self) -> usize {
        (self.t_end / self.dt).floor() as usize
    }
}

/// Run a cascade under an inflow profile.
///
/// Step `i` starts at `t = i * dt`, takes the profile inflow at `t`, and is
/// recorded against `t`. Every `record_every`-th step and the last step are
/// recorded.
pub fn run_cascade(
    cascade: &mut TankCascade,
    profile: &InflowProfile,
    opts: &SimOptions,
) -> SimResult<CascadeRecord> {
    opts.validate()?;
    profile.validate()?;
    if cascade.is_empty() {
        return Err(SimError::InvalidArg {
            what: "cascade needs at least one tank",
        });
    }

    let steps = opts.step_count();
    if steps > opts.max_steps {
        return Err(SimError::InvalidArg {
            what: "t_end / dt exceeds max_steps",
        });
    }

    info!(
        tanks = cascade.len(),
        steps,
        dt = opts.dt,
        scheme = %opts.scheme,
        "starting cascade run"
    );

    let mut record = CascadeRecord::new(cascade.names().to_vec());
    let progress_every = (steps / 10).max(1);

    for i in 0..steps {
        let t = i as Real * opts.dt;
        let inflow = profile.inflow_at(t);
        let sample = cascade.step(opts.scheme, inflow, opts.dt)?;

        if i % opts.record_every == 0 || i + 1 == steps {
            record.push(t, &sample);
        }
        if (i + 1) % progress_every == 0 {
            debug!(step = i + 1, t_s = t, levels = ?sample.levels, "cascade progress");
        }
    }

    info!(records = record.len(), "cascade run complete");
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lf_controls::{LevelController, LevelControllerParams};

    fn single_tank() -> TankCascade {
        TankCascade::new().with_tank(
            "only",
            LevelController::new(LevelControllerParams::default().with_init_level(2.5)).unwrap(),
        )
    }

    #[test]
    fn sim_options_defaults() {
        let opts = SimOptions::default();
        assert_eq!(opts.dt, 0.5);
        assert_eq!(opts.t_end, 129_600.0);
        assert_eq!(opts.record_every, 1);
        assert_eq!(opts.scheme, StepScheme::Implicit);
        assert_eq!(opts.step_count(), 259_200);
    }

    #[test]
    fn sim_options_invalid() {
        let bad_dt = SimOptions {
            dt: 0.0,
            ..SimOptions::default()
        };
        assert!(bad_dt.validate().is_err());

        let bad_end = SimOptions {
            t_end: f64::NAN,
            ..SimOptions::default()
        };
        assert!(bad_end.validate().is_err());

        let bad_decimation = SimOptions {
            record_every: 0,
            ..SimOptions::default()
        };
        assert!(bad_decimation.validate().is_err());
    }

    #[test]
    fn decimation_keeps_last_step() {
        let mut cascade = single_tank();
        let opts = SimOptions {
            dt: 1.0,
            t_end: 10.0,
            record_every: 4,
            ..SimOptions::default()
        };
        let record =
            run_cascade(&mut cascade, &InflowProfile::Constant { flow: 110.0 }, &opts).unwrap();
        assert_eq!(record.t_s, vec![0.0, 4.0, 8.0, 9.0]);
        assert_eq!(record.levels[0].last().copied(), Some(cascade.levels()[0]));
    }

    #[test]
    fn zero_length_run_records_nothing() {
        let mut cascade = single_tank();
        let opts = SimOptions {
            t_end: 0.0,
            ..SimOptions::default()
        };
        let record = run_cascade(&mut cascade, &InflowProfile::default(), &opts).unwrap();
        assert!(record.is_empty());
        assert_eq!(cascade.levels(), vec![2.5]);
    }

    #[test]
    fn empty_cascade_rejected() {
        let result = run_cascade(
            &mut TankCascade::new(),
            &InflowProfile::default(),
            &SimOptions::default(),
        );
        assert_eq!(
            result.unwrap_err(),
            SimError::InvalidArg {
                what: "cascade needs at least one tank"
            }
        );
    }

    #[test]
    fn step_limit_enforced() {
        let opts = SimOptions {
            max_steps: 10,
            ..SimOptions::default()
        };
        let result = run_cascade(&mut single_tank(), &InflowProfile::default(), &opts);
        assert!(matches!(result, Err(SimError::InvalidArg { .. })));
    }

    #[test]
    fn sim_options_from_partial_json() {
        let opts: SimOptions = serde_json::from_str(r#"{"dt": 2.0, "scheme": "explicit"}"#).unwrap();
        assert_eq!(opts.dt, 2.0);
        assert_eq!(opts.scheme, StepScheme::Explicit);
        assert_eq!(opts.t_end, 129_600.0);
    }
}
