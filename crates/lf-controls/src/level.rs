//! P-only level controller coupled to a linear tank balance.
//!
//! Units are whatever the caller uses consistently. The reference tank uses:
//!
//! | Item      | Units |
//! |-----------|-------|
//! | level     | ft    |
//! | flow      | gpm   |
//! | volume    | gal   |
//! | timestep  | s     |
//!
//! with `time_scale = 1/60` converting gpm x s into gallons.

use crate::error::{ControlError, ControlResult};
use crate::scheme::StepScheme;
use lf_core::{Real, ensure_finite, ensure_nonzero};
use serde::{Deserialize, Serialize};

/// Construction parameters for a [`LevelController`].
///
/// Defaults describe the reference tank: 1000 gal over a 0-5 ft sensor span,
/// pump flow 97.5 gpm at the low limit and 117.5 gpm at the high limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelControllerParams {
    /// Level at the bottom of the sensor span.
    pub lo_level: Real,
    /// Level at the top of the sensor span. Must be greater than `lo_level`.
    pub hi_level: Real,
    /// Pump flow at `lo_level`.
    pub lo_flow: Real,
    /// Pump flow at `hi_level`.
    pub hi_flow: Real,
    /// Tank volume between `lo_level` and `hi_level`. Must be nonzero.
    pub full_volume: Real,
    /// Scale from flow x timestep to volume.
    pub time_scale: Real,
    /// Initial level. `None` starts the tank at `lo_level`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub init_level: Option<Real>,
}

impl Default for LevelControllerParams {
    fn default() -> Self {
        Self {
            lo_level: 0.0,
            hi_level: 5.0,
            lo_flow: 97.5,
            hi_flow: 117.5,
            full_volume: 1000.0,
            time_scale: 1.0 / 60.0,
            init_level: None,
        }
    }
}

impl LevelControllerParams {
    /// Set the sensor span.
    pub fn with_levels(mut self, lo_level: Real, hi_level: Real) -> Self {
        self.lo_level = lo_level;
        self.hi_level = hi_level;
        self
    }

    /// Set the pump flows at the ends of the sensor span.
    pub fn with_flows(mut self, lo_flow: Real, hi_flow: Real) -> Self {
        self.lo_flow = lo_flow;
        self.hi_flow = hi_flow;
        self
    }

    pub fn with_full_volume(mut self, full_volume: Real) -> Self {
        self.full_volume = full_volume;
        self
    }

    pub fn with_time_scale(mut self, time_scale: Real) -> Self {
        self.time_scale = time_scale;
        self
    }

    pub fn with_init_level(mut self, init_level: Real) -> Self {
        self.init_level = Some(init_level);
        self
    }
}

/// Tank level under proportional-only pump control.
///
/// The only mutable state is `net_level`, the level above `lo_level`. Gains
/// are derived once at construction.
///
/// A failed step never changes the state.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelController {
    lo_level: Real,
    hi_level: Real,
    lo_flow: Real,
    hi_flow: Real,
    full_volume: Real,
    time_scale: Real,
    controller_gain: Real,
    process_gain: Real,
    net_level: Real,
}

impl LevelController {
    /// Create a controller model.
    ///
    /// # Errors
    ///
    /// - [`ControlError::NonFiniteInput`] if any parameter is NaN or infinite
    /// - [`ControlError::InvalidParameter`] if `hi_level <= lo_level` or `full_volume == 0`
    pub fn new(params: LevelControllerParams) -> ControlResult<Self> {
        let LevelControllerParams {
            lo_level,
            hi_level,
            lo_flow,
            hi_flow,
            full_volume,
            time_scale,
            init_level,
        } = params;

        ensure_finite(lo_level, "lo_level")?;
        ensure_finite(hi_level, "hi_level")?;
        ensure_finite(lo_flow, "lo_flow")?;
        ensure_finite(hi_flow, "hi_flow")?;
        ensure_finite(full_volume, "full_volume")?;
        ensure_finite(time_scale, "time_scale")?;
        if let Some(level) = init_level {
            ensure_finite(level, "init_level")?;
        }

        if hi_level <= lo_level {
            return Err(ControlError::InvalidParameter {
                what: "hi_level must be greater than lo_level",
            });
        }
        ensure_nonzero(full_volume, "full_volume must be nonzero")?;

        let span = hi_level - lo_level;
        let controller_gain = (hi_flow - lo_flow) / span;
        let process_gain = span / full_volume;
        let net_level = init_level.map_or(0.0, |level| level - lo_level);

        tracing::trace!(controller_gain, process_gain, net_level, "level controller created");

        Ok(Self {
            lo_level,
            hi_level,
            lo_flow,
            hi_flow,
            full_volume,
            time_scale,
            controller_gain,
            process_gain,
            net_level,
        })
    }

    pub fn lo_level(&self) -> Real {
        self.lo_level
    }

    pub fn hi_level(&self) -> Real {
        self.hi_level
    }

    pub fn lo_flow(&self) -> Real {
        self.lo_flow
    }

    pub fn hi_flow(&self) -> Real {
        self.hi_flow
    }

    pub fn full_volume(&self) -> Real {
        self.full_volume
    }

    pub fn time_scale(&self) -> Real {
        self.time_scale
    }

    /// Proportional gain, flow per unit level.
    pub fn controller_gain(&self) -> Real {
        self.controller_gain
    }

    /// Level change per unit net volume.
    pub fn process_gain(&self) -> Real {
        self.process_gain
    }

    /// Level above `lo_level`.
    pub fn net_level(&self) -> Real {
        self.net_level
    }

    /// Absolute level.
    pub fn level(&self) -> Real {
        self.net_level + self.lo_level
    }

    /// Reset the absolute level.
    pub fn set_level(&mut self, level: Real) -> ControlResult<()> {
        ensure_finite(level, "level")?;
        self.net_level = level - self.lo_level;
        Ok(())
    }

    /// Parameters that rebuild this model, with the current level as `init_level`.
    pub fn params(&self) -> LevelControllerParams {
        LevelControllerParams {
            lo_level: self.lo_level,
            hi_level: self.hi_level,
            lo_flow: self.lo_flow,
            hi_flow: self.hi_flow,
            full_volume: self.full_volume,
            time_scale: self.time_scale,
            init_level: Some(self.level()),
        }
    }

    /// Pump flow commanded at `level`.
    ///
    /// Linear between the sensor limits and saturated outside them:
    /// `lo_flow` below `lo_level`, `hi_flow` above `hi_level`.
    pub fn outflow(&self, level: Real) -> Real {
        if level < self.lo_level {
            return self.lo_flow;
        }
        if level > self.hi_level {
            return self.hi_flow;
        }
        (level - self.lo_level) * self.controller_gain + self.lo_flow
    }

    /// Pump flow at the current level.
    pub fn outflow_at_current_state(&self) -> Real {
        self.outflow(self.level())
    }

    /// Level where the unclamped controller outflow equals `inflow`.
    ///
    /// This is the fixed point implicit stepping converges to. Returns `None`
    /// when the controller gain is zero, since the pump flow then does not
    /// depend on level.
    pub fn steady_state_level(&self, inflow: Real) -> Option<Real> {
        if self.controller_gain == 0.0 {
            return None;
        }
        Some(self.lo_level + (inflow - self.lo_flow) / self.controller_gain)
    }

    /// Timestep above which explicit stepping diverges in the linear region.
    ///
    /// `2 / (controller_gain * process_gain * time_scale)`. `None` when that
    /// product is not positive, in which case no positive timestep is stable
    /// (or every one is, for a zero product).
    pub fn explicit_stability_limit(&self) -> Option<Real> {
        let rate = self.controller_gain * self.process_gain * self.time_scale;
        if rate > 0.0 { Some(2.0 / rate) } else { None }
    }

    /// Advance one timestep with the given scheme and return the new level.
    pub fn step(&mut self, scheme: StepScheme, inflow: Real, timestep: Real) -> ControlResult<Real> {
        match scheme {
            StepScheme::Implicit => self.step_implicit(inflow, timestep),
            StepScheme::Explicit => self.step_explicit(inflow, timestep),
        }
    }

    /// Advance one timestep with implicit (backward) Euler.
    ///
    /// Solves `net' = net + Kp * (inflow - lo_flow - Kc * net') * dt * time_scale`
    /// for `net'` in closed form. The controller relation is used unclamped
    /// here, so near or beyond the sensor limits this disagrees with
    /// [`Self::step_explicit`].
    pub fn step_implicit(&mut self, inflow: Real, timestep: Real) -> ControlResult<Real> {
        ensure_finite(inflow, "inflow")?;
        ensure_finite(timestep, "timestep")?;

        let net_lo_flow = inflow - self.lo_flow;
        let k_numerator = self.process_gain * net_lo_flow * timestep * self.time_scale;
        let k_denominator =
            self.process_gain * self.controller_gain * timestep * self.time_scale;
        let net_level = (self.net_level + k_numerator) / (1.0 + k_denominator);

        self.commit(net_level)
    }

    /// Advance one timestep with explicit (forward) Euler.
    ///
    /// Outflow is evaluated at the pre-step level through [`Self::outflow`],
    /// so pump saturation applies.
    pub fn step_explicit(&mut self, inflow: Real, timestep: Real) -> ControlResult<Real> {
        ensure_finite(inflow, "inflow")?;
        ensure_finite(timestep, "timestep")?;

        let net_flow = inflow - self.outflow_at_current_state();
        let net_level =
            self.net_level + self.process_gain * net_flow * timestep * self.time_scale;

        self.commit(net_level)
    }

    fn commit(&mut self, net_level: Real) -> ControlResult<Real> {
        if !net_level.is_finite() {
            return Err(ControlError::NonFiniteState {
                what: "net_level",
                value: net_level,
            });
        }
        self.net_level = net_level;
        Ok(self.level())
    }
}

impl Default for LevelController {
    fn default() -> Self {
        let params = LevelControllerParams::default();
        let span = params.hi_level - params.lo_level;
        Self {
            lo_level: params.lo_level,
            hi_level: params.hi_level,
            lo_flow: params.lo_flow,
            hi_flow: params.hi_flow,
            full_volume: params.full_volume,
            time_scale: params.time_scale,
            controller_gain: (params.hi_flow - params.lo_flow) / span,
            process_gain: span / params.full_volume,
            net_level: 0.0,
        }
    }
}
