//! Tanks in series.
//!
//! Within one timestep tank `k` is fully advanced before its clamped pump
//! outflow is read and fed to tank `k + 1`.

use lf_controls::{ControlResult, LevelController, StepScheme};
use lf_core::Real;
use serde::{Deserialize, Serialize};

/// Levels and pump flows of every tank after one cascade step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeSample {
    /// Inflow to the first tank.
    pub inflow: Real,
    pub levels: Vec<Real>,
    pub outflows: Vec<Real>,
}

/// Ordered chain of level controlled tanks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TankCascade {
    names: Vec<String>,
    tanks: Vec<LevelController>,
}

impl TankCascade {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cascade with tanks named `tank_1`, `tank_2`, ...
    pub fn from_tanks(tanks: Vec<LevelController>) -> Self {
        let names = (1..=tanks.len()).map(|i| format!("tank_{i}")).collect();
        Self { names, tanks }
    }

    /// Append a tank downstream of the current last tank.
    pub fn push(&mut self, name: impl Into<String>, tank: LevelController) {
        self.names.push(name.into());
        self.tanks.push(tank);
    }

    pub fn with_tank(mut self, name: impl Into<String>, tank: LevelController) -> Self {
        self.push(name, tank);
        self
    }

    pub fn len(&self) -> usize {
        self.tanks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tanks.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn tanks(&self) -> &[LevelController] {
        &self.tanks
    }

    pub fn tank(&self, index: usize) -> Option<&LevelController> {
        self.tanks.get(index)
    }

    /// Current level of every tank.
    pub fn levels(&self) -> Vec<Real> {
        self.tanks.iter().map(LevelController::level).collect()
    }

    /// Advance every tank by one timestep, upstream first.
    ///
    /// If any tank rejects the step, no tank in the cascade is changed.
    pub fn step(
        &mut self,
        scheme: StepScheme,
        inflow: Real,
        timestep: Real,
    ) -> ControlResult<CascadeSample> {
        let mut staged = self.tanks.clone();
        let mut levels = Vec::with_capacity(staged.len());
        let mut outflows = Vec::with_capacity(staged.len());

        let mut feed = inflow;
        for tank in &mut staged {
            levels.push(tank.step(scheme, feed, timestep)?);
            feed = tank.outflow_at_current_state();
            outflows.push(feed);
        }

        self.tanks = staged;
        Ok(CascadeSample {
            inflow,
            levels,
            outflows,
        })
    }
}
