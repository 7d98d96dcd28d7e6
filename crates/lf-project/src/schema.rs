//! Scenario schema.

use crate::validate::{LATEST_VERSION, ValidationError};
use lf_controls::{LevelController, LevelControllerParams};
use lf_sim::{InflowProfile, SimOptions, TankCascade};
use serde::{Deserialize, Serialize};

/// A cascade study: tanks in series, the inflow driving the first, and run options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    /// Tanks in flow order.
    pub tanks: Vec<TankDef>,
    pub inflow: InflowProfile,
    pub sim: SimOptions,
}

/// A named tank. Parameters are flattened into the tank entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankDef {
    pub name: String,
    #[serde(flatten)]
    pub params: LevelControllerParams,
}

impl Default for Scenario {
    /// Two tanks in series under the 12 h pulsed inflow.
    fn default() -> Self {
        Self {
            version: LATEST_VERSION,
            name: "Two tanks in series".to_string(),
            tanks: vec![
                TankDef {
                    name: "tank1".to_string(),
                    params: LevelControllerParams::default().with_init_level(2.5),
                },
                TankDef {
                    name: "tank2".to_string(),
                    params: LevelControllerParams::default()
                        .with_levels(0.0, 6.0)
                        .with_flows(103.0, 105.0)
                        .with_full_volume(2500.0),
                },
            ],
            inflow: InflowProfile::default(),
            sim: SimOptions::default(),
        }
    }
}

impl Scenario {
    /// Construct the cascade described by `tanks`.
    pub fn build_cascade(&self) -> Result<TankCascade, ValidationError> {
        let mut cascade = TankCascade::new();
        for tank in &self.tanks {
            let controller = LevelController::new(tank.params.clone()).map_err(|source| {
                ValidationError::InvalidTank {
                    name: tank.name.clone(),
                    source,
                }
            })?;
            cascade.push(tank.name.clone(), controller);
        }
        Ok(cascade)
    }
}
