//! Scenario validation logic.

use crate::schema::Scenario;
use lf_controls::ControlError;
use lf_sim::SimError;
use std::collections::HashSet;

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },

    #[error("Scenario has no tanks")]
    NoTanks,

    #[error("Duplicate tank name: {name}")]
    DuplicateName { name: String },

    #[error("Invalid tank '{name}': {source}")]
    InvalidTank { name: String, source: ControlError },

    #[error("Invalid inflow profile: {0}")]
    InvalidInflow(SimError),

    #[error("Invalid simulation options: {0}")]
    InvalidSim(SimError),
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version == 0 || scenario.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }

    if scenario.tanks.is_empty() {
        return Err(ValidationError::NoTanks);
    }

    let mut names = HashSet::new();
    for tank in &scenario.tanks {
        if !names.insert(tank.name.as_str()) {
            return Err(ValidationError::DuplicateName {
                name: tank.name.clone(),
            });
        }
    }

    scenario.build_cascade()?;
    scenario
        .inflow
        .validate()
        .map_err(ValidationError::InvalidInflow)?;
    scenario.sim.validate().map_err(ValidationError::InvalidSim)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TankDef;
    use lf_controls::LevelControllerParams;

    #[test]
    fn default_scenario_is_valid() {
        validate_scenario(&Scenario::default()).unwrap();
    }

    #[test]
    fn rejects_bad_version() {
        let scenario = Scenario {
            version: LATEST_VERSION + 1,
            ..Scenario::default()
        };
        assert!(matches!(
            validate_scenario(&scenario),
            Err(ValidationError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn rejects_empty_and_duplicate_tanks() {
        let empty = Scenario {
            tanks: vec![],
            ..Scenario::default()
        };
        assert!(matches!(
            validate_scenario(&empty),
            Err(ValidationError::NoTanks)
        ));

        let mut duplicate = Scenario::default();
        duplicate.tanks[1].name = "tank1".to_string();
        assert!(matches!(
            validate_scenario(&duplicate),
            Err(ValidationError::DuplicateName { name }) if name == "tank1"
        ));
    }

    #[test]
    fn rejects_degenerate_tank() {
        let mut scenario = Scenario::default();
        scenario.tanks.push(TankDef {
            name: "flat".to_string(),
            params: LevelControllerParams::default().with_full_volume(0.0),
        });
        assert!(matches!(
            validate_scenario(&scenario),
            Err(ValidationError::InvalidTank {
                source: ControlError::InvalidParameter { .. },
                ..
            })
        ));
    }

    #[test]
    fn rejects_bad_sim_options() {
        let mut scenario = Scenario::default();
        scenario.sim.dt = -0.5;
        assert!(matches!(
            validate_scenario(&scenario),
            Err(ValidationError::InvalidSim(_))
        ));
    }
}
