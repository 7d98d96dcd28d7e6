//! Time integration schemes for the level balance.

use serde::{Deserialize, Serialize};

/// Integration scheme used to advance a [`crate::LevelController`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepScheme {
    /// Backward Euler on the linear controller relation (default, unconditionally stable).
    #[default]
    Implicit,
    /// Forward Euler on the clamped outflow (conditionally stable).
    Explicit,
}

impl StepScheme {
    pub fn label(self) -> &'static str {
        match self {
            StepScheme::Implicit => "implicit",
            StepScheme::Explicit => "explicit",
        }
    }
}

impl std::fmt::Display for StepScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for StepScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "implicit" => Ok(StepScheme::Implicit),
            "explicit" => Ok(StepScheme::Explicit),
            other => Err(format!(
                "unknown step scheme '{other}' (expected 'implicit' or 'explicit')"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn implicit_is_default() {
        assert_eq!(StepScheme::default(), StepScheme::Implicit);
    }

    #[test]
    fn parse_and_display() {
        assert_eq!("Explicit".parse::<StepScheme>(), Ok(StepScheme::Explicit));
        assert_eq!("implicit".parse::<StepScheme>(), Ok(StepScheme::Implicit));
        assert!("rk4".parse::<StepScheme>().is_err());
        assert_eq!(StepScheme::Explicit.to_string(), "explicit");
    }
}
