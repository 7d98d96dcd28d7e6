//! Error types for level control operations.

use lf_core::LfError;
use thiserror::Error;

/// Result type for level control operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur in level control operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Construction parameters that would make the model degenerate.
    #[error("Invalid parameter: {what}")]
    InvalidParameter { what: &'static str },

    /// NaN or infinite value supplied by the caller.
    #[error("Non-finite input for {what}: {value}")]
    NonFiniteInput { what: &'static str, value: f64 },

    /// A step produced a NaN or infinite level. The model state is left as it was.
    #[error("Non-finite state for {what}: {value}")]
    NonFiniteState { what: &'static str, value: f64 },
}

impl From<LfError> for ControlError {
    fn from(e: LfError) -> Self {
        match e {
            LfError::NonFinite { what, value } => ControlError::NonFiniteInput { what, value },
            LfError::InvalidArg { what } => ControlError::InvalidParameter { what },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_control_errors() {
        let e: ControlError = LfError::NonFinite {
            what: "inflow",
            value: f64::INFINITY,
        }
        .into();
        assert!(matches!(
            e,
            ControlError::NonFiniteInput { what: "inflow", .. }
        ));

        let e: ControlError = LfError::InvalidArg {
            what: "full_volume must be nonzero",
        }
        .into();
        assert_eq!(
            e,
            ControlError::InvalidParameter {
                what: "full_volume must be nonzero"
            }
        );
    }
}
