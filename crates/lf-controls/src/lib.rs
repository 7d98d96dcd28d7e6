//! Proportional-only tank level control for levelflow.
//!
//! A vertical tank drains through a pump whose flow is set by a P-only
//! controller reading the tank level. The controller output is a linear map
//! from the level sensor span `[lo_level, hi_level]` onto the pump span
//! `[lo_flow, hi_flow]`, saturating outside the span.
//!
//! # Model
//!
//! - **Controller gain**: `(hi_flow - lo_flow) / (hi_level - lo_level)`
//! - **Process gain**: `(hi_level - lo_level) / full_volume`
//! - **Balance**: `d(net_level)/dt = process_gain * (inflow - outflow(level)) * time_scale`
//!
//! The balance is advanced one timestep at a time with either implicit
//! (backward) Euler, which is unconditionally stable, or explicit (forward)
//! Euler, which respects pump saturation but is only stable below
//! [`LevelController::explicit_stability_limit`].
//!
//! # Example
//!
//! ```
//! use lf_controls::{LevelController, LevelControllerParams};
//!
//! let params = LevelControllerParams::default().with_init_level(2.5);
//! let mut tank = LevelController::new(params).unwrap();
//!
//! let level = tank.step_implicit(115.0, 0.5).unwrap();
//! assert!(level > 2.5 && level < 4.375);
//! ```

pub mod error;
pub mod level;
pub mod scheme;

pub use error::{ControlError, ControlResult};
pub use level::{LevelController, LevelControllerParams};
pub use scheme::StepScheme;
