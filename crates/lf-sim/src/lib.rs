//! Fixed-step simulation of P-only level controlled tanks in series.
//!
//! Provides:
//! - Inflow disturbance profiles (constant, periodic pulse, step table)
//! - A series cascade where each tank's pump feeds the next tank
//! - A fixed-step run loop with decimated recording
//! - Run records with CSV export and per-series statistics

pub mod cascade;
pub mod error;
pub mod profile;
pub mod record;
pub mod sim;

pub use cascade::{CascadeSample, TankCascade};
pub use error::{SimError, SimResult};
pub use profile::{InflowProfile, StepPoint};
pub use record::{CascadeRecord, CascadeSummary, SeriesStats, TankSummary};
pub use sim::{SimOptions, run_cascade};
