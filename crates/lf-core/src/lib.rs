//! lf-core: shared foundation for levelflow.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;

pub use error::{LfError, LfResult};
pub use numeric::*;
