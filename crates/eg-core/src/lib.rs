//! eg-core: stable foundation for enginegen.
//!
//! Contains:
//! - units (uom SI types + constructors + unit conversions)
//! - numeric (Real + tolerances + float helpers + bracketed root finding)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{EgError, EgResult};
pub use numeric::*;
pub use units::*;
