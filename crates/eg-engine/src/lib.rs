//! eg-engine: liquid rocket engine sizing.
//!
//! Pipeline:
//! 1. Propellant adjuster: shifts each propellant card to its storage
//!    temperature using saturated-liquid enthalpies from a `FluidModel`.
//! 2. Combustion model: configured from the adjusted cards through a
//!    `CombustionBackend`.
//! 3. Engine sizing: area ratio, exhaust velocity, mass flows, throat and exit
//!    diameters at the design point, plus off-design thrust and Isp.

pub mod engine;
pub mod error;
pub mod propellant;

pub use engine::{
    DEFAULT_CONTRACTION_RATIO, Engine, EngineSpec, OperatingPoint, PropellantInput, ThrustPoint,
};
pub use error::{EngineError, EngineResult};
pub use propellant::{AdjustedPropellant, ConstituentAdjustment, adjust_propellant};
