//! eg-tanks: propellant tank sizing and centre-of-gravity history.
//!
//! A vehicle section is described as a stack of items from bottom to top:
//! fixed components, separate oxidizer and fuel tanks, or one coaxial tank
//! (oxidizer inside, fuel in the annulus). Given the engine mass flow, the
//! tanks are sized for the burn and the mass and CG are tracked while the
//! liquid columns drain.

pub mod error;
pub mod system;

pub use error::{TankError, TankResult};
pub use system::{
    DeadPhase, StackItem, StructureLaw, TankCgHistory, TankFluid, TankSystem, sample_times,
};
