//! Tank model errors.

use eg_fluids::FluidError;
use thiserror::Error;

pub type TankResult<T> = Result<T, TankError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TankError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-physical value for {what}: {value}")]
    NonPhysical { what: &'static str, value: f64 },

    #[error("Invalid stack: {what}")]
    InvalidStack { what: &'static str },

    #[error("Sample time {t} s outside burn [0, {burn_time}] s")]
    TimeOutOfRange { t: f64, burn_time: f64 },

    #[error("Fluid property error: {0}")]
    Fluid(#[from] FluidError),
}
