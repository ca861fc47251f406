//! Engine errors.

use eg_combustion::CombustionError;
use eg_fluids::FluidError;
use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-physical value for {what}: {value}")]
    NonPhysical { what: &'static str, value: f64 },

    #[error("No fluid data source for constituent '{constituent}' of card '{card}'")]
    MissingFluid { card: String, constituent: String },

    #[error("Fluid property error: {0}")]
    Fluid(#[from] FluidError),

    #[error("Combustion error: {0}")]
    Combustion(#[from] CombustionError),
}
