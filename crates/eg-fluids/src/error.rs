//! Fluid property errors.

use eg_core::EgError;
use thiserror::Error;

/// Result type for fluid operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors that can occur during fluid property calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// Non-physical values (negative density, pressure, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Value out of valid range.
    #[error("Value out of range for {what}")]
    OutOfRange { what: &'static str },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Species not handled by this backend.
    #[error("Species {species} not supported by {model}")]
    UnsupportedSpecies {
        species: &'static str,
        model: &'static str,
    },

    /// Backend (CoolProp) error.
    #[error("Backend error: {message}")]
    Backend { message: String },
}

impl From<EgError> for FluidError {
    fn from(err: EgError) -> Self {
        match err {
            EgError::NonFinite { what, .. } => FluidError::NonPhysical { what },
            EgError::InvalidArg { what } => FluidError::InvalidArg { what },
            other => FluidError::Backend {
                message: other.to_string(),
            },
        }
    }
}
