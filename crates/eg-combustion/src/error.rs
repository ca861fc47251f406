//! Combustion errors.

use eg_core::EgError;
use thiserror::Error;

/// Result type for combustion operations.
pub type CombustionResult<T> = Result<T, CombustionError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CombustionError {
    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Non-physical intermediate or result.
    #[error("Non-physical value for {what}: {value}")]
    NonPhysical { what: &'static str, value: f64 },

    /// Malformed or inconsistent propellant card.
    #[error("Propellant card '{card}': {message}")]
    Card { card: String, message: String },

    /// Propellant name not found in the catalog.
    #[error("Unknown propellant: {name}")]
    UnknownPropellant { name: String },

    /// Product table inconsistent.
    #[error("Invalid product table: {what}")]
    InvalidTable { what: &'static str },

    /// Numeric failure (root bracketing, convergence).
    #[error("Numeric error: {0}")]
    Numeric(#[from] EgError),
}

impl CombustionError {
    pub(crate) fn card(card: impl Into<String>, message: impl Into<String>) -> Self {
        CombustionError::Card {
            card: card.into(),
            message: message.into(),
        }
    }
}
