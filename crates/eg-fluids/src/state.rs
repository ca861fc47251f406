//! Thermodynamic state definitions.

use crate::error::{FluidError, FluidResult};
use crate::species::Species;
use eg_core::units::{Pressure, Temperature};

/// Specific enthalpy [J/kg].
///
/// Not part of uom's standard set, so we use f64 with clear documentation.
pub type SpecEnthalpy = f64;

/// Specific heat capacity [J/(kg·K)].
pub type SpecHeatCapacity = f64;

/// Input specification for creating a thermodynamic state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StateInput {
    /// Pressure and temperature.
    PT { p: Pressure, t: Temperature },
    /// Temperature and vapor quality on the saturation line (0 = liquid).
    TQ { t: Temperature, q: f64 },
    /// Pressure and vapor quality on the saturation line (0 = liquid).
    PQ { p: Pressure, q: f64 },
}

/// Thermodynamic state: pressure, temperature, species and, for saturated
/// states, the vapor quality.
///
/// Derived properties (density, enthalpy, etc.) are computed on demand
/// via the `FluidModel` trait.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermoState {
    p: Pressure,
    t: Temperature,
    species: Species,
    quality: Option<f64>,
}

impl ThermoState {
    /// Create a single-phase state from pressure, temperature and species.
    ///
    /// Validates that pressure and temperature are positive and finite.
    pub fn from_pt(p: Pressure, t: Temperature, species: Species) -> FluidResult<Self> {
        validate_pt(p, t)?;
        Ok(Self {
            p,
            t,
            species,
            quality: None,
        })
    }

    /// Create a saturated state. `p` must be the saturation pressure at `t`.
    pub fn saturated(p: Pressure, t: Temperature, q: f64, species: Species) -> FluidResult<Self> {
        validate_pt(p, t)?;
        validate_quality(q)?;
        Ok(Self {
            p,
            t,
            species,
            quality: Some(q),
        })
    }

    /// Get pressure.
    pub fn pressure(&self) -> Pressure {
        self.p
    }

    /// Get temperature.
    pub fn temperature(&self) -> Temperature {
        self.t
    }

    /// Get species.
    pub fn species(&self) -> Species {
        self.species
    }

    /// Vapor quality when the state lies on the saturation line.
    pub fn quality(&self) -> Option<f64> {
        self.quality
    }
}

fn validate_pt(p: Pressure, t: Temperature) -> FluidResult<()> {
    if !p.value.is_finite() || p.value <= 0.0 {
        return Err(FluidError::NonPhysical {
            what: "pressure must be positive and finite",
        });
    }
    if !t.value.is_finite() || t.value <= 0.0 {
        return Err(FluidError::NonPhysical {
            what: "temperature must be positive and finite",
        });
    }
    Ok(())
}

pub(crate) fn validate_quality(q: f64) -> FluidResult<()> {
    if !q.is_finite() || !(0.0..=1.0).contains(&q) {
        return Err(FluidError::OutOfRange {
            what: "quality must lie in [0, 1]",
        });
    }
    Ok(())
}
