//! Fluid property model trait and validation helpers.

use crate::error::{FluidError, FluidResult};
use crate::species::Species;
use crate::state::{SpecEnthalpy, SpecHeatCapacity, StateInput, ThermoState};
use eg_core::units::{Density, Pressure, Temperature};

/// Trait for fluid property models.
///
/// This is the seam to the external real-fluid property service. Implementations
/// must be thread-safe (Send + Sync) and validate outputs for physical plausibility.
pub trait FluidModel: Send + Sync {
    /// Get the model name (for debugging/logging).
    fn name(&self) -> &str;

    /// Check if this model can evaluate the given species.
    fn supports(&self, species: Species) -> bool;

    /// Create a thermodynamic state from input specification.
    ///
    /// Saturated inputs (TQ, PQ) resolve the missing saturation property.
    fn state(&self, input: StateInput, species: Species) -> FluidResult<ThermoState>;

    /// Compute density [kg/m³] at the given state.
    fn rho(&self, state: &ThermoState) -> FluidResult<Density>;

    /// Compute specific enthalpy [J/kg] at the given state.
    fn h(&self, state: &ThermoState) -> FluidResult<SpecEnthalpy>;

    /// Compute specific heat capacity at constant pressure [J/(kg·K)].
    fn cp(&self, state: &ThermoState) -> FluidResult<SpecHeatCapacity>;

    /// Saturated-liquid enthalpy at `t`.
    fn saturated_liquid_enthalpy(
        &self,
        t: Temperature,
        species: Species,
    ) -> FluidResult<SpecEnthalpy> {
        let state = self.state(StateInput::TQ { t, q: 0.0 }, species)?;
        self.h(&state)
    }

    /// Density at a state given by one of the supported input pairs.
    fn density_at(&self, input: StateInput, species: Species) -> FluidResult<Density> {
        let state = self.state(input, species)?;
        self.rho(&state)
    }
}

/// Validation helpers for fluid properties.
pub(crate) mod validation {
    use super::*;

    /// Ensure pressure is positive and finite.
    pub fn validate_pressure(p: Pressure) -> FluidResult<()> {
        if !p.value.is_finite() || p.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "pressure must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure temperature is positive and finite.
    pub fn validate_temperature(t: Temperature) -> FluidResult<()> {
        if !t.value.is_finite() || t.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "temperature must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure density is positive and finite.
    pub fn validate_density(rho: Density) -> FluidResult<()> {
        if !rho.value.is_finite() || rho.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "density must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure specific heat capacity is positive and finite.
    pub fn validate_cp(cp: f64) -> FluidResult<()> {
        if !cp.is_finite() || cp <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "cp must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure enthalpy is finite (can be negative).
    pub fn validate_enthalpy(h: f64) -> FluidResult<()> {
        if !h.is_finite() {
            return Err(FluidError::NonPhysical {
                what: "enthalpy must be finite",
            });
        }
        Ok(())
    }
}
