//! CoolProp-based fluid property model.

use crate::error::{FluidError, FluidResult};
use crate::model::{FluidModel, validation};
use crate::species::Species;
use crate::state::{SpecEnthalpy, SpecHeatCapacity, StateInput, ThermoState, validate_quality};
use eg_core::units::{Density, k, kgpm3, pa};
use rfluids::prelude::*;

/// CoolProp backend for fluid properties.
///
/// Supports the pure species that rfluids maps to a CoolProp fluid.
///
/// Thread-safe: rfluids Fluid instances are created per query.
pub struct CoolPropModel {}

impl CoolPropModel {
    /// Create a new CoolProp model.
    pub fn new() -> Self {
        Self {}
    }

    fn pure_for(&self, species: Species) -> FluidResult<Pure> {
        species
            .rfluids_pure()
            .ok_or(FluidError::UnsupportedSpecies {
                species: species.key(),
                model: "CoolProp",
            })
    }

    /// Build a backend fluid instance for the given state.
    ///
    /// Saturated states are pinned by (T, Q) so that CoolProp does not have to
    /// resolve the phase from a P-T pair sitting exactly on the saturation line.
    fn fluid_for(&self, state: &ThermoState) -> FluidResult<Fluid> {
        let pure = self.pure_for(state.species())?;
        let t_k = state.temperature().value;
        let result = match state.quality() {
            Some(q) => Fluid::from(pure)
                .in_state(FluidInput::quality(q), FluidInput::temperature(t_k)),
            None => Fluid::from(pure).in_state(
                FluidInput::pressure(state.pressure().value),
                FluidInput::temperature(t_k),
            ),
        };
        result.map_err(|e| FluidError::Backend {
            message: format!(
                "rfluids error for {} at P={} Pa, T={} K: {}",
                state.species(),
                state.pressure().value,
                t_k,
                e
            ),
        })
    }
}

impl Default for CoolPropModel {
    fn default() -> Self {
        Self::new()
    }
}

fn backend_err(what: &str, e: impl std::fmt::Display) -> FluidError {
    FluidError::Backend {
        message: format!("rfluids error getting {}: {}", what, e),
    }
}

impl FluidModel for CoolPropModel {
    fn name(&self) -> &str {
        "CoolProp"
    }

    fn supports(&self, species: Species) -> bool {
        species.rfluids_pure().is_some()
    }

    fn state(&self, input: StateInput, species: Species) -> FluidResult<ThermoState> {
        let pure = self.pure_for(species)?;

        match input {
            StateInput::PT { p, t } => {
                validation::validate_pressure(p)?;
                validation::validate_temperature(t)?;

                // Validate that rfluids accepts this state
                let _fluid = Fluid::from(pure)
                    .in_state(FluidInput::pressure(p.value), FluidInput::temperature(t.value))
                    .map_err(|e| FluidError::Backend {
                        message: format!("rfluids error at P={} Pa, T={} K: {}", p.value, t.value, e),
                    })?;

                ThermoState::from_pt(p, t, species)
            }
            StateInput::TQ { t, q } => {
                validation::validate_temperature(t)?;
                validate_quality(q)?;

                let mut fluid = Fluid::from(pure)
                    .in_state(FluidInput::quality(q), FluidInput::temperature(t.value))
                    .map_err(|e| FluidError::Backend {
                        message: format!("rfluids error at T={} K, Q={}: {}", t.value, q, e),
                    })?;
                let p_sat = fluid.pressure().map_err(|e| backend_err("pressure", e))?;

                ThermoState::saturated(pa(p_sat), t, q, species)
            }
            StateInput::PQ { p, q } => {
                validation::validate_pressure(p)?;
                validate_quality(q)?;

                let mut fluid = Fluid::from(pure)
                    .in_state(FluidInput::pressure(p.value), FluidInput::quality(q))
                    .map_err(|e| FluidError::Backend {
                        message: format!("rfluids error at P={} Pa, Q={}: {}", p.value, q, e),
                    })?;
                let t_sat = fluid
                    .temperature()
                    .map_err(|e| backend_err("temperature", e))?;

                ThermoState::saturated(p, k(t_sat), q, species)
            }
        }
    }

    fn rho(&self, state: &ThermoState) -> FluidResult<Density> {
        let mut fluid = self.fluid_for(state)?;
        let rho = kgpm3(fluid.density().map_err(|e| backend_err("density", e))?);
        validation::validate_density(rho)?;
        Ok(rho)
    }

    fn h(&self, state: &ThermoState) -> FluidResult<SpecEnthalpy> {
        let mut fluid = self.fluid_for(state)?;
        let h = fluid.enthalpy().map_err(|e| backend_err("enthalpy", e))?;
        validation::validate_enthalpy(h)?;
        Ok(h)
    }

    fn cp(&self, state: &ThermoState) -> FluidResult<SpecHeatCapacity> {
        let mut fluid = self.fluid_for(state)?;
        let cp = fluid
            .specific_heat()
            .map_err(|e| backend_err("specific heat", e))?;
        validation::validate_cp(cp)?;
        Ok(cp)
    }
}
