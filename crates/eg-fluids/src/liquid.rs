//! Incompressible-liquid property model.
//!
//! A linearised liquid model built around one reference state per species:
//!
//! ```text
//! h(T)   = h_ref + cp · (T - T_ref)
//! ρ(T)   = ρ_ref + dρ/dT · (T - T_ref)
//! ```
//!
//! Pressure has no effect on either property. Saturated inputs are accepted for
//! the liquid side only (quality 0); the reported pressure of such a state is the
//! reference vapor pressure. Enthalpy is zero at the reference state, so only
//! differences are meaningful.
//!
//! Used for species the CoolProp backend does not cover (RP-1, hydrogen peroxide)
//! and whenever deterministic, backend-free evaluation is wanted.

use crate::error::{FluidError, FluidResult};
use crate::model::{FluidModel, validation};
use crate::species::Species;
use crate::state::{SpecEnthalpy, SpecHeatCapacity, StateInput, ThermoState};
use eg_core::units::{Density, k, kgpm3, pa};
use std::collections::HashMap;

/// Reference liquid data for one species.
#[derive(Debug, Clone, PartialEq)]
pub struct LiquidProperties {
    /// Reference temperature [K]
    pub t_ref: f64,
    /// Vapor pressure at the reference temperature [Pa]
    pub p_sat_ref: f64,
    /// Density at the reference temperature [kg/m³]
    pub rho_ref: f64,
    /// Density slope [kg/(m³·K)]
    pub drho_dt: f64,
    /// Constant specific heat [J/(kg·K)]
    pub cp: f64,
}

impl LiquidProperties {
    pub fn new(t_ref: f64, p_sat_ref: f64, rho_ref: f64, drho_dt: f64, cp: f64) -> Self {
        Self {
            t_ref,
            p_sat_ref,
            rho_ref,
            drho_dt,
            cp,
        }
    }

    /// Enthalpy relative to the reference state, assuming constant cp.
    pub fn enthalpy_at_t(&self, t_k: f64) -> f64 {
        self.cp * (t_k - self.t_ref)
    }

    /// Density from the linear thermal-expansion fit.
    pub fn density_at_t(&self, t_k: f64) -> f64 {
        self.rho_ref + self.drho_dt * (t_k - self.t_ref)
    }
}

/// Fluid model backed by per-species [`LiquidProperties`].
#[derive(Debug, Clone, Default)]
pub struct IncompressibleLiquidModel {
    liquids: HashMap<Species, LiquidProperties>,
}

impl IncompressibleLiquidModel {
    /// Empty model; add species with [`Self::with_liquid`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Approximate saturated-liquid data for common propellants.
    pub fn propellants() -> Self {
        Self::new()
            .with_liquid(
                Species::Ethanol,
                LiquidProperties::new(298.15, 7_870.0, 785.1, -0.85, 2_440.0),
            )
            .with_liquid(
                Species::Methanol,
                LiquidProperties::new(298.15, 16_900.0, 786.5, -0.93, 2_530.0),
            )
            .with_liquid(
                Species::H2O,
                LiquidProperties::new(298.15, 3_170.0, 997.0, -0.26, 4_181.0),
            )
            .with_liquid(
                Species::RP1,
                LiquidProperties::new(298.15, 2_000.0, 806.0, -0.71, 2_010.0),
            )
            .with_liquid(
                Species::H2O2,
                LiquidProperties::new(298.15, 300.0, 1_431.0, -1.0, 2_630.0),
            )
            .with_liquid(
                Species::NitrousOxide,
                LiquidProperties::new(298.15, 5.66e6, 743.9, -10.5, 3_300.0),
            )
            .with_liquid(
                Species::O2,
                LiquidProperties::new(90.19, 101_325.0, 1_141.0, -4.6, 1_699.0),
            )
            .with_liquid(
                Species::CH4,
                LiquidProperties::new(111.67, 101_325.0, 422.4, -1.3, 3_480.0),
            )
            .with_liquid(
                Species::H2,
                LiquidProperties::new(20.27, 101_325.0, 70.85, -1.1, 9_700.0),
            )
    }

    /// Register (or replace) a species.
    pub fn with_liquid(mut self, species: Species, props: LiquidProperties) -> Self {
        self.liquids.insert(species, props);
        self
    }

    fn props(&self, species: Species) -> FluidResult<&LiquidProperties> {
        self.liquids
            .get(&species)
            .ok_or(FluidError::UnsupportedSpecies {
                species: species.key(),
                model: "IncompressibleLiquid",
            })
    }
}

impl FluidModel for IncompressibleLiquidModel {
    fn name(&self) -> &str {
        "IncompressibleLiquid"
    }

    fn supports(&self, species: Species) -> bool {
        self.liquids.contains_key(&species)
    }

    fn state(&self, input: StateInput, species: Species) -> FluidResult<ThermoState> {
        let props = self.props(species)?;
        match input {
            StateInput::PT { p, t } => ThermoState::from_pt(p, t, species),
            StateInput::TQ { t, q } => {
                if q != 0.0 {
                    return Err(FluidError::OutOfRange {
                        what: "incompressible liquid model only covers quality 0",
                    });
                }
                ThermoState::saturated(pa(props.p_sat_ref), t, q, species)
            }
            StateInput::PQ { p, q } => {
                if q != 0.0 {
                    return Err(FluidError::OutOfRange {
                        what: "incompressible liquid model only covers quality 0",
                    });
                }
                ThermoState::saturated(p, k(props.t_ref), q, species)
            }
        }
    }

    fn rho(&self, state: &ThermoState) -> FluidResult<Density> {
        let props = self.props(state.species())?;
        let rho = kgpm3(props.density_at_t(state.temperature().value));
        validation::validate_density(rho)?;
        Ok(rho)
    }

    fn h(&self, state: &ThermoState) -> FluidResult<SpecEnthalpy> {
        let props = self.props(state.species())?;
        let h = props.enthalpy_at_t(state.temperature().value);
        validation::validate_enthalpy(h)?;
        Ok(h)
    }

    fn cp(&self, state: &ThermoState) -> FluidResult<SpecHeatCapacity> {
        let cp = self.props(state.species())?.cp;
        validation::validate_cp(cp)?;
        Ok(cp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enthalpy_is_linear_in_temperature() {
        let model = IncompressibleLiquidModel::propellants();
        let h_ref = model
            .saturated_liquid_enthalpy(k(298.15), Species::Ethanol)
            .unwrap();
        let h_cold = model
            .saturated_liquid_enthalpy(k(278.15), Species::Ethanol)
            .unwrap();
        assert_eq!(h_ref, 0.0);
        assert!((h_cold - (-20.0 * 2_440.0)).abs() < 1e-9);
    }

    #[test]
    fn liquid_hydrogen_is_covered() {
        let model = IncompressibleLiquidModel::propellants();
        assert!(model.supports(Species::H2));
        let rho = model
            .density_at(StateInput::TQ { t: k(20.27), q: 0.0 }, Species::H2)
            .unwrap();
        assert!((rho.value - 70.85).abs() < 1e-9);
    }

    #[test]
    fn density_falls_with_temperature() {
        let model = IncompressibleLiquidModel::propellants();
        let cold = model
            .density_at(StateInput::PT { p: pa(3.0e6), t: k(280.0) }, Species::Ethanol)
            .unwrap();
        let warm = model
            .density_at(StateInput::PT { p: pa(3.0e6), t: k(310.0) }, Species::Ethanol)
            .unwrap();
        assert!(cold.value > warm.value);
    }

    #[test]
    fn vapor_side_is_rejected() {
        let model = IncompressibleLiquidModel::propellants();
        let err = model
            .state(StateInput::TQ { t: k(298.15), q: 1.0 }, Species::Ethanol)
            .unwrap_err();
        assert!(matches!(err, FluidError::OutOfRange { .. }));
    }

    #[test]
    fn unknown_species_is_reported() {
        let model = IncompressibleLiquidModel::new();
        assert!(!model.supports(Species::He));
        assert!(model.cp(&ThermoState::from_pt(pa(1e5), k(4.0), Species::He).unwrap()).is_err());
    }
}
