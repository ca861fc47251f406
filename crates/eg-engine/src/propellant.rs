//! Propellant temperature adjustment.
//!
//! Catalog cards carry enthalpies at a reference temperature. Propellants stored
//! at another temperature bring more or less sensible heat into the chamber; the
//! card is shifted by a mean specific heat taken from two saturated-liquid
//! enthalpies supplied by the fluid model.

use crate::error::{EngineError, EngineResult};
use eg_combustion::PropellantCard;
use eg_core::units::{Temperature, k};
use eg_fluids::{FluidModel, Species};
use tracing::debug;

/// Temperature differences below this are treated as no adjustment [K].
const MIN_DELTA_T_K: f64 = 1e-6;

/// What happened to one constituent.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstituentAdjustment {
    pub constituent: String,
    /// Fluid the enthalpies were taken from
    pub fluid: Species,
    /// Card reference temperature [K]
    pub reference_temperature_k: f64,
    /// Storage minus reference temperature [K]
    pub delta_t_k: f64,
    /// Saturated-liquid enthalpy change [J/kg]
    pub delta_h_j_per_kg: f64,
    /// `|Δh / ΔT|` [J/(kg·K)]
    pub cp_avg: f64,
}

/// Card shifted to storage temperature, with the lookup trail.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustedPropellant {
    pub card: PropellantCard,
    pub storage_temperature: Temperature,
    pub adjustments: Vec<ConstituentAdjustment>,
}

impl AdjustedPropellant {
    /// Mass-weighted mean specific heat of the blend [J/(kg·K)].
    pub fn cp_avg(&self) -> f64 {
        self.card
            .mass_fractions()
            .zip(&self.adjustments)
            .map(|((_, w), adj)| w * adj.cp_avg)
            .sum()
    }
}

/// Shift `card` to `storage_t`.
///
/// The standard state of each constituent is saturated liquid at the card's own
/// reference temperature (298.15 K for storables, the normal boiling point for
/// cryogens); the actual state is saturated liquid at `storage_t`. A constituent
/// without its own fluid falls back to `primary`.
pub fn adjust_propellant<F: FluidModel + ?Sized>(
    fluids: &F,
    card: &PropellantCard,
    storage_t: Temperature,
    primary: Option<Species>,
) -> EngineResult<AdjustedPropellant> {
    let t_new = storage_t.value;
    if !t_new.is_finite() || t_new <= 0.0 {
        return Err(EngineError::NonPhysical {
            what: "propellant storage temperature",
            value: t_new,
        });
    }

    let mut adjusted = card.clone();
    let mut adjustments = Vec::with_capacity(card.constituents.len());

    for c in adjusted.constituents.iter_mut() {
        let fluid = c
            .fluid
            .or(primary)
            .ok_or_else(|| EngineError::MissingFluid {
                card: card.name.clone(),
                constituent: c.name.clone(),
            })?;
        let t_ref = c.temperature_k;
        let delta_t = t_new - t_ref;

        if delta_t.abs() < MIN_DELTA_T_K {
            adjustments.push(ConstituentAdjustment {
                constituent: c.name.clone(),
                fluid,
                reference_temperature_k: t_ref,
                delta_t_k: 0.0,
                delta_h_j_per_kg: 0.0,
                cp_avg: 0.0,
            });
            continue;
        }

        let h_std = fluids.saturated_liquid_enthalpy(k(t_ref), fluid)?;
        let h_new = fluids.saturated_liquid_enthalpy(storage_t, fluid)?;
        let delta_h = h_new - h_std;
        let cp_avg = (delta_h / delta_t).abs();

        debug!(
            card = %card.name,
            constituent = %c.name,
            fluid = %fluid,
            t_ref,
            t_new,
            cp_avg,
            "adjusted propellant constituent"
        );

        *c = c.at_temperature(t_new, cp_avg)?;
        adjustments.push(ConstituentAdjustment {
            constituent: c.name.clone(),
            fluid,
            reference_temperature_k: t_ref,
            delta_t_k: delta_t,
            delta_h_j_per_kg: delta_h,
            cp_avg,
        });
    }

    Ok(AdjustedPropellant {
        card: adjusted,
        storage_temperature: storage_t,
        adjustments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use eg_combustion::{Constituent, PropellantRole, catalog};
    use eg_fluids::IncompressibleLiquidModel;

    #[test]
    fn storage_at_reference_leaves_card_unchanged() {
        let fluids = IncompressibleLiquidModel::propellants();
        let card = catalog::card("Ethanol").unwrap();
        let adjusted = adjust_propellant(&fluids, &card, k(298.15), None).unwrap();
        assert_eq!(adjusted.card, card);
        assert_eq!(adjusted.adjustments[0].cp_avg, 0.0);
    }

    #[test]
    fn cold_ethanol_loses_enthalpy() {
        let fluids = IncompressibleLiquidModel::propellants();
        let card = catalog::card("Ethanol").unwrap();
        let adjusted = adjust_propellant(&fluids, &card, k(268.15), None).unwrap();

        let adj = &adjusted.adjustments[0];
        assert_eq!(adj.fluid, Species::Ethanol);
        assert!((adj.cp_avg - 2_440.0).abs() < 1e-9);
        assert!((adj.delta_t_k + 30.0).abs() < 1e-9);

        let c = &adjusted.card.constituents[0];
        assert_eq!(c.temperature_k, 268.15);
        let expected_dh = 2_440.0 * -30.0 * card.constituents[0].molar_mass().unwrap() / 1000.0;
        let dh = c.enthalpy_j_per_mol - card.constituents[0].enthalpy_j_per_mol;
        assert!((dh - expected_dh).abs() < 1e-6);
        assert!((adjusted.cp_avg() - 2_440.0).abs() < 1e-9);
    }

    #[test]
    fn blend_uses_each_constituent_fluid() {
        let fluids = IncompressibleLiquidModel::propellants();
        let card = catalog::ethanol_water(20.0).unwrap();
        let adjusted = adjust_propellant(&fluids, &card, k(288.15), None).unwrap();

        assert_eq!(adjusted.adjustments[0].fluid, Species::Ethanol);
        assert_eq!(adjusted.adjustments[1].fluid, Species::H2O);
        let expected = 0.8 * 2_440.0 + 0.2 * 4_181.0;
        assert!((adjusted.cp_avg() - expected).abs() < 1e-9);
    }

    #[test]
    fn cryogen_is_referenced_to_its_boiling_point() {
        let fluids = IncompressibleLiquidModel::propellants();
        let card = catalog::card("LOX").unwrap();
        let adjusted = adjust_propellant(&fluids, &card, k(95.17), None).unwrap();
        let adj = &adjusted.adjustments[0];
        assert!((adj.reference_temperature_k - 90.17).abs() < 1e-9);
        assert!((adj.delta_t_k - 5.0).abs() < 1e-9);
    }

    #[test]
    fn liquid_hydrogen_adjusts_offline() {
        let fluids = IncompressibleLiquidModel::propellants();
        let card = catalog::card("H2(L)").unwrap();
        let adjusted = adjust_propellant(&fluids, &card, k(22.27), None).unwrap();
        let adj = &adjusted.adjustments[0];
        assert_eq!(adj.fluid, Species::H2);
        assert!((adj.delta_t_k - 2.0).abs() < 1e-9);
        assert!((adj.cp_avg - 9_700.0).abs() < 1e-6);
    }

    #[test]
    fn constituent_without_fluid_needs_primary() {
        let fluids = IncompressibleLiquidModel::propellants();
        let card = PropellantCard::pure(
            PropellantRole::Fuel,
            Constituent::new("C2H5OH(L)", &[("C", 2.0), ("H", 6.0), ("O", 1.0)], -277_692.0, 298.15),
        )
        .unwrap();

        let err = adjust_propellant(&fluids, &card, k(280.0), None).unwrap_err();
        assert!(matches!(err, EngineError::MissingFluid { .. }));

        let ok = adjust_propellant(&fluids, &card, k(280.0), Some(Species::Ethanol)).unwrap();
        assert_eq!(ok.adjustments[0].fluid, Species::Ethanol);
    }

    #[test]
    fn unsupported_fluid_propagates_backend_error() {
        let fluids = IncompressibleLiquidModel::new();
        let card = catalog::card("Ethanol").unwrap();
        let err = adjust_propellant(&fluids, &card, k(280.0), None).unwrap_err();
        assert!(matches!(err, EngineError::Fluid(_)));
    }

    proptest::proptest! {
        #[test]
        fn shift_is_linear_in_storage_temperature(t in 250.0_f64..340.0) {
            let fluids = IncompressibleLiquidModel::propellants();
            let card = catalog::card("Methanol").unwrap();
            let adjusted = adjust_propellant(&fluids, &card, k(t), None).unwrap();
            let h0 = card.specific_enthalpy().unwrap();
            let h1 = adjusted.card.specific_enthalpy().unwrap();
            let expected = 2_530.0 * (t - 298.15);
            proptest::prop_assert!((h1 - h0 - expected).abs() < 1e-6 * expected.abs().max(1.0));
        }
    }
}
