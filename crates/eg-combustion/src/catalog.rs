//! Built-in propellant cards.
//!
//! Enthalpies are heats of formation of the liquid at the listed temperature.
//! Storables are referenced to 298.15 K, cryogens to their normal boiling point.

use crate::card::{Constituent, PropellantCard, PropellantRole};
use crate::error::{CombustionError, CombustionResult};
use eg_core::units::constants::{CAL_TO_J, T_STD_K};
use eg_fluids::Species;

/// Catalog entry names, for listing.
pub const NAMES: [&str; 9] = [
    "Ethanol", "Methanol", "Water", "RP-1", "CH4(L)", "H2(L)", "LOX", "N2O", "H2O2-98",
];

fn ethanol() -> Constituent {
    Constituent::new(
        "C2H5OH(L)",
        &[("C", 2.0), ("H", 6.0), ("O", 1.0)],
        -66_370.0 * CAL_TO_J,
        T_STD_K,
    )
    .with_density(0.789)
    .with_fluid(Species::Ethanol)
}

fn water() -> Constituent {
    Constituent::new("H2O(L)", &[("H", 2.0), ("O", 1.0)], -68_308.0 * CAL_TO_J, T_STD_K)
        .with_density(0.9998)
        .with_fluid(Species::H2O)
}

/// Look up a catalog card by name or alias (case-insensitive).
pub fn card(name: &str) -> CombustionResult<PropellantCard> {
    use PropellantRole::{Fuel, Oxidizer};

    match name.trim().to_ascii_uppercase().as_str() {
        "ETHANOL" | "C2H5OH" | "C2H5OH(L)" => PropellantCard::new("Ethanol", Fuel, vec![ethanol()]),
        "METHANOL" | "CH3OH" | "CH3OH(L)" => PropellantCard::new(
            "Methanol",
            Fuel,
            vec![
                Constituent::new(
                    "CH3OH(L)",
                    &[("C", 1.0), ("H", 4.0), ("O", 1.0)],
                    -57_040.0 * CAL_TO_J,
                    T_STD_K,
                )
                .with_density(0.791)
                .with_fluid(Species::Methanol),
            ],
        ),
        "WATER" | "H2O" | "H2O(L)" => PropellantCard::new("Water", Fuel, vec![water()]),
        "RP-1" | "RP1" | "KEROSENE" => PropellantCard::new(
            "RP-1",
            Fuel,
            vec![
                Constituent::new("RP-1", &[("C", 1.0), ("H", 1.9423)], -5_430.0 * CAL_TO_J, T_STD_K)
                    .with_density(0.806)
                    .with_fluid(Species::RP1),
            ],
        ),
        "CH4(L)" | "CH4" | "METHANE" | "LCH4" => PropellantCard::new(
            "CH4(L)",
            Fuel,
            vec![
                Constituent::new("CH4(L)", &[("C", 1.0), ("H", 4.0)], -89_233.0, 111.643)
                    .with_density(0.4239)
                    .with_fluid(Species::CH4),
            ],
        ),
        "H2(L)" | "LH2" | "HYDROGEN" => PropellantCard::new(
            "H2(L)",
            Fuel,
            vec![
                Constituent::new("H2(L)", &[("H", 2.0)], -9_012.0, 20.27)
                    .with_density(0.0709)
                    .with_fluid(Species::H2),
            ],
        ),
        "LOX" | "O2(L)" | "O2" | "OXYGEN" => PropellantCard::new(
            "LOX",
            Oxidizer,
            vec![
                Constituent::new("O2(L)", &[("O", 2.0)], -12_979.0, 90.17)
                    .with_density(1.1409)
                    .with_fluid(Species::O2),
            ],
        ),
        "N2O" | "NITROUS" | "NITROUSOXIDE" | "NITROUS OXIDE" => PropellantCard::new(
            "N2O",
            Oxidizer,
            vec![
                Constituent::new("N2O(L)", &[("N", 2.0), ("O", 1.0)], 75_250.0, T_STD_K)
                    .with_density(0.7439)
                    .with_fluid(Species::NitrousOxide),
            ],
        ),
        "H2O2-98" | "H2O2" | "HTP" | "PEROXIDE" => PropellantCard::new(
            "H2O2-98",
            Oxidizer,
            vec![
                Constituent::new("H2O2(L)", &[("H", 2.0), ("O", 2.0)], -187_780.0, T_STD_K)
                    .with_weight_percent(98.0)
                    .with_density(1.431)
                    .with_fluid(Species::H2O2),
                Constituent::new("H2O(L)", &[("H", 2.0), ("O", 1.0)], -68_308.0 * CAL_TO_J, T_STD_K)
                    .with_weight_percent(2.0)
                    .with_fluid(Species::H2O),
            ],
        ),
        _ => Err(CombustionError::UnknownPropellant {
            name: name.to_string(),
        }),
    }
}

/// Ethanol diluted with water, `water_percent` by weight.
pub fn ethanol_water(water_percent: f64) -> CombustionResult<PropellantCard> {
    if !water_percent.is_finite() || !(0.0..100.0).contains(&water_percent) {
        return Err(CombustionError::InvalidArg {
            what: "water fraction must lie in [0, 100) wt%",
        });
    }
    if water_percent == 0.0 {
        return PropellantCard::new("EthanolWater", PropellantRole::Fuel, vec![ethanol()]);
    }
    PropellantCard::new(
        "EthanolWater",
        PropellantRole::Fuel,
        vec![
            ethanol().with_weight_percent(100.0 - water_percent),
            water().with_weight_percent(water_percent),
        ],
    )
}
