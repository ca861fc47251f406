//! Custom cards flowing through the ideal-rocket backend.

use eg_combustion::ideal::{IdealRocketBackend, ProductTable};
use eg_combustion::{CombustionBackend, CombustionModel, CombustionSetup, PropellantCard, catalog};
use eg_core::units::bar;

fn setup(fuel: PropellantCard) -> CombustionSetup {
    CombustionSetup {
        fuel,
        oxidizer: catalog::card("N2O").unwrap(),
        contraction_ratio: Some(2.5),
    }
}

#[test]
fn water_dilution_cools_the_chamber() {
    let backend = IdealRocketBackend::new(ProductTable::ethanol_n2o().unwrap());
    let neat = backend.configure(&setup(catalog::card("Ethanol").unwrap())).unwrap();
    let diluted = backend
        .configure(&setup(catalog::ethanol_water(25.0).unwrap()))
        .unwrap();

    let pc = bar(25.0);
    let t_neat = neat.combustion_temperature(pc, 3.4).unwrap().value;
    let t_diluted = diluted.combustion_temperature(pc, 3.4).unwrap().value;
    assert!(t_diluted < t_neat);

    let c_neat = neat.cstar(pc, 3.4).unwrap().value;
    let c_diluted = diluted.cstar(pc, 3.4).unwrap().value;
    assert!(c_diluted < c_neat);
}

#[test]
fn parsed_card_matches_catalog_blend() {
    let text = "
        fuel C2H5OH(L)   C 2 H 6 O 1   wt%=75.0
        h,cal=-66370.0     t(k)=298.15
        fuel H2O(L)   H 2 O 1   wt%=25.0
        h,cal=-68308.0     t(k)=298.15     rho,g/cc = 0.9998
    ";
    let parsed = PropellantCard::parse_cea("EthanolWater", text).unwrap();
    let built = catalog::ethanol_water(25.0).unwrap();

    let h_parsed = parsed.specific_enthalpy().unwrap();
    let h_built = built.specific_enthalpy().unwrap();
    assert!((h_parsed - h_built).abs() < 1e-6 * h_built.abs());
}

#[test]
fn separation_appears_at_sea_level_for_a_vacuum_nozzle() {
    let backend = IdealRocketBackend::new(ProductTable::ethanol_n2o().unwrap());
    let model = backend.configure(&setup(catalog::card("Ethanol").unwrap())).unwrap();
    let pc = bar(25.0);

    // Sized for 0.05 bar exit pressure, fired at sea level
    let eps = model.eps_at_pc_over_pe(pc, 3.4, 500.0).unwrap();
    let sea_level = model.estimate_ambient_isp(pc, 3.4, eps, bar(1.01325)).unwrap();
    assert!(sea_level.mode.is_separated(), "mode = {}", sea_level.mode);

    let vacuum = model.estimate_ambient_isp(pc, 3.4, eps, bar(0.0)).unwrap();
    assert!(!vacuum.mode.is_separated());
    assert!(vacuum.velocity.value > sea_level.velocity.value);
}
