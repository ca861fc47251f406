use eg_core::units::{bar, k, kg, kgps, m, s};
use eg_fluids::{IncompressibleLiquidModel, Species, StateInput};
use eg_tanks::{DeadPhase, StackItem, StructureLaw, TankFluid, TankSystem, sample_times};

fn system(tanks: &[StackItem]) -> TankSystem {
    let mut stack = vec![StackItem::Component {
        mass: kg(1.0),
        length: m(0.41),
    }];
    stack.extend_from_slice(tanks);
    stack.push(StackItem::Component {
        mass: kg(3.5),
        length: m(0.3),
    });
    TankSystem {
        burn_time: s(30.0),
        mixture_ratio: 3.4,
        tank_diameter: m(0.2),
        structure: StructureLaw::new(2.5, m(0.2)),
        oxidizer: TankFluid {
            species: Species::NitrousOxide,
            state: StateInput::TQ {
                t: k(298.15),
                q: 0.0,
            },
            dead_fraction: 0.05,
            dead_phase: DeadPhase::Liquid,
        },
        fuel: TankFluid {
            species: Species::Ethanol,
            state: StateInput::PT {
                p: bar(30.0),
                t: k(298.15),
            },
            dead_fraction: 0.05,
            dead_phase: DeadPhase::Liquid,
        },
        stack,
    }
}

#[test]
fn coaxial_tank_is_as_long_as_both_separate_tanks() {
    let fluids = IncompressibleLiquidModel::propellants();
    let times = sample_times(s(30.0), 6);

    let separate = system(&[StackItem::OxidizerTank, StackItem::FuelTank])
        .evaluate(&fluids, kgps(2.2), &times)
        .unwrap();
    let coax = system(&[StackItem::Coaxial])
        .evaluate(&fluids, kgps(2.2), &times)
        .unwrap();

    let rel = (coax.total_length.value - separate.total_length.value).abs()
        / separate.total_length.value;
    assert!(rel < 1e-12);
    // Inner tube adds wall mass
    assert!(coax.dry_mass.value > separate.dry_mass.value);
    assert_eq!(coax.mass.len(), 7);
}

#[test]
fn cg_moves_as_tanks_drain() {
    let fluids = IncompressibleLiquidModel::propellants();
    let h = system(&[StackItem::OxidizerTank, StackItem::FuelTank])
        .evaluate(&fluids, kgps(2.2), &sample_times(s(30.0), 10))
        .unwrap();

    let first = h.cg_from_top[0].value;
    let last = h.cg_from_top[10].value;
    assert!((first - last).abs() > 1e-3);
    assert!(h.mass.windows(2).all(|w| w[1] < w[0]));
}

#[test]
fn dead_phase_moves_mass_between_dry_and_loaded() {
    let fluids = IncompressibleLiquidModel::propellants();
    let liquid = system(&[StackItem::OxidizerTank, StackItem::FuelTank]);
    let mut gas = liquid.clone();
    gas.oxidizer.dead_phase = DeadPhase::Gas;

    let a = liquid.evaluate(&fluids, kgps(2.2), &[s(0.0)]).unwrap();
    let b = gas.evaluate(&fluids, kgps(2.2), &[s(0.0)]).unwrap();

    assert!((a.loaded_mass.value - b.loaded_mass.value).abs() < 1e-9);
    let ox_dead = 2.2 * 30.0 * 3.4 / 4.4 * 0.05;
    assert!((b.dry_mass.value - a.dry_mass.value - ox_dead).abs() < 1e-9);
}
