//! Tank stack description and the mass/CG calculation.

use crate::error::{TankError, TankResult};
use eg_core::units::{Density, Length, Mass, MassRate, Time, kg, kgpm3, m, s};
use eg_fluids::{FluidModel, Species, StateInput};
use std::f64::consts::PI;
use tracing::debug;

/// Where the unusable propellant ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadPhase {
    /// Settles at the tank bottom with the liquid column.
    Liquid,
    /// Spread through the tank; counted with the tank structure.
    Gas,
}

/// One entry of the vehicle stack, listed bottom to top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StackItem {
    Component { mass: Mass, length: Length },
    OxidizerTank,
    FuelTank,
    /// Oxidizer in an inner tube, fuel in the surrounding annulus.
    Coaxial,
}

/// Tank wall mass per unit length, scaling linearly with diameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StructureLaw {
    /// Mass per length at the reference diameter [kg/m]
    pub reference_mass_per_length: f64,
    pub reference_diameter: Length,
}

impl StructureLaw {
    pub fn new(reference_mass_per_length: f64, reference_diameter: Length) -> Self {
        Self {
            reference_mass_per_length,
            reference_diameter,
        }
    }

    /// Wall mass per length [kg/m] of a tank of diameter `d`.
    pub fn mass_per_length(&self, d: Length) -> f64 {
        self.reference_mass_per_length * d.value / self.reference_diameter.value
    }
}

/// Stored propellant and its unusable remainder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TankFluid {
    pub species: Species,
    /// Storage state the density is evaluated at
    pub state: StateInput,
    /// Dead mass as a fraction of the operational mass
    pub dead_fraction: f64,
    pub dead_phase: DeadPhase,
}

impl TankFluid {
    pub fn density<F: FluidModel + ?Sized>(&self, fluids: &F) -> TankResult<Density> {
        Ok(fluids.density_at(self.state, self.species)?)
    }
}

/// A propellant feed section: tanks, fixed components and the burn they serve.
#[derive(Debug, Clone, PartialEq)]
pub struct TankSystem {
    pub burn_time: Time,
    /// Oxidizer-to-fuel mass ratio
    pub mixture_ratio: f64,
    pub tank_diameter: Length,
    pub structure: StructureLaw,
    pub oxidizer: TankFluid,
    pub fuel: TankFluid,
    /// Bottom to top
    pub stack: Vec<StackItem>,
}

/// Mass and CG over the burn.
#[derive(Debug, Clone, PartialEq)]
pub struct TankCgHistory {
    pub times: Vec<Time>,
    /// CG measured down from the top of the stack
    pub cg_from_top: Vec<Length>,
    pub mass: Vec<Mass>,
    pub total_length: Length,
    pub loaded_mass: Mass,
    pub dry_mass: Mass,
    pub oxidizer_tank_length: Length,
    pub fuel_tank_length: Length,
    pub oxidizer_density: Density,
    pub fuel_density: Density,
}

/// `steps + 1` evenly spaced times from ignition to burnout.
pub fn sample_times(burn_time: Time, steps: usize) -> Vec<Time> {
    if steps == 0 {
        return vec![s(0.0)];
    }
    (0..=steps)
        .map(|i| s(burn_time.value * (i as f64 / steps as f64)))
        .collect()
}

fn non_negative(value: f64, what: &'static str) -> TankResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(TankError::NonPhysical { what, value })
    }
}

fn positive(value: f64, what: &'static str) -> TankResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TankError::NonPhysical { what, value })
    }
}

/// Where the liquid columns sit inside the stack.
struct ColumnSite {
    base: f64,
    /// Share of the tank cross-section the column fills
    area_fraction: f64,
}

impl TankSystem {
    pub fn validate(&self) -> TankResult<()> {
        positive(self.burn_time.value, "burn time")?;
        positive(self.mixture_ratio, "mixture ratio")?;
        positive(self.tank_diameter.value, "tank diameter")?;
        positive(
            self.structure.reference_mass_per_length,
            "structure mass per length",
        )?;
        positive(
            self.structure.reference_diameter.value,
            "structure reference diameter",
        )?;
        non_negative(self.oxidizer.dead_fraction, "oxidizer dead fraction")?;
        non_negative(self.fuel.dead_fraction, "fuel dead fraction")?;

        let (mut ox, mut fuel, mut coax) = (0, 0, 0);
        for item in &self.stack {
            match item {
                StackItem::Component { mass, length } => {
                    non_negative(mass.value, "component mass")?;
                    non_negative(length.value, "component length")?;
                }
                StackItem::OxidizerTank => ox += 1,
                StackItem::FuelTank => fuel += 1,
                StackItem::Coaxial => coax += 1,
            }
        }

        match (ox, fuel, coax) {
            (1, 1, 0) | (0, 0, 1) => Ok(()),
            (_, _, c) if c > 1 => Err(TankError::InvalidStack {
                what: "more than one coaxial tank",
            }),
            (_, _, 1) => Err(TankError::InvalidStack {
                what: "coaxial tank cannot be combined with separate tanks",
            }),
            (o, _, _) if o > 1 => Err(TankError::InvalidStack {
                what: "more than one oxidizer tank",
            }),
            (_, f, _) if f > 1 => Err(TankError::InvalidStack {
                what: "more than one fuel tank",
            }),
            (0, _, _) => Err(TankError::InvalidStack {
                what: "no oxidizer tank",
            }),
            _ => Err(TankError::InvalidStack {
                what: "no fuel tank",
            }),
        }
    }

    /// Size the tanks for `mass_flow` over the burn and track mass and CG at
    /// each of `times`.
    pub fn evaluate<F: FluidModel + ?Sized>(
        &self,
        fluids: &F,
        mass_flow: MassRate,
        times: &[Time],
    ) -> TankResult<TankCgHistory> {
        self.validate()?;
        let mdot = mass_flow.value;
        positive(mdot, "mass flow")?;
        let burn = self.burn_time.value;
        if let Some(t) = times
            .iter()
            .map(|t| t.value)
            .find(|t| !(t.is_finite() && (0.0..=burn).contains(t)))
        {
            return Err(TankError::TimeOutOfRange { t, burn_time: burn });
        }

        let mr = self.mixture_ratio;
        let ox_share = mr / (1.0 + mr);

        let m_operational = mdot * burn;
        let ox_operational = m_operational * ox_share;
        let fuel_operational = m_operational - ox_operational;
        let ox_flow = mdot * ox_share;
        let fuel_flow = mdot - ox_flow;

        let ox_total = ox_operational * (1.0 + self.oxidizer.dead_fraction);
        let fuel_total = fuel_operational * (1.0 + self.fuel.dead_fraction);

        let rho_ox = self.oxidizer.density(fluids)?.value;
        let rho_fuel = self.fuel.density(fluids)?.value;

        let d = self.tank_diameter.value;
        let area = 0.25 * PI * d * d;
        let v_ox = ox_total / rho_ox;
        let v_fuel = fuel_total / rho_fuel;
        let mut ox_length = v_ox / area;
        let mut fuel_length = v_fuel / area;

        let wall = self.structure.mass_per_length(self.tank_diameter);
        let (ox_liquid, ox_gas_dead) = split_dead(ox_total, ox_operational, self.oxidizer.dead_phase);
        let (fuel_liquid, fuel_gas_dead) = split_dead(fuel_total, fuel_operational, self.fuel.dead_phase);

        let mut height = 0.0;
        let mut moment = 0.0;
        let mut dry = 0.0;
        let mut ox_site = None;
        let mut fuel_site = None;

        for item in &self.stack {
            let (mass, length) = match *item {
                StackItem::Component { mass, length } => (mass.value, length.value),
                StackItem::OxidizerTank => {
                    ox_site = Some(ColumnSite {
                        base: height,
                        area_fraction: 1.0,
                    });
                    (ox_length * wall + ox_gas_dead, ox_length)
                }
                StackItem::FuelTank => {
                    fuel_site = Some(ColumnSite {
                        base: height,
                        area_fraction: 1.0,
                    });
                    (fuel_length * wall + fuel_gas_dead, fuel_length)
                }
                StackItem::Coaxial => {
                    let d_inner = (d * d / (1.0 + v_fuel / v_ox)).sqrt();
                    let inner_fraction = (d_inner / d).powi(2);
                    let length = v_ox / (area * inner_fraction);
                    let inner_wall = self.structure.mass_per_length(m(d_inner));
                    ox_site = Some(ColumnSite {
                        base: height,
                        area_fraction: inner_fraction,
                    });
                    fuel_site = Some(ColumnSite {
                        base: height,
                        area_fraction: 1.0 - inner_fraction,
                    });
                    ox_length = length;
                    fuel_length = length;
                    debug!(d_inner, length, "sized coaxial tank");
                    (
                        length * (wall + inner_wall) + ox_gas_dead + fuel_gas_dead,
                        length,
                    )
                }
            };
            moment += mass * (height + 0.5 * length);
            height += length;
            dry += mass;
        }

        let ox_site = ox_site.ok_or(TankError::InvalidStack {
            what: "no oxidizer tank",
        })?;
        let fuel_site = fuel_site.ok_or(TankError::InvalidStack {
            what: "no fuel tank",
        })?;
        let total_length = height;
        let loaded = dry + ox_liquid + fuel_liquid;

        debug!(
            ox_length,
            fuel_length,
            total_length,
            dry_mass = dry,
            loaded_mass = loaded,
            "sized tank stack"
        );

        let mut cg_from_top = Vec::with_capacity(times.len());
        let mut mass = Vec::with_capacity(times.len());
        for t in times.iter().map(|t| t.value) {
            let ox_left = (ox_liquid - t * ox_flow).max(0.0);
            let fuel_left = (fuel_liquid - t * fuel_flow).max(0.0);
            let ox_column = ox_left / rho_ox / (area * ox_site.area_fraction);
            let fuel_column = fuel_left / rho_fuel / (area * fuel_site.area_fraction);

            let m_t = dry + ox_left + fuel_left;
            let moment_t = moment
                + ox_left * (ox_site.base + 0.5 * ox_column)
                + fuel_left * (fuel_site.base + 0.5 * fuel_column);

            mass.push(kg(m_t));
            cg_from_top.push(m(total_length - moment_t / m_t));
        }

        Ok(TankCgHistory {
            times: times.to_vec(),
            cg_from_top,
            mass,
            total_length: m(total_length),
            loaded_mass: kg(loaded),
            dry_mass: kg(dry),
            oxidizer_tank_length: m(ox_length),
            fuel_tank_length: m(fuel_length),
            oxidizer_density: kgpm3(rho_ox),
            fuel_density: kgpm3(rho_fuel),
        })
    }
}

/// `(liquid mass in the column, gaseous dead mass)` for one side.
fn split_dead(total: f64, operational: f64, phase: DeadPhase) -> (f64, f64) {
    match phase {
        DeadPhase::Liquid => (total, 0.0),
        DeadPhase::Gas => (operational, total - operational),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eg_core::units::{bar, k, kgps};
    use eg_fluids::IncompressibleLiquidModel;

    const MDOT: f64 = 2.2;

    fn system(stack: Vec<StackItem>) -> TankSystem {
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
                dead_phase: DeadPhase::Gas,
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

    fn separate() -> Vec<StackItem> {
        vec![
            StackItem::Component {
                mass: kg(1.0),
                length: m(0.41),
            },
            StackItem::Component {
                mass: kg(3.5),
                length: m(0.3),
            },
            StackItem::OxidizerTank,
            StackItem::FuelTank,
            StackItem::Component {
                mass: kg(3.5),
                length: m(0.3),
            },
        ]
    }

    fn evaluate(sys: &TankSystem, steps: usize) -> TankCgHistory {
        let fluids = IncompressibleLiquidModel::propellants();
        sys.evaluate(&fluids, kgps(MDOT), &sample_times(sys.burn_time, steps))
            .unwrap()
    }

    #[test]
    fn sample_times_cover_burn() {
        let t = sample_times(s(30.0), 4);
        assert_eq!(t.len(), 5);
        assert_eq!(t[0].value, 0.0);
        assert_eq!(t[4].value, 30.0);
        assert_eq!(sample_times(s(30.0), 0).len(), 1);
    }

    #[test]
    fn tank_lengths_follow_volumes() {
        let sys = system(separate());
        let h = evaluate(&sys, 10);
        let area = 0.25 * PI * 0.04;
        let ox_total = MDOT * 30.0 * 3.4 / 4.4 * 1.05;
        let fuel_total = MDOT * 30.0 / 4.4 * 1.05;
        let ox_len = ox_total / h.oxidizer_density.value / area;
        let fuel_len = fuel_total / h.fuel_density.value / area;
        assert!((h.oxidizer_tank_length.value - ox_len).abs() < 1e-12);
        assert!((h.fuel_tank_length.value - fuel_len).abs() < 1e-12);
        assert!((h.total_length.value - (1.01 + ox_len + fuel_len)).abs() < 1e-12);
    }

    #[test]
    fn gaseous_dead_mass_counts_as_dry() {
        let sys = system(separate());
        let h = evaluate(&sys, 10);
        let ox_dead = MDOT * 30.0 * 3.4 / 4.4 * 0.05;
        let walls = (h.oxidizer_tank_length.value + h.fuel_tank_length.value) * 2.5;
        assert!((h.dry_mass.value - (8.0 + walls + ox_dead)).abs() < 1e-9);
    }

    #[test]
    fn mass_drains_at_engine_flow() {
        let sys = system(separate());
        let h = evaluate(&sys, 30);
        assert_eq!(h.mass[0], h.loaded_mass);
        for w in h.mass.windows(2) {
            assert!((w[0].value - w[1].value - MDOT).abs() < 1e-9);
        }
        // Liquid dead fuel stays aboard at burnout
        let fuel_dead = MDOT * 30.0 / 4.4 * 0.05;
        let last = h.mass.last().unwrap().value;
        assert!((last - (h.dry_mass.value + fuel_dead)).abs() < 1e-9);
    }

    #[test]
    fn cg_at_ignition_matches_hand_calculation() {
        let sys = system(separate());
        let h = evaluate(&sys, 1);
        let lo = h.oxidizer_tank_length.value;
        let lf = h.fuel_tank_length.value;
        let ox_liquid = MDOT * 30.0 * 3.4 / 4.4;
        let ox_dead = ox_liquid * 0.05;
        let fuel_liquid = MDOT * 30.0 / 4.4 * 1.05;

        let ox_base = 0.71;
        let fuel_base = 0.71 + lo;
        let ox_col = ox_liquid / h.oxidizer_density.value / (0.25 * PI * 0.04);
        let moment = 1.0 * 0.205
            + 3.5 * 0.56
            + (lo * 2.5 + ox_dead) * (ox_base + 0.5 * lo)
            + lf * 2.5 * (fuel_base + 0.5 * lf)
            + 3.5 * (fuel_base + lf + 0.15)
            + ox_liquid * (ox_base + 0.5 * ox_col)
            + fuel_liquid * (fuel_base + 0.5 * lf);
        let expected = h.total_length.value - moment / h.loaded_mass.value;
        assert!((h.cg_from_top[0].value - expected).abs() < 1e-9);
    }

    #[test]
    fn coaxial_columns_share_length_and_base() {
        let sys = system(vec![
            StackItem::Component {
                mass: kg(1.0),
                length: m(0.41),
            },
            StackItem::Coaxial,
            StackItem::Component {
                mass: kg(3.5),
                length: m(0.3),
            },
        ]);
        let h = evaluate(&sys, 5);
        assert_eq!(h.oxidizer_tank_length, h.fuel_tank_length);

        let v_ox = MDOT * 30.0 * 3.4 / 4.4 * 1.05 / h.oxidizer_density.value;
        let v_f = MDOT * 30.0 / 4.4 * 1.05 / h.fuel_density.value;
        let expected = (v_ox + v_f) / (0.25 * PI * 0.04);
        assert!((h.oxidizer_tank_length.value - expected).abs() < 1e-9);
        assert!((h.total_length.value - (0.71 + expected)).abs() < 1e-9);
    }

    #[test]
    fn rejects_bad_stacks() {
        let fluids = IncompressibleLiquidModel::propellants();
        let cases = [
            vec![StackItem::OxidizerTank],
            vec![StackItem::FuelTank],
            vec![StackItem::OxidizerTank, StackItem::OxidizerTank, StackItem::FuelTank],
            vec![StackItem::Coaxial, StackItem::FuelTank],
            vec![StackItem::Coaxial, StackItem::Coaxial],
        ];
        for stack in cases {
            let err = system(stack)
                .evaluate(&fluids, kgps(MDOT), &[s(0.0)])
                .unwrap_err();
            assert!(matches!(err, TankError::InvalidStack { .. }), "{err}");
        }
    }

    #[test]
    fn rejects_times_past_burnout() {
        let fluids = IncompressibleLiquidModel::propellants();
        let err = system(separate())
            .evaluate(&fluids, kgps(MDOT), &[s(0.0), s(31.0)])
            .unwrap_err();
        assert_eq!(
            err,
            TankError::TimeOutOfRange {
                t: 31.0,
                burn_time: 30.0
            }
        );
        assert!(
            system(separate())
                .evaluate(&fluids, kgps(MDOT), &[s(-1.0)])
                .is_err()
        );
    }

    #[test]
    fn rejects_non_physical_inputs() {
        let fluids = IncompressibleLiquidModel::propellants();
        let mut sys = system(separate());
        sys.mixture_ratio = 0.0;
        assert!(sys.evaluate(&fluids, kgps(MDOT), &[s(0.0)]).is_err());

        let sys = system(separate());
        assert!(sys.evaluate(&fluids, kgps(0.0), &[s(0.0)]).is_err());
    }

    #[test]
    fn structure_scales_with_diameter() {
        let law = StructureLaw::new(2.5, m(0.2));
        assert!((law.mass_per_length(m(0.1)) - 1.25).abs() < 1e-12);
        assert!((law.mass_per_length(m(0.2)) - 2.5).abs() < 1e-12);
    }

    proptest::proptest! {
        #[test]
        fn cg_stays_inside_stack(mdot in 0.2_f64..10.0, frac in 0.0_f64..=1.0, coax in proptest::bool::ANY) {
            let stack = if coax {
                vec![StackItem::Coaxial, StackItem::Component { mass: kg(2.0), length: m(0.3) }]
            } else {
                separate()
            };
            let sys = system(stack);
            let fluids = IncompressibleLiquidModel::propellants();
            let h = sys.evaluate(&fluids, kgps(mdot), &[s(30.0 * frac)]).unwrap();
            let cg = h.cg_from_top[0].value;
            proptest::prop_assert!(cg >= 0.0 && cg <= h.total_length.value);
        }
    }
}
