//! Engine sizing and off-design performance.

use crate::error::{EngineError, EngineResult};
use crate::propellant::{AdjustedPropellant, adjust_propellant};
use eg_combustion::{
    AmbientIsp, CombustionBackend, CombustionModel, CombustionSetup, PropellantCard,
    PropellantRole,
};
use eg_core::units::constants::G0_MPS2;
use eg_core::units::{
    Area, Force, Length, MassRate, Pressure, Temperature, Velocity, kgps, m, m2, mps, newtons, pa,
};
use eg_fluids::{FluidModel, Species};
use std::f64::consts::PI;
use std::fmt;
use tracing::{debug, info, warn};

/// Chamber-to-throat area ratio used when none is given.
pub const DEFAULT_CONTRACTION_RATIO: f64 = 2.5;

/// A propellant as the engine is fed with it.
#[derive(Debug, Clone, PartialEq)]
pub struct PropellantInput {
    pub card: PropellantCard,
    /// Storage temperature
    pub temperature: Temperature,
    /// Fluid for constituents whose card entry names none
    pub fluid: Option<Species>,
}

/// Design inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSpec {
    pub name: String,
    pub fuel: PropellantInput,
    pub oxidizer: PropellantInput,
    /// Oxidizer-to-fuel mass ratio
    pub mixture_ratio: f64,
    pub chamber_pressure: Pressure,
    /// Ambient pressure the nozzle is optimally expanded to
    pub reference_ambient_pressure: Pressure,
    /// Thrust at the reference ambient pressure
    pub reference_thrust: Force,
    /// Applied to both c* and exhaust velocity, in (0, 1]
    pub efficiency: f64,
    /// `None` for an infinite-area combustor
    pub contraction_ratio: Option<f64>,
}

impl EngineSpec {
    pub fn validate(&self) -> EngineResult<()> {
        if self.fuel.card.role != PropellantRole::Fuel {
            return Err(EngineError::InvalidArg {
                what: "fuel card must have the fuel role",
            });
        }
        if self.oxidizer.card.role != PropellantRole::Oxidizer {
            return Err(EngineError::InvalidArg {
                what: "oxidizer card must have the oxidizer role",
            });
        }
        positive(self.mixture_ratio, "mixture ratio")?;
        positive(self.chamber_pressure.value, "chamber pressure")?;
        positive(self.reference_ambient_pressure.value, "reference ambient pressure")?;
        positive(self.reference_thrust.value, "reference thrust")?;
        positive(self.efficiency, "engine efficiency")?;
        if self.efficiency > 1.0 {
            return Err(EngineError::NonPhysical {
                what: "engine efficiency",
                value: self.efficiency,
            });
        }
        if self.chamber_pressure.value <= self.reference_ambient_pressure.value {
            return Err(EngineError::InvalidArg {
                what: "chamber pressure must exceed reference ambient pressure",
            });
        }
        if let Some(cr) = self.contraction_ratio
            && !(cr.is_finite() && cr > 1.0)
        {
            return Err(EngineError::NonPhysical {
                what: "contraction ratio",
                value: cr,
            });
        }
        Ok(())
    }
}

fn positive(value: f64, what: &'static str) -> EngineResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(EngineError::NonPhysical { what, value })
    }
}

/// Off-design operating point; unset fields fall back to the design values.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OperatingPoint {
    pub ambient_pressure: Option<Pressure>,
    pub mass_flow: Option<MassRate>,
    pub mixture_ratio: Option<f64>,
    pub chamber_pressure: Option<Pressure>,
}

impl OperatingPoint {
    pub fn design() -> Self {
        Self::default()
    }

    pub fn at_ambient(mut self, p: Pressure) -> Self {
        self.ambient_pressure = Some(p);
        self
    }

    pub fn with_mass_flow(mut self, mdot: MassRate) -> Self {
        self.mass_flow = Some(mdot);
        self
    }

    pub fn with_mixture_ratio(mut self, mr: f64) -> Self {
        self.mixture_ratio = Some(mr);
        self
    }

    pub fn with_chamber_pressure(mut self, pc: Pressure) -> Self {
        self.chamber_pressure = Some(pc);
        self
    }
}

/// Thrust evaluated at one operating point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrustPoint {
    pub ambient_pressure: Pressure,
    pub chamber_pressure: Pressure,
    pub mass_flow: MassRate,
    pub thrust: Force,
    pub performance: AmbientIsp,
}

impl ThrustPoint {
    /// Specific impulse [s].
    pub fn isp_seconds(&self) -> f64 {
        self.performance.isp_seconds()
    }
}

/// A sized engine bound to its configured combustion model.
#[derive(Debug, Clone)]
pub struct Engine<M> {
    spec: EngineSpec,
    model: M,
    fuel: AdjustedPropellant,
    oxidizer: AdjustedPropellant,
    area_ratio: f64,
    reference: AmbientIsp,
    mass_flow: MassRate,
    fuel_mass_flow: MassRate,
    oxidizer_mass_flow: MassRate,
    combustion_temperature: Temperature,
    cstar: Velocity,
    throat_area: Area,
    throat_diameter: Length,
    exit_diameter: Length,
}

impl<M: CombustionModel> Engine<M> {
    /// Size an engine for `spec`.
    pub fn design<F, B>(spec: EngineSpec, fluids: &F, backend: &B) -> EngineResult<Self>
    where
        F: FluidModel + ?Sized,
        B: CombustionBackend<Model = M> + ?Sized,
    {
        spec.validate()?;

        let fuel = adjust_propellant(fluids, &spec.fuel.card, spec.fuel.temperature, spec.fuel.fluid)?;
        let oxidizer = adjust_propellant(
            fluids,
            &spec.oxidizer.card,
            spec.oxidizer.temperature,
            spec.oxidizer.fluid,
        )?;

        let model = backend.configure(&CombustionSetup {
            fuel: fuel.card.clone(),
            oxidizer: oxidizer.card.clone(),
            contraction_ratio: spec.contraction_ratio,
        })?;

        let pc = spec.chamber_pressure;
        let mr = spec.mixture_ratio;
        let pamb = spec.reference_ambient_pressure;

        let area_ratio = model.eps_at_pc_over_pe(pc, mr, pc.value / pamb.value)?;
        let reference = model
            .estimate_ambient_isp(pc, mr, area_ratio, pamb)?
            .scaled(spec.efficiency);
        warn_on_separation(&spec.name, &reference);

        let ve = positive(reference.velocity.value, "reference exhaust velocity")?;
        let mdot = spec.reference_thrust.value / ve;
        let fuel_mdot = mdot / (mr + 1.0);
        let ox_mdot = mdot / (mr + 1.0) * mr;

        let combustion_temperature = model.combustion_temperature(pc, mr)?;
        let cstar = model.cstar(pc, mr)?.value * spec.efficiency;

        let throat_area = mdot * cstar / pc.value;
        let throat_diameter = 2.0 * (throat_area / PI).sqrt();
        let exit_diameter = 2.0 * (throat_area * area_ratio / PI).sqrt();

        debug!(
            engine = %spec.name,
            backend = backend.name(),
            area_ratio,
            ve,
            mdot,
            cstar,
            throat_diameter,
            "engine sized"
        );
        info!(
            engine = %spec.name,
            isp_s = reference.isp_seconds(),
            throat_mm = throat_diameter * 1e3,
            "design point solved"
        );

        Ok(Self {
            spec,
            model,
            fuel,
            oxidizer,
            area_ratio,
            reference,
            mass_flow: kgps(mdot),
            fuel_mass_flow: kgps(fuel_mdot),
            oxidizer_mass_flow: kgps(ox_mdot),
            combustion_temperature,
            cstar: mps(cstar),
            throat_area: m2(throat_area),
            throat_diameter: m(throat_diameter),
            exit_diameter: m(exit_diameter),
        })
    }

    pub fn spec(&self) -> &EngineSpec {
        &self.spec
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn fuel(&self) -> &AdjustedPropellant {
        &self.fuel
    }

    pub fn oxidizer(&self) -> &AdjustedPropellant {
        &self.oxidizer
    }

    /// Nozzle exit-to-throat area ratio.
    pub fn area_ratio(&self) -> f64 {
        self.area_ratio
    }

    /// Efficiency-corrected exhaust velocity at the reference ambient pressure.
    pub fn reference_exhaust_velocity(&self) -> Velocity {
        self.reference.velocity
    }

    pub fn reference_performance(&self) -> AmbientIsp {
        self.reference
    }

    /// Specific impulse at the reference ambient pressure [s].
    pub fn reference_isp(&self) -> f64 {
        self.reference.velocity.value / G0_MPS2
    }

    pub fn mass_flow(&self) -> MassRate {
        self.mass_flow
    }

    pub fn fuel_mass_flow(&self) -> MassRate {
        self.fuel_mass_flow
    }

    pub fn oxidizer_mass_flow(&self) -> MassRate {
        self.oxidizer_mass_flow
    }

    pub fn combustion_temperature(&self) -> Temperature {
        self.combustion_temperature
    }

    /// Efficiency-corrected characteristic velocity.
    pub fn cstar(&self) -> Velocity {
        self.cstar
    }

    pub fn throat_area(&self) -> Area {
        self.throat_area
    }

    pub fn throat_diameter(&self) -> Length {
        self.throat_diameter
    }

    pub fn exit_diameter(&self) -> Length {
        self.exit_diameter
    }

    /// Efficiency-corrected exhaust velocity at an operating point.
    ///
    /// The nozzle geometry stays fixed; mixture ratio and chamber pressure
    /// default to the design values.
    pub fn exhaust_velocity(&self, point: &OperatingPoint) -> EngineResult<AmbientIsp> {
        let pamb = point
            .ambient_pressure
            .unwrap_or(self.spec.reference_ambient_pressure);
        let mr = point.mixture_ratio.unwrap_or(self.spec.mixture_ratio);
        let pc = point.chamber_pressure.unwrap_or(self.spec.chamber_pressure);

        let perf = self
            .model
            .estimate_ambient_isp(pc, mr, self.area_ratio, pamb)?
            .scaled(self.spec.efficiency);
        warn_on_separation(&self.spec.name, &perf);
        Ok(perf)
    }

    /// Chamber pressure a given mass flow produces through the fixed throat.
    pub fn chamber_pressure_for(&self, mass_flow: MassRate) -> Pressure {
        pa(self.cstar.value * mass_flow.value / self.throat_area.value)
    }

    /// Thrust at an operating point.
    ///
    /// Without an explicit chamber pressure, the chamber pressure follows the
    /// mass flow through the fixed throat (`pc = c*·ṁ/At`).
    pub fn thrust(&self, point: &OperatingPoint) -> EngineResult<ThrustPoint> {
        let mdot = point.mass_flow.unwrap_or(self.mass_flow);
        positive(mdot.value, "mass flow")?;
        let pc = point
            .chamber_pressure
            .unwrap_or_else(|| self.chamber_pressure_for(mdot));
        let pamb = point
            .ambient_pressure
            .unwrap_or(self.spec.reference_ambient_pressure);

        let performance = self.exhaust_velocity(&OperatingPoint {
            ambient_pressure: Some(pamb),
            mass_flow: Some(mdot),
            mixture_ratio: point.mixture_ratio,
            chamber_pressure: Some(pc),
        })?;

        Ok(ThrustPoint {
            ambient_pressure: pamb,
            chamber_pressure: pc,
            mass_flow: mdot,
            thrust: newtons(mdot.value * performance.velocity.value),
            performance,
        })
    }

    /// Specific impulse at an operating point [s].
    pub fn isp(&self, point: &OperatingPoint) -> EngineResult<f64> {
        Ok(self.exhaust_velocity(point)?.isp_seconds())
    }

    /// Input/output report, as printed by `Display`.
    pub fn summary(&self) -> String {
        self.to_string()
    }

    /// Design-flow thrust over a list of ambient pressures (e.g. an ascent).
    pub fn thrust_sweep(&self, ambient: &[Pressure]) -> EngineResult<Vec<ThrustPoint>> {
        ambient
            .iter()
            .map(|&p| self.thrust(&OperatingPoint::design().at_ambient(p)))
            .collect()
    }
}

fn warn_on_separation(engine: &str, perf: &AmbientIsp) {
    if perf.mode.is_separated() {
        warn!(engine, mode = %perf.mode, "flow separation in nozzle");
    }
}

impl<M: CombustionModel> fmt::Display for Engine<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.spec;
        writeln!(f, "Engine Input Parameters:")?;
        writeln!(f, "    name: {}", s.name)?;
        writeln!(
            f,
            "    fuel: {} at {:.2} K",
            s.fuel.card.name, s.fuel.temperature.value
        )?;
        writeln!(
            f,
            "    oxidizer: {} at {:.2} K",
            s.oxidizer.card.name, s.oxidizer.temperature.value
        )?;
        writeln!(f, "    oxidizerFuelRatio: {}", s.mixture_ratio)?;
        writeln!(f, "    chamberPressure: {} bar", s.chamber_pressure.value / 1e5)?;
        writeln!(f, "    referenceThrust: {} N", s.reference_thrust.value)?;
        writeln!(
            f,
            "    referenceAmbientPressure: {} bar",
            s.reference_ambient_pressure.value / 1e5
        )?;
        writeln!(f, "    engineEfficiency: {}", s.efficiency)?;
        writeln!(f, "Engine Output Parameters:")?;
        writeln!(f, "    throatDiameter: {:.1} mm", self.throat_diameter.value * 1e3)?;
        writeln!(f, "    nozzleDiameter: {:.1} mm", self.exit_diameter.value * 1e3)?;
        writeln!(f, "    areaRatio: {:.2}", self.area_ratio)?;
        writeln!(
            f,
            "    combustionTemperature: {:.1} K",
            self.combustion_temperature.value
        )?;
        writeln!(f, "    c*: {:.1} m/s", self.cstar.value)?;
        writeln!(f, "    referenceIsp: {:.1} s", self.reference_isp())?;
        writeln!(f, "    expansion: {}", self.reference.mode)?;
        writeln!(f, "    massFlow: {:.3} kg/s", self.mass_flow.value)?;
        writeln!(f, "    fuelMassFlow: {:.2} g/s", self.fuel_mass_flow.value * 1e3)?;
        write!(
            f,
            "    oxidizerMassFlow: {:.2} g/s",
            self.oxidizer_mass_flow.value * 1e3
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eg_combustion::catalog;
    use eg_combustion::ideal::{IdealRocketBackend, ProductTable};
    use eg_core::units::{bar, k};
    use eg_fluids::IncompressibleLiquidModel;

    fn spec() -> EngineSpec {
        EngineSpec {
            name: "Amalia".into(),
            fuel: PropellantInput {
                card: catalog::card("Ethanol").unwrap(),
                temperature: k(298.15),
                fluid: None,
            },
            oxidizer: PropellantInput {
                card: catalog::card("N2O").unwrap(),
                temperature: k(298.15),
                fluid: None,
            },
            mixture_ratio: 3.4,
            chamber_pressure: bar(25.0),
            reference_ambient_pressure: bar(1.0),
            reference_thrust: newtons(5000.0),
            efficiency: 0.9,
            contraction_ratio: Some(DEFAULT_CONTRACTION_RATIO),
        }
    }

    fn design(spec: EngineSpec) -> EngineResult<Engine<eg_combustion::ideal::IdealRocketModel>> {
        let fluids = IncompressibleLiquidModel::propellants();
        let backend = IdealRocketBackend::new(ProductTable::ethanol_n2o().unwrap());
        Engine::design(spec, &fluids, &backend)
    }

    #[test]
    fn mass_flow_split_follows_mixture_ratio() {
        let e = design(spec()).unwrap();
        let total = e.mass_flow().value;
        assert!((e.fuel_mass_flow().value + e.oxidizer_mass_flow().value - total).abs() < 1e-12);
        assert!((e.oxidizer_mass_flow().value / e.fuel_mass_flow().value - 3.4).abs() < 1e-9);
    }

    #[test]
    fn thrust_at_design_point_matches_reference() {
        let e = design(spec()).unwrap();
        let t = e.thrust(&OperatingPoint::design()).unwrap();
        assert!((t.thrust.value - 5000.0).abs() < 1e-6 * 5000.0);
        assert!((t.chamber_pressure.value - 25.0e5).abs() < 1e-6 * 25.0e5);
    }

    #[test]
    fn throat_area_satisfies_cstar_relation() {
        let e = design(spec()).unwrap();
        let at = e.mass_flow().value * e.cstar().value / 25.0e5;
        assert!((e.throat_area().value - at).abs() < 1e-15);
        let d = e.throat_diameter().value;
        assert!((PI * d * d / 4.0 - at).abs() < 1e-12);
        let ratio = (e.exit_diameter().value / d).powi(2);
        assert!((ratio - e.area_ratio()).abs() < 1e-9);
    }

    #[test]
    fn efficiency_scales_isp() {
        let full = design(EngineSpec {
            efficiency: 1.0,
            ..spec()
        })
        .unwrap();
        let derated = design(spec()).unwrap();
        assert!((derated.reference_isp() / full.reference_isp() - 0.9).abs() < 1e-9);
        assert!(derated.mass_flow().value > full.mass_flow().value);
    }

    #[test]
    fn vacuum_thrust_exceeds_sea_level() {
        let e = design(spec()).unwrap();
        let sweep = e.thrust_sweep(&[bar(1.0), bar(0.5), bar(0.0)]).unwrap();
        assert_eq!(sweep.len(), 3);
        assert!(sweep[0].thrust.value < sweep[1].thrust.value);
        assert!(sweep[1].thrust.value < sweep[2].thrust.value);
        assert!(sweep.iter().all(|p| p.mass_flow == e.mass_flow()));
    }

    #[test]
    fn throttling_lowers_chamber_pressure() {
        let e = design(spec()).unwrap();
        let half = e.mass_flow() * 0.5;
        let t = e
            .thrust(&OperatingPoint::design().with_mass_flow(half))
            .unwrap();
        assert!((t.chamber_pressure.value - 12.5e5).abs() < 1e-6 * 12.5e5);
        assert!(t.thrust.value < 2500.0);
    }

    #[test]
    fn deep_throttle_at_sea_level_separates() {
        let e = design(spec()).unwrap();
        let t = e
            .thrust(&OperatingPoint::design().with_mass_flow(e.mass_flow() * 0.3))
            .unwrap();
        assert!(t.performance.mode.is_separated(), "mode = {}", t.performance.mode);
    }

    #[test]
    fn rejects_swapped_propellants() {
        let mut s = spec();
        std::mem::swap(&mut s.fuel, &mut s.oxidizer);
        assert!(matches!(design(s), Err(EngineError::InvalidArg { .. })));
    }

    #[test]
    fn rejects_non_physical_inputs() {
        assert!(design(EngineSpec { efficiency: 1.2, ..spec() }).is_err());
        assert!(design(EngineSpec { mixture_ratio: 0.0, ..spec() }).is_err());
        assert!(design(EngineSpec { contraction_ratio: Some(1.0), ..spec() }).is_err());
        assert!(
            design(EngineSpec {
                reference_ambient_pressure: bar(30.0),
                ..spec()
            })
            .is_err()
        );
    }

    #[test]
    fn report_lists_outputs() {
        let e = design(spec()).unwrap();
        let text = e.to_string();
        assert!(text.contains("throatDiameter"));
        assert!(text.contains("name: Amalia"));
        assert!(text.contains("expansion: Ideal"));
    }
}
