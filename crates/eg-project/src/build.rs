//! Turn a validated project into model inputs.

use crate::schema::{
    BuiltinTableDef, CombustionDef, DeadPhaseDef, Project, PropellantDef, StackItemDef, StateDef,
    TankFluidDef,
};
use crate::validate::{parse_species, resolve_card};
use crate::{FluidBackendDef, ProjectResult};
use eg_combustion::ideal::{IdealRocketBackend, IdealRocketModel, ProductRow, ProductTable};
use eg_core::units::{Pressure, bar, k, kg, m, newtons, pa, s};
use eg_engine::{Engine, EngineSpec, PropellantInput};
use eg_fluids::{CoolPropModel, FluidModel, IncompressibleLiquidModel, StateInput};
use eg_tanks::{DeadPhase, StackItem, StructureLaw, TankFluid, TankSystem};

impl Project {
    /// Fluid property backend selected by the project.
    pub fn fluid_model(&self) -> Box<dyn FluidModel> {
        match self.fluids {
            FluidBackendDef::CoolProp => Box::new(CoolPropModel::new()),
            FluidBackendDef::Incompressible => Box::new(IncompressibleLiquidModel::propellants()),
        }
    }

    pub fn combustion_backend(&self) -> ProjectResult<IdealRocketBackend> {
        let table = match &self.combustion {
            CombustionDef::Builtin {
                table: BuiltinTableDef::EthanolN2o,
            } => ProductTable::ethanol_n2o()?,
            CombustionDef::Builtin {
                table: BuiltinTableDef::EthanolLox,
            } => ProductTable::ethanol_lox()?,
            CombustionDef::Table {
                rows,
                reference_fuel,
                reference_oxidizer,
            } => ProductTable::new(
                rows.iter()
                    .map(|r| {
                        ProductRow::new(
                            r.mixture_ratio,
                            r.chamber_temperature_k,
                            r.gamma,
                            r.molar_mass,
                        )
                    })
                    .collect(),
                &resolve_card(reference_fuel)?,
                &resolve_card(reference_oxidizer)?,
            )?,
        };
        Ok(IdealRocketBackend::new(table))
    }

    pub fn engine_spec(&self) -> ProjectResult<EngineSpec> {
        let e = &self.engine;
        Ok(EngineSpec {
            name: e.name.clone(),
            fuel: propellant_input(&e.fuel)?,
            oxidizer: propellant_input(&e.oxidizer)?,
            mixture_ratio: e.mixture_ratio,
            chamber_pressure: pa(e.chamber_pressure_pa),
            reference_ambient_pressure: pa(e.reference_ambient_pressure_pa),
            reference_thrust: newtons(e.thrust_n),
            efficiency: e.efficiency,
            contraction_ratio: e.contraction_ratio,
        })
    }

    /// Size the engine with the project's fluid and combustion backends.
    pub fn design_engine(&self) -> ProjectResult<Engine<IdealRocketModel>> {
        let fluids = self.fluid_model();
        let backend = self.combustion_backend()?;
        Ok(Engine::design(self.engine_spec()?, fluids.as_ref(), &backend)?)
    }

    /// Tank system, if the project describes one. Uses the engine mixture ratio.
    pub fn tank_system(&self) -> ProjectResult<Option<TankSystem>> {
        let Some(t) = &self.tanks else {
            return Ok(None);
        };
        let stack = t
            .stack
            .iter()
            .map(|item| match item {
                StackItemDef::Component {
                    mass_kg, length_m, ..
                } => StackItem::Component {
                    mass: kg(*mass_kg),
                    length: m(*length_m),
                },
                StackItemDef::OxidizerTank => StackItem::OxidizerTank,
                StackItemDef::FuelTank => StackItem::FuelTank,
                StackItemDef::Coaxial => StackItem::Coaxial,
            })
            .collect();
        Ok(Some(TankSystem {
            burn_time: s(t.burn_time_s),
            mixture_ratio: self.engine.mixture_ratio,
            tank_diameter: m(t.tank_diameter_m),
            structure: StructureLaw::new(
                t.structure_mass_per_length_kg_per_m,
                m(t.structure_reference_diameter_m),
            ),
            oxidizer: tank_fluid(&t.oxidizer)?,
            fuel: tank_fluid(&t.fuel)?,
            stack,
        }))
    }

    /// Ambient pressures for the thrust sweep; sea level when none are listed.
    pub fn sweep_pressures(&self) -> Vec<Pressure> {
        if self.analysis.ambient_pressures_pa.is_empty() {
            vec![bar(1.01325)]
        } else {
            self.analysis
                .ambient_pressures_pa
                .iter()
                .map(|&p| pa(p))
                .collect()
        }
    }
}

fn propellant_input(def: &PropellantDef) -> ProjectResult<PropellantInput> {
    Ok(PropellantInput {
        card: resolve_card(&def.card)?,
        temperature: k(def.temperature_k),
        fluid: def.fluid.as_deref().map(parse_species).transpose()?,
    })
}

fn tank_fluid(def: &TankFluidDef) -> ProjectResult<TankFluid> {
    let state = match def.state {
        StateDef::PT {
            pressure_pa,
            temperature_k,
        } => StateInput::PT {
            p: pa(pressure_pa),
            t: k(temperature_k),
        },
        StateDef::TQ {
            temperature_k,
            quality,
        } => StateInput::TQ {
            t: k(temperature_k),
            q: quality,
        },
        StateDef::PQ { pressure_pa, quality } => StateInput::PQ {
            p: pa(pressure_pa),
            q: quality,
        },
    };
    Ok(TankFluid {
        species: parse_species(&def.species)?,
        state,
        dead_fraction: def.dead_fraction,
        dead_phase: match def.dead_phase {
            DeadPhaseDef::Liquid => DeadPhase::Liquid,
            DeadPhaseDef::Gas => DeadPhase::Gas,
        },
    })
}
