//! Project schema definitions.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub version: u32,
    pub name: String,
    pub engine: EngineDef,
    #[serde(default)]
    pub combustion: CombustionDef,
    #[serde(default)]
    pub fluids: FluidBackendDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tanks: Option<TankSystemDef>,
    #[serde(default)]
    pub analysis: AnalysisDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineDef {
    pub name: String,
    pub fuel: PropellantDef,
    pub oxidizer: PropellantDef,
    pub mixture_ratio: f64,
    pub chamber_pressure_pa: f64,
    pub reference_ambient_pressure_pa: f64,
    pub thrust_n: f64,
    #[serde(default = "default_efficiency")]
    pub efficiency: f64,
    /// `null` for an infinite-area combustor
    #[serde(default = "default_contraction_ratio")]
    pub contraction_ratio: Option<f64>,
}

fn default_efficiency() -> f64 {
    1.0
}

fn default_contraction_ratio() -> Option<f64> {
    Some(eg_engine::DEFAULT_CONTRACTION_RATIO)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropellantDef {
    pub card: CardDef,
    pub temperature_k: f64,
    /// Fluid for constituents whose card names none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fluid: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum CardDef {
    Catalog { name: String },
    EthanolWater { water_percent: f64 },
    /// CEA reactant input text
    Cea { name: String, text: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum CombustionDef {
    Builtin {
        table: BuiltinTableDef,
    },
    Table {
        rows: Vec<ProductRowDef>,
        reference_fuel: CardDef,
        reference_oxidizer: CardDef,
    },
}

impl Default for CombustionDef {
    fn default() -> Self {
        CombustionDef::Builtin {
            table: BuiltinTableDef::EthanolN2o,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinTableDef {
    EthanolN2o,
    EthanolLox,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ProductRowDef {
    pub mixture_ratio: f64,
    pub chamber_temperature_k: f64,
    pub gamma: f64,
    pub molar_mass: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FluidBackendDef {
    #[default]
    CoolProp,
    Incompressible,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TankSystemDef {
    pub burn_time_s: f64,
    pub tank_diameter_m: f64,
    pub structure_mass_per_length_kg_per_m: f64,
    pub structure_reference_diameter_m: f64,
    pub oxidizer: TankFluidDef,
    pub fuel: TankFluidDef,
    /// Bottom to top
    pub stack: Vec<StackItemDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TankFluidDef {
    pub species: String,
    pub state: StateDef,
    #[serde(default)]
    pub dead_fraction: f64,
    #[serde(default)]
    pub dead_phase: DeadPhaseDef,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum StateDef {
    PT { pressure_pa: f64, temperature_k: f64 },
    TQ { temperature_k: f64, quality: f64 },
    PQ { pressure_pa: f64, quality: f64 },
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeadPhaseDef {
    #[default]
    Liquid,
    Gas,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum StackItemDef {
    Component {
        #[serde(default)]
        name: String,
        mass_kg: f64,
        length_m: f64,
    },
    OxidizerTank,
    FuelTank,
    Coaxial,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisDef {
    /// Ambient pressures for the thrust sweep
    #[serde(default)]
    pub ambient_pressures_pa: Vec<f64>,
    #[serde(default = "default_cg_steps")]
    pub cg_steps: usize,
}

fn default_cg_steps() -> usize {
    30
}

impl Default for AnalysisDef {
    fn default() -> Self {
        Self {
            ambient_pressures_pa: Vec::new(),
            cg_steps: default_cg_steps(),
        }
    }
}
