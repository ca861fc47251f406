//! eg-fluids: propellant fluid properties for enginegen.
//!
//! Provides:
//! - Propellant species definitions (ethanol, N2O, LOX, etc.)
//! - Thermodynamic state representation (P-T and saturated T-Q / P-Q inputs)
//! - FluidModel trait for property calculations
//! - CoolProp backend for real fluid properties
//! - Incompressible-liquid model for offline work and species CoolProp lacks
//!
//! # Architecture
//!
//! The `FluidModel` trait isolates the engine and tank models from the
//! real-fluid backend. The engine only needs saturated-liquid enthalpy and
//! liquid density, so the trait surface is kept to those queries plus cp.
//!
//! # Example
//!
//! ```no_run
//! use eg_fluids::{CoolPropModel, FluidModel, Species, StateInput};
//! use eg_core::units::k;
//!
//! let model = CoolPropModel::new();
//! let input = StateInput::TQ { t: k(298.15), q: 0.0 };
//!
//! let state = model.state(input, Species::Ethanol).unwrap();
//! let h = model.h(&state).unwrap();
//! println!("Saturated liquid enthalpy: {} J/kg", h);
//! ```

pub mod coolprop;
pub mod error;
pub mod liquid;
pub mod model;
pub mod species;
pub mod state;

// Re-exports for ergonomics
pub use coolprop::CoolPropModel;
pub use error::{FluidError, FluidResult};
pub use liquid::{IncompressibleLiquidModel, LiquidProperties};
pub use model::FluidModel;
pub use species::Species;
pub use state::{SpecEnthalpy, SpecHeatCapacity, StateInput, ThermoState};
