//! eg-combustion: propellant cards and combustion performance for enginegen.
//!
//! Provides:
//! - `PropellantCard`: CEA-style thermochemical description of a propellant or blend
//! - A catalog of common liquid propellant cards
//! - `CombustionModel` trait: the seam to an equilibrium combustion solver
//! - Ambient Isp estimation with nozzle flow-separation detection
//! - An ideal-rocket backend (frozen, calorically perfect products)
//!
//! # Example
//!
//! ```
//! use eg_combustion::{catalog, CombustionBackend, CombustionModel, CombustionSetup};
//! use eg_combustion::ideal::{IdealRocketBackend, ProductTable};
//! use eg_core::units::bar;
//!
//! let setup = CombustionSetup {
//!     fuel: catalog::card("Ethanol").unwrap(),
//!     oxidizer: catalog::card("N2O").unwrap(),
//!     contraction_ratio: Some(2.5),
//! };
//! let backend = IdealRocketBackend::new(ProductTable::ethanol_n2o().unwrap());
//! let model = backend.configure(&setup).unwrap();
//! let eps = model.eps_at_pc_over_pe(bar(25.0), 3.4, 25.0).unwrap();
//! assert!(eps > 1.0);
//! ```

pub mod card;
pub mod catalog;
pub mod error;
pub mod ideal;
pub mod model;
pub mod nozzle;

pub use card::{Constituent, PropellantCard, PropellantRole};
pub use error::{CombustionError, CombustionResult};
pub use model::{AmbientIsp, CombustionBackend, CombustionModel, CombustionSetup, ExpansionMode};
