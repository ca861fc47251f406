//! Ideal-rocket combustion backend.
//!
//! An offline stand-in for an equilibrium solver: combustion products are a
//! calorically perfect gas whose chamber temperature, `γ` and molar mass come
//! from a table over mixture ratio. Expansion is frozen and isentropic.
//!
//! Reactant enthalpy enters through the chamber temperature: a card whose
//! specific enthalpy differs from the table's reference card shifts
//! `Tc` by `Δh_reactants / cp_products`.
//!
//! A finite contraction ratio costs stagnation pressure between injector face
//! and throat (Rayleigh line). Reported `c*` is referenced to injector pressure,
//! so throat sizing with `At = ṁ·c*/pc` stays consistent.

use crate::card::PropellantCard;
use crate::catalog;
use crate::error::{CombustionError, CombustionResult};
use crate::model::{
    CombustionBackend, CombustionModel, CombustionSetup, check_mixture_ratio, check_pressure,
};
use crate::nozzle;
use eg_core::numeric::interp_clamped;
use eg_core::units::constants::R_UNIVERSAL;
use eg_core::units::{Pressure, Temperature, Velocity, k, mps};
use tracing::debug;

/// Chamber products at one mixture ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProductRow {
    /// Oxidizer-to-fuel mass ratio
    pub mr: f64,
    /// Chamber temperature [K]
    pub tc_k: f64,
    /// Ratio of specific heats
    pub gamma: f64,
    /// Product molar mass [kg/kmol]
    pub molar_mass: f64,
}

impl ProductRow {
    pub fn new(mr: f64, tc_k: f64, gamma: f64, molar_mass: f64) -> Self {
        Self {
            mr,
            tc_k,
            gamma,
            molar_mass,
        }
    }
}

/// Products over mixture ratio for one propellant pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductTable {
    rows: Vec<ProductRow>,
    /// Specific enthalpy of the fuel card the table was computed for [J/kg]
    fuel_h_ref: f64,
    /// Specific enthalpy of the oxidizer card the table was computed for [J/kg]
    oxidizer_h_ref: f64,
}

impl ProductTable {
    /// Build a table. Rows must be sorted by strictly increasing mixture ratio.
    pub fn new(
        rows: Vec<ProductRow>,
        reference_fuel: &PropellantCard,
        reference_oxidizer: &PropellantCard,
    ) -> CombustionResult<Self> {
        if rows.is_empty() {
            return Err(CombustionError::InvalidTable { what: "no rows" });
        }
        for row in &rows {
            if !(row.mr.is_finite() && row.mr > 0.0) {
                return Err(CombustionError::InvalidTable {
                    what: "mixture ratio must be positive",
                });
            }
            if !(row.tc_k.is_finite() && row.tc_k > 0.0) {
                return Err(CombustionError::InvalidTable {
                    what: "chamber temperature must be positive",
                });
            }
            if !(row.gamma.is_finite() && row.gamma > 1.0) {
                return Err(CombustionError::InvalidTable {
                    what: "gamma must exceed 1",
                });
            }
            if !(row.molar_mass.is_finite() && row.molar_mass > 0.0) {
                return Err(CombustionError::InvalidTable {
                    what: "molar mass must be positive",
                });
            }
        }
        if rows.windows(2).any(|w| w[1].mr <= w[0].mr) {
            return Err(CombustionError::InvalidTable {
                what: "mixture ratios must be strictly increasing",
            });
        }
        Ok(Self {
            rows,
            fuel_h_ref: reference_fuel.specific_enthalpy()?,
            oxidizer_h_ref: reference_oxidizer.specific_enthalpy()?,
        })
    }

    /// Ethanol / nitrous oxide near 25 bar, referenced to the catalog cards.
    pub fn ethanol_n2o() -> CombustionResult<Self> {
        Self::new(
            vec![
                ProductRow::new(2.0, 2_350.0, 1.215, 22.0),
                ProductRow::new(3.0, 2_850.0, 1.225, 24.0),
                ProductRow::new(4.0, 3_120.0, 1.230, 25.6),
                ProductRow::new(5.0, 3_180.0, 1.240, 26.7),
                ProductRow::new(6.0, 3_100.0, 1.250, 27.4),
                ProductRow::new(7.0, 2_950.0, 1.260, 27.8),
            ],
            &catalog::card("Ethanol")?,
            &catalog::card("N2O")?,
        )
    }

    /// Ethanol / liquid oxygen near 25 bar, referenced to the catalog cards.
    pub fn ethanol_lox() -> CombustionResult<Self> {
        Self::new(
            vec![
                ProductRow::new(1.0, 2_650.0, 1.220, 19.5),
                ProductRow::new(1.4, 3_150.0, 1.210, 22.0),
                ProductRow::new(1.8, 3_350.0, 1.200, 24.0),
                ProductRow::new(2.2, 3_400.0, 1.200, 25.7),
                ProductRow::new(2.6, 3_330.0, 1.210, 26.9),
            ],
            &catalog::card("Ethanol")?,
            &catalog::card("LOX")?,
        )
    }

    pub fn rows(&self) -> &[ProductRow] {
        &self.rows
    }

    fn column(&self, f: impl Fn(&ProductRow) -> f64) -> Vec<f64> {
        self.rows.iter().map(f).collect()
    }

    /// Interpolate the row at `mr`, clamped to the table ends.
    pub fn at(&self, mr: f64) -> ProductRow {
        let xs = self.column(|r| r.mr);
        let pick = |f: fn(&ProductRow) -> f64| {
            interp_clamped(&xs, &self.column(f), mr).unwrap_or(f(&self.rows[0]))
        };
        ProductRow {
            mr,
            tc_k: pick(|r| r.tc_k),
            gamma: pick(|r| r.gamma),
            molar_mass: pick(|r| r.molar_mass),
        }
    }
}

/// Chamber gas state used by the expansion relations.
#[derive(Debug, Clone, Copy)]
struct Products {
    tc_k: f64,
    gamma: f64,
    r_specific: f64,
}

/// Builds [`IdealRocketModel`]s from a product table.
#[derive(Debug, Clone)]
pub struct IdealRocketBackend {
    table: ProductTable,
}

impl IdealRocketBackend {
    pub fn new(table: ProductTable) -> Self {
        Self { table }
    }
}

impl CombustionBackend for IdealRocketBackend {
    type Model = IdealRocketModel;

    fn name(&self) -> &str {
        "IdealRocket"
    }

    fn configure(&self, setup: &CombustionSetup) -> CombustionResult<IdealRocketModel> {
        IdealRocketModel::new(
            self.table.clone(),
            &setup.fuel,
            &setup.oxidizer,
            setup.contraction_ratio,
        )
    }
}

/// Frozen ideal-rocket performance model.
#[derive(Debug, Clone)]
pub struct IdealRocketModel {
    table: ProductTable,
    fuel_dh: f64,
    oxidizer_dh: f64,
    contraction_ratio: Option<f64>,
}

impl IdealRocketModel {
    pub fn new(
        table: ProductTable,
        fuel: &PropellantCard,
        oxidizer: &PropellantCard,
        contraction_ratio: Option<f64>,
    ) -> CombustionResult<Self> {
        if let Some(cr) = contraction_ratio
            && !(cr.is_finite() && cr > 1.0)
        {
            return Err(CombustionError::InvalidArg {
                what: "contraction ratio must exceed 1",
            });
        }
        let fuel_dh = fuel.specific_enthalpy()? - table.fuel_h_ref;
        let oxidizer_dh = oxidizer.specific_enthalpy()? - table.oxidizer_h_ref;
        debug!(
            fuel = %fuel.name,
            oxidizer = %oxidizer.name,
            fuel_dh,
            oxidizer_dh,
            "configured ideal rocket model"
        );
        Ok(Self {
            table,
            fuel_dh,
            oxidizer_dh,
            contraction_ratio,
        })
    }

    fn products(&self, pc: Pressure, mr: f64) -> CombustionResult<Products> {
        check_pressure(pc, "chamber pressure")?;
        check_mixture_ratio(mr)?;

        let row = self.table.at(mr);
        let r_specific = R_UNIVERSAL / row.molar_mass;
        let cp = row.gamma / (row.gamma - 1.0) * r_specific;
        let dh_reactants = (self.fuel_dh + mr * self.oxidizer_dh) / (1.0 + mr);
        let tc_k = row.tc_k + dh_reactants / cp;
        if !(tc_k.is_finite() && tc_k > 0.0) {
            return Err(CombustionError::NonPhysical {
                what: "combustion temperature",
                value: tc_k,
            });
        }
        Ok(Products {
            tc_k,
            gamma: row.gamma,
            r_specific,
        })
    }

    /// Throat stagnation pressure over injector pressure.
    fn stagnation_ratio(&self, gamma: f64) -> CombustionResult<f64> {
        match self.contraction_ratio {
            None => Ok(1.0),
            Some(cr) => {
                let m_end = nozzle::subsonic_mach(gamma, cr)?;
                Ok(nozzle::rayleigh_stagnation_ratio(gamma, m_end))
            }
        }
    }

    /// Exit Mach number for area ratio `eps`.
    fn exit_state(&self, pc: Pressure, mr: f64, eps: f64) -> CombustionResult<(Products, f64)> {
        let gas = self.products(pc, mr)?;
        let m_exit = nozzle::supersonic_mach(gas.gamma, eps)?;
        Ok((gas, m_exit))
    }
}

impl CombustionModel for IdealRocketModel {
    fn name(&self) -> &str {
        "IdealRocket"
    }

    fn combustion_temperature(&self, pc: Pressure, mr: f64) -> CombustionResult<Temperature> {
        Ok(k(self.products(pc, mr)?.tc_k))
    }

    fn cstar(&self, pc: Pressure, mr: f64) -> CombustionResult<Velocity> {
        let gas = self.products(pc, mr)?;
        let ideal = nozzle::characteristic_velocity(gas.gamma, gas.r_specific, gas.tc_k);
        Ok(mps(ideal / self.stagnation_ratio(gas.gamma)?))
    }

    fn eps_at_pc_over_pe(&self, pc: Pressure, mr: f64, pc_over_pe: f64) -> CombustionResult<f64> {
        if !(pc_over_pe.is_finite() && pc_over_pe > 1.0) {
            return Err(CombustionError::InvalidArg {
                what: "pc/pe must exceed 1",
            });
        }
        let gas = self.products(pc, mr)?;
        let p0_over_pe = pc_over_pe * self.stagnation_ratio(gas.gamma)?;
        if p0_over_pe <= nozzle::pressure_ratio(gas.gamma, 1.0) {
            return Err(CombustionError::InvalidArg {
                what: "pc/pe does not reach supersonic expansion",
            });
        }
        let m_exit = nozzle::mach_from_pressure_ratio(gas.gamma, p0_over_pe)?;
        Ok(nozzle::area_ratio(gas.gamma, m_exit))
    }

    fn pc_over_pe(&self, pc: Pressure, mr: f64, eps: f64) -> CombustionResult<f64> {
        let (gas, m_exit) = self.exit_state(pc, mr, eps)?;
        Ok(nozzle::pressure_ratio(gas.gamma, m_exit) / self.stagnation_ratio(gas.gamma)?)
    }

    fn vacuum_isp(&self, pc: Pressure, mr: f64, eps: f64) -> CombustionResult<Velocity> {
        let (gas, m_exit) = self.exit_state(pc, mr, eps)?;
        let pe_over_p0 = 1.0 / nozzle::pressure_ratio(gas.gamma, m_exit);
        let ve = nozzle::exit_velocity(gas.gamma, gas.r_specific, gas.tc_k, pe_over_p0);
        let cstar_ideal = nozzle::characteristic_velocity(gas.gamma, gas.r_specific, gas.tc_k);
        Ok(mps(ve + pe_over_p0 * eps * cstar_ideal))
    }
}
