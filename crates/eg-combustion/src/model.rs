//! Combustion performance model trait.

use crate::card::PropellantCard;
use crate::error::{CombustionError, CombustionResult};
use eg_core::units::constants::G0_MPS2;
use eg_core::units::{Pressure, Temperature, Velocity, mps, pa};
use std::fmt;

/// Kalt–Badal separation coefficient: `p_sep = K · p_amb · (pc/p_amb)^-0.2`.
pub const KALT_BADAL_COEFF: f64 = 0.667;

/// Kalt–Badal pressure-ratio exponent.
pub const KALT_BADAL_EXP: f64 = -0.2;

/// How the nozzle flow meets the ambient pressure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExpansionMode {
    /// Exit pressure matches ambient.
    Ideal,
    /// Exit pressure above ambient (includes vacuum).
    UnderExpanded,
    /// Exit pressure below ambient, flow still attached.
    OverExpanded,
    /// Flow separates from the wall before the exit.
    Separated {
        /// Wall pressure at which separation occurs [Pa]
        separation_pressure: f64,
        /// Area ratio at the separation point
        separation_area_ratio: f64,
    },
}

impl ExpansionMode {
    pub fn is_separated(&self) -> bool {
        matches!(self, ExpansionMode::Separated { .. })
    }
}

impl fmt::Display for ExpansionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpansionMode::Ideal => write!(f, "Ideal"),
            ExpansionMode::UnderExpanded => write!(f, "UnderExpanded"),
            ExpansionMode::OverExpanded => write!(f, "OverExpanded"),
            ExpansionMode::Separated {
                separation_pressure,
                separation_area_ratio,
            } => write!(
                f,
                "Separated (Psep={:.0} Pa, epsSep={:.2})",
                separation_pressure, separation_area_ratio
            ),
        }
    }
}

/// Ambient-corrected nozzle performance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientIsp {
    /// Effective exhaust velocity at the ambient pressure
    pub velocity: Velocity,
    pub mode: ExpansionMode,
    /// Static pressure at the nozzle exit plane (attached flow)
    pub exit_pressure: Pressure,
}

impl AmbientIsp {
    /// Specific impulse [s].
    pub fn isp_seconds(&self) -> f64 {
        self.velocity.value / G0_MPS2
    }

    /// Same result with the velocity scaled by an efficiency factor.
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            velocity: self.velocity * factor,
            ..self
        }
    }
}

/// Reactants and chamber geometry a combustion model is configured with.
#[derive(Debug, Clone, PartialEq)]
pub struct CombustionSetup {
    pub fuel: PropellantCard,
    pub oxidizer: PropellantCard,
    /// Chamber-to-throat area ratio; `None` for an infinite-area combustor
    pub contraction_ratio: Option<f64>,
}

/// Seam to an equilibrium combustion solver (NASA CEA or equivalent).
///
/// All pressures are chamber (injector-face) pressures. Velocities in m/s.
pub trait CombustionModel: Send + Sync {
    /// Get the model name (for debugging/logging).
    fn name(&self) -> &str;

    /// Adiabatic combustion temperature.
    fn combustion_temperature(&self, pc: Pressure, mr: f64) -> CombustionResult<Temperature>;

    /// Characteristic velocity `pc · At / ṁ`.
    fn cstar(&self, pc: Pressure, mr: f64) -> CombustionResult<Velocity>;

    /// Nozzle area ratio that expands to `pc/pe`.
    fn eps_at_pc_over_pe(&self, pc: Pressure, mr: f64, pc_over_pe: f64) -> CombustionResult<f64>;

    /// Pressure ratio `pc/pe` reached at area ratio `eps`.
    fn pc_over_pe(&self, pc: Pressure, mr: f64, eps: f64) -> CombustionResult<f64>;

    /// Vacuum specific impulse as an exhaust velocity.
    fn vacuum_isp(&self, pc: Pressure, mr: f64, eps: f64) -> CombustionResult<Velocity>;

    /// Effective exhaust velocity at ambient pressure `pamb`, with flow
    /// separation estimated by the Kalt–Badal criterion.
    ///
    /// A separated nozzle is treated as if it were cut off at the separation
    /// area ratio.
    fn estimate_ambient_isp(
        &self,
        pc: Pressure,
        mr: f64,
        eps: f64,
        pamb: Pressure,
    ) -> CombustionResult<AmbientIsp> {
        check_pressure(pc, "chamber pressure")?;
        if !pamb.value.is_finite() || pamb.value < 0.0 {
            return Err(CombustionError::InvalidArg {
                what: "ambient pressure must be non-negative and finite",
            });
        }

        let pc_pa = pc.value;
        let pamb_pa = pamb.value;
        let cstar = self.cstar(pc, mr)?.value;
        let ivac = self.vacuum_isp(pc, mr, eps)?.value;
        let pe_pa = pc_pa / self.pc_over_pe(pc, mr, eps)?;

        if pamb_pa == 0.0 {
            return Ok(AmbientIsp {
                velocity: mps(ivac),
                mode: ExpansionMode::UnderExpanded,
                exit_pressure: pa(pe_pa),
            });
        }

        let p_sep = KALT_BADAL_COEFF * pamb_pa * (pc_pa / pamb_pa).powf(KALT_BADAL_EXP);
        let (cf, mode) = if pe_pa < p_sep {
            if p_sep >= pc_pa {
                return Err(CombustionError::InvalidArg {
                    what: "chamber pressure too low for the ambient pressure",
                });
            }
            let eps_sep = self.eps_at_pc_over_pe(pc, mr, pc_pa / p_sep)?;
            let ivac_sep = self.vacuum_isp(pc, mr, eps_sep)?.value;
            let cf = ivac_sep / cstar - eps_sep * pamb_pa / pc_pa;
            (
                cf,
                ExpansionMode::Separated {
                    separation_pressure: p_sep,
                    separation_area_ratio: eps_sep,
                },
            )
        } else {
            let mode = if (pe_pa - pamb_pa).abs() <= 1e-6 * pamb_pa {
                ExpansionMode::Ideal
            } else if pe_pa > pamb_pa {
                ExpansionMode::UnderExpanded
            } else {
                ExpansionMode::OverExpanded
            };
            (ivac / cstar - eps * pamb_pa / pc_pa, mode)
        };

        Ok(AmbientIsp {
            velocity: mps(cf * cstar),
            mode,
            exit_pressure: pa(pe_pa),
        })
    }
}

/// Builds configured [`CombustionModel`]s from propellant cards.
pub trait CombustionBackend {
    type Model: CombustionModel;

    /// Get the backend name (for debugging/logging).
    fn name(&self) -> &str;

    fn configure(&self, setup: &CombustionSetup) -> CombustionResult<Self::Model>;
}

pub(crate) fn check_pressure(p: Pressure, what: &'static str) -> CombustionResult<()> {
    if !p.value.is_finite() || p.value <= 0.0 {
        return Err(CombustionError::NonPhysical {
            what,
            value: p.value,
        });
    }
    Ok(())
}

pub(crate) fn check_mixture_ratio(mr: f64) -> CombustionResult<()> {
    if !mr.is_finite() || mr <= 0.0 {
        return Err(CombustionError::NonPhysical {
            what: "mixture ratio",
            value: mr,
        });
    }
    Ok(())
}
