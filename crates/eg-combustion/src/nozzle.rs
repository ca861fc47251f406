//! Isentropic nozzle relations for a calorically perfect gas.
//!
//! All functions take the ratio of specific heats `gamma` and work in
//! stagnation-referenced ratios (`p0/p`, `A/A*`).

use crate::error::{CombustionError, CombustionResult};
use eg_core::numeric::{RootConfig, bisect};

fn check_gamma(gamma: f64) -> CombustionResult<()> {
    if !gamma.is_finite() || gamma <= 1.0 {
        return Err(CombustionError::NonPhysical {
            what: "gamma",
            value: gamma,
        });
    }
    Ok(())
}

/// Stagnation-to-static pressure ratio `p0/p` at Mach `mach`.
pub fn pressure_ratio(gamma: f64, mach: f64) -> f64 {
    (1.0 + 0.5 * (gamma - 1.0) * mach * mach).powf(gamma / (gamma - 1.0))
}

/// Mach number reached by isentropic expansion through `p0/p`.
pub fn mach_from_pressure_ratio(gamma: f64, p0_over_p: f64) -> CombustionResult<f64> {
    check_gamma(gamma)?;
    if !p0_over_p.is_finite() || p0_over_p < 1.0 {
        return Err(CombustionError::NonPhysical {
            what: "stagnation-to-static pressure ratio",
            value: p0_over_p,
        });
    }
    let x = p0_over_p.powf((gamma - 1.0) / gamma) - 1.0;
    Ok((2.0 / (gamma - 1.0) * x).sqrt())
}

/// Area ratio `A/A*` at Mach `mach`.
pub fn area_ratio(gamma: f64, mach: f64) -> f64 {
    let exp = (gamma + 1.0) / (2.0 * (gamma - 1.0));
    let term = 2.0 / (gamma + 1.0) * (1.0 + 0.5 * (gamma - 1.0) * mach * mach);
    term.powf(exp) / mach
}

/// Supersonic Mach number for area ratio `eps`.
pub fn supersonic_mach(gamma: f64, eps: f64) -> CombustionResult<f64> {
    check_gamma(gamma)?;
    if !eps.is_finite() || eps < 1.0 {
        return Err(CombustionError::NonPhysical {
            what: "nozzle area ratio",
            value: eps,
        });
    }
    if eps == 1.0 {
        return Ok(1.0);
    }
    let mut hi = 2.0;
    while area_ratio(gamma, hi) < eps {
        hi *= 2.0;
        if hi > 1.0e4 {
            return Err(CombustionError::NonPhysical {
                what: "nozzle area ratio",
                value: eps,
            });
        }
    }
    Ok(bisect(
        |m| area_ratio(gamma, m) - eps,
        1.0,
        hi,
        RootConfig::default(),
        "supersonic area-Mach inversion",
    )?)
}

/// Subsonic Mach number for area ratio `ratio` (e.g. a chamber contraction ratio).
pub fn subsonic_mach(gamma: f64, ratio: f64) -> CombustionResult<f64> {
    check_gamma(gamma)?;
    if !ratio.is_finite() || ratio < 1.0 {
        return Err(CombustionError::NonPhysical {
            what: "subsonic area ratio",
            value: ratio,
        });
    }
    if ratio == 1.0 {
        return Ok(1.0);
    }
    Ok(bisect(
        |m| area_ratio(gamma, m) - ratio,
        1.0e-9,
        1.0,
        RootConfig::default(),
        "subsonic area-Mach inversion",
    )?)
}

/// Characteristic velocity [m/s] from chamber temperature and gas constant.
pub fn characteristic_velocity(gamma: f64, r_specific: f64, t0: f64) -> f64 {
    let exp = (gamma + 1.0) / (2.0 * (gamma - 1.0));
    (r_specific * t0 / gamma).sqrt() * (0.5 * (gamma + 1.0)).powf(exp)
}

/// Exit velocity [m/s] for a full expansion from `t0` down to `pe/p0`.
pub fn exit_velocity(gamma: f64, r_specific: f64, t0: f64, pe_over_p0: f64) -> f64 {
    let x = 1.0 - pe_over_p0.powf((gamma - 1.0) / gamma);
    (2.0 * gamma / (gamma - 1.0) * r_specific * t0 * x.max(0.0)).sqrt()
}

/// Stagnation pressure left at the chamber end of a finite-area combustor.
///
/// Heat addition along a constant-area duct (Rayleigh line) from rest at the
/// injector face to Mach `m_end`. Returns `p0_end / p_injector` (≤ 1).
pub fn rayleigh_stagnation_ratio(gamma: f64, m_end: f64) -> f64 {
    let m2 = m_end * m_end;
    (1.0 + 0.5 * (gamma - 1.0) * m2).powf(gamma / (gamma - 1.0)) / (1.0 + gamma * m2)
}
