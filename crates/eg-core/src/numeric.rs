use crate::EgError;

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, EgError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(EgError::NonFinite { what, value: v })
    }
}

/// Finite and strictly positive.
pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, EgError> {
    ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(EgError::InvalidArg { what })
    }
}

/// Settings for [`bisect`].
#[derive(Clone, Copy, Debug)]
pub struct RootConfig {
    pub tol: Tolerances,
    pub max_iter: usize,
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            tol: Tolerances {
                abs: 1e-12,
                rel: 1e-12,
            },
            max_iter: 200,
        }
    }
}

/// Find a root of `f` inside `[lo, hi]` by bisection.
///
/// The interval must bracket a sign change. Converges when the bracket width
/// falls under the configured tolerance or `f` hits zero exactly.
pub fn bisect<F>(
    mut f: F,
    lo: Real,
    hi: Real,
    config: RootConfig,
    what: &'static str,
) -> Result<Real, EgError>
where
    F: FnMut(Real) -> Real,
{
    let (mut lo, mut hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let mut f_lo = ensure_finite(f(lo), what)?;
    let f_hi = ensure_finite(f(hi), what)?;

    if f_lo == 0.0 {
        return Ok(lo);
    }
    if f_hi == 0.0 {
        return Ok(hi);
    }
    if f_lo.signum() == f_hi.signum() {
        return Err(EgError::NotBracketed { what, f_lo, f_hi });
    }

    for _ in 0..config.max_iter {
        let mid = 0.5 * (lo + hi);
        let f_mid = ensure_finite(f(mid), what)?;
        if f_mid == 0.0 || nearly_equal(lo, hi, config.tol) {
            return Ok(mid);
        }
        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }

    Err(EgError::NoConvergence {
        what,
        iterations: config.max_iter,
    })
}

/// Linear interpolation of `y` over sorted `xs`, clamped at both ends.
pub fn interp_clamped(xs: &[Real], ys: &[Real], x: Real) -> Option<Real> {
    if xs.is_empty() || xs.len() != ys.len() {
        return None;
    }
    if x <= xs[0] {
        return Some(ys[0]);
    }
    let last = xs.len() - 1;
    if x >= xs[last] {
        return Some(ys[last]);
    }
    let i = xs.partition_point(|&xi| xi <= x);
    let (x0, x1) = (xs[i - 1], xs[i]);
    let (y0, y1) = (ys[i - 1], ys[i]);
    Some(y0 + (y1 - y0) * (x - x0) / (x1 - x0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_positive_rejects_zero() {
        assert!(ensure_positive(0.0, "zero").is_err());
        assert!(ensure_positive(-1.0, "neg").is_err());
        assert_eq!(ensure_positive(2.0, "two").unwrap(), 2.0);
    }

    #[test]
    fn bisect_finds_sqrt2() {
        let r = bisect(|x| x * x - 2.0, 0.0, 2.0, RootConfig::default(), "sqrt2").unwrap();
        assert!((r - 2.0_f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn bisect_reports_missing_bracket() {
        let err = bisect(|x| x * x + 1.0, -1.0, 1.0, RootConfig::default(), "none").unwrap_err();
        assert!(matches!(err, EgError::NotBracketed { .. }));
    }

    #[test]
    fn interp_clamps_and_interpolates() {
        let xs = [1.0, 2.0, 4.0];
        let ys = [10.0, 20.0, 0.0];
        assert_eq!(interp_clamped(&xs, &ys, 0.0), Some(10.0));
        assert_eq!(interp_clamped(&xs, &ys, 5.0), Some(0.0));
        assert_eq!(interp_clamped(&xs, &ys, 1.5), Some(15.0));
        assert_eq!(interp_clamped(&xs, &ys, 3.0), Some(10.0));
        assert_eq!(interp_clamped(&xs, &ys, 2.0), Some(20.0));
        assert_eq!(interp_clamped(&[], &[], 1.0), None);
    }

    proptest::proptest! {
        #[test]
        fn bisect_inverts_monotone_cubic(target in -50.0_f64..50.0) {
            let r = bisect(|x| x * x * x - target, -5.0, 5.0, RootConfig::default(), "cubic").unwrap();
            proptest::prop_assert!((r * r * r - target).abs() < 1e-8);
        }
    }
}
