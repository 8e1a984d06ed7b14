//! Gamma, log-gamma, digamma and the inverse gamma function.
//!
//! `gamma` uses the Lanczos approximation (g = 7, nine coefficients as used by
//! the GNU Scientific Library) with the reflection formula below 0.5.
//! `ln_gamma` is a separate six-term rational approximation so that large
//! arguments never pass through an overflowing `gamma`.

use std::f64::consts::{E, PI};

use super::lambert::{lambert_w_with, Branch};
use super::solver::{Estimate, SolverSettings};

const LANCZOS_G: f64 = 7.0;

const LANCZOS_COEFFS: [f64; 9] = [
    0.999_999_999_999_809_93,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_13,
    -176.615_029_162_140_59,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_571_6e-6,
    1.505_632_735_149_311_6e-7,
];

const LN_GAMMA_COEFFS: [f64; 6] = [
    76.180_091_729_471_46,
    -86.505_320_329_416_77,
    24.014_098_240_830_91,
    -1.231_739_572_450_155,
    0.120_865_097_386_617_9e-2,
    -0.539_523_938_495_3e-5,
];

const LN_GAMMA_SERIES_BASE: f64 = 1.000_000_000_190_015;

/// Above this `Γ(x)` exceeds `f64::MAX`.
pub(crate) const GAMMA_OVERFLOW_ARG: f64 = 171.624_376_956_302_7;

/// √(2π)
const SQRT_2PI: f64 = 2.506_628_274_631_000_5;

/// Euler–Mascheroni constant.
const EULER_GAMMA: f64 = 0.577_215_664_9;

/// Below this, digamma uses its singular form `-γ - 1/x`.
const DIGAMMA_SMALL: f64 = 1.0e-5;
/// Recurrence target before the asymptotic series applies.
const DIGAMMA_ASYMPTOTIC: f64 = 8.5;
/// Asymptotic coefficients 1/12, 1/120, 1/252 (AS 103).
const DIGAMMA_S3: f64 = 8.333_333_333e-2;
const DIGAMMA_S4: f64 = 8.333_333_333e-3;
const DIGAMMA_S5: f64 = 3.968_253_968e-3;

/// Positive minimum of gamma on the real line, `Γ(1.461632)`.
pub const GAMMA_MIN_VALUE: f64 = 0.885_603;
/// Argument at which gamma attains [`GAMMA_MIN_VALUE`].
pub const GAMMA_MIN_ARG: f64 = 1.461_632;
/// Offset `√(2π)/e − Γ(1.461632)` used by the inverse-gamma transform.
const INV_GAMMA_OFFSET: f64 = 0.036_534;

/// Gamma function.
///
/// Defined for every real argument except the poles at the non-positive
/// integers, which return NaN.
pub fn gamma(x: f64) -> f64 {
    if x.is_nan() || (x <= 0.0 && x == x.floor()) {
        return f64::NAN;
    }
    if x > GAMMA_OVERFLOW_ARG {
        return f64::INFINITY;
    }

    if x < 0.5 {
        // 1 - x >= 0.5 here, so this recurses at most once.
        return PI / ((PI * x).sin() * gamma(1.0 - x));
    }

    let x = x - 1.0;
    let mut sum = LANCZOS_COEFFS[0];
    for (i, &c) in LANCZOS_COEFFS.iter().enumerate().skip(1) {
        sum += c / (x + i as f64);
    }

    let t = x + LANCZOS_G + 0.5;
    SQRT_2PI * t.powf(x + 0.5) * (-t).exp() * sum
}

/// Natural logarithm of the gamma function for `x > 0`.
///
/// Returns NaN for non-positive arguments.
pub fn ln_gamma(x: f64) -> f64 {
    if x.is_nan() || x <= 0.0 {
        return f64::NAN;
    }

    let tmp = x + 5.5;
    let tmp = tmp - (x + 0.5) * tmp.ln();
    let mut ser = LN_GAMMA_SERIES_BASE;
    let mut y = x;
    for &c in &LN_GAMMA_COEFFS {
        y += 1.0;
        ser += c / y;
    }
    (SQRT_2PI * ser / x).ln() - tmp
}

/// Digamma function `ψ(x) = d/dx ln Γ(x)` for `x > 0` (AS 103).
///
/// Returns NaN for `x <= 0`.
pub fn digamma(x: f64) -> f64 {
    if x.is_nan() || x <= 0.0 {
        return f64::NAN;
    }
    if x <= DIGAMMA_SMALL {
        return -EULER_GAMMA - 1.0 / x;
    }

    // ψ(x) = ψ(x + 1) - 1/x
    let mut y = x;
    let mut acc = 0.0;
    while y < DIGAMMA_ASYMPTOTIC {
        acc -= 1.0 / y;
        y += 1.0;
    }

    let r = 1.0 / y;
    acc += y.ln() - 0.5 * r;
    let r2 = r * r;
    acc - r2 * (DIGAMMA_S3 - r2 * (DIGAMMA_S4 - r2 * DIGAMMA_S5))
}

/// Inverse of the gamma function on the principal (`x >= 1.461632`) or
/// secondary (`0 < x < 1.461632`) branch, using default solver settings.
pub fn inv_gamma(y: f64, branch: Branch) -> Estimate {
    inv_gamma_with(y, branch, &SolverSettings::DEFAULT)
}

/// Inverse gamma via the Lambert W transform
/// `x ≈ L / W(L/e) + 1/2` with `L = ln((y + c)/√(2π))`.
///
/// The principal branch peaks at 1.5 % relative error near the minimum and
/// improves with `y`; the secondary branch is a much coarser approximation.
/// Values below the gamma minimum have no real preimage and are out of domain.
pub fn inv_gamma_with(y: f64, branch: Branch, settings: &SolverSettings) -> Estimate {
    if y.is_nan() || y < GAMMA_MIN_VALUE {
        return Estimate::out_of_domain();
    }
    if y == f64::INFINITY && branch == Branch::Principal {
        return Estimate::exact(y);
    }

    let l = ((y + INV_GAMMA_OFFSET) / SQRT_2PI).ln();
    // At the minimum L/e rounds a hair below the Lambert branch point.
    let arg = (l / E).max(-1.0 / E);
    lambert_w_with(arg, branch, settings).map(|w| l / w + 0.5)
}
