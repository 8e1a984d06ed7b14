//! Error function and its series inverse.

use std::f64::consts::PI;

/// Abramowitz & Stegun 7.1.26 coefficients `a1..a5`.
const ERF_COEFFS: [f64; 5] = [
    0.254829592,
    -0.284496736,
    1.421413741,
    -1.453152027,
    1.061405429,
];

const ERF_P: f64 = 0.3275911;

/// Gauss error function.
///
/// Rational approximation A&S 7.1.26, maximum absolute error 1.5e-7.
/// Odd symmetry is exact: `erf(-x) == -erf(x)` bit for bit.
pub fn erf(x: f64) -> f64 {
    if x < 0.0 {
        return -erf(-x);
    }
    // The polynomial sums to 1 - 1e-9 at t = 1; pin the zero (and keep -0.0).
    if x == 0.0 {
        return x;
    }

    let t = 1.0 / (1.0 + ERF_P * x);
    let poly = ERF_COEFFS.iter().rev().fold(0.0, |acc, &c| acc * t + c) * t;
    1.0 - poly * (-x * x).exp()
}

/// Inverse error function via its Maclaurin series (six odd terms).
///
/// Accurate near the origin and progressively worse toward ±1. Returns NaN
/// for `|x| > 1` and `±∞` at exactly `±1`.
pub fn inv_erf(x: f64) -> f64 {
    if x.is_nan() || x.abs() > 1.0 {
        return f64::NAN;
    }
    if x.abs() == 1.0 {
        return x * f64::INFINITY;
    }

    // c_k * π^k / d_k for the x^(2k+1) term
    const SERIES: [(f64, i32, f64); 6] = [
        (1.0, 0, 1.0),
        (1.0, 1, 12.0),
        (7.0, 2, 480.0),
        (127.0, 3, 40320.0),
        (4369.0, 4, 5_806_080.0),
        (34807.0, 5, 182_476_800.0),
    ];

    let x2 = x * x;
    let mut power = x;
    let mut sum = 0.0;
    for &(num, k, den) in &SERIES {
        sum += num * PI.powi(k) * power / den;
        power *= x2;
    }
    0.5 * PI.sqrt() * sum
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        if a.is_nan() || b.is_nan() {
            return false;
        }
        (a - b).abs() <= tol
    }

    #[test]
    fn erf_zero_is_exact() {
        assert_eq!(erf(0.0), 0.0);
        assert!(erf(-0.0).is_sign_negative());
    }

    #[test]
    fn erf_known_values() {
        // Reference values from tables.
        assert!(approx_eq(erf(0.5), 0.520_499_877_8, 2e-7));
        assert!(approx_eq(erf(1.0), 0.842_700_792_9, 2e-7));
        assert!(approx_eq(erf(2.0), 0.995_322_265_0, 2e-7));
        assert!(approx_eq(erf(-1.0), -0.842_700_792_9, 2e-7));
    }

    #[test]
    fn erf_saturates() {
        assert!(approx_eq(erf(6.0), 1.0, 1e-12));
        assert_eq!(erf(f64::INFINITY), 1.0);
        assert_eq!(erf(f64::NEG_INFINITY), -1.0);
        assert!(erf(f64::NAN).is_nan());
    }

    #[test]
    fn inv_erf_near_origin_inverts_erf() {
        for &y in &[-0.5, -0.2, 0.0, 0.1, 0.3, 0.5] {
            let x = inv_erf(y);
            assert!(approx_eq(erf(x), y, 1e-4), "y={y}: erf({x})={}", erf(x));
        }
    }

    #[test]
    fn inv_erf_domain() {
        assert!(inv_erf(1.5).is_nan());
        assert!(inv_erf(-1.0001).is_nan());
        assert!(inv_erf(f64::NAN).is_nan());
        assert_eq!(inv_erf(1.0), f64::INFINITY);
        assert_eq!(inv_erf(-1.0), f64::NEG_INFINITY);
        assert_eq!(inv_erf(0.0), 0.0);
    }

    #[test]
    fn inv_erf_is_odd() {
        for &y in &[0.05, 0.25, 0.6, 0.9] {
            assert_eq!(inv_erf(-y), -inv_erf(y));
        }
    }
}
