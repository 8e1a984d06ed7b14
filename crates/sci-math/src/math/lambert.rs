//! Lambert W function: solves `w·e^w = x` on either real branch.

use std::f64::consts::E;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::solver::{Estimate, SolverSettings};

/// Real branch of a multivalued inverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Branch {
    /// `W₀`, defined on `[-1/e, ∞)`, with `W₀ ≥ -1`.
    #[default]
    Principal,
    /// `W₋₁`, defined on `[-1/e, 0)`, with `W₋₁ ≤ -1`.
    Secondary,
}

impl std::fmt::Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Branch::Principal => write!(f, "principal"),
            Branch::Secondary => write!(f, "secondary"),
        }
    }
}

/// Branch point of W: `-1/e`.
const BRANCH_POINT: f64 = -1.0 / E;

/// Lambert W with default solver settings.
pub fn lambert_w(x: f64, branch: Branch) -> Estimate {
    lambert_w_with(x, branch, &SolverSettings::DEFAULT)
}

/// Lambert W by Newton refinement `w ← (x·e^(−w) + w²)/(w + 1)`.
///
/// Seeds: principal uses `ln x − ln ln x` above 10 and 0 on `[-1/e, 10]`;
/// secondary uses −2 on `[-1/e, −0.1]` and `ln(−x) − ln(−ln(−x))` on
/// `(−0.1, 0)`. `W₀(+∞) = +∞` exactly. Arguments outside the branch's
/// domain are out of domain.
pub fn lambert_w_with(x: f64, branch: Branch, settings: &SolverSettings) -> Estimate {
    if x == f64::INFINITY && branch == Branch::Principal {
        return Estimate::exact(x);
    }
    let Some(seed) = seed(x, branch) else {
        return Estimate::out_of_domain();
    };

    let policy = settings.lambert_w;
    let mut w = seed;
    for k in 1..=policy.max_iterations {
        let prev = w;
        w = (x * (-w).exp() + w * w) / (w + 1.0);
        if !w.is_finite() {
            debug!(x, %branch, iterations = k, "lambert_w diverged");
            return Estimate::exhausted(w, k);
        }
        if (w - prev).abs() < policy.tolerance {
            return Estimate::converged(w, k);
        }
    }

    debug!(
        x,
        %branch,
        iterations = policy.max_iterations,
        "lambert_w iteration budget exhausted"
    );
    Estimate::exhausted(w, policy.max_iterations)
}

fn seed(x: f64, branch: Branch) -> Option<f64> {
    if x.is_nan() || x < BRANCH_POINT {
        return None;
    }
    match branch {
        Branch::Principal => {
            if x > 10.0 {
                Some(x.ln() - x.ln().ln())
            } else {
                Some(0.0)
            }
        }
        Branch::Secondary => {
            if x <= -0.1 {
                Some(-2.0)
            } else if x < 0.0 {
                let l = (-x).ln();
                Some(l - (-l).ln())
            } else {
                None
            }
        }
    }
}
