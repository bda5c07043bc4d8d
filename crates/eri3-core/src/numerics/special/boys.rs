//! Boys function F_m(T), the scaled incomplete-gamma kernel of the
//! Gaussian Coulomb integrals.

use crate::common::constants::PI;

const UPWARD_CUTOFF: f64 = 35.0;
const SERIES_MAX_ITER: usize = 200;
const SERIES_REL_TOL: f64 = 1.0e-17;

/// Fills `out[0..=max_order]` with F_0(t)..F_max_order(t).
///
/// Three regimes:
///   - t = 0: the exact limit 1/(2m+1).
///   - t >= 35: closed-form F_0 via erf and upward recursion, stable there
///     because e^{-t} no longer cancels against (2m+1) F_m.
///   - otherwise: Kummer series evaluated at the highest order, then
///     downward recursion, which is stable in this direction for all t.
pub fn boys_sequence(max_order: usize, t: f64, out: &mut [f64]) {
    assert!(
        t.is_finite() && t >= 0.0,
        "boys_sequence requires finite t >= 0, got {t}"
    );
    assert!(
        out.len() > max_order,
        "boys_sequence output buffer holds {} orders, needs {}",
        out.len(),
        max_order + 1
    );

    if t <= 0.0 {
        for (order, value) in out.iter_mut().enumerate().take(max_order + 1) {
            *value = 1.0 / (2 * order + 1) as f64;
        }
        return;
    }

    if t >= UPWARD_CUTOFF {
        out[0] = 0.5 * (PI / t).sqrt() * libm::erf(t.sqrt());
        let exp_neg_t = (-t).exp();
        let inv_2t = 0.5 / t;
        for order in 1..=max_order {
            out[order] = ((2 * order - 1) as f64 * out[order - 1] - exp_neg_t) * inv_2t;
        }
        return;
    }

    out[max_order] = boys_highest_by_series(max_order, t);
    let exp_neg_t = (-t).exp();
    for order in (1..=max_order).rev() {
        out[order - 1] = (2.0 * t * out[order] + exp_neg_t) / (2 * order - 1) as f64;
    }
}

/// Single-order convenience wrapper.
pub fn boys(order: usize, t: f64) -> f64 {
    let mut values = vec![0.0; order + 1];
    boys_sequence(order, t, &mut values);
    values[order]
}

/// Kummer series F_m(t) = e^{-t} sum_k (2t)^k / (2m+1)(2m+3)..(2m+2k+1),
/// evaluated at the recursion seed order.
fn boys_highest_by_series(order: usize, t: f64) -> f64 {
    let mut term = 1.0 / (2 * order + 1) as f64;
    let mut total = term;
    for k in 1..=SERIES_MAX_ITER {
        term *= 2.0 * t / (2 * order + 2 * k + 1) as f64;
        total += term;
        if term < SERIES_REL_TOL * total {
            break;
        }
    }
    (-t).exp() * total
}
