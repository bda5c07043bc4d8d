//! Truncated-Coulomb auxiliary function G_m(T, R) for the interaction
//! kernel v(r) = 1/r inside a cutoff sphere of radius Rc, zero outside.
//!
//! T = rho |P - Q|^2 is the usual Boys argument and R = Rc sqrt(rho) the
//! dimensionless cutoff. G_m plays the role F_m plays for the plain
//! Coulomb operator; the tail correction Delta_m = F_m - G_m decays like
//! erfc(R - sqrt(T)), so far inside the cutoff the plain Boys function is
//! exact to f64.

use crate::common::constants::SQRT_PI;
use crate::numerics::special::boys::boys_sequence;

const SERIES_CUTOFF: f64 = 6.0;
const UPWARD_CUTOFF: f64 = 35.0;
const FAR_FIELD_MARGIN: f64 = 11.0;
const SERIES_MAX_TERMS: usize = 60;
const SERIES_REL_TOL: f64 = 1.0e-18;
const QUADRATURE_POINTS: usize = 128;

/// Evaluation seam for the truncated-Coulomb auxiliary vector.
///
/// `evaluate` fills `out[0..=max_order]` with G_0..G_max_order and returns
/// `false`, or returns `true` without touching `out` to report that the
/// cutoff is effectively infinite for these arguments and the caller
/// should use the plain Boys function instead.
pub trait TruncatedCoulombApi {
    fn evaluate(&self, max_order: usize, t: f64, r: f64, out: &mut [f64]) -> bool;
}

/// Closed-form evaluator with three branches joined at empirically tuned
/// seams: a Hermite power series in T for small T, Gauss-Legendre
/// quadrature of the jet-differentiated tail kernel in the mid range, and
/// closed-form G_0 with coupled upward recursion for large T.
#[derive(Debug, Clone)]
pub struct AnalyticTruncatedCoulomb {
    nodes: Vec<f64>,
    weights: Vec<f64>,
}

impl Default for AnalyticTruncatedCoulomb {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyticTruncatedCoulomb {
    pub fn new() -> Self {
        let (nodes, weights) = gauss_legendre(QUADRATURE_POINTS);
        Self { nodes, weights }
    }
}

impl TruncatedCoulombApi for AnalyticTruncatedCoulomb {
    fn evaluate(&self, max_order: usize, t: f64, r: f64, out: &mut [f64]) -> bool {
        assert!(
            t.is_finite() && t >= 0.0 && r.is_finite() && r > 0.0,
            "truncated auxiliary requires finite t >= 0 and r > 0, got t={t} r={r}"
        );
        assert!(
            out.len() > max_order,
            "truncated auxiliary output buffer holds {} orders, needs {}",
            out.len(),
            max_order + 1
        );

        if r >= t.sqrt() + FAR_FIELD_MARGIN {
            return true;
        }

        if t >= UPWARD_CUTOFF {
            upward_from_closed_form(max_order, t, r, out);
            return false;
        }

        boys_sequence(max_order, t, out);
        let mut tail = vec![0.0; max_order + 1];
        if t <= SERIES_CUTOFF {
            tail_by_series(max_order, t, r, &mut tail);
        } else {
            self.tail_by_quadrature(max_order, t, r, &mut tail);
        }
        for order in 0..=max_order {
            out[order] -= tail[order];
        }
        false
    }
}

impl AnalyticTruncatedCoulomb {
    /// Delta_m = (-1)^m m! / 2 * [u^m] of integral_{-1}^{1} e^{-(R + u s)^2} du
    /// with s = sqrt(T), the jet taken in T.
    fn tail_by_quadrature(&self, max_order: usize, t: f64, r: f64, tail: &mut [f64]) {
        let sqrt_t = sqrt_jet(t, max_order);
        let mut exponent = vec![0.0; max_order + 1];
        let mut kernel = vec![0.0; max_order + 1];
        tail[..=max_order].fill(0.0);

        for (&node, &weight) in self.nodes.iter().zip(&self.weights) {
            // exponent jet of -(r + node * sqrt(t))^2 in t
            for (i, value) in exponent.iter_mut().enumerate() {
                let linear = if i == 0 {
                    r + node * sqrt_t[0]
                } else {
                    node * sqrt_t[i]
                };
                *value = linear;
            }
            square_negate_in_place(&mut exponent, &mut kernel);
            exp_jet(&kernel, &mut exponent);
            for order in 0..=max_order {
                tail[order] += 0.5 * weight * exponent[order];
            }
        }

        apply_signed_factorial(tail, max_order);
    }
}

/// Delta_m(T) = e^{-R^2} (-1)^m sum_k (m+k)!/(k! (2m+2k+1)!) H_{2(m+k)}(R) T^k
/// with physicist's Hermite polynomials H_n.
fn tail_by_series(max_order: usize, t: f64, r: f64, tail: &mut [f64]) {
    let hermite = hermite_values(2 * (max_order + SERIES_MAX_TERMS) + 1, r);
    let gauss = (-r * r).exp();

    for (order, value) in tail.iter_mut().enumerate().take(max_order + 1) {
        // k = 0 coefficient: m! / (2m+1)!
        let mut coefficient = 1.0;
        for j in (order + 1)..=(2 * order + 1) {
            coefficient /= j as f64;
        }
        let mut total = 0.0;
        for k in 0..SERIES_MAX_TERMS {
            total += coefficient * hermite[2 * (order + k)];
            coefficient *= t * (order + k + 1) as f64
                / ((k + 1) * (2 * order + 2 * k + 2) * (2 * order + 2 * k + 3)) as f64;
            let next = coefficient.abs() * hermite[(2 * (order + k + 1)).min(hermite.len() - 1)].abs();
            if k > 3 && next < SERIES_REL_TOL * total.abs().max(f64::MIN_POSITIVE) {
                break;
            }
        }
        *value = sign_for(order) * gauss * total;
    }
}

/// G_0 in closed form, higher orders by the coupled upward recursion
/// G_{m+1} = [(2m+1) G_m - e^{-T} + Q_m] / (2T) where Q_m is the m-th
/// signed T-derivative of (e^{-(R-s)^2} + e^{-(R+s)^2}) / 2, s = sqrt(T).
/// Stable only once e^{-T} is negligible, hence the T >= 35 gate.
fn upward_from_closed_form(max_order: usize, t: f64, r: f64, out: &mut [f64]) {
    let sqrt_t = t.sqrt();
    let mut f0 = [0.0];
    boys_sequence(0, t, &mut f0);
    out[0] = f0[0]
        - SQRT_PI / (4.0 * sqrt_t) * (libm::erfc(r - sqrt_t) - libm::erfc(r + sqrt_t));

    if max_order == 0 {
        return;
    }

    let q = derivative_jets_of_q(max_order - 1, t, r);
    let exp_neg_t = (-t).exp();
    let inv_2t = 0.5 / t;
    for order in 0..max_order {
        out[order + 1] = ((2 * order + 1) as f64 * out[order] - exp_neg_t + q[order]) * inv_2t;
    }
}

/// Q_m for m = 0..=max_order via exact jet arithmetic: the two Gaussians
/// are exponentials of quadratic-in-sqrt(T) jets, kept separate so neither
/// overflows before the average.
fn derivative_jets_of_q(max_order: usize, t: f64, r: f64) -> Vec<f64> {
    let n = max_order + 1;
    let sqrt_t = sqrt_jet(t, max_order);
    let mut linear = vec![0.0; n];
    let mut kernel = vec![0.0; n];
    let mut q = vec![0.0; n];

    for sign in [1.0, -1.0] {
        // exponent jet of -(r - sign * sqrt(t))^2
        for (i, value) in linear.iter_mut().enumerate() {
            *value = if i == 0 {
                r - sign * sqrt_t[0]
            } else {
                -sign * sqrt_t[i]
            };
        }
        square_negate_in_place(&mut linear, &mut kernel);
        let mut gaussian = vec![0.0; n];
        exp_jet(&kernel, &mut gaussian);
        for order in 0..n {
            q[order] += 0.5 * gaussian[order];
        }
    }

    apply_signed_factorial(&mut q, max_order);
    q
}

/// Taylor coefficients of sqrt(x) around x = t0, orders 0..=n.
fn sqrt_jet(t0: f64, n: usize) -> Vec<f64> {
    let mut out = vec![0.0; n + 1];
    out[0] = t0.sqrt();
    if n >= 1 {
        out[1] = 0.5 / out[0];
    }
    for k in 1..n {
        out[k + 1] = out[k] * (0.5 - k as f64) / ((k + 1) as f64 * t0);
    }
    out
}

/// kernel = -(linear * linear), as Taylor coefficient convolution.
fn square_negate_in_place(linear: &mut [f64], kernel: &mut [f64]) {
    let n = linear.len();
    for i in 0..n {
        let mut acc = 0.0;
        for k in 0..=i {
            acc += linear[k] * linear[i - k];
        }
        kernel[i] = -acc;
    }
}

/// out = Taylor coefficients of exp(kernel), via the standard recurrence
/// out_k = (1/k) sum_{i=1..k} i * kernel_i * out_{k-i}.
fn exp_jet(kernel: &[f64], out: &mut [f64]) {
    out[0] = kernel[0].exp();
    for k in 1..kernel.len() {
        let mut acc = 0.0;
        for i in 1..=k {
            acc += i as f64 * kernel[i] * out[k - i];
        }
        out[k] = acc / k as f64;
    }
}

/// Turns Taylor coefficients c_m into signed derivatives (-1)^m m! c_m.
fn apply_signed_factorial(values: &mut [f64], max_order: usize) {
    let mut factor = 1.0;
    for (order, value) in values.iter_mut().enumerate().take(max_order + 1) {
        if order > 0 {
            factor *= -(order as f64);
        }
        *value *= factor;
    }
}

/// Physicist's Hermite polynomial values H_0(r)..H_nmax(r).
fn hermite_values(nmax: usize, r: f64) -> Vec<f64> {
    let mut values = vec![0.0; nmax + 1];
    values[0] = 1.0;
    if nmax >= 1 {
        values[1] = 2.0 * r;
    }
    for n in 1..nmax {
        values[n + 1] = 2.0 * r * values[n] - 2.0 * n as f64 * values[n - 1];
    }
    values
}

/// Gauss-Legendre nodes and weights on [-1, 1] by Newton iteration on the
/// Legendre recurrence, Tricomi initial guesses.
fn gauss_legendre(n: usize) -> (Vec<f64>, Vec<f64>) {
    let mut nodes = Vec::with_capacity(n);
    let mut weights = Vec::with_capacity(n);
    for i in 1..=n {
        let mut x = (crate::common::constants::PI * (i as f64 - 0.25) / (n as f64 + 0.5)).cos();
        for _ in 0..20 {
            let (p, dp) = legendre_pair(n, x);
            let dx = p / dp;
            x -= dx;
            if dx.abs() < 1.0e-15 {
                break;
            }
        }
        let (_, dp) = legendre_pair(n, x);
        nodes.push(x);
        weights.push(2.0 / ((1.0 - x * x) * dp * dp));
    }
    (nodes, weights)
}

fn legendre_pair(n: usize, x: f64) -> (f64, f64) {
    let mut p0 = 1.0;
    let mut p1 = x;
    for k in 2..=n {
        let next = ((2 * k - 1) as f64 * x * p1 - (k - 1) as f64 * p0) / k as f64;
        p0 = p1;
        p1 = next;
    }
    let dp = n as f64 * (x * p1 - p0) / (x * x - 1.0);
    (p1, dp)
}

fn sign_for(order: usize) -> f64 {
    if order % 2 == 0 { 1.0 } else { -1.0 }
}
