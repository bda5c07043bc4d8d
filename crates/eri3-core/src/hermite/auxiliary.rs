//! Hermite auxiliary integrals R_{tuv}, built by the order-descending
//! McMurchie-Davidson recursion from the scaled operator kernel values.

/// The m = 0 layer R_{tuv}, flat over (t, u, v) with t + u + v <= max order.
#[derive(Debug, Clone)]
pub(crate) struct AuxiliaryTable {
    values: Vec<f64>,
    dim: usize,
}

impl AuxiliaryTable {
    #[inline]
    pub(crate) fn get(&self, t: usize, u: usize, v: usize) -> f64 {
        self.values[(t * self.dim + u) * self.dim + v]
    }
}

/// Builds R_{tuv} at m = 0 from `scaled[m]`, the operator kernel values
/// already carrying the integral prefactor and the (-2 rho)^m order
/// scaling. `pq` is the composite-center separation P - C.
///
/// Layer m is derived from layer m + 1 by raising one Cartesian index,
/// so only two layers are live at a time.
pub(crate) fn auxiliary_table(max_order: usize, scaled: &[f64], pq: [f64; 3]) -> AuxiliaryTable {
    debug_assert!(scaled.len() > max_order);
    let dim = max_order + 1;
    let idx = |t: usize, u: usize, v: usize| (t * dim + u) * dim + v;
    let mut upper = vec![0.0; dim * dim * dim];
    let mut layer = vec![0.0; dim * dim * dim];

    for m in (0..=max_order).rev() {
        layer[0] = scaled[m];
        let budget = max_order - m;
        for t in 0..=budget {
            for u in 0..=(budget - t) {
                for v in 0..=(budget - t - u) {
                    if t + u + v == 0 {
                        continue;
                    }
                    let value = if t >= 1 {
                        let mut value = pq[0] * upper[idx(t - 1, u, v)];
                        if t >= 2 {
                            value += (t - 1) as f64 * upper[idx(t - 2, u, v)];
                        }
                        value
                    } else if u >= 1 {
                        let mut value = pq[1] * upper[idx(t, u - 1, v)];
                        if u >= 2 {
                            value += (u - 1) as f64 * upper[idx(t, u - 2, v)];
                        }
                        value
                    } else {
                        let mut value = pq[2] * upper[idx(t, u, v - 1)];
                        if v >= 2 {
                            value += (v - 1) as f64 * upper[idx(t, u, v - 2)];
                        }
                        value
                    };
                    layer[idx(t, u, v)] = value;
                }
            }
        }
        std::mem::swap(&mut upper, &mut layer);
    }

    AuxiliaryTable { values: upper, dim }
}
