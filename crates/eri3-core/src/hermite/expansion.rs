//! Hermite expansion coefficients E^{ij}_t for a one-dimensional product
//! of two Gaussians, McMurchie-Davidson recurrences.

/// Flat table of E^{ij}_t, indexed by (i, j, t) with i <= la, j <= lb,
/// t <= la + lb. Entries with t > i + j are identically zero.
#[derive(Debug, Clone)]
pub(crate) struct ExpansionTable {
    values: Vec<f64>,
    j_dim: usize,
    t_dim: usize,
}

impl ExpansionTable {
    #[inline]
    pub(crate) fn get(&self, i: usize, j: usize, t: usize) -> f64 {
        self.values[(i * self.j_dim + j) * self.t_dim + t]
    }

    #[inline]
    fn set(&mut self, i: usize, j: usize, t: usize, value: f64) {
        self.values[(i * self.j_dim + j) * self.t_dim + t] = value;
    }
}

/// Builds the E table for angular momenta (la, lb) on a pair with combined
/// exponent `exponent_sum`, composite-center offsets `xpa` = P_d - A_d and
/// `xpb` = P_d - B_d. `base` seeds E^{00}_0; for a bra pair that is the
/// one-dimensional Gaussian overlap factor, for a bare Hermite expansion
/// (single center, j = 0, offsets zero) it is 1.
pub(crate) fn expansion_table(
    la: usize,
    lb: usize,
    exponent_sum: f64,
    xpa: f64,
    xpb: f64,
    base: f64,
) -> ExpansionTable {
    let t_dim = la + lb + 1;
    let mut table = ExpansionTable {
        values: vec![0.0; (la + 1) * (lb + 1) * t_dim],
        j_dim: lb + 1,
        t_dim,
    };
    table.set(0, 0, 0, base);
    let inv_2p = 0.5 / exponent_sum;

    // raise i with j = 0
    for i in 0..la {
        for t in 0..=(i + 1) {
            let mut value = if t <= i { xpa * table.get(i, 0, t) } else { 0.0 };
            if t >= 1 {
                value += inv_2p * table.get(i, 0, t - 1);
            }
            if t + 1 <= i {
                value += (t + 1) as f64 * table.get(i, 0, t + 1);
            }
            table.set(i + 1, 0, t, value);
        }
    }

    // raise j at every i
    for i in 0..=la {
        for j in 0..lb {
            for t in 0..=(i + j + 1) {
                let mut value = if t <= i + j {
                    xpb * table.get(i, j, t)
                } else {
                    0.0
                };
                if t >= 1 {
                    value += inv_2p * table.get(i, j, t - 1);
                }
                if t + 1 <= i + j {
                    value += (t + 1) as f64 * table.get(i, j, t + 1);
                }
                table.set(i, j + 1, t, value);
            }
        }
    }

    table
}
