//! McMurchie-Davidson assembly of three-center repulsion integrals: the
//! bra pair and the ket shell are each expanded in Hermite Gaussians, the
//! operator enters only through its auxiliary kernel values, and the
//! Cartesian integrals are contractions of expansion coefficients against
//! the auxiliary table.

mod auxiliary;
mod expansion;

use thiserror::Error;

use crate::basis::{cartesian_components, ncart, Shell, L_MAX};
use crate::common::constants::TWO_PI_POW_5_2;

use auxiliary::auxiliary_table;
use expansion::{expansion_table, ExpansionTable};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ThreeCenterKernelError {
    #[error("bra angular momenta must satisfy la >= lb, got la={la} lb={lb}")]
    BraOrderReversed { la: usize, lb: usize },
    #[error("angular momentum {l} exceeds the supported maximum {max}", max = L_MAX)]
    AngularMomentumTooHigh { l: usize },
}

/// Pair and composite-center quantities shared by every integral of one
/// primitive shell triple.
#[derive(Debug, Clone, Copy)]
pub struct HermiteParameters {
    /// Bra pair exponent zeta = za + zb.
    pub zeta: f64,
    /// Ket exponent eta = zc.
    pub eta: f64,
    /// Reduced exponent rho = zeta eta / (zeta + eta).
    pub rho: f64,
    /// Kernel argument T = rho |P - C|^2.
    pub boys_argument: f64,
    /// P - A per dimension.
    pub pa: [f64; 3],
    /// P - B per dimension.
    pub pb: [f64; 3],
    /// P - C per dimension.
    pub pq: [f64; 3],
    /// Per-dimension bra overlap exp(-za zb (A_d - B_d)^2 / zeta). The
    /// integral prefactor deliberately omits this factor; it is counted
    /// exactly once, here, through the expansion-table bases.
    pub gauss_ab: [f64; 3],
    /// 2 pi^{5/2} / (zeta eta sqrt(zeta + eta)).
    pub prefactor: f64,
}

impl HermiteParameters {
    pub fn build(shell_a: &Shell, shell_b: &Shell, shell_c: &Shell) -> Self {
        Self::from_primitives(
            shell_a.exponent,
            shell_b.exponent,
            shell_c.exponent,
            shell_a.center,
            shell_b.center,
            shell_c.center,
        )
    }

    pub fn from_primitives(
        za: f64,
        zb: f64,
        zc: f64,
        a: [f64; 3],
        b: [f64; 3],
        c: [f64; 3],
    ) -> Self {
        let zeta = za + zb;
        let eta = zc;
        let rho = zeta * eta / (zeta + eta);
        let mut pa = [0.0; 3];
        let mut pb = [0.0; 3];
        let mut pq = [0.0; 3];
        let mut gauss_ab = [0.0; 3];
        let mut pq2 = 0.0;
        for d in 0..3 {
            let p = (za * a[d] + zb * b[d]) / zeta;
            pa[d] = p - a[d];
            pb[d] = p - b[d];
            pq[d] = p - c[d];
            pq2 += pq[d] * pq[d];
            let ab = a[d] - b[d];
            gauss_ab[d] = (-za * zb / zeta * ab * ab).exp();
        }
        Self {
            zeta,
            eta,
            rho,
            boys_argument: rho * pq2,
            pa,
            pb,
            pq,
            gauss_ab,
            prefactor: TWO_PI_POW_5_2 / (zeta * eta * (zeta + eta).sqrt()),
        }
    }

    /// Scales raw kernel values G_m into the engine-ready sequence
    /// prefactor * (-2 rho)^m G_m consumed by the auxiliary recursion.
    pub fn scale_orders(&self, kernel: &[f64], out: &mut [f64]) {
        let mut factor = self.prefactor;
        for (value, g) in out.iter_mut().zip(kernel) {
            *value = factor * g;
            factor *= -2.0 * self.rho;
        }
    }
}

/// Integral assembly for one (la, lb | lc) angular momentum class. The
/// kernel is geometry-free and may be reused across primitives and
/// centers; `la >= lb` is required, callers handle the swapped class by
/// transposing the output.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreeCenterKernel {
    la: usize,
    lb: usize,
    lc: usize,
    components_a: Vec<[usize; 3]>,
    components_b: Vec<[usize; 3]>,
    components_c: Vec<[usize; 3]>,
}

impl ThreeCenterKernel {
    pub fn new(la: usize, lb: usize, lc: usize) -> Result<Self, ThreeCenterKernelError> {
        for l in [la, lb, lc] {
            if l > L_MAX {
                return Err(ThreeCenterKernelError::AngularMomentumTooHigh { l });
            }
        }
        if la < lb {
            return Err(ThreeCenterKernelError::BraOrderReversed { la, lb });
        }
        Ok(Self {
            la,
            lb,
            lc,
            components_a: cartesian_components(la),
            components_b: cartesian_components(lb),
            components_c: cartesian_components(lc),
        })
    }

    /// Highest kernel order the operator evaluation must supply.
    pub fn max_order(&self) -> usize {
        self.la + self.lb + self.lc
    }

    /// Number of Cartesian integrals one primitive triple produces.
    pub fn output_len(&self) -> usize {
        ncart(self.la) * ncart(self.lb) * ncart(self.lc)
    }

    /// Contracts the expansion tables against the auxiliary table and
    /// writes the integrals to `out` in a-major, b-middle, c-minor order.
    /// `scaled_kernel` must hold `max_order() + 1` values produced by
    /// [`HermiteParameters::scale_orders`].
    pub fn assemble(&self, params: &HermiteParameters, scaled_kernel: &[f64], out: &mut [f64]) {
        debug_assert!(scaled_kernel.len() > self.max_order());
        debug_assert!(out.len() >= self.output_len());

        let e: [ExpansionTable; 3] = std::array::from_fn(|d| {
            expansion_table(
                self.la,
                self.lb,
                params.zeta,
                params.pa[d],
                params.pb[d],
                params.gauss_ab[d],
            )
        });
        // Ket expansion about its own center: zero offsets, unit base.
        let ec = expansion_table(self.lc, 0, params.eta, 0.0, 0.0, 1.0);
        let r0 = auxiliary_table(self.max_order(), scaled_kernel, params.pq);

        let mut index = 0;
        for &[ax, ay, az] in &self.components_a {
            for &[bx, by, bz] in &self.components_b {
                for &[cx, cy, cz] in &self.components_c {
                    let mut value = 0.0;
                    for tau in 0..=cx {
                        let ecx = ec.get(cx, 0, tau);
                        if ecx == 0.0 {
                            continue;
                        }
                        for nu in 0..=cy {
                            let ecy = ec.get(cy, 0, nu);
                            if ecy == 0.0 {
                                continue;
                            }
                            for phi in 0..=cz {
                                let ecz = ec.get(cz, 0, phi);
                                if ecz == 0.0 {
                                    continue;
                                }
                                // Hermite derivatives on the ket center pick
                                // up one sign flip per order.
                                let sign = if (tau + nu + phi) % 2 == 0 { 1.0 } else { -1.0 };
                                let ket = sign * ecx * ecy * ecz;
                                value += ket
                                    * self.bra_contraction(
                                        &e, &r0, ax, ay, az, bx, by, bz, tau, nu, phi,
                                    );
                            }
                        }
                    }
                    out[index] = value;
                    index += 1;
                }
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn bra_contraction(
        &self,
        e: &[ExpansionTable; 3],
        r0: &auxiliary::AuxiliaryTable,
        ax: usize,
        ay: usize,
        az: usize,
        bx: usize,
        by: usize,
        bz: usize,
        tau: usize,
        nu: usize,
        phi: usize,
    ) -> f64 {
        let mut total = 0.0;
        for t in 0..=(ax + bx) {
            let ex = e[0].get(ax, bx, t);
            if ex == 0.0 {
                continue;
            }
            for u in 0..=(ay + by) {
                let ey = e[1].get(ay, by, u);
                if ey == 0.0 {
                    continue;
                }
                for v in 0..=(az + bz) {
                    let ez = e[2].get(az, bz, v);
                    if ez == 0.0 {
                        continue;
                    }
                    total += ex * ey * ez * r0.get(t + tau, u + nu, v + phi);
                }
            }
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::{HermiteParameters, ThreeCenterKernel, ThreeCenterKernelError};

    #[test]
    fn kernel_rejects_reversed_bra_order_and_excess_angular_momentum() {
        assert_eq!(
            ThreeCenterKernel::new(0, 1, 0),
            Err(ThreeCenterKernelError::BraOrderReversed { la: 0, lb: 1 })
        );
        assert_eq!(
            ThreeCenterKernel::new(7, 0, 0),
            Err(ThreeCenterKernelError::AngularMomentumTooHigh { l: 7 })
        );
        assert!(ThreeCenterKernel::new(3, 2, 4).is_ok());
    }

    #[test]
    fn parameters_carry_the_composite_center_geometry() {
        let params = HermiteParameters::from_primitives(
            0.8,
            1.1,
            0.6,
            [0.0, 0.1, -0.3],
            [0.5, -0.2, 0.4],
            [-0.7, 0.9, 0.2],
        );
        assert!((params.zeta - 1.9).abs() < 1.0e-15);
        assert!((params.eta - 0.6).abs() < 1.0e-15);
        assert!((params.rho - 1.9 * 0.6 / 2.5).abs() < 1.0e-15);
        for d in 0..3 {
            // P sits between A and B, so the offsets have opposite signs
            // (or both vanish) and differ by B_d - A_d.
            let diff = params.pa[d] - params.pb[d];
            let ab = [0.0 - 0.5, 0.1 + 0.2, -0.3 - 0.4][d];
            assert!((diff - ab).abs() < 1.0e-15);
        }
        let t = params.rho
            * params.pq.iter().map(|x| x * x).sum::<f64>();
        assert!((params.boys_argument - t).abs() < 1.0e-15);
    }

    #[test]
    fn scale_orders_applies_the_alternating_rho_powers() {
        let params = HermiteParameters::from_primitives(
            1.0,
            1.0,
            2.0,
            [0.0; 3],
            [0.0; 3],
            [1.0, 0.0, 0.0],
        );
        let kernel = [1.0, 1.0, 1.0];
        let mut scaled = [0.0; 3];
        params.scale_orders(&kernel, &mut scaled);
        assert!((scaled[0] - params.prefactor).abs() < 1.0e-15);
        assert!((scaled[1] + 2.0 * params.rho * params.prefactor).abs() < 1.0e-14);
        assert!((scaled[2] - 4.0 * params.rho * params.rho * params.prefactor).abs() < 1.0e-14);
    }
}
