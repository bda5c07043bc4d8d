//! Parameter setup, operator dispatch, and tensor scatter for three-center
//! repulsion integrals (a b | v | c).
//!
//! The Hermite engine requires la >= lb on the bra pair; callers never see
//! that constraint because `eri_3center` swaps the first two shells when
//! needed and transposes the corresponding output indices on scatter.

pub mod job;

use ndarray::ArrayViewMut3;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::basis::{ContractedShell, Shell, ShellError};
use crate::hermite::{ThreeCenterKernel, ThreeCenterKernelError};
use crate::numerics::special::boys::boys_sequence;
use crate::numerics::special::truncated::{AnalyticTruncatedCoulomb, TruncatedCoulombApi};

pub use crate::hermite::HermiteParameters;

/// Interaction operator v(|r1 - r2|) of the repulsion integral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Operator {
    /// v(r) = 1/r.
    Coulomb,
    /// v(r) = erfc(omega r)/r.
    ShortRange { omega: f64 },
    /// v(r) = 1/r inside a sphere of radius `cutoff_radius`, zero outside.
    Truncated { cutoff_radius: f64 },
}

impl Operator {
    fn validate(self) -> Result<(), EriError> {
        let (name, value) = match self {
            Operator::Coulomb => return Ok(()),
            Operator::ShortRange { omega } => ("omega", omega),
            Operator::Truncated { cutoff_radius } => ("cutoff_radius", cutoff_radius),
        };
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(EriError::InvalidOperatorParameter { name, value })
        }
    }
}

#[derive(Debug, Error)]
pub enum EriError {
    #[error(transparent)]
    Shell(#[from] ShellError),
    #[error(transparent)]
    Kernel(#[from] ThreeCenterKernelError),
    #[error("operator parameter {name} must be finite and positive, got {value}")]
    InvalidOperatorParameter { name: &'static str, value: f64 },
    #[error(
        "scatter block for center {center} needs {count} slots at offset {offset} \
         but the output axis extent is {extent}"
    )]
    ScatterOutOfBounds {
        center: char,
        offset: usize,
        count: usize,
        extent: usize,
    },
}

/// Per-center offsets into the caller's 3-index output tensor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScatterOffsets {
    pub a: usize,
    pub b: usize,
    pub c: usize,
}

/// Reusable work buffers for repeated evaluation, plus the
/// truncated-Coulomb evaluator whose quadrature grid is built once.
pub struct EriScratch {
    kernel_values: Vec<f64>,
    scaled: Vec<f64>,
    integrals: Vec<f64>,
    accumulated: Vec<f64>,
    truncated: Box<dyn TruncatedCoulombApi>,
}

impl Default for EriScratch {
    fn default() -> Self {
        Self::new()
    }
}

impl EriScratch {
    pub fn new() -> Self {
        Self::with_truncated_evaluator(Box::new(AnalyticTruncatedCoulomb::new()))
    }

    /// Swaps in an alternative truncated-Coulomb evaluation, for instance
    /// a tabulated one.
    pub fn with_truncated_evaluator(evaluator: Box<dyn TruncatedCoulombApi>) -> Self {
        Self {
            kernel_values: Vec::new(),
            scaled: Vec::new(),
            integrals: Vec::new(),
            accumulated: Vec::new(),
            truncated: evaluator,
        }
    }

    fn reserve(&mut self, max_order: usize, output_len: usize) {
        self.kernel_values.resize(max_order + 1, 0.0);
        self.scaled.resize(max_order + 1, 0.0);
        self.integrals.resize(output_len, 0.0);
    }
}

/// Evaluates one primitive shell triple and writes the Cartesian block
/// into `out` at the given per-center offsets, row-major within the block.
pub fn eri_3center(
    shell_a: &Shell,
    shell_b: &Shell,
    shell_c: &Shell,
    operator: Operator,
    mut out: ArrayViewMut3<'_, f64>,
    offsets: ScatterOffsets,
    scratch: &mut EriScratch,
) -> Result<(), EriError> {
    operator.validate()?;
    let block = BlockShape::checked(shell_a, shell_b, shell_c, &out, offsets)?;
    let (first, second) = block.bra_order(shell_a, shell_b);
    let kernel = ThreeCenterKernel::new(
        first.angular_momentum,
        second.angular_momentum,
        shell_c.angular_momentum,
    )?;

    let params = HermiteParameters::build(first, second, shell_c);
    scratch.reserve(kernel.max_order(), kernel.output_len());
    evaluate_operator_kernel(
        operator,
        &params,
        kernel.max_order(),
        scratch.truncated.as_ref(),
        &mut scratch.kernel_values,
    );
    params.scale_orders(&scratch.kernel_values, &mut scratch.scaled);
    kernel.assemble(&params, &scratch.scaled, &mut scratch.integrals);
    debug!(
        t = params.boys_argument,
        swapped = block.swapped,
        len = kernel.output_len(),
        "assembled primitive integral block"
    );

    block.scatter(&scratch.integrals, offsets, &mut out);
    Ok(())
}

/// Evaluates one contracted shell triple, accumulating coefficient-weighted
/// primitive blocks before a single scatter.
pub fn eri_3center_contracted(
    shell_a: &ContractedShell,
    shell_b: &ContractedShell,
    shell_c: &ContractedShell,
    operator: Operator,
    mut out: ArrayViewMut3<'_, f64>,
    offsets: ScatterOffsets,
    scratch: &mut EriScratch,
) -> Result<(), EriError> {
    operator.validate()?;
    let block = BlockShape::checked_contracted(shell_a, shell_b, shell_c, &out, offsets)?;
    let (first, second) = block.bra_order(shell_a, shell_b);
    let kernel = ThreeCenterKernel::new(
        first.angular_momentum,
        second.angular_momentum,
        shell_c.angular_momentum,
    )?;

    scratch.reserve(kernel.max_order(), kernel.output_len());
    scratch.accumulated.clear();
    scratch.accumulated.resize(kernel.output_len(), 0.0);

    for (i, pf) in first.primitives.iter().enumerate() {
        for (j, ps) in second.primitives.iter().enumerate() {
            for (k, pc) in shell_c.primitives.iter().enumerate() {
                let params = HermiteParameters::build(
                    &first.primitive_shell(i),
                    &second.primitive_shell(j),
                    &shell_c.primitive_shell(k),
                );
                evaluate_operator_kernel(
                    operator,
                    &params,
                    kernel.max_order(),
                    scratch.truncated.as_ref(),
                    &mut scratch.kernel_values,
                );
                params.scale_orders(&scratch.kernel_values, &mut scratch.scaled);
                kernel.assemble(&params, &scratch.scaled, &mut scratch.integrals);

                let weight = pf.coefficient * ps.coefficient * pc.coefficient;
                for (acc, value) in scratch.accumulated.iter_mut().zip(&scratch.integrals) {
                    *acc += weight * value;
                }
            }
        }
    }
    debug!(
        primitives = first.primitives.len() * second.primitives.len() * shell_c.primitives.len(),
        swapped = block.swapped,
        "accumulated contracted integral block"
    );

    block.scatter(&scratch.accumulated, offsets, &mut out);
    Ok(())
}

/// Fills `out[0..=max_order]` with the raw operator kernel values G_m.
fn evaluate_operator_kernel(
    operator: Operator,
    params: &HermiteParameters,
    max_order: usize,
    truncated: &dyn TruncatedCoulombApi,
    out: &mut [f64],
) {
    let t = params.boys_argument;
    match operator {
        Operator::Coulomb => boys_sequence(max_order, t, out),
        Operator::ShortRange { omega } => {
            let s = omega * omega / (omega * omega + params.rho);
            boys_sequence(max_order, t, out);
            let mut attenuated = vec![0.0; max_order + 1];
            boys_sequence(max_order, s * t, &mut attenuated);
            let mut scale = s.sqrt();
            for (value, long_range) in out.iter_mut().zip(&attenuated) {
                *value -= scale * long_range;
                scale *= s;
            }
        }
        Operator::Truncated { cutoff_radius } => {
            let r = cutoff_radius * params.rho.sqrt();
            if truncated.evaluate(max_order, t, r, out) {
                debug!(t, r, "cutoff beyond the interaction range, using the plain Coulomb kernel");
                boys_sequence(max_order, t, out);
            }
        }
    }
}

/// Component counts, swap decision and bounds checks shared by the
/// primitive and contracted drivers.
#[derive(Debug, Clone, Copy)]
struct BlockShape {
    na: usize,
    nb: usize,
    nc: usize,
    swapped: bool,
}

impl BlockShape {
    fn checked(
        a: &Shell,
        b: &Shell,
        c: &Shell,
        out: &ArrayViewMut3<'_, f64>,
        offsets: ScatterOffsets,
    ) -> Result<Self, EriError> {
        Self::from_momenta(
            a.angular_momentum,
            b.angular_momentum,
            c.angular_momentum,
            out,
            offsets,
        )
    }

    fn checked_contracted(
        a: &ContractedShell,
        b: &ContractedShell,
        c: &ContractedShell,
        out: &ArrayViewMut3<'_, f64>,
        offsets: ScatterOffsets,
    ) -> Result<Self, EriError> {
        Self::from_momenta(
            a.angular_momentum,
            b.angular_momentum,
            c.angular_momentum,
            out,
            offsets,
        )
    }

    fn from_momenta(
        la: usize,
        lb: usize,
        lc: usize,
        out: &ArrayViewMut3<'_, f64>,
        offsets: ScatterOffsets,
    ) -> Result<Self, EriError> {
        let shape = Self {
            na: crate::basis::ncart(la),
            nb: crate::basis::ncart(lb),
            nc: crate::basis::ncart(lc),
            swapped: la < lb,
        };
        let (ea, eb, ec) = out.dim();
        for (center, offset, count, extent) in [
            ('a', offsets.a, shape.na, ea),
            ('b', offsets.b, shape.nb, eb),
            ('c', offsets.c, shape.nc, ec),
        ] {
            if offset + count > extent {
                return Err(EriError::ScatterOutOfBounds {
                    center,
                    offset,
                    count,
                    extent,
                });
            }
        }
        Ok(shape)
    }

    /// Orders the bra shells so the engine sees la >= lb.
    fn bra_order<'s, S>(&self, a: &'s S, b: &'s S) -> (&'s S, &'s S) {
        if self.swapped {
            (b, a)
        } else {
            (a, b)
        }
    }

    /// Writes the engine's flat buffer into the output view. The buffer is
    /// ordered first-major over the engine's bra order; when the bra was
    /// swapped the first two output indices are transposed back.
    fn scatter(&self, buffer: &[f64], offsets: ScatterOffsets, out: &mut ArrayViewMut3<'_, f64>) {
        let mut index = 0;
        if self.swapped {
            for ib in 0..self.nb {
                for ia in 0..self.na {
                    for ic in 0..self.nc {
                        out[[offsets.a + ia, offsets.b + ib, offsets.c + ic]] = buffer[index];
                        index += 1;
                    }
                }
            }
        } else {
            for ia in 0..self.na {
                for ib in 0..self.nb {
                    for ic in 0..self.nc {
                        out[[offsets.a + ia, offsets.b + ib, offsets.c + ic]] = buffer[index];
                        index += 1;
                    }
                }
            }
        }
    }
}
