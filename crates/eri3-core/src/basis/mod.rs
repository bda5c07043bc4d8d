//! Primitive and contracted Cartesian Gaussian shells, together with the
//! Cartesian component bookkeeping the integral driver scatters with.

/// Highest angular momentum supported per shell (i functions).
///
/// The auxiliary-function vectors inside the kernels are sized for
/// `3 * L_MAX` orders, so raising this requires revisiting the branch
/// cutoffs in `numerics::special`.
pub const L_MAX: usize = 6;

/// Number of Cartesian components of a shell with angular momentum `l`.
pub const fn ncart(l: usize) -> usize {
    (l + 1) * (l + 2) / 2
}

/// Cumulative component count below angular momentum `l`.
///
/// Callers lay out tensor axes as the concatenation of all components of
/// consecutive shells; this is the standard offset of the first `l`
/// component within such an axis, `l(l+1)(l+2)/6`.
pub const fn coset_offset(l: usize) -> usize {
    l * (l + 1) * (l + 2) / 6
}

/// Cartesian component exponent triples `[lx, ly, lz]` of a shell with
/// angular momentum `l`, lexicographically ordered with `lx` descending
/// (CCA ordering: xx, xy, xz, yy, yz, zz for d shells).
pub fn cartesian_components(l: usize) -> Vec<[usize; 3]> {
    let mut components = Vec::with_capacity(ncart(l));
    for lx in (0..=l).rev() {
        for ly in (0..=(l - lx)).rev() {
            components.push([lx, ly, l - lx - ly]);
        }
    }
    components
}

/// Normalization constant of the primitive Cartesian Gaussian
/// `x^lx y^ly z^lz exp(-alpha r^2)`.
pub fn primitive_norm(lx: usize, ly: usize, lz: usize, alpha: f64) -> f64 {
    let l = lx + ly + lz;
    let angular = double_factorial(lx) * double_factorial(ly) * double_factorial(lz);
    (2.0 * alpha / crate::common::constants::PI).powf(0.75) * (4.0 * alpha).powf(l as f64 / 2.0)
        / angular.sqrt()
}

/// (2n - 1)!! with the usual conventions (-1)!! = 1!! = 1.
fn double_factorial(n: usize) -> f64 {
    let mut product = 1.0;
    let mut factor = 2.0 * n as f64 - 1.0;
    while factor > 1.0 {
        product *= factor;
        factor -= 2.0;
    }
    product
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShellError {
    #[error("shell angular momentum {angular_momentum} exceeds supported maximum {maximum}")]
    AngularMomentumTooHigh {
        angular_momentum: usize,
        maximum: usize,
    },
    #[error("shell exponent must be finite and > 0, got {value}")]
    InvalidExponent { value: f64 },
    #[error("shell center component {index} must be finite, got {value}")]
    NonFiniteCenter { index: usize, value: f64 },
    #[error("contracted shell must have at least one primitive")]
    EmptyContraction,
    #[error("contraction coefficient {index} must be finite, got {value}")]
    NonFiniteCoefficient { index: usize, value: f64 },
}

/// A primitive Cartesian Gaussian shell: all `ncart(l)` components that
/// share one exponent and center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shell {
    pub angular_momentum: usize,
    pub exponent: f64,
    pub center: [f64; 3],
}

impl Shell {
    pub fn new(angular_momentum: usize, exponent: f64, center: [f64; 3]) -> Result<Self, ShellError> {
        if angular_momentum > L_MAX {
            return Err(ShellError::AngularMomentumTooHigh {
                angular_momentum,
                maximum: L_MAX,
            });
        }
        if !exponent.is_finite() || exponent <= 0.0 {
            return Err(ShellError::InvalidExponent { value: exponent });
        }
        for (index, value) in center.iter().copied().enumerate() {
            if !value.is_finite() {
                return Err(ShellError::NonFiniteCenter { index, value });
            }
        }

        Ok(Self {
            angular_momentum,
            exponent,
            center,
        })
    }

    pub fn component_count(&self) -> usize {
        ncart(self.angular_momentum)
    }
}

/// One primitive of a contracted shell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContractionPrimitive {
    pub exponent: f64,
    pub coefficient: f64,
}

/// A fixed linear combination of primitives sharing angular momentum and
/// center. Coefficients are applied as given; callers fold primitive
/// normalization into them when needed.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractedShell {
    pub angular_momentum: usize,
    pub center: [f64; 3],
    pub primitives: Vec<ContractionPrimitive>,
}

impl ContractedShell {
    pub fn new(
        angular_momentum: usize,
        center: [f64; 3],
        primitives: Vec<ContractionPrimitive>,
    ) -> Result<Self, ShellError> {
        if primitives.is_empty() {
            return Err(ShellError::EmptyContraction);
        }
        for (index, primitive) in primitives.iter().enumerate() {
            Shell::new(angular_momentum, primitive.exponent, center)?;
            if !primitive.coefficient.is_finite() {
                return Err(ShellError::NonFiniteCoefficient {
                    index,
                    value: primitive.coefficient,
                });
            }
        }

        Ok(Self {
            angular_momentum,
            center,
            primitives,
        })
    }

    pub fn component_count(&self) -> usize {
        ncart(self.angular_momentum)
    }

    pub fn primitive_shell(&self, index: usize) -> Shell {
        Shell {
            angular_momentum: self.angular_momentum,
            exponent: self.primitives[index].exponent,
            center: self.center,
        }
    }
}
