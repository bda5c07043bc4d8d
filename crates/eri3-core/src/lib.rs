//! Three-center electron-repulsion integrals over primitive Cartesian
//! Gaussian basis functions, for the Coulomb, truncated-Coulomb and
//! short-range (erfc) interaction operators.

pub mod basis;
pub mod common;
pub mod eri3;
pub mod hermite;
pub mod numerics;

pub use basis::{ContractedShell, Shell, ShellError};
pub use eri3::{
    eri_3center, eri_3center_contracted, EriError, EriScratch, HermiteParameters, Operator,
    ScatterOffsets,
};
pub use hermite::{ThreeCenterKernel, ThreeCenterKernelError};
pub use numerics::special::truncated::{AnalyticTruncatedCoulomb, TruncatedCoulombApi};
