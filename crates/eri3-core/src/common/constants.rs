//! Shared mathematical constants for the integral kernels.
//!
//! These values are shared across the kernels to avoid ad hoc per-module
//! literal constants.

pub const PI: f64 = 3.141_592_653_589_793_238_462_643_383_279_5_f64;
pub const SQRT_PI: f64 = 1.772_453_850_905_516_027_298_167_483_341_f64;
/// 2 * pi^(5/2), the angular factor of the two-electron prefactor.
pub const TWO_PI_POW_5_2: f64 = 34.986_836_655_249_725_693_f64;
