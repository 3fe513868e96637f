use crate::errors::{Error, Result};

/// Tolerances for deciding whether two floating point values are "the same".
///
/// Two values `a` and `b` are close when `|a - b| <= atol + rtol * |b|`. Note that this isn't
/// symmetric: `b` is the reference value.
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerance {
    /// Relative tolerance
    pub rtol: f64,

    /// Absolute tolerance
    pub atol: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            rtol: 1e-5,
            atol: 1e-8,
        }
    }
}

impl Tolerance {
    pub fn new(rtol: f64, atol: f64) -> Self {
        Self { rtol, atol }
    }

    /// Infinite values are only close to the same infinity.
    pub fn is_close(&self, a: f64, b: f64) -> bool {
        if a.is_infinite() || b.is_infinite() {
            return a == b;
        }

        (a - b).abs() <= self.atol + self.rtol * b.abs()
    }

    /// Whether every value in `a` is close to the value at the same position in `b`.
    ///
    /// NaN is never close to anything. Slices of different lengths can't be compared at all,
    /// which is an error rather than a `false`.
    ///
    pub fn allclose(&self, a: &[f64], b: &[f64]) -> Result<bool> {
        if a.len() != b.len() {
            return Err(Error::ShapeMismatch(a.len(), b.len()));
        }

        Ok(a.iter().zip(b).all(|(&a, &b)| self.is_close(a, b)))
    }
}
