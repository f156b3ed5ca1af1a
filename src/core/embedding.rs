// This module defines the Embedding type, the numeric vector representation that all
// other components of irvec produce and consume. An Embedding is a fixed-dimension
// vector of f64 values with element-wise arithmetic (addition, subtraction, scalar
// scaling), a fused scale-and-add used by the weighting paths, and approximate
// equality for comparing computed vectors in tests and heuristics. Dimensions are
// fixed at construction; mixing dimensions in arithmetic is a programming error and
// asserts rather than returning a Result. The Display implementation prints elements
// at two decimal places for diagnostics and the dump tool.

//! Fixed-dimension embedding vectors.
//!
//! All vocabulary entries and computed instruction/block/function vectors share
//! this representation. Arithmetic is element-wise and requires both operands to
//! have the same dimension.

use std::fmt;
use std::ops::{Add, AddAssign, Index, Mul, MulAssign, Sub, SubAssign};

/// A fixed-dimension vector of f64 values.
///
/// Embeddings have value semantics: they are cloned where a copy is needed and
/// never shared through interior mutability. The dimension is set at
/// construction and all binary operations require matching dimensions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Embedding {
    data: Vec<f64>,
}

impl Embedding {
    /// Tolerance used by [`Embedding::approx_eq`] callers that have no better choice.
    pub const DEFAULT_TOLERANCE: f64 = 1e-6;

    /// Create a zero vector of the given dimension.
    pub fn zeros(dim: usize) -> Self {
        Self {
            data: vec![0.0; dim],
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the vector has no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The elements as a slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Add `src` scaled by `factor` into `self` without allocating a temporary.
    pub fn scale_and_add(&mut self, src: &Embedding, factor: f64) {
        assert_eq!(self.len(), src.len(), "embedding dimensions differ");
        for (dst, s) in self.data.iter_mut().zip(&src.data) {
            *dst += s * factor;
        }
    }

    /// Element-wise comparison within `tolerance`.
    pub fn approx_eq(&self, other: &Embedding, tolerance: f64) -> bool {
        assert_eq!(self.len(), other.len(), "embedding dimensions differ");
        self.data
            .iter()
            .zip(&other.data)
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }
}

impl From<Vec<f64>> for Embedding {
    fn from(data: Vec<f64>) -> Self {
        Self { data }
    }
}

impl Index<usize> for Embedding {
    type Output = f64;

    fn index(&self, idx: usize) -> &f64 {
        &self.data[idx]
    }
}

impl AddAssign<&Embedding> for Embedding {
    fn add_assign(&mut self, rhs: &Embedding) {
        assert_eq!(self.len(), rhs.len(), "embedding dimensions differ");
        for (dst, s) in self.data.iter_mut().zip(&rhs.data) {
            *dst += s;
        }
    }
}

impl AddAssign<Embedding> for Embedding {
    fn add_assign(&mut self, rhs: Embedding) {
        *self += &rhs;
    }
}

impl SubAssign<&Embedding> for Embedding {
    fn sub_assign(&mut self, rhs: &Embedding) {
        assert_eq!(self.len(), rhs.len(), "embedding dimensions differ");
        for (dst, s) in self.data.iter_mut().zip(&rhs.data) {
            *dst -= s;
        }
    }
}

impl SubAssign<Embedding> for Embedding {
    fn sub_assign(&mut self, rhs: Embedding) {
        *self -= &rhs;
    }
}

impl Add<&Embedding> for Embedding {
    type Output = Embedding;

    fn add(mut self, rhs: &Embedding) -> Embedding {
        self += rhs;
        self
    }
}

impl Add<Embedding> for Embedding {
    type Output = Embedding;

    fn add(self, rhs: Embedding) -> Embedding {
        self + &rhs
    }
}

impl Sub<&Embedding> for Embedding {
    type Output = Embedding;

    fn sub(mut self, rhs: &Embedding) -> Embedding {
        self -= rhs;
        self
    }
}

impl Sub<Embedding> for Embedding {
    type Output = Embedding;

    fn sub(self, rhs: Embedding) -> Embedding {
        self - &rhs
    }
}

impl MulAssign<f64> for Embedding {
    fn mul_assign(&mut self, factor: f64) {
        for dst in &mut self.data {
            *dst *= factor;
        }
    }
}

impl Mul<f64> for Embedding {
    type Output = Embedding;

    fn mul(mut self, factor: f64) -> Embedding {
        self *= factor;
        self
    }
}

impl fmt::Display for Embedding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for elem in &self.data {
            write!(f, " {:.2}", elem)?;
        }
        write!(f, " ]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros() {
        let e = Embedding::zeros(4);
        assert_eq!(e.len(), 4);
        assert_eq!(e.as_slice(), &[0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_add_then_sub_restores() {
        let a = Embedding::from(vec![1.5, -2.0, 0.25]);
        let b = Embedding::from(vec![0.5, 3.0, -1.0]);

        let restored = (a.clone() + &b) - &b;
        assert!(restored.approx_eq(&a, Embedding::DEFAULT_TOLERANCE));
    }

    #[test]
    fn test_addition_commutes() {
        let a = Embedding::from(vec![1.0, 2.0]);
        let b = Embedding::from(vec![3.0, 4.0]);

        let ab = a.clone() + &b;
        let ba = b + &a;
        assert!(ab.approx_eq(&ba, Embedding::DEFAULT_TOLERANCE));
    }

    #[test]
    fn test_scalar_identity() {
        let a = Embedding::from(vec![1.25, -0.5, 3.0]);
        let scaled = a.clone() * 1.0;
        assert!(scaled.approx_eq(&a, Embedding::DEFAULT_TOLERANCE));
    }

    #[test]
    fn test_scalar_scaling() {
        let a = Embedding::from(vec![2.0, 4.0]);
        let scaled = a * 0.5;
        assert_eq!(scaled.as_slice(), &[1.0, 2.0]);
    }

    #[test]
    fn test_scale_and_add() {
        let mut acc = Embedding::from(vec![1.0, 1.0]);
        let src = Embedding::from(vec![2.0, 4.0]);
        acc.scale_and_add(&src, 0.5);
        assert_eq!(acc.as_slice(), &[2.0, 3.0]);
    }

    #[test]
    fn test_approx_eq_tolerance() {
        let a = Embedding::from(vec![1.0, 2.0]);
        let b = Embedding::from(vec![1.0 + 1e-7, 2.0 - 1e-7]);
        let c = Embedding::from(vec![1.0 + 1e-3, 2.0]);

        assert!(a.approx_eq(&b, Embedding::DEFAULT_TOLERANCE));
        assert!(!a.approx_eq(&c, Embedding::DEFAULT_TOLERANCE));
        assert!(a.approx_eq(&c, 1e-2));
    }

    #[test]
    fn test_display_two_decimals() {
        let e = Embedding::from(vec![1.0, 2.5, -0.25]);
        assert_eq!(format!("{}", e), "[ 1.00 2.50 -0.25 ]");
    }

    #[test]
    #[should_panic(expected = "embedding dimensions differ")]
    fn test_mismatched_add_panics() {
        let mut a = Embedding::zeros(2);
        let b = Embedding::zeros(3);
        a += &b;
    }

    #[test]
    #[should_panic(expected = "embedding dimensions differ")]
    fn test_mismatched_sub_panics() {
        let a = Embedding::zeros(4);
        let b = Embedding::zeros(2);
        let _ = a - &b;
    }
}
