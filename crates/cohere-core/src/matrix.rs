use serde::Serialize;

use crate::complex::Complex;
use crate::constants::{EPSILON, STATE_TOLERANCE};
use crate::error::{CoreError, Result};

/// Square complex matrix stored row-major.
///
/// The tracker only ever holds Hermitian instances: projectors, the scaled
/// identity and real convex blends of those. Products are general and are
/// only used transiently (e.g. `rho · rho` for purity).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComplexMatrix {
    dim: usize,
    entries: Vec<Complex>,
}

impl ComplexMatrix {
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            entries: vec![Complex::ZERO; dim * dim],
        }
    }

    pub fn identity(dim: usize) -> Self {
        let mut m = Self::zeros(dim);
        for i in 0..dim {
            m.entries[i * dim + i] = Complex::ONE;
        }
        m
    }

    /// Maximally mixed state I/N. Purity 1/N.
    pub fn maximally_mixed(dim: usize) -> Self {
        let mut m = Self::identity(dim);
        if dim > 0 {
            m = m.scale(1.0 / dim as f64);
        }
        m
    }

    /// Rank-1 projector |v⟩⟨v| = outer(v, conj(v)).
    pub fn projector(v: &[Complex]) -> Self {
        let dim = v.len();
        let mut entries = Vec::with_capacity(dim * dim);
        for a in v {
            for b in v {
                entries.push(*a * b.conj());
            }
        }
        Self { dim, entries }
    }

    /// Build from explicit rows. Every row must have as many entries as there are rows.
    pub fn from_rows(rows: Vec<Vec<Complex>>) -> Result<Self> {
        let dim = rows.len();
        let mut entries = Vec::with_capacity(dim * dim);
        for row in rows {
            if row.len() != dim {
                return Err(CoreError::DimensionMismatch {
                    expected: dim,
                    actual: row.len(),
                });
            }
            entries.extend(row);
        }
        Ok(Self { dim, entries })
    }

    /// Real-valued convenience constructor.
    pub fn from_real_rows(rows: &[&[f64]]) -> Result<Self> {
        Self::from_rows(
            rows.iter()
                .map(|r| r.iter().copied().map(Complex::real).collect())
                .collect(),
        )
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn get(&self, row: usize, col: usize) -> Complex {
        self.entries[row * self.dim + col]
    }

    pub fn trace(&self) -> Complex {
        (0..self.dim).fold(Complex::ZERO, |acc, i| acc + self.get(i, i))
    }

    pub fn scale(&self, k: f64) -> Self {
        Self {
            dim: self.dim,
            entries: self.entries.iter().map(|z| z.scale(k)).collect(),
        }
    }

    pub fn conj_transpose(&self) -> Self {
        let mut out = Self::zeros(self.dim);
        for r in 0..self.dim {
            for c in 0..self.dim {
                out.entries[c * self.dim + r] = self.get(r, c).conj();
            }
        }
        out
    }

    /// Matrix product. Panics if the dimensions differ.
    pub fn matmul(&self, other: &Self) -> Self {
        assert_eq!(self.dim, other.dim, "matmul dimension mismatch");
        let n = self.dim;
        let mut out = Self::zeros(n);
        for r in 0..n {
            for c in 0..n {
                out.entries[r * n + c] =
                    (0..n).fold(Complex::ZERO, |acc, k| acc + self.get(r, k) * other.get(k, c));
            }
        }
        out
    }

    /// Convex combination `(1 - weight)·self + weight·other`.
    ///
    /// `weight` is not clamped; values outside [0, 1] extrapolate.
    /// Panics if the dimensions differ.
    pub fn blend(&self, other: &Self, weight: f64) -> Self {
        assert_eq!(self.dim, other.dim, "blend dimension mismatch");
        Self {
            dim: self.dim,
            entries: self
                .entries
                .iter()
                .zip(&other.entries)
                .map(|(a, b)| a.scale(1.0 - weight) + b.scale(weight))
                .collect(),
        }
    }

    /// Re(trace(M·M)).
    pub fn purity(&self) -> f64 {
        self.matmul(self).trace().re
    }

    /// True when `M ≈ M†` entrywise within `tol`.
    pub fn is_hermitian(&self, tol: f64) -> bool {
        self.entries
            .iter()
            .zip(&self.conj_transpose().entries)
            .all(|(a, b)| (a.re - b.re).abs() <= tol && (a.im - b.im).abs() <= tol)
    }

    /// Validate that this matrix is a legal state: Hermitian with unit trace.
    pub fn validate_state(&self, name: &str) -> Result<()> {
        if !self.is_hermitian(STATE_TOLERANCE) {
            return Err(CoreError::NonHermitian(name.to_string()));
        }
        let trace = self.trace();
        if (trace.re - 1.0).abs() > STATE_TOLERANCE || trace.im.abs() > STATE_TOLERANCE {
            return Err(CoreError::TraceViolation { trace: trace.re });
        }
        Ok(())
    }

    /// Normalize a vector to unit length. Near-zero vectors map to basis state |0⟩.
    pub fn normalize_vector(v: &[Complex]) -> Vec<Complex> {
        let norm = v.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt();
        if norm < EPSILON || !norm.is_finite() {
            let mut basis = vec![Complex::ZERO; v.len()];
            if let Some(first) = basis.first_mut() {
                *first = Complex::ONE;
            }
            return basis;
        }
        v.iter().map(|z| z.scale(1.0 / norm)).collect()
    }
}
