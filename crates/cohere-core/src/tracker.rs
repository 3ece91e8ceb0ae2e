use crate::complex::Complex;
use crate::constants::{CORRECTION_SWITCH, STRONG_CORRECTION_GAIN, WEAK_CORRECTION_GAIN};
use crate::error::{CoreError, Result};
use crate::matrix::ComplexMatrix;

/// Owns the state matrix `rho` and the fixed reference projector.
///
/// Every mutation is a real convex blend of unit-trace Hermitian matrices,
/// so `rho` stays Hermitian with trace 1.
#[derive(Clone, Debug)]
pub struct CoherenceTracker {
    rho: ComplexMatrix,
    reference: ComplexMatrix,
    mixed: ComplexMatrix,
}

impl CoherenceTracker {
    /// Start in the pure state |ideal⟩⟨ideal|. The vector is normalized first.
    ///
    /// An empty vector has no unit-trace state and is rejected.
    pub fn new(ideal: &[Complex]) -> Result<Self> {
        if ideal.is_empty() {
            return Err(CoreError::EmptyState);
        }
        Ok(Self::from_unit(&ComplexMatrix::normalize_vector(ideal)))
    }

    /// Two-level tracker aligned with basis state |0⟩.
    pub fn ground() -> Self {
        Self::from_unit(&[Complex::ONE, Complex::ZERO])
    }

    fn from_unit(ideal: &[Complex]) -> Self {
        let reference = ComplexMatrix::projector(ideal);
        Self {
            rho: reference.clone(),
            mixed: ComplexMatrix::maximally_mixed(reference.dim()),
            reference,
        }
    }

    /// Tracker with an explicit starting state.
    pub fn with_state(ideal: &[Complex], rho: ComplexMatrix) -> Result<Self> {
        let mut tracker = Self::new(ideal)?;
        if rho.dim() != tracker.dimension() {
            return Err(CoreError::DimensionMismatch {
                expected: tracker.dimension(),
                actual: rho.dim(),
            });
        }
        rho.validate_state("rho")?;
        tracker.rho = rho;
        Ok(tracker)
    }

    pub fn dimension(&self) -> usize {
        self.reference.dim()
    }

    pub fn rho(&self) -> &ComplexMatrix {
        &self.rho
    }

    pub fn reference(&self) -> &ComplexMatrix {
        &self.reference
    }

    pub fn trace(&self) -> f64 {
        self.rho.trace().re
    }

    /// Re(trace(rho²)). 1.0 for a pure state, 1/N for the maximally mixed one.
    pub fn purity(&self) -> f64 {
        self.rho.purity()
    }

    /// `rho ← (1 - noise)·rho + noise·I/N`. The noise level is not clamped.
    pub fn mix_noise(&mut self, noise: f64) {
        self.rho = self.rho.blend(&self.mixed, noise);
    }

    /// Pull `rho` toward the reference and return the new purity.
    ///
    /// Strong gain below the switch purity, weak gain above it.
    pub fn correct(&mut self) -> f64 {
        let gain = if self.purity() < CORRECTION_SWITCH {
            STRONG_CORRECTION_GAIN
        } else {
            WEAK_CORRECTION_GAIN
        };
        self.rho = self.rho.blend(&self.reference, gain);
        self.purity()
    }
}
