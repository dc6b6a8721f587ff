//! Canonical, hashable state identity.
//!
//! Two state vectors are the same search node iff one is a unit-phase
//! multiple of the other within tolerance. [`CanonicalKey`] realizes that
//! equivalence as a hashable value: fix the global phase by rotating the
//! first significant amplitude onto the positive real axis, then quantize
//! every component to a fixed number of decimal places.

use ndarray::Array1;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Comparison tolerances for state identity.
///
/// This is the single most consequential tuning knob in the engine and is
/// therefore an explicit parameter on every API that compares states:
///
/// - `epsilon` — magnitude floor: amplitudes at or below it are treated as
///   zero when anchoring the global phase, and vectors with norm below it
///   are rejected as degenerate.
/// - `decimals` — quantization granularity of [`CanonicalKey`]. Too fine
///   and floating-point drift from repeated matrix multiplication splits
///   one physical state into many nodes; too coarse and genuinely distinct
///   states collapse into one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    /// Magnitude floor for phase anchoring and norm checks.
    pub epsilon: f64,
    /// Decimal places kept when quantizing amplitudes.
    pub decimals: u32,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            epsilon: 1e-10,
            decimals: 6,
        }
    }
}

impl Tolerance {
    /// Override the magnitude floor.
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Override the quantization granularity.
    #[must_use]
    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = decimals;
        self
    }

    /// Smallest amplitude difference the quantization can still resolve.
    #[inline]
    pub fn resolution(&self) -> f64 {
        10f64.powi(-(self.decimals as i32))
    }
}

/// Hashable identity of a state up to global phase.
///
/// Derived deterministically from an amplitude vector and a [`Tolerance`];
/// equal keys mean "same search node". Keys built with different tolerances
/// are not comparable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalKey(Vec<(i64, i64)>);

impl CanonicalKey {
    /// Compute the key for an amplitude vector.
    pub fn of(amplitudes: &Array1<Complex64>, tolerance: &Tolerance) -> Self {
        let phase = amplitudes
            .iter()
            .find(|a| a.norm() > tolerance.epsilon)
            .map_or(Complex64::new(1.0, 0.0), |a| a.conj() / a.norm());

        let scale = 10f64.powi(tolerance.decimals as i32);
        let quantized = amplitudes
            .iter()
            .map(|a| {
                let rotated = a * phase;
                (quantize(rotated.re, scale), quantize(rotated.im, scale))
            })
            .collect();
        Self(quantized)
    }
}

#[inline]
fn quantize(value: f64, scale: f64) -> i64 {
    // round() maps -0.0 to -0.0, and the cast folds it into 0.
    (value * scale).round() as i64
}
