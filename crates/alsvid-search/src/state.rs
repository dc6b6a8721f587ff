//! Normalized qudit state vectors.

use ndarray::Array1;
use num_complex::Complex64;

use alsvid_ir::QuditRegister;

use crate::canon::{CanonicalKey, Tolerance};
use crate::error::{SearchError, SearchResult};

/// A normalized amplitude vector over a [`QuditRegister`].
///
/// Immutable once constructed; every operation that would change amplitudes
/// produces a fresh state. Identity for search purposes is defined up to
/// global phase via [`StateVector::canonical_key`], not by raw amplitude
/// equality.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    register: QuditRegister,
    amplitudes: Array1<Complex64>,
}

impl StateVector {
    /// Build a state from raw amplitudes, normalizing to unit norm.
    ///
    /// Fails with [`SearchError::DimensionMismatch`] when the vector length
    /// is not `d^n`, and with [`SearchError::InvalidState`] when the input
    /// norm is below `tolerance.epsilon` (a degenerate vector that cannot
    /// be normalized meaningfully).
    pub fn from_amplitudes(
        register: QuditRegister,
        amplitudes: impl Into<Array1<Complex64>>,
        tolerance: &Tolerance,
    ) -> SearchResult<Self> {
        let amplitudes = amplitudes.into();
        if amplitudes.len() != register.total_dim() {
            return Err(SearchError::DimensionMismatch {
                expected: register.total_dim(),
                got: amplitudes.len(),
            });
        }
        let norm = vector_norm(&amplitudes);
        if norm <= tolerance.epsilon {
            return Err(SearchError::InvalidState { norm });
        }
        Ok(Self {
            register,
            amplitudes: amplitudes / Complex64::new(norm, 0.0),
        })
    }

    /// The computational basis state `|levels[0], …, levels[n-1]⟩`.
    pub fn basis(register: QuditRegister, levels: &[u32]) -> SearchResult<Self> {
        if levels.len() != register.num_qudits() as usize {
            return Err(SearchError::DimensionMismatch {
                expected: register.num_qudits() as usize,
                got: levels.len(),
            });
        }
        for &level in levels {
            if level >= register.dimension() {
                return Err(SearchError::LevelOutOfRange {
                    level,
                    dimension: register.dimension(),
                });
            }
        }
        let mut amplitudes = Array1::zeros(register.total_dim());
        amplitudes[register.index_of(levels)] = Complex64::new(1.0, 0.0);
        Ok(Self {
            register,
            amplitudes,
        })
    }

    /// The all-zeros basis state `|0…0⟩`.
    pub fn zero(register: QuditRegister) -> Self {
        let mut amplitudes = Array1::zeros(register.total_dim());
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            register,
            amplitudes,
        }
    }

    /// The uniform GHZ state `(1/√d)·(|0…0⟩ + |1…1⟩ + … + |d-1…d-1⟩)`.
    pub fn ghz(register: QuditRegister) -> Self {
        let d = register.dimension();
        let weight = Complex64::new(1.0 / f64::from(d).sqrt(), 0.0);
        let mut amplitudes = Array1::zeros(register.total_dim());
        for level in 0..d {
            let digits = vec![level; register.num_qudits() as usize];
            amplitudes[register.index_of(&digits)] = weight;
        }
        Self {
            register,
            amplitudes,
        }
    }

    /// A weighted superposition of basis states, normalized.
    ///
    /// This is the symbolic sum-of-basis-states input form: each term is a
    /// digit string plus a complex weight. Weights for repeated digit
    /// strings accumulate.
    pub fn superposition(
        register: QuditRegister,
        terms: &[(Vec<u32>, Complex64)],
        tolerance: &Tolerance,
    ) -> SearchResult<Self> {
        let mut amplitudes = Array1::zeros(register.total_dim());
        for (levels, weight) in terms {
            if levels.len() != register.num_qudits() as usize {
                return Err(SearchError::DimensionMismatch {
                    expected: register.num_qudits() as usize,
                    got: levels.len(),
                });
            }
            for &level in levels {
                if level >= register.dimension() {
                    return Err(SearchError::LevelOutOfRange {
                        level,
                        dimension: register.dimension(),
                    });
                }
            }
            amplitudes[register.index_of(levels)] += *weight;
        }
        Self::from_amplitudes(register, amplitudes, tolerance)
    }

    /// The register this state lives on.
    #[inline]
    pub fn register(&self) -> QuditRegister {
        self.register
    }

    /// The amplitudes, in row-major basis order.
    #[inline]
    pub fn amplitudes(&self) -> &Array1<Complex64> {
        &self.amplitudes
    }

    /// L2 norm; 1 within numerical drift by construction.
    pub fn norm(&self) -> f64 {
        vector_norm(&self.amplitudes)
    }

    /// Inner product `⟨self|other⟩`.
    pub fn overlap(&self, other: &Self) -> SearchResult<Complex64> {
        if self.register != other.register {
            return Err(SearchError::DimensionMismatch {
                expected: self.register.total_dim(),
                got: other.register.total_dim(),
            });
        }
        Ok(self
            .amplitudes
            .iter()
            .zip(other.amplitudes.iter())
            .map(|(a, b)| a.conj() * b)
            .sum())
    }

    /// Hashable identity up to global phase.
    pub fn canonical_key(&self, tolerance: &Tolerance) -> CanonicalKey {
        CanonicalKey::of(&self.amplitudes, tolerance)
    }

    /// Whether two states are equal up to a unit-phase factor.
    ///
    /// States over different registers are never equivalent.
    pub fn equivalent(&self, other: &Self, tolerance: &Tolerance) -> bool {
        self.register == other.register
            && self.canonical_key(tolerance) == other.canonical_key(tolerance)
    }

    /// Relabel qudits: qudit `i` of the result carries what qudit
    /// `permutation[i]` carried before.
    pub fn permute_qudits(&self, permutation: &[u32]) -> SearchResult<Self> {
        let n = self.register.num_qudits();
        let valid = permutation.len() == n as usize && {
            let mut seen = vec![false; n as usize];
            permutation.iter().all(|&p| {
                p < n && !std::mem::replace(&mut seen[p as usize], true)
            })
        };
        if !valid {
            return Err(SearchError::InvalidPermutation { num_qudits: n });
        }

        let mut amplitudes = Array1::zeros(self.register.total_dim());
        for (index, &amp) in self.amplitudes.iter().enumerate() {
            let digits = self.register.digits_of(index);
            let permuted: Vec<u32> = permutation.iter().map(|&p| digits[p as usize]).collect();
            amplitudes[self.register.index_of(&permuted)] = amp;
        }
        Ok(Self {
            register: self.register,
            amplitudes,
        })
    }
}

fn vector_norm(amplitudes: &Array1<Complex64>) -> f64 {
    amplitudes.iter().map(|a| a.norm_sqr()).sum::<f64>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsvid_ir::QuditRegister;

    fn register(d: u32, n: u32) -> QuditRegister {
        QuditRegister::new(d, n).unwrap()
    }

    #[test]
    fn test_from_amplitudes_normalizes() {
        let tolerance = Tolerance::default();
        let state = StateVector::from_amplitudes(
            register(2, 1),
            vec![Complex64::new(3.0, 0.0), Complex64::new(4.0, 0.0)],
            &tolerance,
        )
        .unwrap();
        assert!((state.norm() - 1.0).abs() < 1e-12);
        assert!((state.amplitudes()[0].re - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_vector_rejected() {
        let tolerance = Tolerance::default();
        let err = StateVector::from_amplitudes(
            register(2, 1),
            vec![Complex64::new(0.0, 0.0), Complex64::new(0.0, 0.0)],
            &tolerance,
        )
        .unwrap_err();
        assert!(matches!(err, SearchError::InvalidState { .. }));
    }

    #[test]
    fn test_wrong_length_rejected() {
        let tolerance = Tolerance::default();
        let err = StateVector::from_amplitudes(
            register(2, 2),
            vec![Complex64::new(1.0, 0.0)],
            &tolerance,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SearchError::DimensionMismatch {
                expected: 4,
                got: 1
            }
        ));
    }

    #[test]
    fn test_basis_state_addressing() {
        let state = StateVector::basis(register(3, 2), &[1, 2]).unwrap();
        // Row-major: |12> sits at 1*3 + 2 = 5.
        assert_eq!(state.amplitudes()[5], Complex64::new(1.0, 0.0));
        assert!(matches!(
            StateVector::basis(register(3, 2), &[3, 0]),
            Err(SearchError::LevelOutOfRange { .. })
        ));
    }

    #[test]
    fn test_ghz_support() {
        let state = StateVector::ghz(register(3, 3));
        let w = 1.0 / 3f64.sqrt();
        for (index, amp) in state.amplitudes().iter().enumerate() {
            let expected = matches!(index, 0 | 13 | 26);
            if expected {
                assert!((amp.re - w).abs() < 1e-12);
            } else {
                assert_eq!(*amp, Complex64::new(0.0, 0.0));
            }
        }
    }

    #[test]
    fn test_equivalence_up_to_phase() {
        let tolerance = Tolerance::default();
        let state = StateVector::ghz(register(2, 2));
        let phase = Complex64::from_polar(1.0, 0.777);
        let rotated = StateVector::from_amplitudes(
            state.register(),
            state.amplitudes().mapv(|a| a * phase),
            &tolerance,
        )
        .unwrap();
        assert!(state.equivalent(&rotated, &tolerance));

        let other = StateVector::zero(register(2, 2));
        assert!(!state.equivalent(&other, &tolerance));
    }

    #[test]
    fn test_superposition_accumulates_and_normalizes() {
        let tolerance = Tolerance::default();
        let reg = register(3, 3);
        let one = Complex64::new(1.0, 0.0);
        let state = StateVector::superposition(
            reg,
            &[
                (vec![0, 0, 0], one),
                (vec![1, 1, 0], one),
                (vec![2, 2, 0], one),
            ],
            &tolerance,
        )
        .unwrap();
        let w = 1.0 / 3f64.sqrt();
        assert!((state.amplitudes()[0].re - w).abs() < 1e-12);
        assert!((state.amplitudes()[reg.index_of(&[1, 1, 0])].re - w).abs() < 1e-12);
    }

    #[test]
    fn test_permute_qudits() {
        let reg = register(2, 3);
        let state = StateVector::basis(reg, &[0, 1, 1]).unwrap();
        // Reverse the labels: |011> -> |110>.
        let reversed = state.permute_qudits(&[2, 1, 0]).unwrap();
        assert_eq!(
            reversed.amplitudes()[reg.index_of(&[1, 1, 0])],
            Complex64::new(1.0, 0.0)
        );

        assert!(matches!(
            state.permute_qudits(&[0, 0, 1]),
            Err(SearchError::InvalidPermutation { .. })
        ));
    }

    #[test]
    fn test_overlap() {
        let tolerance = Tolerance::default();
        let reg = register(2, 1);
        let zero = StateVector::basis(reg, &[0]).unwrap();
        let plus = StateVector::superposition(
            reg,
            &[
                (vec![0], Complex64::new(1.0, 0.0)),
                (vec![1], Complex64::new(1.0, 0.0)),
            ],
            &tolerance,
        )
        .unwrap();
        let overlap = zero.overlap(&plus).unwrap();
        assert!((overlap.re - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
    }
}
