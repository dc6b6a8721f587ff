//! Property-based tests for the state-identity contract.
//!
//! The canonical key is the engine's node identity, so its invariants —
//! phase invariance and agreement with `equivalent` — hold for arbitrary
//! states, not just the handful in the unit tests.

use num_complex::Complex64;
use proptest::prelude::*;

use alsvid_ir::QuditRegister;
use alsvid_search::{StateVector, Tolerance};

/// Random normalizable amplitude vectors for a 2-qubit register.
fn arb_amplitudes() -> impl Strategy<Value = Vec<Complex64>> {
    prop::collection::vec((-1.0f64..1.0, -1.0f64..1.0), 4)
        .prop_map(|parts| {
            parts
                .into_iter()
                .map(|(re, im)| Complex64::new(re, im))
                .collect::<Vec<_>>()
        })
        .prop_filter("vector must be normalizable", |amps| {
            amps.iter().map(|a| a.norm_sqr()).sum::<f64>().sqrt() > 1e-3
        })
}

fn arb_phase() -> impl Strategy<Value = Complex64> {
    (0.0f64..std::f64::consts::TAU).prop_map(|angle| Complex64::from_polar(1.0, angle))
}

proptest! {
    #[test]
    fn prop_construction_normalizes(amps in arb_amplitudes()) {
        let register = QuditRegister::new(2, 2).unwrap();
        let tolerance = Tolerance::default();
        let state = StateVector::from_amplitudes(register, amps, &tolerance).unwrap();
        prop_assert!((state.norm() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn prop_phase_invariance(amps in arb_amplitudes(), phase in arb_phase()) {
        let register = QuditRegister::new(2, 2).unwrap();
        let tolerance = Tolerance::default();

        let state = StateVector::from_amplitudes(register, amps.clone(), &tolerance).unwrap();
        let rotated_amps: Vec<Complex64> = amps.iter().map(|a| a * phase).collect();
        let rotated =
            StateVector::from_amplitudes(register, rotated_amps, &tolerance).unwrap();

        prop_assert!(state.equivalent(&rotated, &tolerance));
        prop_assert_eq!(
            state.canonical_key(&tolerance),
            rotated.canonical_key(&tolerance)
        );
    }

    #[test]
    fn prop_equivalence_is_symmetric(amps in arb_amplitudes(), phase in arb_phase()) {
        let register = QuditRegister::new(2, 2).unwrap();
        let tolerance = Tolerance::default();

        let a = StateVector::from_amplitudes(register, amps.clone(), &tolerance).unwrap();
        let rotated: Vec<Complex64> = amps.iter().map(|x| x * phase).collect();
        let b = StateVector::from_amplitudes(register, rotated, &tolerance).unwrap();

        prop_assert_eq!(a.equivalent(&b, &tolerance), b.equivalent(&a, &tolerance));
    }

    #[test]
    fn prop_permutation_preserves_norm(amps in arb_amplitudes()) {
        let register = QuditRegister::new(2, 2).unwrap();
        let tolerance = Tolerance::default();
        let state = StateVector::from_amplitudes(register, amps, &tolerance).unwrap();
        let swapped = state.permute_qudits(&[1, 0]).unwrap();
        prop_assert!((swapped.norm() - 1.0).abs() < 1e-9);
        // Swapping twice is the identity.
        let back = swapped.permute_qudits(&[1, 0]).unwrap();
        prop_assert!(back.equivalent(&state, &tolerance));
    }
}
