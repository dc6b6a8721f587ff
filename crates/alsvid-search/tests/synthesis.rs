//! End-to-end synthesis scenarios.

use num_complex::Complex64;

use alsvid_ir::{GateDef, GateSet, QuditRegister};
use alsvid_search::{
    replay, synthesize, BasisSupportTarget, Budget, BudgetKind, ExactTarget, MoveTable,
    SearchConfig, SearchOutcome, StateVector, TargetMatcher, Tolerance,
};

fn bell_gates() -> GateSet {
    GateSet::new(2)
        .unwrap()
        .with_gate(GateDef::hadamard().unwrap())
        .unwrap()
        .with_gate(GateDef::cnot().unwrap())
        .unwrap()
}

fn bell_state(register: QuditRegister, tolerance: &Tolerance) -> StateVector {
    let one = Complex64::new(1.0, 0.0);
    StateVector::superposition(register, &[(vec![0, 0], one), (vec![1, 1], one)], tolerance)
        .unwrap()
}

/// Minimum cost over every gate sequence of bounded length that reaches
/// the target, by exhaustive enumeration. Ground truth for optimality.
fn brute_force_min_cost(
    initial: &StateVector,
    target: &dyn TargetMatcher,
    gates: &GateSet,
    max_depth: usize,
    tolerance: &Tolerance,
) -> Option<f64> {
    let table = MoveTable::new(gates, initial.register()).unwrap();

    fn descend(
        table: &MoveTable,
        state: &StateVector,
        target: &dyn TargetMatcher,
        cost_so_far: f64,
        depth_left: usize,
        tolerance: &Tolerance,
        best: &mut Option<f64>,
    ) {
        if target.matches(state, tolerance) {
            *best = Some(best.map_or(cost_so_far, |b: f64| b.min(cost_so_far)));
            return;
        }
        if depth_left == 0 {
            return;
        }
        for index in 0..table.len() {
            let next = table.apply(state, index, tolerance).unwrap();
            descend(
                table,
                &next,
                target,
                cost_so_far + table.cost_of(index),
                depth_left - 1,
                tolerance,
                best,
            );
        }
    }

    let mut best = None;
    descend(
        &table,
        initial,
        target,
        0.0,
        max_depth,
        tolerance,
        &mut best,
    );
    best
}

#[test]
fn test_bell_scenario_exact_circuit() {
    // d=2, n=2, |00⟩, {H, CX} at cost 1 each: expect exactly
    // [h q0, cx q0,q1] at cost 2.
    let register = QuditRegister::new(2, 2).unwrap();
    let tolerance = Tolerance::default();
    let initial = StateVector::zero(register);
    let target = ExactTarget::new(bell_state(register, &tolerance));
    let gates = bell_gates();

    let outcome = synthesize(&initial, &target, &gates, &SearchConfig::default()).unwrap();
    let solution = outcome.solution().expect("bell state is reachable");

    assert_eq!(solution.circuit.len(), 2);
    assert_eq!(solution.circuit.total_cost(), 2.0);
    let rendered: Vec<String> = solution
        .circuit
        .ops()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(rendered, vec!["h q0", "cx q0,q1"]);
}

#[test]
fn test_optimality_matches_brute_force() {
    let register = QuditRegister::new(2, 2).unwrap();
    let tolerance = Tolerance::default();
    let initial = StateVector::zero(register);
    let target = ExactTarget::new(bell_state(register, &tolerance));
    let gates = bell_gates();

    let engine_cost = synthesize(&initial, &target, &gates, &SearchConfig::default())
        .unwrap()
        .solution()
        .unwrap()
        .circuit
        .total_cost();

    let brute = brute_force_min_cost(&initial, &target, &gates, 3, &tolerance)
        .expect("reachable within 3 gates");
    assert_eq!(engine_cost, brute);
}

#[test]
fn test_solution_replays_to_target() {
    let register = QuditRegister::new(2, 2).unwrap();
    let tolerance = Tolerance::default();
    let initial = StateVector::zero(register);
    let bell = bell_state(register, &tolerance);
    let gates = bell_gates();

    let outcome = synthesize(
        &initial,
        &ExactTarget::new(bell.clone()),
        &gates,
        &SearchConfig::default(),
    )
    .unwrap();
    let solution = outcome.solution().unwrap();

    let reached = replay(&initial, &solution.circuit, &gates, &tolerance).unwrap();
    assert!(reached.equivalent(&bell, &tolerance));
    assert!(reached.equivalent(&solution.state, &tolerance));
}

#[test]
fn test_determinism_across_runs() {
    let register = QuditRegister::new(2, 2).unwrap();
    let tolerance = Tolerance::default();
    let initial = StateVector::zero(register);
    let target = ExactTarget::new(bell_state(register, &tolerance));
    // The full standard set adds redundant gates and therefore ties.
    let gates = GateSet::standard_qubit().unwrap();
    let config = SearchConfig::default();

    let first = synthesize(&initial, &target, &gates, &config).unwrap();
    let second = synthesize(&initial, &target, &gates, &config).unwrap();

    let first = first.solution().unwrap();
    let second = second.solution().unwrap();
    // Identical gate sequence, not merely identical cost.
    assert_eq!(first.circuit.ops(), second.circuit.ops());
}

#[test]
fn test_identity_target_yields_empty_circuit() {
    let register = QuditRegister::new(2, 2).unwrap();
    let initial = StateVector::zero(register);
    let target = ExactTarget::new(initial.clone());
    let gates = bell_gates();

    let outcome = synthesize(&initial, &target, &gates, &SearchConfig::default()).unwrap();
    let solution = outcome.solution().unwrap();
    assert!(solution.circuit.is_empty());
    assert_eq!(solution.circuit.total_cost(), 0.0);
}

#[test]
fn test_unreachable_target_is_definitive() {
    // Z gates never move |00⟩ off its basis state, so a superposition
    // target is unreachable — and reported as such, not as a budget stop.
    let register = QuditRegister::new(2, 2).unwrap();
    let tolerance = Tolerance::default();
    let initial = StateVector::zero(register);
    let one = Complex64::new(1.0, 0.0);
    let plus = StateVector::superposition(
        register,
        &[(vec![0, 0], one), (vec![1, 0], one)],
        &tolerance,
    )
    .unwrap();
    let gates = GateSet::new(2)
        .unwrap()
        .with_gate(GateDef::pauli_z().unwrap())
        .unwrap();

    let outcome = synthesize(
        &initial,
        &ExactTarget::new(plus),
        &gates,
        &SearchConfig::default(),
    )
    .unwrap();
    match outcome {
        SearchOutcome::NotReachable { stats } => {
            assert_eq!(stats.expansions, 1);
        }
        other => panic!("expected NotReachable, got {other:?}"),
    }
}

#[test]
fn test_expansion_budget_never_reports_unreachable() {
    let register = QuditRegister::new(2, 2).unwrap();
    let tolerance = Tolerance::default();
    let initial = StateVector::zero(register);
    let target = ExactTarget::new(bell_state(register, &tolerance));
    let gates = bell_gates();

    // The bell instance needs more than two expansions; capping below
    // that must report the budget, never a false NotReachable.
    let config =
        SearchConfig::default().with_budget(Budget::unlimited().with_max_expansions(2));
    let outcome = synthesize(&initial, &target, &gates, &config).unwrap();
    match outcome {
        SearchOutcome::BudgetExceeded { reason, best, .. } => {
            assert_eq!(reason, BudgetKind::Expansions);
            assert!(best.is_some());
        }
        other => panic!("expected BudgetExceeded, got {other:?}"),
    }
}

#[test]
fn test_cost_cap_clipping_is_reported_as_budget() {
    let register = QuditRegister::new(2, 2).unwrap();
    let tolerance = Tolerance::default();
    let initial = StateVector::zero(register);
    let target = ExactTarget::new(bell_state(register, &tolerance));
    let gates = bell_gates();

    // Every candidate beyond cost 1 is clipped; the frontier then runs
    // dry, but the space beyond the cap was never explored.
    let config = SearchConfig::default().with_budget(Budget::unlimited().with_max_cost(1.0));
    let outcome = synthesize(&initial, &target, &gates, &config).unwrap();
    match outcome {
        SearchOutcome::BudgetExceeded { reason, .. } => {
            assert_eq!(reason, BudgetKind::Cost);
        }
        other => panic!("expected BudgetExceeded, got {other:?}"),
    }
}

#[test]
fn test_zero_deadline_stops_immediately() {
    let register = QuditRegister::new(2, 2).unwrap();
    let tolerance = Tolerance::default();
    let initial = StateVector::zero(register);
    let target = ExactTarget::new(bell_state(register, &tolerance));
    let gates = bell_gates();

    let config = SearchConfig::default()
        .with_budget(Budget::unlimited().with_deadline(std::time::Duration::ZERO));
    let outcome = synthesize(&initial, &target, &gates, &config).unwrap();
    match outcome {
        SearchOutcome::BudgetExceeded { reason, best, .. } => {
            assert_eq!(reason, BudgetKind::Deadline);
            assert!(best.is_none());
        }
        other => panic!("expected BudgetExceeded, got {other:?}"),
    }
}

#[test]
fn test_qutrit_ghz_from_bell_pair_prefix() {
    // The scalable GHZ construction: start from the three-qutrit "bell
    // prefix" (|000⟩+|110⟩+|220⟩)/√3, use subspace-X gates (cost 1) and
    // subspace-SWAPs (cost 10), and ask for support {000, 111, 222}.
    let register = QuditRegister::new(3, 3).unwrap();
    let tolerance = Tolerance::default();
    let one = Complex64::new(1.0, 0.0);
    let initial = StateVector::superposition(
        register,
        &[
            (vec![0, 0, 0], one),
            (vec![1, 1, 0], one),
            (vec![2, 2, 0], one),
        ],
        &tolerance,
    )
    .unwrap();

    let gates = GateSet::new(3)
        .unwrap()
        .with_gate(GateDef::subspace_x(3, 0).unwrap())
        .unwrap()
        .with_gate(GateDef::subspace_x(3, 1).unwrap())
        .unwrap()
        .with_gate(GateDef::subspace_swap(3, 0).unwrap().with_cost(10.0).unwrap())
        .unwrap()
        .with_gate(GateDef::subspace_swap(3, 1).unwrap().with_cost(10.0).unwrap())
        .unwrap();

    let target = BasisSupportTarget::new(
        register,
        &[vec![0, 0, 0], vec![1, 1, 1], vec![2, 2, 2]],
    )
    .unwrap();

    // All gates permute basis states, so the reachable space is finite;
    // the cap is a safety net, not an expected stop.
    let config =
        SearchConfig::default().with_budget(Budget::unlimited().with_max_expansions(100_000));
    let outcome = synthesize(&initial, &target, &gates, &config).unwrap();
    let solution = outcome.solution().expect("GHZ support is reachable");

    // Splitting qudit 2 across branches takes at least one two-qudit gate.
    assert!(
        solution
            .circuit
            .ops()
            .iter()
            .any(|op| op.gate.starts_with("subswap")),
        "expected at least one subspace-SWAP in {}",
        solution.circuit
    );
    assert!(solution.circuit.total_cost() >= 10.0);

    let reached = replay(&initial, &solution.circuit, &gates, &tolerance).unwrap();
    assert!(target.matches(&reached, &tolerance));
}
