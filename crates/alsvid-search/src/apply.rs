//! Gate application: embedding a local unitary into the full state space.

use ndarray::Array1;
use num_complex::Complex64;

use alsvid_ir::{Circuit, GateDef, GateSet, QuditId};

use crate::canon::Tolerance;
use crate::error::{SearchError, SearchResult};
use crate::state::StateVector;

/// Apply `gate` to the given qudit positions of `state`, producing a new
/// state.
///
/// Pure function: the input state is untouched. The gate's `d^k` matrix is
/// embedded into the `d^n` space (identity on every other qudit) by
/// gathering the `d^k` amplitudes of each non-target configuration,
/// multiplying by the matrix, and scattering back — the dense `d^n × d^n`
/// operator is never materialized. The result is renormalized to absorb
/// ε-drift from long gate chains.
pub fn apply_gate(
    state: &StateVector,
    gate: &GateDef,
    qudits: &[QuditId],
    tolerance: &Tolerance,
) -> SearchResult<StateVector> {
    let register = state.register();

    if gate.dimension() != register.dimension() {
        return Err(SearchError::GateDimension {
            gate: gate.name().to_string(),
            gate_dimension: gate.dimension(),
            register_dimension: register.dimension(),
        });
    }
    if qudits.len() != gate.arity() as usize {
        return Err(SearchError::ArityMismatch {
            gate: gate.name().to_string(),
            arity: gate.arity(),
            got: qudits.len(),
        });
    }
    for (i, &qudit) in qudits.iter().enumerate() {
        if !register.contains(qudit) {
            return Err(SearchError::QuditOutOfRange {
                qudit,
                num_qudits: register.num_qudits(),
            });
        }
        if qudits[..i].contains(&qudit) {
            return Err(SearchError::DuplicateQudit { qudit });
        }
    }

    let d = register.dimension() as usize;
    let n = register.num_qudits();
    let total = register.total_dim();
    let local_dim = gate.local_dim();
    let matrix = gate.matrix();

    // Stride of each target qudit in the flat row-major index.
    let strides: Vec<usize> = qudits
        .iter()
        .map(|q| d.pow(n - 1 - q.0))
        .collect();

    // Flat offset contributed by each local basis index: local digit j of
    // the gate corresponds to target qudit j (row-major within the gate).
    let mut offsets = vec![0usize; local_dim];
    for (local, offset) in offsets.iter_mut().enumerate() {
        let mut rest = local;
        for j in (0..strides.len()).rev() {
            *offset += (rest % d) * strides[j];
            rest /= d;
        }
    }

    let input = state.amplitudes();
    let mut output: Array1<Complex64> = Array1::zeros(total);
    let mut gathered = vec![Complex64::new(0.0, 0.0); local_dim];

    for base in 0..total {
        // A base configuration has digit 0 at every target position; all
        // other flat indices are reached from exactly one base via offsets.
        if strides.iter().any(|&s| (base / s) % d != 0) {
            continue;
        }

        for (local, &offset) in offsets.iter().enumerate() {
            gathered[local] = input[base + offset];
        }
        for (row, &offset) in offsets.iter().enumerate() {
            let mut sum = Complex64::new(0.0, 0.0);
            for (col, &amp) in gathered.iter().enumerate() {
                sum += matrix[[row, col]] * amp;
            }
            output[base + offset] = sum;
        }
    }

    // from_amplitudes renormalizes, absorbing ε-drift from long gate chains.
    StateVector::from_amplitudes(register, output, tolerance)
}

/// Replay a circuit against an initial state, resolving gates by name.
///
/// Used to verify solutions: the invariant is that replaying a returned
/// circuit yields a state equivalent (up to global phase) to the target.
pub fn replay(
    initial: &StateVector,
    circuit: &Circuit,
    gates: &GateSet,
    tolerance: &Tolerance,
) -> SearchResult<StateVector> {
    let mut state = initial.clone();
    for op in circuit.ops() {
        let (_, gate) = gates
            .find(&op.gate)
            .ok_or_else(|| SearchError::UnknownGate(op.gate.clone()))?;
        state = apply_gate(&state, gate, &op.qudits, tolerance)?;
    }
    Ok(state)
}
