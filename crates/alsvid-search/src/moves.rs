//! Move enumeration: every (gate, qudit-subset) application on a register.

use alsvid_ir::{GateSet, IrError, QuditId, QuditRegister};

use crate::apply::apply_gate;
use crate::canon::Tolerance;
use crate::error::{SearchError, SearchResult};
use crate::state::StateVector;

/// One candidate edge of the search graph: a gate applied to an ordered
/// qudit subset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    /// Index of the gate in the [`GateSet`]'s stable order.
    pub gate_index: usize,
    /// Ordered target qudits.
    pub qudits: Vec<QuditId>,
}

/// The precomputed, deterministically ordered move list for one
/// (gate set, register) pair.
///
/// Moves enumerate the Cartesian product of every ordered arrangement of
/// distinct qudit indices with every gate of matching arity: arities
/// ascend, arrangements within an arity are lexicographic, and gates
/// within an arrangement follow gate-set order. The order is part of the
/// engine's determinism contract — the tie-break of the search is defined
/// in terms of it.
///
/// Building the table validates the configuration up front: an empty gate
/// set and gates whose arity exceeds the register are rejected before any
/// search work begins.
#[derive(Debug, Clone)]
pub struct MoveTable {
    register: QuditRegister,
    gates: GateSet,
    moves: Vec<Move>,
}

impl MoveTable {
    /// Enumerate all moves for `gates` on `register`.
    pub fn new(gates: &GateSet, register: QuditRegister) -> SearchResult<Self> {
        if gates.is_empty() {
            return Err(SearchError::EmptyGateSet);
        }
        if gates.dimension() != register.dimension() {
            return Err(SearchError::SetDimension {
                set_dimension: gates.dimension(),
                register_dimension: register.dimension(),
            });
        }
        for gate in gates.gates() {
            if gate.arity() > register.num_qudits() {
                return Err(SearchError::Ir(IrError::ArityTooLarge {
                    name: gate.name().to_string(),
                    arity: gate.arity(),
                    num_qudits: register.num_qudits(),
                }));
            }
        }

        let mut moves = vec![];
        for arity in 1..=gates.max_arity() {
            let gate_indices: Vec<usize> = gates
                .gates()
                .iter()
                .enumerate()
                .filter(|(_, g)| g.arity() == arity)
                .map(|(i, _)| i)
                .collect();
            if gate_indices.is_empty() {
                continue;
            }
            for qudits in arrangements(register.num_qudits(), arity) {
                for &gate_index in &gate_indices {
                    moves.push(Move {
                        gate_index,
                        qudits: qudits.clone(),
                    });
                }
            }
        }

        Ok(Self {
            register,
            gates: gates.clone(),
            moves,
        })
    }

    /// The moves, in enumeration order.
    #[inline]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Number of moves.
    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Whether the table has no moves (never true for a built table).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// The register the table was built for.
    #[inline]
    pub fn register(&self) -> QuditRegister {
        self.register
    }

    /// The gate set the table was built from.
    #[inline]
    pub fn gates(&self) -> &GateSet {
        &self.gates
    }

    /// Edge cost of a move: its gate's cost weight.
    #[inline]
    pub fn cost_of(&self, move_index: usize) -> f64 {
        self.gates.gates()[self.moves[move_index].gate_index].cost()
    }

    /// Apply one move to a state.
    pub fn apply(
        &self,
        state: &StateVector,
        move_index: usize,
        tolerance: &Tolerance,
    ) -> SearchResult<StateVector> {
        let mv = &self.moves[move_index];
        let gate = &self.gates.gates()[mv.gate_index];
        apply_gate(state, gate, &mv.qudits, tolerance)
    }

    /// Lazily enumerate all neighbors of `state` in table order.
    ///
    /// Yields `(move index, neighbor state, edge cost)`. Pure: the input
    /// state is never mutated and nothing is cached across calls.
    pub fn expand<'a>(
        &'a self,
        state: &'a StateVector,
        tolerance: &'a Tolerance,
    ) -> impl Iterator<Item = SearchResult<(usize, StateVector, f64)>> + 'a {
        (0..self.moves.len()).map(move |index| {
            let neighbor = self.apply(state, index, tolerance)?;
            Ok((index, neighbor, self.cost_of(index)))
        })
    }
}

/// All ordered arrangements of `arity` distinct indices from `0..n`, in
/// lexicographic order.
fn arrangements(n: u32, arity: u32) -> Vec<Vec<QuditId>> {
    let mut out = vec![];
    let mut current: Vec<QuditId> = Vec::with_capacity(arity as usize);
    fill(n, arity, &mut current, &mut out);
    out
}

fn fill(n: u32, arity: u32, current: &mut Vec<QuditId>, out: &mut Vec<Vec<QuditId>>) {
    if current.len() == arity as usize {
        out.push(current.clone());
        return;
    }
    for candidate in (0..n).map(QuditId) {
        if !current.contains(&candidate) {
            current.push(candidate);
            fill(n, arity, current, out);
            current.pop();
        }
    }
}
