//! `alsvid-search` — minimal-cost circuit synthesis by shortest-path
//! search.
//!
//! Given an initial qudit state, a fixed catalog of discrete gates
//! ([`alsvid_ir::GateSet`]), and a goal ([`TargetMatcher`]), the engine
//! runs Dijkstra's algorithm over the implicit graph whose nodes are
//! canonicalized state vectors and whose edges are gate applications. The
//! first goal state settled is reached at minimal total gate cost, and the
//! parent chain reconstructs the circuit.
//!
//! State identity is "equal up to global phase, within tolerance": states
//! are deduplicated by [`CanonicalKey`], derived by fixing the global
//! phase and quantizing amplitudes per an explicit [`Tolerance`]. That
//! tolerance, together with the [`search::Budget`] limits, is the whole
//! configuration surface — nothing that changes search outcomes hides
//! behind a default.
//!
//! # Quick start
//!
//! ```rust
//! use alsvid_ir::{GateDef, GateSet, QuditRegister};
//! use alsvid_search::{
//!     synthesize, ExactTarget, SearchConfig, StateVector, Tolerance,
//! };
//! use num_complex::Complex64;
//!
//! let register = QuditRegister::new(2, 2).unwrap();
//! let tolerance = Tolerance::default();
//!
//! // |00⟩ → (|00⟩ + |11⟩)/√2 with H and CX.
//! let initial = StateVector::zero(register);
//! let one = Complex64::new(1.0, 0.0);
//! let bell = StateVector::superposition(
//!     register,
//!     &[(vec![0, 0], one), (vec![1, 1], one)],
//!     &tolerance,
//! )
//! .unwrap();
//!
//! let gates = GateSet::new(2)
//!     .unwrap()
//!     .with_gate(GateDef::hadamard().unwrap())
//!     .unwrap()
//!     .with_gate(GateDef::cnot().unwrap())
//!     .unwrap();
//!
//! let outcome = synthesize(
//!     &initial,
//!     &ExactTarget::new(bell),
//!     &gates,
//!     &SearchConfig::default(),
//! )
//! .unwrap();
//!
//! let solution = outcome.solution().unwrap();
//! assert_eq!(solution.circuit.len(), 2);
//! assert_eq!(solution.circuit.total_cost(), 2.0);
//! ```

pub mod apply;
pub mod canon;
pub mod error;
pub mod moves;
pub mod search;
pub mod state;
pub mod target;

pub use apply::{apply_gate, replay};
pub use canon::{CanonicalKey, Tolerance};
pub use error::{SearchError, SearchResult};
pub use moves::{Move, MoveTable};
pub use search::{
    synthesize, Budget, BudgetKind, PartialResult, SearchConfig, SearchOutcome, SearchStats,
    Solution, TieBreak,
};
pub use state::StateVector;
pub use target::{BasisSupportTarget, ClassTarget, ExactTarget, TargetMatcher};
