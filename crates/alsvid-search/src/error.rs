//! Error types for the synthesis engine.

use alsvid_ir::{IrError, QuditId};
use thiserror::Error;

/// Errors produced while building states or running a synthesis search.
///
/// Budget exhaustion and unreachable targets are *not* errors — they are
/// ordinary [`crate::SearchOutcome`] variants. Everything here is either a
/// caller mistake caught up front or an internal invariant violation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SearchError {
    /// Input amplitude vector cannot be normalized.
    #[error("State vector norm {norm:.3e} is below tolerance; cannot normalize")]
    InvalidState {
        /// Norm of the rejected vector.
        norm: f64,
    },

    /// Amplitude vector length does not match the register.
    #[error("Expected {expected} amplitudes for the register, got {got}")]
    DimensionMismatch {
        /// Amplitudes the register requires (`d^n`).
        expected: usize,
        /// Amplitudes actually supplied.
        got: usize,
    },

    /// A basis-state level is outside `0..d`.
    #[error("Basis level {level} is out of range for dimension {dimension}")]
    LevelOutOfRange {
        /// The offending level.
        level: u32,
        /// Qudit dimension.
        dimension: u32,
    },

    /// A qudit index points outside the register.
    #[error("Qudit {qudit} is out of range for a register of {num_qudits} qudits")]
    QuditOutOfRange {
        /// The offending qudit.
        qudit: QuditId,
        /// Number of qudits in the register.
        num_qudits: u32,
    },

    /// The same qudit appears twice in one gate application.
    #[error("Duplicate qudit {qudit} in gate application")]
    DuplicateQudit {
        /// The repeated qudit.
        qudit: QuditId,
    },

    /// Gate arity and target-subset size disagree.
    #[error("Gate '{gate}' has arity {arity} but was applied to {got} qudits")]
    ArityMismatch {
        /// Name of the gate.
        gate: String,
        /// Declared arity.
        arity: u32,
        /// Number of qudits supplied.
        got: usize,
    },

    /// Gate and register disagree on the qudit dimension.
    #[error("Gate '{gate}' is defined for d={gate_dimension}, register has d={register_dimension}")]
    GateDimension {
        /// Name of the gate.
        gate: String,
        /// Dimension the gate was built for.
        gate_dimension: u32,
        /// Dimension of the register.
        register_dimension: u32,
    },

    /// Gate set and register disagree on the qudit dimension.
    #[error("Gate set is for d={set_dimension}, register has d={register_dimension}")]
    SetDimension {
        /// Dimension of the gate set.
        set_dimension: u32,
        /// Dimension of the register.
        register_dimension: u32,
    },

    /// A circuit op names a gate absent from the gate set.
    #[error("Circuit references unknown gate '{0}'")]
    UnknownGate(String),

    /// Searching with no gates cannot move anywhere.
    #[error("Gate set is empty")]
    EmptyGateSet,

    /// A basis-support target needs at least one basis state.
    #[error("Basis-support target lists no basis states")]
    EmptySupport,

    /// A qudit permutation is malformed.
    #[error("Permutation is not a bijection over {num_qudits} qudit labels")]
    InvalidPermutation {
        /// Number of qudits in the register.
        num_qudits: u32,
    },

    /// Back-pointer walk did not terminate; indicates an engine bug.
    #[error("Parent-pointer cycle detected while reconstructing the circuit")]
    InconsistentPath,

    /// IR-level construction error.
    #[error("IR error: {0}")]
    Ir(#[from] IrError),
}

/// Result type for synthesis operations.
pub type SearchResult<T> = Result<T, SearchError>;
