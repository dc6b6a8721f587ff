//! Error types for the IR crate.

use thiserror::Error;

/// Errors that can occur while building registers, gates, or circuits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qudit dimension must be at least 2.
    #[error("Qudit dimension must be at least 2, got {0}")]
    InvalidDimension(u32),

    /// A register needs at least one qudit.
    #[error("Register must contain at least one qudit")]
    EmptyRegister,

    /// The full Hilbert-space dimension d^n does not fit in a usize.
    #[error("Register {dimension}^{num_qudits} exceeds the addressable state space")]
    RegisterTooLarge {
        /// Qudit dimension.
        dimension: u32,
        /// Number of qudits.
        num_qudits: u32,
    },

    /// Gate matrix is not square.
    #[error("Gate '{name}' matrix must be square, got {rows}x{cols}")]
    MatrixNotSquare {
        /// Name of the offending gate.
        name: String,
        /// Row count of the supplied matrix.
        rows: usize,
        /// Column count of the supplied matrix.
        cols: usize,
    },

    /// Gate matrix dimension is not a power of the qudit dimension.
    #[error("Gate '{name}' matrix dimension {rows} is not a positive power of d={dimension}")]
    MatrixNotDimensionPower {
        /// Name of the offending gate.
        name: String,
        /// Matrix dimension.
        rows: usize,
        /// Qudit dimension.
        dimension: u32,
    },

    /// Gate matrix is not unitary within tolerance.
    #[error("Gate '{name}' matrix is not unitary (max |U†U - I| entry = {deviation:.3e})")]
    NonUnitaryGate {
        /// Name of the offending gate.
        name: String,
        /// Largest deviation of U†U from the identity.
        deviation: f64,
    },

    /// Gate cost must be a positive, finite weight.
    #[error("Gate '{name}' cost must be positive and finite, got {cost}")]
    NegativeGateCost {
        /// Name of the offending gate.
        name: String,
        /// The rejected cost.
        cost: f64,
    },

    /// Gate acts on more qudits than the register holds.
    #[error("Gate '{name}' has arity {arity} but the register only has {num_qudits} qudits")]
    ArityTooLarge {
        /// Name of the offending gate.
        name: String,
        /// Gate arity.
        arity: u32,
        /// Number of qudits in the register.
        num_qudits: u32,
    },

    /// Two gates in one set share a name.
    #[error("Gate set already contains a gate named '{0}'")]
    DuplicateGateName(String),

    /// A gate set and a gate disagree on the qudit dimension.
    #[error("Gate '{name}' is defined for d={gate_dimension} but the set is for d={set_dimension}")]
    DimensionMismatch {
        /// Name of the offending gate.
        name: String,
        /// Dimension the gate was built for.
        gate_dimension: u32,
        /// Dimension of the gate set.
        set_dimension: u32,
    },

    /// A subspace gate constructor was asked for levels outside 0..d.
    #[error("Subspace levels ({low}, {high}) are out of range for d={dimension}")]
    SubspaceOutOfRange {
        /// Lower level of the two-level subspace.
        low: u32,
        /// Upper level of the two-level subspace.
        high: u32,
        /// Qudit dimension.
        dimension: u32,
    },
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
