//! `alsvid-ir` — circuit intermediate representation for Alsvid.
//!
//! Defines the vocabulary shared by the synthesis engine and its callers:
//!
//! - [`QuditRegister`] / [`QuditId`]: the shape of the system, `n` qudits of
//!   dimension `d`.
//! - [`GateDef`] / [`GateSet`]: a fixed, finite catalog of discrete unitary
//!   gates with cost weights, validated at construction time.
//! - [`Circuit`]: an ordered gate sequence with its total cost — the output
//!   of a successful synthesis run.
//!
//! Gates are data records (matrix, arity, cost, name); adding a gate means
//! adding a record to a [`GateSet`], never a new code path.
//!
//! # Quick start
//!
//! ```rust
//! use alsvid_ir::{GateDef, GateSet, QuditRegister};
//!
//! let register = QuditRegister::new(2, 2).unwrap();
//! assert_eq!(register.total_dim(), 4);
//!
//! let gates = GateSet::new(2)
//!     .unwrap()
//!     .with_gate(GateDef::hadamard().unwrap())
//!     .unwrap()
//!     .with_gate(GateDef::cnot().unwrap().with_cost(2.0).unwrap())
//!     .unwrap();
//! assert_eq!(gates.len(), 2);
//! assert_eq!(gates.gates()[1].cost(), 2.0);
//! ```

pub mod circuit;
pub mod error;
pub mod gate;
pub mod qudit;

pub use circuit::{Circuit, CircuitOp};
pub use error::{IrError, IrResult};
pub use gate::{GateDef, GateSet, UNITARITY_EPSILON};
pub use qudit::{QuditId, QuditRegister};
