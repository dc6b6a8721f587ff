//! Fixed-gate definitions and the ordered gate catalog.
//!
//! A [`GateDef`] is a data record: name, unitary matrix, arity, cost. New
//! gates are new records, never new code paths. Every record is validated
//! when it is built — matrix shape, unitarity, cost sign — so the search
//! engine never has to re-check a gate mid-run.

use ndarray::Array2;
use num_complex::Complex64;
use std::f64::consts::{FRAC_1_SQRT_2, PI};

use crate::error::{IrError, IrResult};

/// Default tolerance for the construction-time unitarity check.
pub const UNITARITY_EPSILON: f64 = 1e-9;

/// A fixed (non-parameterized) gate acting on `arity` qudits of dimension
/// `dimension`, with a strictly positive cost weight.
#[derive(Debug, Clone, PartialEq)]
pub struct GateDef {
    name: String,
    dimension: u32,
    arity: u32,
    cost: f64,
    matrix: Array2<Complex64>,
}

impl GateDef {
    /// Build a gate from its matrix, validating shape, unitarity, and cost.
    ///
    /// The matrix must be square with dimension `d^k` for some `k >= 1`;
    /// `k` becomes the gate's arity.
    pub fn new(
        name: impl Into<String>,
        dimension: u32,
        matrix: Array2<Complex64>,
        cost: f64,
    ) -> IrResult<Self> {
        Self::with_unitarity_epsilon(name, dimension, matrix, cost, UNITARITY_EPSILON)
    }

    /// Like [`GateDef::new`] but with an explicit unitarity tolerance.
    pub fn with_unitarity_epsilon(
        name: impl Into<String>,
        dimension: u32,
        matrix: Array2<Complex64>,
        cost: f64,
        epsilon: f64,
    ) -> IrResult<Self> {
        let name = name.into();

        if dimension < 2 {
            return Err(IrError::InvalidDimension(dimension));
        }

        let (rows, cols) = matrix.dim();
        if rows != cols {
            return Err(IrError::MatrixNotSquare { name, rows, cols });
        }

        let arity = arity_for(rows, dimension).ok_or_else(|| IrError::MatrixNotDimensionPower {
            name: name.clone(),
            rows,
            dimension,
        })?;

        if !cost.is_finite() || cost <= 0.0 {
            return Err(IrError::NegativeGateCost { name, cost });
        }

        let deviation = unitarity_deviation(&matrix);
        if deviation > epsilon {
            return Err(IrError::NonUnitaryGate { name, deviation });
        }

        Ok(Self {
            name,
            dimension,
            arity,
            cost,
            matrix,
        })
    }

    /// Replace the cost weight, re-validating it.
    pub fn with_cost(mut self, cost: f64) -> IrResult<Self> {
        if !cost.is_finite() || cost <= 0.0 {
            return Err(IrError::NegativeGateCost {
                name: self.name,
                cost,
            });
        }
        self.cost = cost;
        Ok(self)
    }

    /// Gate name, unique within a [`GateSet`].
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Qudit dimension the matrix is defined over.
    #[inline]
    pub fn dimension(&self) -> u32 {
        self.dimension
    }

    /// Number of qudits the gate acts on.
    #[inline]
    pub fn arity(&self) -> u32 {
        self.arity
    }

    /// Cost weight; the edge cost of every application of this gate.
    #[inline]
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// The `d^arity` × `d^arity` unitary matrix.
    #[inline]
    pub fn matrix(&self) -> &Array2<Complex64> {
        &self.matrix
    }

    /// Dimension of the gate's local subspace, `d^arity`.
    #[inline]
    pub fn local_dim(&self) -> usize {
        self.matrix.nrows()
    }

    // =========================================================================
    // Built-in catalog: qubit gates
    // =========================================================================

    /// Hadamard gate (d=2).
    pub fn hadamard() -> IrResult<Self> {
        let s = Complex64::new(FRAC_1_SQRT_2, 0.0);
        let matrix = Array2::from_shape_vec((2, 2), vec![s, s, s, -s])
            .expect("shape matches literal data");
        Self::new("h", 2, matrix, 1.0)
    }

    /// Pauli-X gate (d=2).
    pub fn pauli_x() -> IrResult<Self> {
        Self::cycle_named("x", 2)
    }

    /// Pauli-Z gate (d=2).
    pub fn pauli_z() -> IrResult<Self> {
        Self::clock_named("z", 2)
    }

    /// Controlled-X gate (d=2, arity 2).
    pub fn cnot() -> IrResult<Self> {
        Self::controlled_cycle_named("cx", 2)
    }

    /// SWAP gate (d=2, arity 2).
    pub fn swap() -> IrResult<Self> {
        let one = Complex64::new(1.0, 0.0);
        let mut matrix = Array2::zeros((4, 4));
        matrix[[0, 0]] = one;
        matrix[[1, 2]] = one;
        matrix[[2, 1]] = one;
        matrix[[3, 3]] = one;
        Self::new("swap", 2, matrix, 1.0)
    }

    // =========================================================================
    // Built-in catalog: qudit generalizations
    // =========================================================================

    /// Discrete Fourier gate, the Hadamard analog for dimension `d`:
    /// `F[j,k] = ω^{jk} / √d` with `ω = e^{2πi/d}`.
    pub fn fourier(dimension: u32) -> IrResult<Self> {
        if dimension < 2 {
            return Err(IrError::InvalidDimension(dimension));
        }
        let d = dimension as usize;
        let norm = 1.0 / (d as f64).sqrt();
        let omega = 2.0 * PI / d as f64;
        let matrix = Array2::from_shape_fn((d, d), |(j, k)| {
            Complex64::from_polar(norm, omega * (j * k) as f64)
        });
        Self::new(format!("f{dimension}"), dimension, matrix, 1.0)
    }

    /// Cyclic shift, the X analog for dimension `d`: `|j⟩ → |j+1 mod d⟩`.
    pub fn cycle(dimension: u32) -> IrResult<Self> {
        Self::cycle_named(format!("x{dimension}"), dimension)
    }

    /// Clock gate, the Z analog for dimension `d`: `diag(1, ω, …, ω^{d-1})`.
    pub fn clock(dimension: u32) -> IrResult<Self> {
        Self::clock_named(format!("z{dimension}"), dimension)
    }

    /// Controlled cyclic shift (SUM), the controlled-X analog for
    /// dimension `d`: `|i,j⟩ → |i, (i+j) mod d⟩`. Reduces to CNOT at d=2.
    pub fn controlled_cycle(dimension: u32) -> IrResult<Self> {
        Self::controlled_cycle_named(format!("cx{dimension}"), dimension)
    }

    /// Subspace-X: Pauli-X on the two-level subspace `{low, low+1}` of a
    /// single qudit, identity on every other level.
    pub fn subspace_x(dimension: u32, low: u32) -> IrResult<Self> {
        let high = low + 1;
        if high >= dimension {
            return Err(IrError::SubspaceOutOfRange {
                low,
                high,
                dimension,
            });
        }
        let d = dimension as usize;
        let (lo, hi) = (low as usize, high as usize);
        let one = Complex64::new(1.0, 0.0);
        let mut matrix = Array2::from_diag_elem(d, one);
        matrix[[lo, lo]] = Complex64::new(0.0, 0.0);
        matrix[[hi, hi]] = Complex64::new(0.0, 0.0);
        matrix[[lo, hi]] = one;
        matrix[[hi, lo]] = one;
        Self::new(format!("x_{low}{high}"), dimension, matrix, 1.0)
    }

    /// Subspace-SWAP: exchanges `|low,low⟩ ↔ |low+1,low+1⟩` on a pair of
    /// qudits, identity elsewhere.
    pub fn subspace_swap(dimension: u32, low: u32) -> IrResult<Self> {
        let high = low + 1;
        if high >= dimension {
            return Err(IrError::SubspaceOutOfRange {
                low,
                high,
                dimension,
            });
        }
        let d = dimension as usize;
        let a = low as usize * d + low as usize;
        let b = high as usize * d + high as usize;
        let one = Complex64::new(1.0, 0.0);
        let mut matrix = Array2::from_diag_elem(d * d, one);
        matrix[[a, a]] = Complex64::new(0.0, 0.0);
        matrix[[b, b]] = Complex64::new(0.0, 0.0);
        matrix[[a, b]] = one;
        matrix[[b, a]] = one;
        Self::new(format!("subswap_{low}{high}"), dimension, matrix, 1.0)
    }

    fn cycle_named(name: impl Into<String>, dimension: u32) -> IrResult<Self> {
        if dimension < 2 {
            return Err(IrError::InvalidDimension(dimension));
        }
        let d = dimension as usize;
        let matrix = Array2::from_shape_fn((d, d), |(r, c)| {
            if r == (c + 1) % d {
                Complex64::new(1.0, 0.0)
            } else {
                Complex64::new(0.0, 0.0)
            }
        });
        Self::new(name, dimension, matrix, 1.0)
    }

    fn clock_named(name: impl Into<String>, dimension: u32) -> IrResult<Self> {
        if dimension < 2 {
            return Err(IrError::InvalidDimension(dimension));
        }
        let d = dimension as usize;
        let omega = 2.0 * PI / d as f64;
        let matrix = Array2::from_shape_fn((d, d), |(r, c)| {
            if r == c {
                Complex64::from_polar(1.0, omega * r as f64)
            } else {
                Complex64::new(0.0, 0.0)
            }
        });
        Self::new(name, dimension, matrix, 1.0)
    }

    fn controlled_cycle_named(name: impl Into<String>, dimension: u32) -> IrResult<Self> {
        if dimension < 2 {
            return Err(IrError::InvalidDimension(dimension));
        }
        let d = dimension as usize;
        let matrix = Array2::from_shape_fn((d * d, d * d), |(r, c)| {
            let (ci, cj) = (c / d, c % d);
            if r == ci * d + (ci + cj) % d {
                Complex64::new(1.0, 0.0)
            } else {
                Complex64::new(0.0, 0.0)
            }
        });
        Self::new(name, dimension, matrix, 1.0)
    }
}

/// Solve `rows = d^k` for `k >= 1`; `None` if `rows` is not such a power.
fn arity_for(rows: usize, dimension: u32) -> Option<u32> {
    let d = dimension as usize;
    let mut power = 1usize;
    let mut arity = 0u32;
    while power < rows {
        power = power.checked_mul(d)?;
        arity += 1;
    }
    (power == rows && arity >= 1).then_some(arity)
}

/// Largest entry of |U†U - I|.
fn unitarity_deviation(matrix: &Array2<Complex64>) -> f64 {
    let n = matrix.nrows();
    let mut worst = 0.0f64;
    for i in 0..n {
        for j in 0..n {
            let mut sum = Complex64::new(0.0, 0.0);
            for k in 0..n {
                sum += matrix[[k, i]].conj() * matrix[[k, j]];
            }
            let expected = if i == j { 1.0 } else { 0.0 };
            worst = worst.max((sum - expected).norm());
        }
    }
    worst
}

/// An ordered, immutable catalog of gates for a fixed qudit dimension.
///
/// The order of insertion is stable and observable: it defines the
/// deterministic tie-break order of the search engine, so two runs over the
/// same set always enumerate candidate moves identically.
#[derive(Debug, Clone)]
pub struct GateSet {
    dimension: u32,
    gates: Vec<GateDef>,
}

impl GateSet {
    /// Create an empty gate set for qudits of the given dimension.
    pub fn new(dimension: u32) -> IrResult<Self> {
        if dimension < 2 {
            return Err(IrError::InvalidDimension(dimension));
        }
        Ok(Self {
            dimension,
            gates: vec![],
        })
    }

    /// Append a gate, rejecting dimension mismatches and duplicate names.
    pub fn push(&mut self, gate: GateDef) -> IrResult<()> {
        if gate.dimension != self.dimension {
            return Err(IrError::DimensionMismatch {
                name: gate.name,
                gate_dimension: gate.dimension,
                set_dimension: self.dimension,
            });
        }
        if self.gates.iter().any(|g| g.name == gate.name) {
            return Err(IrError::DuplicateGateName(gate.name));
        }
        self.gates.push(gate);
        Ok(())
    }

    /// Builder-style [`GateSet::push`].
    pub fn with_gate(mut self, gate: GateDef) -> IrResult<Self> {
        self.push(gate)?;
        Ok(self)
    }

    /// The gates, in stable insertion order.
    #[inline]
    pub fn gates(&self) -> &[GateDef] {
        &self.gates
    }

    /// Qudit dimension the set is defined over.
    #[inline]
    pub fn dimension(&self) -> u32 {
        self.dimension
    }

    /// Number of gates in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Whether the set holds no gates.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Largest arity among the gates, 0 for an empty set.
    pub fn max_arity(&self) -> u32 {
        self.gates.iter().map(GateDef::arity).max().unwrap_or(0)
    }

    /// Look up a gate by name, returning its stable index too.
    pub fn find(&self, name: &str) -> Option<(usize, &GateDef)> {
        self.gates
            .iter()
            .enumerate()
            .find(|(_, g)| g.name == name)
    }

    /// The standard qubit catalog: H, X, Z, CX, SWAP, all cost 1.
    pub fn standard_qubit() -> IrResult<Self> {
        Self::new(2)?
            .with_gate(GateDef::hadamard()?)?
            .with_gate(GateDef::pauli_x()?)?
            .with_gate(GateDef::pauli_z()?)?
            .with_gate(GateDef::cnot()?)?
            .with_gate(GateDef::swap()?)
    }

    /// The standard qudit catalog for dimension `d`: Fourier, cycle,
    /// controlled cycle, all cost 1.
    pub fn standard_qudit(dimension: u32) -> IrResult<Self> {
        Self::new(dimension)?
            .with_gate(GateDef::fourier(dimension)?)?
            .with_gate(GateDef::cycle(dimension)?)?
            .with_gate(GateDef::controlled_cycle(dimension)?)
    }
}
