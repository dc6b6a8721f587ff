//! Problem-file schema: everything a synthesis run needs, in one document.
//!
//! Problems are JSON or YAML. The core crates stay serialization-agnostic;
//! this module is the external collaborator that turns documents into
//! engine inputs.
//!
//! ```yaml
//! dimension: 2
//! qudits: 2
//! initial: { kind: basis, levels: [0, 0] }
//! gates:
//!   - { kind: builtin, name: h }
//!   - { kind: builtin, name: cx, cost: 2.0 }
//! target:
//!   kind: exact
//!   state:
//!     kind: superposition
//!     terms:
//!       - { levels: [0, 0] }
//!       - { levels: [1, 1] }
//! budget: { max_expansions: 100000 }
//! ```

use anyhow::{bail, Context, Result};
use ndarray::Array2;
use num_complex::Complex64;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use alsvid_ir::{GateDef, GateSet, QuditRegister};
use alsvid_search::{
    BasisSupportTarget, Budget, ClassTarget, ExactTarget, SearchConfig, StateVector,
    TargetMatcher, TieBreak, Tolerance,
};

/// A complete synthesis problem description.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Problem {
    /// Qudit dimension `d`.
    pub dimension: u32,
    /// Number of qudits `n`.
    pub qudits: u32,
    /// The initial state.
    pub initial: StateSpec,
    /// The gate catalog.
    pub gates: Vec<GateSpec>,
    /// The goal.
    pub target: TargetSpec,
    /// Optional tolerance overrides.
    #[serde(default)]
    pub tolerance: ToleranceSpec,
    /// Optional tie-break policy; defaults to shorter-circuit-first.
    #[serde(default)]
    pub tie_break: TieBreak,
    /// Optional budget limits.
    #[serde(default)]
    pub budget: BudgetSpec,
}

/// A state description.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum StateSpec {
    /// A computational basis state.
    Basis {
        /// One level per qudit.
        levels: Vec<u32>,
    },
    /// The uniform GHZ state for the register.
    Ghz,
    /// A weighted sum of basis states, normalized on load.
    Superposition {
        /// The terms; weights default to 1.
        terms: Vec<TermSpec>,
    },
    /// Raw amplitudes as `[re, im]` pairs, normalized on load.
    Amplitudes {
        /// `d^n` amplitude pairs in row-major basis order.
        amplitudes: Vec<[f64; 2]>,
    },
}

/// One term of a superposition.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TermSpec {
    /// One level per qudit.
    pub levels: Vec<u32>,
    /// Complex weight as `[re, im]`; defaults to `[1, 0]`.
    #[serde(default)]
    pub amplitude: Option<[f64; 2]>,
}

/// A gate description: built-in by name, or an explicit matrix.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum GateSpec {
    /// A gate from the built-in catalog (see `alsvid gates`).
    Builtin {
        /// Catalog name, e.g. `h`, `cx`, `fourier`, `subspace_x`.
        name: String,
        /// Lower level of the two-level subspace, for subspace gates.
        #[serde(default)]
        low: Option<u32>,
        /// Cost weight override.
        #[serde(default)]
        cost: Option<f64>,
    },
    /// An explicit unitary matrix, row-major, entries as `[re, im]`.
    Matrix {
        /// Gate name used in circuit output.
        name: String,
        /// Square matrix of dimension `d^arity`.
        matrix: Vec<Vec<[f64; 2]>>,
        /// Cost weight override.
        #[serde(default)]
        cost: Option<f64>,
    },
}

/// A goal description.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum TargetSpec {
    /// Match one fixed state up to global phase.
    Exact {
        /// The goal state.
        state: StateSpec,
    },
    /// Match the GHZ family, optionally up to qudit permutation.
    GhzClass {
        /// Whether qudit-label permutations count as equivalent.
        #[serde(default)]
        permutation_invariant: bool,
    },
    /// Match equal-magnitude support on exactly these basis states.
    BasisSupport {
        /// Digit strings, one level per qudit each.
        states: Vec<Vec<u32>>,
    },
}

/// Optional tolerance overrides; engine defaults fill the gaps.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToleranceSpec {
    /// Amplitude magnitude floor.
    pub epsilon: Option<f64>,
    /// Quantization granularity in decimal places.
    pub decimals: Option<u32>,
}

/// Optional budget limits; absent means unlimited.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BudgetSpec {
    /// Cap on settled nodes.
    pub max_expansions: Option<usize>,
    /// Cap on tentative path cost.
    pub max_cost: Option<f64>,
    /// Wall-clock limit in seconds.
    pub deadline_secs: Option<f64>,
}

impl Problem {
    /// Load a problem from a JSON or YAML file, chosen by extension.
    pub fn load(path: &str) -> Result<Self> {
        let path_obj = Path::new(path);
        if !path_obj.exists() {
            bail!("File not found: {path}");
        }
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {path}"))?;

        let ext = path_obj
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => serde_yaml_ng::from_str(&source)
                .with_context(|| format!("Failed to parse YAML problem: {path}")),
            _ => serde_json::from_str(&source)
                .with_context(|| format!("Failed to parse JSON problem: {path}")),
        }
    }

    /// The register described by the problem.
    pub fn register(&self) -> Result<QuditRegister> {
        Ok(QuditRegister::new(self.dimension, self.qudits)?)
    }

    /// Resolve the tolerance, engine defaults filling unset fields.
    pub fn tolerance(&self) -> Tolerance {
        let mut tolerance = Tolerance::default();
        if let Some(epsilon) = self.tolerance.epsilon {
            tolerance = tolerance.with_epsilon(epsilon);
        }
        if let Some(decimals) = self.tolerance.decimals {
            tolerance = tolerance.with_decimals(decimals);
        }
        tolerance
    }

    /// Resolve the search configuration (tolerance + budget).
    pub fn config(&self) -> SearchConfig {
        let mut budget = Budget::unlimited();
        if let Some(max_expansions) = self.budget.max_expansions {
            budget = budget.with_max_expansions(max_expansions);
        }
        if let Some(max_cost) = self.budget.max_cost {
            budget = budget.with_max_cost(max_cost);
        }
        if let Some(secs) = self.budget.deadline_secs {
            budget = budget.with_deadline(Duration::from_secs_f64(secs));
        }
        SearchConfig::default()
            .with_tolerance(self.tolerance())
            .with_tie_break(self.tie_break)
            .with_budget(budget)
    }

    /// Build the initial state.
    pub fn initial_state(&self) -> Result<StateVector> {
        build_state(&self.initial, self.register()?, &self.tolerance())
    }

    /// Build the gate set in the file's declared order.
    pub fn gate_set(&self) -> Result<GateSet> {
        let mut set = GateSet::new(self.dimension)?;
        for spec in &self.gates {
            set.push(build_gate(spec, self.dimension)?)?;
        }
        Ok(set)
    }

    /// Build the target matcher.
    pub fn target_matcher(&self) -> Result<Box<dyn TargetMatcher>> {
        let register = self.register()?;
        let tolerance = self.tolerance();
        Ok(match &self.target {
            TargetSpec::Exact { state } => {
                Box::new(ExactTarget::new(build_state(state, register, &tolerance)?))
            }
            TargetSpec::GhzClass {
                permutation_invariant,
            } => Box::new(ClassTarget::ghz(register).with_permutations(*permutation_invariant)),
            TargetSpec::BasisSupport { states } => {
                Box::new(BasisSupportTarget::new(register, states)?)
            }
        })
    }
}

fn build_state(
    spec: &StateSpec,
    register: QuditRegister,
    tolerance: &Tolerance,
) -> Result<StateVector> {
    Ok(match spec {
        StateSpec::Basis { levels } => StateVector::basis(register, levels)?,
        StateSpec::Ghz => StateVector::ghz(register),
        StateSpec::Superposition { terms } => {
            let terms: Vec<(Vec<u32>, Complex64)> = terms
                .iter()
                .map(|term| {
                    let [re, im] = term.amplitude.unwrap_or([1.0, 0.0]);
                    (term.levels.clone(), Complex64::new(re, im))
                })
                .collect();
            StateVector::superposition(register, &terms, tolerance)?
        }
        StateSpec::Amplitudes { amplitudes } => {
            let amps: Vec<Complex64> = amplitudes
                .iter()
                .map(|[re, im]| Complex64::new(*re, *im))
                .collect();
            StateVector::from_amplitudes(register, amps, tolerance)?
        }
    })
}

fn build_gate(spec: &GateSpec, dimension: u32) -> Result<GateDef> {
    match spec {
        GateSpec::Builtin { name, low, cost } => {
            let gate = builtin_gate(name, *low, dimension)?;
            Ok(match cost {
                Some(cost) => gate.with_cost(*cost)?,
                None => gate,
            })
        }
        GateSpec::Matrix { name, matrix, cost } => {
            let rows = matrix.len();
            let mut data = Vec::with_capacity(rows * rows);
            for row in matrix {
                if row.len() != rows {
                    bail!(
                        "Gate '{name}': matrix row has {} entries, expected {rows}",
                        row.len()
                    );
                }
                data.extend(row.iter().map(|[re, im]| Complex64::new(*re, *im)));
            }
            let matrix = Array2::from_shape_vec((rows, rows), data)
                .context("matrix shape mismatch")?;
            let gate = GateDef::new(name, dimension, matrix, cost.unwrap_or(1.0))?;
            Ok(gate)
        }
    }
}

fn builtin_gate(name: &str, low: Option<u32>, dimension: u32) -> Result<GateDef> {
    let subspace_low = || {
        low.with_context(|| format!("Gate '{name}' needs a 'low' level parameter"))
    };
    let gate = match name {
        "h" | "hadamard" => {
            require_qubit(name, dimension)?;
            GateDef::hadamard()?
        }
        "x" => {
            require_qubit(name, dimension)?;
            GateDef::pauli_x()?
        }
        "z" => {
            require_qubit(name, dimension)?;
            GateDef::pauli_z()?
        }
        "cx" | "cnot" => {
            require_qubit(name, dimension)?;
            GateDef::cnot()?
        }
        "swap" => {
            require_qubit(name, dimension)?;
            GateDef::swap()?
        }
        "fourier" => GateDef::fourier(dimension)?,
        "cycle" => GateDef::cycle(dimension)?,
        "clock" => GateDef::clock(dimension)?,
        "controlled_cycle" => GateDef::controlled_cycle(dimension)?,
        "subspace_x" => GateDef::subspace_x(dimension, subspace_low()?)?,
        "subspace_swap" => GateDef::subspace_swap(dimension, subspace_low()?)?,
        other => bail!("Unknown built-in gate '{other}' (try 'alsvid gates')"),
    };
    Ok(gate)
}

fn require_qubit(name: &str, dimension: u32) -> Result<()> {
    if dimension != 2 {
        bail!("Gate '{name}' is a qubit gate; the problem has d={dimension}");
    }
    Ok(())
}
