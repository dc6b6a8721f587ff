//! Goal predicates: exact states and described state classes.

use alsvid_ir::QuditRegister;

use crate::canon::Tolerance;
use crate::error::{SearchError, SearchResult};
use crate::state::StateVector;

/// Decides whether a discovered state satisfies the synthesis goal.
///
/// Matchers are pure and side-effect free; they may be shared across
/// concurrent searches. Which symmetries count as "equivalent" is always
/// explicit configuration on the matcher, never an implicit default.
pub trait TargetMatcher: Send + Sync {
    /// Human-readable description for logs and CLI output.
    fn describe(&self) -> String;

    /// Whether `state` is a goal state.
    fn matches(&self, state: &StateVector, tolerance: &Tolerance) -> bool;
}

/// Matches one fixed state, up to global phase.
#[derive(Debug, Clone)]
pub struct ExactTarget {
    state: StateVector,
}

impl ExactTarget {
    /// Create a matcher for the given state.
    pub fn new(state: StateVector) -> Self {
        Self { state }
    }

    /// The state being matched.
    pub fn state(&self) -> &StateVector {
        &self.state
    }
}

impl TargetMatcher for ExactTarget {
    fn describe(&self) -> String {
        format!("exact state over {}", self.state.register())
    }

    fn matches(&self, state: &StateVector, tolerance: &Tolerance) -> bool {
        state.equivalent(&self.state, tolerance)
    }
}

/// Matches the equivalence class of a reference state under explicitly
/// configured symmetries.
///
/// Global phase always counts as equivalent (that is the engine's state
/// identity). Qudit-label permutation counts only when
/// [`ClassTarget::with_permutations`] enables it: the candidate matches if
/// any relabeling of its qudits is equivalent to the reference. Relabeling
/// of computational levels is not an offered symmetry.
#[derive(Debug, Clone)]
pub struct ClassTarget {
    label: String,
    reference: StateVector,
    permutation_invariant: bool,
}

impl ClassTarget {
    /// Class of an arbitrary reference state.
    pub fn new(reference: StateVector) -> Self {
        Self {
            label: "state class".to_string(),
            reference,
            permutation_invariant: false,
        }
    }

    /// Class of the uniform GHZ state `(1/√d)·Σ_j |j…j⟩` on `register`.
    pub fn ghz(register: QuditRegister) -> Self {
        Self {
            label: "GHZ class".to_string(),
            reference: StateVector::ghz(register),
            permutation_invariant: false,
        }
    }

    /// Also accept candidates that match the reference after a relabeling
    /// of qudit positions.
    #[must_use]
    pub fn with_permutations(mut self, permutation_invariant: bool) -> Self {
        self.permutation_invariant = permutation_invariant;
        self
    }

    /// The reference state defining the class.
    pub fn reference(&self) -> &StateVector {
        &self.reference
    }
}

impl TargetMatcher for ClassTarget {
    fn describe(&self) -> String {
        if self.permutation_invariant {
            format!(
                "{} over {} (up to qudit permutation)",
                self.label,
                self.reference.register()
            )
        } else {
            format!("{} over {}", self.label, self.reference.register())
        }
    }

    fn matches(&self, state: &StateVector, tolerance: &Tolerance) -> bool {
        if state.register() != self.reference.register() {
            return false;
        }
        if state.equivalent(&self.reference, tolerance) {
            return true;
        }
        if !self.permutation_invariant {
            return false;
        }
        label_permutations(self.reference.register().num_qudits())
            .into_iter()
            .skip(1) // identity was checked above
            .any(|permutation| {
                // Only malformed permutations can fail, and these are
                // bijections by construction.
                state
                    .permute_qudits(&permutation)
                    .is_ok_and(|permuted| permuted.equivalent(&self.reference, tolerance))
            })
    }
}

/// Matches any state whose support is exactly a given set of basis states
/// with equal magnitudes, regardless of relative phases.
///
/// This is the classic symbolic success test for GHZ-like synthesis: the
/// goal `{|000⟩, |111⟩, |222⟩}` accepts every state of the form
/// `(α|000⟩ + β|111⟩ + γ|222⟩)/√3` with unit-magnitude weights α, β, γ.
#[derive(Debug, Clone)]
pub struct BasisSupportTarget {
    register: QuditRegister,
    support: Vec<usize>,
}

impl BasisSupportTarget {
    /// Create a matcher from digit strings, e.g. `[[0,0,0], [1,1,1]]`.
    pub fn new(register: QuditRegister, basis_states: &[Vec<u32>]) -> SearchResult<Self> {
        if basis_states.is_empty() {
            return Err(SearchError::EmptySupport);
        }
        let mut support = Vec::with_capacity(basis_states.len());
        for levels in basis_states {
            if levels.len() != register.num_qudits() as usize {
                return Err(SearchError::DimensionMismatch {
                    expected: register.num_qudits() as usize,
                    got: levels.len(),
                });
            }
            for &level in levels {
                if level >= register.dimension() {
                    return Err(SearchError::LevelOutOfRange {
                        level,
                        dimension: register.dimension(),
                    });
                }
            }
            support.push(register.index_of(levels));
        }
        support.sort_unstable();
        support.dedup();
        Ok(Self { register, support })
    }
}

impl TargetMatcher for BasisSupportTarget {
    fn describe(&self) -> String {
        format!(
            "support on {} basis states over {}",
            self.support.len(),
            self.register
        )
    }

    fn matches(&self, state: &StateVector, tolerance: &Tolerance) -> bool {
        if state.register() != self.register {
            return false;
        }
        let expected = 1.0 / (self.support.len() as f64).sqrt();
        let resolution = tolerance.resolution();
        let mut cursor = self.support.iter().peekable();
        for (index, amp) in state.amplitudes().iter().enumerate() {
            let magnitude = amp.norm();
            if cursor.next_if(|&&s| s == index).is_some() {
                if (magnitude - expected).abs() > resolution {
                    return false;
                }
            } else if magnitude > tolerance.epsilon {
                return false;
            }
        }
        true
    }
}

/// All permutations of `0..n`, lexicographic, identity first.
fn label_permutations(n: u32) -> Vec<Vec<u32>> {
    fn fill(n: u32, current: &mut Vec<u32>, out: &mut Vec<Vec<u32>>) {
        if current.len() == n as usize {
            out.push(current.clone());
            return;
        }
        for candidate in 0..n {
            if !current.contains(&candidate) {
                current.push(candidate);
                fill(n, current, out);
                current.pop();
            }
        }
    }
    let mut out = vec![];
    let mut current = Vec::with_capacity(n as usize);
    fill(n, &mut current, &mut out);
    out
}
