//! The Dijkstra engine: shortest-path search over the implicit state graph.

use std::cmp::{Ordering, Reverse};
use std::collections::hash_map::Entry;
use std::collections::BinaryHeap;
use std::fmt;
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use alsvid_ir::{Circuit, CircuitOp, GateSet};

use crate::canon::{CanonicalKey, Tolerance};
use crate::error::{SearchError, SearchResult};
use crate::moves::MoveTable;
use crate::state::StateVector;
use crate::target::TargetMatcher;

/// Settled-node count between progress log lines.
const PROGRESS_INTERVAL: usize = 10_000;

/// Termination limits for one search.
///
/// The state graph is not bounded a priori — repeated gate application can
/// generate unboundedly many distinct canonical keys, especially at fine
/// quantization — so every long-running search should carry at least one
/// limit. All fields default to unlimited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// Cap on nodes removed from the frontier (settled nodes).
    pub max_expansions: Option<usize>,
    /// Cap on the tentative cost considered; costlier candidates are never
    /// enqueued.
    pub max_cost: Option<f64>,
    /// Wall-clock limit, checked at the top of each expansion iteration.
    /// This is the engine's cancellation mechanism.
    pub deadline: Option<Duration>,
}

impl Budget {
    /// No limits.
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Cap the number of settled nodes.
    #[must_use]
    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = Some(max_expansions);
        self
    }

    /// Cap the tentative cost considered.
    #[must_use]
    pub fn with_max_cost(mut self, max_cost: f64) -> Self {
        self.max_cost = Some(max_cost);
        self
    }

    /// Cap the wall-clock duration.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// How equal-cost frontier entries are ordered. Both policies are fully
/// deterministic; they differ in which of several equally cheap circuits
/// gets reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Prefer fewer gate applications, then earlier enumeration order.
    #[default]
    ShorterCircuit,
    /// Earlier enumeration order only, ignoring circuit length.
    InsertionOrder,
}

/// Full configuration of one search: comparison tolerances, tie-break
/// policy, and budget.
///
/// All three change search outcomes, so all three are explicit here rather
/// than hidden defaults inside the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// State-identity tolerances (quantization is the key knob).
    pub tolerance: Tolerance,
    /// Ordering of equal-cost frontier entries.
    pub tie_break: TieBreak,
    /// Termination limits.
    pub budget: Budget,
}

impl SearchConfig {
    /// Override the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Override the tie-break policy.
    #[must_use]
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Override the budget.
    #[must_use]
    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.budget = budget;
        self
    }
}

/// Which budget limit stopped a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetKind {
    /// `max_expansions` was reached.
    Expansions,
    /// `max_cost` clipped the frontier and nothing cheaper remained.
    Cost,
    /// The wall-clock deadline passed.
    Deadline,
}

impl fmt::Display for BudgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetKind::Expansions => write!(f, "max_expansions"),
            BudgetKind::Cost => write!(f, "max_cost"),
            BudgetKind::Deadline => write!(f, "deadline"),
        }
    }
}

/// Counters describing one finished (or aborted) search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Nodes settled (removed from the frontier with final cost).
    pub expansions: usize,
    /// Distinct canonical keys discovered.
    pub distinct_states: usize,
    /// Largest frontier size observed.
    pub frontier_peak: usize,
    /// Wall-clock time spent.
    pub elapsed: Duration,
}

/// A successful synthesis result.
#[derive(Debug, Clone)]
pub struct Solution {
    /// The gate sequence, in execution order, with its total cost.
    pub circuit: Circuit,
    /// The goal state actually reached.
    pub state: StateVector,
    /// Search counters.
    pub stats: SearchStats,
}

/// Best-effort progress report attached to a budget failure: the
/// costliest optimally-settled state when the limit tripped, i.e. the
/// boundary of the explored region, with the circuit that reaches it.
#[derive(Debug, Clone)]
pub struct PartialResult {
    /// Circuit reaching the boundary state.
    pub circuit: Circuit,
    /// The boundary state.
    pub state: StateVector,
}

/// Outcome of a search. Budget exhaustion and unreachable targets are
/// expected results, distinguished so callers can widen budgets and retry
/// only when that can help.
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    /// A goal state was settled; the circuit is cost-minimal.
    Found(Solution),
    /// The frontier was exhausted without clipping: no gate sequence
    /// reaches the target under this gate set and tolerance.
    NotReachable {
        /// Search counters.
        stats: SearchStats,
    },
    /// A budget limit tripped before the search could decide.
    BudgetExceeded {
        /// Which limit tripped.
        reason: BudgetKind,
        /// Progress at the moment the limit tripped, when any node beyond
        /// the initial state was settled.
        best: Option<PartialResult>,
        /// Search counters.
        stats: SearchStats,
    },
}

impl SearchOutcome {
    /// The solution, when the search succeeded.
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            SearchOutcome::Found(solution) => Some(solution),
            _ => None,
        }
    }

    /// Whether the search succeeded.
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }
}

/// Frontier entry; the heap orders by (cost, depth, sequence) so that ties
/// resolve toward shorter circuits first and then toward the move that was
/// generated earlier — parents settle deterministically and moves
/// enumerate in table order, so sequence numbers realize the gate-set
/// tie-break exactly.
#[derive(Debug, Clone, Copy)]
struct FrontierEntry {
    cost: f64,
    depth: u32,
    seq: u64,
    node: usize,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then_with(|| self.depth.cmp(&other.depth))
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// One discovered canonical state.
struct NodeRecord {
    state: StateVector,
    cost: f64,
    depth: u32,
    /// (parent node, move index) that produced the best-known path here.
    parent: Option<(usize, usize)>,
    settled: bool,
}

/// Search for a minimal-cost circuit transforming `initial` into a state
/// accepted by `target`.
///
/// Returns `Err` only for configuration and internal errors; "no solution"
/// and "budget exhausted" are [`SearchOutcome`] variants. On success the
/// returned circuit is cost-minimal: with non-negative edge weights, the
/// first settled node the matcher accepts has its final (minimal) cost.
#[instrument(skip_all, fields(register = %initial.register(), target = %target.describe()))]
pub fn synthesize(
    initial: &StateVector,
    target: &dyn TargetMatcher,
    gates: &GateSet,
    config: &SearchConfig,
) -> SearchResult<SearchOutcome> {
    let started = Instant::now();
    let tolerance = config.tolerance;
    let budget = config.budget;
    // The heap's depth component realizes the tie-break policy: under
    // InsertionOrder it is pinned to zero so only (cost, seq) order.
    let order_depth = |depth: u32| match config.tie_break {
        TieBreak::ShorterCircuit => depth,
        TieBreak::InsertionOrder => 0,
    };

    let table = MoveTable::new(gates, initial.register())?;
    info!(
        "Starting synthesis: {} gates, {} moves per expansion",
        gates.len(),
        table.len()
    );

    let mut nodes: Vec<NodeRecord> = vec![];
    let mut index: FxHashMap<CanonicalKey, usize> = FxHashMap::default();
    let mut heap: BinaryHeap<Reverse<FrontierEntry>> = BinaryHeap::new();
    let mut seq: u64 = 0;

    let mut expansions = 0usize;
    let mut frontier_peak = 1usize;
    let mut cost_clipped = false;
    let mut last_settled: Option<usize> = None;

    index.insert(initial.canonical_key(&tolerance), 0);
    nodes.push(NodeRecord {
        state: initial.clone(),
        cost: 0.0,
        depth: 0,
        parent: None,
        settled: false,
    });
    heap.push(Reverse(FrontierEntry {
        cost: 0.0,
        depth: 0,
        seq,
        node: 0,
    }));

    loop {
        // Deadline first: it is the cancellation mechanism and must fire
        // even when the frontier still holds work.
        if let Some(deadline) = budget.deadline {
            if started.elapsed() >= deadline {
                return budget_exceeded(
                    BudgetKind::Deadline,
                    &nodes,
                    &table,
                    last_settled,
                    stats(expansions, &index, frontier_peak, started),
                );
            }
        }

        let Some(Reverse(entry)) = heap.pop() else {
            break;
        };
        // Lazy deletion: superseded entries carry an outdated cost.
        if nodes[entry.node].settled || entry.cost > nodes[entry.node].cost {
            continue;
        }

        if let Some(max) = budget.max_expansions {
            if expansions >= max {
                return budget_exceeded(
                    BudgetKind::Expansions,
                    &nodes,
                    &table,
                    last_settled,
                    stats(expansions, &index, frontier_peak, started),
                );
            }
        }

        nodes[entry.node].settled = true;
        expansions += 1;
        last_settled = Some(entry.node);
        if expansions % PROGRESS_INTERVAL == 0 {
            debug!(
                "Settled {} nodes, frontier {}, cost {:.3}",
                expansions,
                heap.len(),
                entry.cost
            );
        }

        if target.matches(&nodes[entry.node].state, &tolerance) {
            let circuit = reconstruct(&nodes, &table, entry.node)?;
            let final_stats = stats(expansions, &index, frontier_peak, started);
            info!(
                "Found circuit: {} ops, cost {:.3}, {} expansions in {:?}",
                circuit.len(),
                circuit.total_cost(),
                final_stats.expansions,
                final_stats.elapsed
            );
            return Ok(SearchOutcome::Found(Solution {
                circuit,
                state: nodes[entry.node].state.clone(),
                stats: final_stats,
            }));
        }

        let parent_cost = nodes[entry.node].cost;
        let parent_depth = nodes[entry.node].depth;
        let parent_state = nodes[entry.node].state.clone();

        for step in table.expand(&parent_state, &tolerance) {
            let (move_index, neighbor, edge_cost) = step?;
            let candidate_cost = parent_cost + edge_cost;

            if let Some(max_cost) = budget.max_cost {
                if candidate_cost > max_cost {
                    cost_clipped = true;
                    continue;
                }
            }

            let key = neighbor.canonical_key(&tolerance);
            match index.entry(key) {
                Entry::Vacant(slot) => {
                    let node = nodes.len();
                    slot.insert(node);
                    nodes.push(NodeRecord {
                        state: neighbor,
                        cost: candidate_cost,
                        depth: parent_depth + 1,
                        parent: Some((entry.node, move_index)),
                        settled: false,
                    });
                    seq += 1;
                    heap.push(Reverse(FrontierEntry {
                        cost: candidate_cost,
                        depth: order_depth(parent_depth + 1),
                        seq,
                        node,
                    }));
                }
                Entry::Occupied(slot) => {
                    let existing = *slot.get();
                    let record = &mut nodes[existing];
                    if !record.settled && candidate_cost < record.cost {
                        record.cost = candidate_cost;
                        record.depth = parent_depth + 1;
                        record.parent = Some((entry.node, move_index));
                        seq += 1;
                        heap.push(Reverse(FrontierEntry {
                            cost: candidate_cost,
                            depth: order_depth(parent_depth + 1),
                            seq,
                            node: existing,
                        }));
                    }
                }
            }
        }
        frontier_peak = frontier_peak.max(heap.len());
    }

    // Frontier exhausted. If max_cost ever clipped a candidate, the space
    // beyond the cap is unexplored and "not reachable" would be a lie.
    let final_stats = stats(expansions, &index, frontier_peak, started);
    if cost_clipped {
        info!(
            "Frontier exhausted under max_cost after {} expansions",
            final_stats.expansions
        );
        return budget_exceeded(
            BudgetKind::Cost,
            &nodes,
            &table,
            last_settled,
            final_stats,
        );
    }
    info!(
        "Target not reachable: frontier exhausted after {} expansions",
        final_stats.expansions
    );
    Ok(SearchOutcome::NotReachable { stats: final_stats })
}

fn stats(
    expansions: usize,
    index: &FxHashMap<CanonicalKey, usize>,
    frontier_peak: usize,
    started: Instant,
) -> SearchStats {
    SearchStats {
        expansions,
        distinct_states: index.len(),
        frontier_peak,
        elapsed: started.elapsed(),
    }
}

fn budget_exceeded(
    reason: BudgetKind,
    nodes: &[NodeRecord],
    table: &MoveTable,
    last_settled: Option<usize>,
    stats: SearchStats,
) -> SearchResult<SearchOutcome> {
    let best = match last_settled {
        Some(node) => Some(PartialResult {
            circuit: reconstruct(nodes, table, node)?,
            state: nodes[node].state.clone(),
        }),
        None => None,
    };
    info!("Budget exceeded ({reason}) after {} expansions", stats.expansions);
    Ok(SearchOutcome::BudgetExceeded {
        reason,
        best,
        stats,
    })
}

/// Walk parent pointers from `goal` back to the root and reverse into
/// execution order. A walk longer than the node count means a cycle in
/// the back-pointer table, which Dijkstra's monotone settling rules out;
/// hitting it indicates a cost-model or tie-break bug.
fn reconstruct(nodes: &[NodeRecord], table: &MoveTable, goal: usize) -> SearchResult<Circuit> {
    let mut ops_reversed = vec![];
    let mut current = goal;
    let mut steps = 0usize;

    while let Some((parent, move_index)) = nodes[current].parent {
        steps += 1;
        if steps > nodes.len() {
            return Err(SearchError::InconsistentPath);
        }
        let mv = &table.moves()[move_index];
        let gate = &table.gates().gates()[mv.gate_index];
        ops_reversed.push((
            CircuitOp::new(gate.name(), mv.qudits.clone()),
            gate.cost(),
        ));
        current = parent;
    }

    let mut circuit = Circuit::new(table.register());
    for (op, cost) in ops_reversed.into_iter().rev() {
        circuit.push(op, cost);
    }
    Ok(circuit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::ExactTarget;
    use alsvid_ir::{GateDef, QuditRegister};

    fn bell_setup() -> (StateVector, ExactTarget, GateSet) {
        let register = QuditRegister::new(2, 2).unwrap();
        let tolerance = Tolerance::default();
        let initial = StateVector::zero(register);
        let bell = StateVector::superposition(
            register,
            &[
                (vec![0, 0], num_complex::Complex64::new(1.0, 0.0)),
                (vec![1, 1], num_complex::Complex64::new(1.0, 0.0)),
            ],
            &tolerance,
        )
        .unwrap();
        let gates = GateSet::new(2)
            .unwrap()
            .with_gate(GateDef::hadamard().unwrap())
            .unwrap()
            .with_gate(GateDef::cnot().unwrap())
            .unwrap();
        (initial, ExactTarget::new(bell), gates)
    }

    #[test]
    fn test_frontier_entry_ordering() {
        let cheap = FrontierEntry {
            cost: 1.0,
            depth: 5,
            seq: 9,
            node: 0,
        };
        let costly = FrontierEntry {
            cost: 2.0,
            depth: 1,
            seq: 1,
            node: 1,
        };
        assert!(cheap < costly);

        let shallow = FrontierEntry {
            cost: 1.0,
            depth: 1,
            seq: 9,
            node: 0,
        };
        let deep = FrontierEntry {
            cost: 1.0,
            depth: 2,
            seq: 1,
            node: 1,
        };
        assert!(shallow < deep);

        let early = FrontierEntry {
            cost: 1.0,
            depth: 1,
            seq: 1,
            node: 0,
        };
        let late = FrontierEntry {
            cost: 1.0,
            depth: 1,
            seq: 2,
            node: 1,
        };
        assert!(early < late);
    }

    #[test]
    fn test_bell_is_found_optimally() {
        let (initial, target, gates) = bell_setup();
        let outcome =
            synthesize(&initial, &target, &gates, &SearchConfig::default()).unwrap();
        let solution = outcome.solution().expect("bell state is reachable");
        assert_eq!(solution.circuit.len(), 2);
        assert_eq!(solution.circuit.total_cost(), 2.0);
    }

    #[test]
    fn test_insertion_order_tie_break_is_still_optimal() {
        let (initial, target, gates) = bell_setup();
        let config = SearchConfig::default().with_tie_break(TieBreak::InsertionOrder);
        let outcome = synthesize(&initial, &target, &gates, &config).unwrap();
        let solution = outcome.solution().unwrap();
        // The policy may pick a different equally cheap circuit, never a
        // costlier one.
        assert_eq!(solution.circuit.total_cost(), 2.0);
    }

    #[test]
    fn test_expansion_budget_reports_partial() {
        let (initial, target, gates) = bell_setup();
        let config = SearchConfig::default()
            .with_budget(Budget::unlimited().with_max_expansions(1));
        let outcome = synthesize(&initial, &target, &gates, &config).unwrap();
        match outcome {
            SearchOutcome::BudgetExceeded { reason, best, stats } => {
                assert_eq!(reason, BudgetKind::Expansions);
                assert_eq!(stats.expansions, 1);
                // Only the initial state was settled; its circuit is empty.
                let partial = best.expect("initial state was settled");
                assert!(partial.circuit.is_empty());
            }
            other => panic!("expected BudgetExceeded, got {other:?}"),
        }
    }
}
