//! Solve command implementation.

use anyhow::{Context, Result};
use console::style;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use alsvid_ir::Circuit;
use alsvid_search::{synthesize, SearchOutcome, SearchStats};

use crate::problem::Problem;

/// Command-line overrides applied on top of the problem file's embedded
/// configuration.
#[derive(Debug, Default)]
pub struct Overrides {
    /// Cap on settled nodes.
    pub max_expansions: Option<usize>,
    /// Cap on tentative path cost.
    pub max_cost: Option<f64>,
    /// Wall-clock limit in seconds.
    pub deadline_secs: Option<f64>,
    /// Quantization granularity in decimal places.
    pub decimals: Option<u32>,
    /// Amplitude magnitude floor.
    pub epsilon: Option<f64>,
}

/// JSON report written with `--output`.
#[derive(Serialize)]
struct Report {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    circuit: Option<Circuit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_cost: Option<f64>,
    stats: SearchStats,
}

/// Execute the solve command. Returns the process exit code: 0 for a
/// solution, 2 when the target is unreachable, 3 when a budget tripped.
pub fn execute(input: &str, output: Option<&str>, overrides: &Overrides) -> Result<i32> {
    let problem = Problem::load(input)?;
    debug!(
        "Loaded problem: d={}, n={}, {} gate specs",
        problem.dimension,
        problem.qudits,
        problem.gates.len()
    );

    let initial = problem.initial_state()?;
    let gates = problem.gate_set()?;
    let target = problem.target_matcher()?;
    let mut config = problem.config();

    if let Some(max_expansions) = overrides.max_expansions {
        config.budget.max_expansions = Some(max_expansions);
    }
    if let Some(max_cost) = overrides.max_cost {
        config.budget.max_cost = Some(max_cost);
    }
    if let Some(secs) = overrides.deadline_secs {
        config.budget.deadline = Some(Duration::from_secs_f64(secs));
    }
    if let Some(decimals) = overrides.decimals {
        config.tolerance.decimals = decimals;
    }
    if let Some(epsilon) = overrides.epsilon {
        config.tolerance.epsilon = epsilon;
    }

    println!(
        "{} Solving {} over {} ({} gates, target: {})",
        style("→").cyan().bold(),
        style(input).green(),
        initial.register(),
        gates.len(),
        target.describe()
    );

    let outcome = synthesize(&initial, target.as_ref(), &gates, &config)?;

    let (exit_code, report) = match &outcome {
        SearchOutcome::Found(solution) => {
            println!(
                "{} Found circuit: {} ops, cost {}",
                style("✓").green().bold(),
                solution.circuit.len(),
                solution.circuit.total_cost()
            );
            print!("{}", solution.circuit);
            print_stats(&solution.stats);
            (
                0,
                Report {
                    status: "found",
                    reason: None,
                    circuit: Some(solution.circuit.clone()),
                    total_cost: Some(solution.circuit.total_cost()),
                    stats: solution.stats,
                },
            )
        }
        SearchOutcome::NotReachable { stats } => {
            println!(
                "{} Target not reachable: the frontier was exhausted",
                style("✗").red().bold()
            );
            print_stats(stats);
            (
                2,
                Report {
                    status: "not_reachable",
                    reason: None,
                    circuit: None,
                    total_cost: None,
                    stats: *stats,
                },
            )
        }
        SearchOutcome::BudgetExceeded {
            reason,
            best,
            stats,
        } => {
            println!(
                "{} Budget exceeded ({}) before the search could decide",
                style("!").yellow().bold(),
                style(reason).yellow()
            );
            if let Some(partial) = best {
                println!(
                    "  Explored up to cost {} ({} ops to the boundary)",
                    partial.circuit.total_cost(),
                    partial.circuit.len()
                );
            }
            print_stats(stats);
            (
                3,
                Report {
                    status: "budget_exceeded",
                    reason: Some(reason.to_string()),
                    circuit: best.as_ref().map(|partial| partial.circuit.clone()),
                    total_cost: best.as_ref().map(|partial| partial.circuit.total_cost()),
                    stats: *stats,
                },
            )
        }
    };

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&report).context("Failed to encode report")?;
        std::fs::write(path, json).with_context(|| format!("Failed to write report: {path}"))?;
        println!("  Report: {}", style(path).green());
    }

    Ok(exit_code)
}

fn print_stats(stats: &SearchStats) {
    println!(
        "  Stats: {} expansions, {} distinct states, frontier peak {}, {:.1?} elapsed",
        stats.expansions, stats.distinct_states, stats.frontier_peak, stats.elapsed
    );
}
