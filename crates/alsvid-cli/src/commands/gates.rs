//! Gates command implementation: list the built-in catalog.

use anyhow::Result;
use console::style;

use alsvid_ir::GateDef;

/// Execute the gates command.
pub fn execute(dimension: u32) -> Result<()> {
    println!(
        "{} Built-in gates for d={}",
        style("→").cyan().bold(),
        style(dimension).yellow()
    );

    let mut rows: Vec<(GateDef, &str)> = vec![];

    if dimension == 2 {
        rows.push((GateDef::hadamard()?, "Hadamard"));
        rows.push((GateDef::pauli_x()?, "Pauli-X"));
        rows.push((GateDef::pauli_z()?, "Pauli-Z"));
        rows.push((GateDef::cnot()?, "controlled-X"));
        rows.push((GateDef::swap()?, "SWAP"));
    }
    rows.push((GateDef::fourier(dimension)?, "discrete Fourier (H analog)"));
    rows.push((GateDef::cycle(dimension)?, "cyclic shift (X analog)"));
    rows.push((GateDef::clock(dimension)?, "clock (Z analog)"));
    rows.push((
        GateDef::controlled_cycle(dimension)?,
        "controlled cyclic shift (CX analog)",
    ));
    for low in 0..dimension - 1 {
        rows.push((
            GateDef::subspace_x(dimension, low)?,
            "X on a two-level subspace",
        ));
        rows.push((
            GateDef::subspace_swap(dimension, low)?,
            "SWAP within a doubled level pair",
        ));
    }

    println!("  {:<12} {:>5}  description", "name", "arity");
    for (gate, description) in rows {
        println!(
            "  {:<12} {:>5}  {}",
            style(gate.name()).green(),
            gate.arity(),
            description
        );
    }
    println!();
    println!(
        "Reference gates by name in problem files; subspace gates take a 'low' level."
    );

    Ok(())
}
