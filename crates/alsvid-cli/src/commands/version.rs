//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - minimal-cost qudit state-preparation synthesis",
        style("Alsvid").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  alsvid-ir      Registers, gate catalogs, circuits");
    println!("  alsvid-search  Dijkstra synthesis engine");
    println!("  alsvid-cli     Command-line interface");
    println!();
    println!(
        "Repository: {}",
        style("https://github.com/hiq-lab/alsvid").underlined()
    );
    println!("License:    {}", style("Apache-2.0").dim());
}
