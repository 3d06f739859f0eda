//! Contract command implementation.

use anyhow::Result;
use colored::Colorize;
use dagsweep_training::ArgumentContract;

pub fn execute(json_output: bool) -> Result<()> {
    let contract = ArgumentContract::new();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&contract.describe())?);
        return Ok(());
    }

    println!();
    println!("{}", "Training argument contract".bold().cyan());
    println!();
    println!("{:<26} {:<16} {:<22} {}", "Option", "Group", "Subcommand", "Default");
    println!("{}", "─".repeat(90));
    for spec in contract.describe() {
        let default = if spec.required {
            "required".yellow().to_string()
        } else {
            spec.default.unwrap_or_default()
        };
        println!(
            "{:<26} {:<16} {:<22} {}",
            spec.flag.cyan(),
            spec.group.unwrap_or_default(),
            spec.subcommand.unwrap_or_default().dimmed(),
            default
        );
    }
    println!();
    println!("  {} {}", "Graph types:".dimmed(), contract.subcommands().join(", "));
    println!();
    Ok(())
}
