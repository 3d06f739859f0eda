//! Plan command implementation.

use super::prepare_sweep;
use super::types::SweepArgs;
use anyhow::Result;
use colored::Colorize;
use dagsweep_training::{DriverConfig, plan_sweep};
use serde_json::json;

pub fn execute(args: &SweepArgs, json_output: bool, config: &DriverConfig) -> Result<()> {
    let prepared = prepare_sweep(args, config)?;
    let plan = plan_sweep(&prepared.sweep, &prepared.builder, &prepared.settings)?;

    if json_output {
        let out: Vec<_> = plan
            .iter()
            .map(|inv| {
                json!({
                    "run": inv.run,
                    "seed": inv.seed,
                    "output_folder": inv.config.output_folder,
                    "tokens": inv.tokens,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!("{}", format!("Sweep plan ({} runs)", plan.len()).bold().cyan());
    println!();

    if plan.is_empty() {
        println!("  {}", "The sweep file lists no data sizes.".dimmed());
        return Ok(());
    }

    println!("{:<28} {}", "Output", "Arguments");
    println!("{}", "─".repeat(90));
    for inv in &plan {
        println!(
            "{:<28} {}",
            inv.config.output_folder.display().to_string().cyan(),
            inv.tokens.join(" ").dimmed()
        );
    }
    println!();
    Ok(())
}
