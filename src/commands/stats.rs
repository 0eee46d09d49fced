//! @acp:module "Stats Command"
//! @acp:summary "Summarize a question bank by mark tier and unit"
//! @acp:domain cli
//! @acp:layer handler

use std::path::PathBuf;

use anyhow::Result;
use console::style;

use super::generate::open_pool;
use crate::paper::planner::max_achievable;

/// Options for the stats command
#[derive(Debug, Clone)]
pub struct StatsOptions {
    pub pool: PathBuf,
    pub json: bool,
}

/// Execute the stats command
pub fn execute_stats(options: StatsOptions) -> Result<()> {
    let pool = open_pool(&options.pool)?;
    let stats = pool.stats();

    if options.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{} questions in {}\n", style(stats.total_questions).bold(), options.pool.display());

    println!("By tier:");
    for (marks, count) in &stats.by_tier {
        println!("  {:>3} marks  {:>5}", marks, count);
    }
    println!(
        "  largest possible paper: {} marks\n",
        max_achievable(&stats.by_tier)
    );

    let tiers = pool.tiers();
    let header: Vec<String> = tiers.iter().map(|m| format!("{:>5}m", m)).collect();
    println!("By unit:");
    println!("  {:20} {}", "", header.join(" "));
    for (unit, counts) in &stats.by_unit {
        let row: Vec<String> = tiers
            .iter()
            .map(|m| format!("{:>6}", counts.get(m).copied().unwrap_or(0)))
            .collect();
        println!("  {:20} {}", unit, row.join(" "));
    }

    Ok(())
}
