//! @acp:module "Units Command"
//! @acp:summary "List the units in a question bank with per-tier counts"
//! @acp:domain cli
//! @acp:layer handler

use std::path::PathBuf;

use anyhow::Result;
use console::style;

use super::generate::open_pool;

/// Options for the units command
#[derive(Debug, Clone)]
pub struct UnitsOptions {
    pub pool: PathBuf,
    pub json: bool,
}

/// Execute the units command
pub fn execute_units(options: UnitsOptions) -> Result<()> {
    let pool = open_pool(&options.pool)?;
    let stats = pool.stats();

    if options.json {
        println!("{}", serde_json::to_string_pretty(&pool.units())?);
        return Ok(());
    }

    println!("Units ({}):\n", stats.by_unit.len());
    for (unit, tiers) in &stats.by_unit {
        let total: usize = tiers.values().sum();
        let breakdown: Vec<String> = tiers
            .iter()
            .map(|(marks, count)| format!("{}x{}m", count, marks))
            .collect();
        println!(
            "  {:20} {:>4} questions  ({})",
            style(unit).bold(),
            total,
            breakdown.join(", ")
        );
    }

    Ok(())
}
