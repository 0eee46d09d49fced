//! @acp:module "Plan Command"
//! @acp:summary "Show the deterministic mark distribution for a target without sampling"
//! @acp:domain cli
//! @acp:layer handler

use std::path::PathBuf;

use anyhow::Result;
use console::style;
use serde::Serialize;

use super::generate::{build_criteria, open_pool};
use crate::paper::{
    filter, load_paper_config, plan, plan_explicit, tier_capacity, CliOverrides, Degradation,
    DistributionPlan,
};

/// Options for the plan command
#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    pub pool: PathBuf,
    pub units: Vec<String>,
    pub all_units: bool,
    pub marks: u32,
    pub distribution: Option<String>,
    pub policy: Option<PathBuf>,
    pub preset: Option<String>,
    pub no_fill: bool,
    pub json: bool,
}

/// Planning report
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanReport {
    pub target_marks: u32,
    pub achieved_marks: u32,
    pub candidates: usize,
    pub ideal: DistributionPlan,
    pub realized: DistributionPlan,
    pub shortfalls: Vec<Degradation>,
}

/// Execute the plan command
pub fn execute_plan(options: PlanOptions) -> Result<()> {
    let report = build_plan_report(&options)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "Plan for {} marks ({} candidate questions)\n",
        style(report.target_marks).bold(),
        report.candidates
    );
    println!("  {:10} {}", "ideal", report.ideal);
    println!("  {:10} {}", "realized", report.realized);
    for shortfall in &report.shortfalls {
        println!("  {} {}", style("⚠").yellow(), shortfall);
    }
    if report.achieved_marks < report.target_marks {
        println!(
            "\n  {} {} marks short of the target",
            style("note:").dim(),
            report.target_marks - report.achieved_marks
        );
    }

    Ok(())
}

pub fn build_plan_report(options: &PlanOptions) -> Result<PlanReport> {
    let pool = open_pool(&options.pool)?;
    let cli_overrides = CliOverrides {
        preset: options.preset.clone(),
        no_fill: options.no_fill,
        ..Default::default()
    };
    let config = load_paper_config(options.policy.as_deref(), &cli_overrides)?;
    let criteria = build_criteria(
        &pool,
        &options.units,
        options.all_units,
        options.marks,
        options.distribution.as_deref(),
    )?;
    criteria.validate()?;

    let subset = filter(&pool, &criteria.units)?;
    let outcome = match criteria.distribution {
        Some(ref counts) => plan_explicit(&subset, criteria.target_marks, counts, &config.planning)?,
        None => plan(&subset, criteria.target_marks, &config.planning)?,
    };
    tracing::debug!("Tier capacity: {:?}", tier_capacity(&subset));

    Ok(PlanReport {
        target_marks: criteria.target_marks,
        achieved_marks: outcome.realized.total_marks(),
        candidates: subset.len(),
        ideal: outcome.ideal,
        realized: outcome.realized,
        shortfalls: outcome.shortfalls,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_plan_report_with_scarce_long_answers() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        let mut yaml = String::from("questions:\n");
        for i in 0..30 {
            yaml.push_str(&format!(
                "  - {{id: s{}, text: short, unit: Unit 1, marks: 2}}\n",
                i
            ));
        }
        for i in 0..2 {
            yaml.push_str(&format!(
                "  - {{id: l{}, text: long, unit: Unit 1, marks: 16}}\n",
                i
            ));
        }
        write!(file, "{}", yaml).unwrap();

        let options = PlanOptions {
            pool: file.path().to_path_buf(),
            units: vec!["Unit 1".to_string()],
            marks: 100,
            ..Default::default()
        };
        let report = build_plan_report(&options).unwrap();

        assert_eq!(report.ideal.count(16), 4);
        assert_eq!(report.realized.count(16), 2);
        assert_eq!(report.realized.count(2), 30);
        assert_eq!(report.achieved_marks, 92);
        assert_eq!(report.shortfalls.len(), 1);
    }
}
