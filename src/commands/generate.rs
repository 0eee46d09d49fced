//! @acp:module "Generate Command"
//! @acp:summary "Assemble and render a question paper from a question bank"
//! @acp:domain cli
//! @acp:layer handler

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use console::style;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::paper::{
    self, load_paper_config, render_paper, select_paper, CliOverrides, OutputFormat,
    SelectionCriteria,
};
use crate::pool::{load_pool, QuestionPool};

/// Options for the generate command
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Question bank file (JSON or YAML)
    pub pool: PathBuf,
    /// Units to draw from
    pub units: Vec<String>,
    /// Use every unit in the bank
    pub all_units: bool,
    /// Target total marks
    pub marks: u32,
    /// Explicit distribution, e.g. "2=10,16=4"
    pub distribution: Option<String>,
    /// Seed for reproducible papers
    pub seed: Option<u64>,
    /// Output format
    pub format: OutputFormat,
    /// Write to file instead of stdout
    pub output: Option<PathBuf>,
    /// Project policy file
    pub policy: Option<PathBuf>,
    /// Planning preset (balanced, short-answer, long-answer)
    pub preset: Option<String>,
    /// Disable either/or choices
    pub no_choices: bool,
    /// Do not top up the plan to the target
    pub no_fill: bool,
    /// Paper title
    pub title: Option<String>,
    /// Paper subject
    pub subject: Option<String>,
    /// Show planning details on stderr
    pub explain: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            pool: PathBuf::from("questions.json"),
            units: vec![],
            all_units: false,
            marks: 100,
            distribution: None,
            seed: None,
            format: OutputFormat::Markdown,
            output: None,
            policy: None,
            preset: None,
            no_choices: false,
            no_fill: false,
            title: None,
            subject: None,
            explain: false,
        }
    }
}

/// Generated paper with a summary of how it was assembled
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPaper {
    pub target_marks: u32,
    pub achieved_marks: u32,
    pub questions: usize,
    pub choices: usize,
    pub plan: String,
    pub ideal_plan: String,
    pub notices: Vec<String>,
    pub content: String,
}

/// Execute the generate command
pub fn execute_generate(options: GenerateOptions) -> Result<()> {
    let paper = generate(&options)?;

    if options.explain {
        eprintln!("{} {}", style("Ideal plan:").bold(), paper.ideal_plan);
        eprintln!("{} {}", style("Realized:  ").bold(), paper.plan);
        eprintln!(
            "{} {} questions, {} with choices",
            style("Selected:  ").bold(),
            paper.questions,
            paper.choices
        );
    }
    for notice in &paper.notices {
        eprintln!("{} {}", style("⚠").yellow(), notice);
    }

    match options.output {
        Some(ref path) => {
            std::fs::write(path, &paper.content)
                .with_context(|| format!("Failed to write paper to {:?}", path))?;
            eprintln!(
                "{} Wrote {}-mark paper to {}",
                style("✓").green(),
                paper.achieved_marks,
                path.display()
            );
        }
        None => println!("{}", paper.content),
    }

    Ok(())
}

/// Generate a paper without printing it
pub fn generate(options: &GenerateOptions) -> Result<GeneratedPaper> {
    let pool = open_pool(&options.pool)?;

    let cli_overrides = CliOverrides {
        preset: options.preset.clone(),
        no_choices: options.no_choices,
        no_fill: options.no_fill,
        title: options.title.clone(),
        subject: options.subject.clone(),
    };
    let config = load_paper_config(options.policy.as_deref(), &cli_overrides)?;

    let criteria = build_criteria(
        &pool,
        &options.units,
        options.all_units,
        options.marks,
        options.distribution.as_deref(),
    )?;

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let result = select_paper(&pool, &criteria, &config, &mut rng)?;
    let content = render_paper(&result, &config.paper, options.format)?;

    Ok(GeneratedPaper {
        target_marks: result.target_marks,
        achieved_marks: result.achieved_marks,
        questions: result.items.len(),
        choices: result.alternates().count(),
        plan: result.plan.to_string(),
        ideal_plan: result.ideal_plan.to_string(),
        notices: result.degradations.iter().map(|d| d.to_string()).collect(),
        content,
    })
}

/// Print the planning presets
pub fn execute_presets() -> Result<()> {
    println!("Available presets:\n");
    for (name, description, bands) in paper::list_presets() {
        println!("  {} - {}", style(name).bold(), description);
        for band in &bands {
            println!("    {}", paper::presets::describe_band(band));
        }
        println!();
    }
    Ok(())
}

pub(crate) fn open_pool(path: &Path) -> Result<QuestionPool> {
    load_pool(path).with_context(|| format!("Failed to load question bank from {:?}", path))
}

pub(crate) fn build_criteria(
    pool: &QuestionPool,
    units: &[String],
    all_units: bool,
    marks: u32,
    distribution: Option<&str>,
) -> Result<SelectionCriteria> {
    let units = if all_units { pool.units() } else { units.to_vec() };
    let mut criteria = SelectionCriteria::new(units, marks);
    if let Some(text) = distribution {
        criteria = criteria.with_distribution(parse_distribution(text)?);
    }
    Ok(criteria)
}

/// Parse "2=10,16=4" into marks -> count
pub fn parse_distribution(text: &str) -> Result<BTreeMap<u32, usize>> {
    let mut counts = BTreeMap::new();
    for part in text.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (marks, count) = part
            .split_once('=')
            .ok_or_else(|| anyhow!("Expected MARKS=COUNT, got {:?}", part))?;
        let marks: u32 = marks
            .trim()
            .parse()
            .with_context(|| format!("Invalid mark value in {:?}", part))?;
        let count: usize = count
            .trim()
            .parse()
            .with_context(|| format!("Invalid count in {:?}", part))?;
        *counts.entry(marks).or_insert(0) += count;
    }
    if counts.is_empty() {
        return Err(anyhow!("Distribution is empty"));
    }
    Ok(counts)
}
