#![forbid(unsafe_code)]
//! QPGen Command Line Interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;

use qpgen::commands::{
    execute_generate, execute_interactive, execute_plan, execute_presets, execute_stats,
    execute_units, GenerateOptions, InteractiveOptions, PlanOptions, StatsOptions, UnitsOptions,
};
use qpgen::logging::init_tracing;
use qpgen::paper::resolve_policy_path;
use qpgen::OutputFormat;

#[derive(Parser)]
#[command(name = "qpgen")]
#[command(about = "Question paper generator - assemble exam papers by unit and marks")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Policy file path [default: .qpgen.json when present]
    #[arg(short, long, global = true)]
    policy: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the units in a question bank
    Units {
        /// Question bank file (JSON or YAML)
        #[arg(long)]
        pool: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show question counts by tier and unit
    Stats {
        /// Question bank file (JSON or YAML)
        #[arg(long)]
        pool: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the mark distribution for a target without drawing questions
    Plan {
        /// Question bank file (JSON or YAML)
        #[arg(long)]
        pool: PathBuf,

        /// Unit to include (can specify multiple)
        #[arg(short, long = "unit")]
        units: Vec<String>,

        /// Include every unit in the bank
        #[arg(long, conflicts_with = "units")]
        all_units: bool,

        /// Target total marks
        #[arg(short, long)]
        marks: u32,

        /// Explicit distribution, e.g. "2=10,16=4"
        #[arg(short, long)]
        distribution: Option<String>,

        /// Planning preset (balanced, short-answer, long-answer)
        #[arg(long)]
        preset: Option<String>,

        /// Do not top up the plan to the target
        #[arg(long)]
        no_fill: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate a question paper
    Generate {
        /// Question bank file (JSON or YAML)
        #[arg(long)]
        pool: PathBuf,

        /// Unit to include (can specify multiple)
        #[arg(short, long = "unit")]
        units: Vec<String>,

        /// Include every unit in the bank
        #[arg(long, conflicts_with = "units")]
        all_units: bool,

        /// Target total marks
        #[arg(short, long)]
        marks: u32,

        /// Explicit distribution, e.g. "2=10,16=4"
        #[arg(short, long)]
        distribution: Option<String>,

        /// Seed for a reproducible paper
        #[arg(long)]
        seed: Option<u64>,

        /// Output format (markdown, text, json)
        #[arg(short, long, default_value = "markdown")]
        format: OutputFormat,

        /// Write to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Planning preset (balanced, short-answer, long-answer)
        #[arg(long)]
        preset: Option<String>,

        /// Disable either/or choices
        #[arg(long)]
        no_choices: bool,

        /// Do not top up the plan to the target
        #[arg(long)]
        no_fill: bool,

        /// Paper title
        #[arg(long)]
        title: Option<String>,

        /// Paper subject
        #[arg(long)]
        subject: Option<String>,

        /// Print planning details to stderr
        #[arg(long)]
        explain: bool,
    },

    /// List planning presets
    Presets,

    /// Generate papers interactively
    Interactive {
        /// Question bank file (JSON or YAML)
        #[arg(long)]
        pool: PathBuf,

        /// Planning preset (balanced, short-answer, long-answer)
        #[arg(long)]
        preset: Option<String>,

        /// Seed for reproducible papers
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", style("✗").red(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let policy = resolve_policy_path(cli.policy.as_deref())?;

    match cli.command {
        Commands::Units { pool, json } => {
            execute_units(UnitsOptions { pool, json })?;
        }
        Commands::Stats { pool, json } => {
            execute_stats(StatsOptions { pool, json })?;
        }
        Commands::Plan {
            pool,
            units,
            all_units,
            marks,
            distribution,
            preset,
            no_fill,
            json,
        } => {
            let options = PlanOptions {
                pool,
                units,
                all_units,
                marks,
                distribution,
                policy,
                preset,
                no_fill,
                json,
            };
            execute_plan(options)?;
        }
        Commands::Generate {
            pool,
            units,
            all_units,
            marks,
            distribution,
            seed,
            format,
            output,
            preset,
            no_choices,
            no_fill,
            title,
            subject,
            explain,
        } => {
            let options = GenerateOptions {
                pool,
                units,
                all_units,
                marks,
                distribution,
                seed,
                format,
                output,
                policy,
                preset,
                no_choices,
                no_fill,
                title,
                subject,
                explain,
            };
            execute_generate(options)?;
        }
        Commands::Presets => {
            execute_presets()?;
        }
        Commands::Interactive { pool, preset, seed } => {
            let options = InteractiveOptions {
                pool,
                policy,
                preset,
                seed,
            };
            execute_interactive(options)?;
        }
    }

    Ok(())
}
