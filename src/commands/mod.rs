//! @acp:module "Commands"
//! @acp:summary "CLI command implementations"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Each command is in its own submodule with an options struct
//! and an `execute_*` entry point.

pub mod generate;
pub mod interactive;
pub mod plan;
pub mod stats;
pub mod units;

pub use generate::{execute_generate, execute_presets, generate, GenerateOptions, GeneratedPaper};
pub use interactive::{execute_interactive, InteractiveOptions};
pub use plan::{build_plan_report, execute_plan, PlanOptions, PlanReport};
pub use stats::{execute_stats, StatsOptions};
pub use units::{execute_units, UnitsOptions};
