//! @acp:module "Paper"
//! @acp:summary "Unit and marks based exam paper selection with either/or choices"
//! @acp:domain paper
//! @acp:layer feature

pub mod choice;
pub mod filter;
pub mod loader;
pub mod planner;
pub mod presets;
pub mod renderer;
pub mod sampler;
pub mod selector;
pub mod session;
pub mod types;

pub use choice::augment;
pub use filter::filter;
pub use loader::{load_paper_config, resolve_policy_path, CliOverrides, DEFAULT_POLICY_FILE};
pub use planner::{plan, plan_explicit, tier_capacity, PlanOutcome};
pub use presets::{get_preset_bands, list_presets};
pub use renderer::{render_paper, OutputFormat};
pub use sampler::sample;
pub use selector::select_paper;
pub use session::{generate_paper, Session};
pub use types::*;
