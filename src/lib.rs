#![forbid(unsafe_code)]

//! @acp:module "QPGen Library"
//! @acp:summary "Unit and marks based question paper assembly"
//! @acp:domain paper
//! @acp:layer api
//! @acp:stability stable
//!
//! # QPGen - Question Paper Generator
//!
//! Assembles exam papers from a tagged question bank.
//!
//! ## Pipeline
//!
//! 1. **Filter** the bank down to the requested units
//! 2. **Plan** how many questions of each mark tier to use
//! 3. **Sample** distinct questions per tier
//! 4. **Augment** high-mark questions with either/or alternates
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use qpgen::{load_pool, select_paper, PaperConfig, SelectionCriteria};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! fn main() -> anyhow::Result<()> {
//!     let pool = load_pool(Path::new("questions.json"))?;
//!     let criteria = SelectionCriteria::new(["Unit 1", "Unit 2"], 60);
//!     let mut rng = StdRng::seed_from_u64(7);
//!
//!     let result = select_paper(&pool, &criteria, &PaperConfig::default(), &mut rng)?;
//!     println!("{} ({} marks)", result.plan, result.achieved_marks);
//!
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod error;
pub mod logging;
pub mod paper;
pub mod pool;

// Re-exports
pub use error::{QpError, Result};
pub use paper::{
    generate_paper, render_paper, select_paper, DistributionPlan, OutputFormat, PaperConfig,
    SelectedItem, SelectionCriteria, SelectionResult, Session,
};
pub use pool::{load_pool, Question, QuestionPool};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
