//! @acp:module "Question Pool"
//! @acp:summary "Normalized in-memory question bank and its file loader"
//! @acp:domain pool
//! @acp:layer feature

pub mod loader;
pub mod types;

pub use loader::load_pool;
pub use types::{PoolStats, Question, QuestionPool};
