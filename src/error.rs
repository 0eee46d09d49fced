//! @acp:module "Errors"
//! @acp:summary "Error types for question pool loading and paper selection"
//! @acp:domain cli
//! @acp:layer types

use thiserror::Error;

/// Errors raised by the selection engine and its adapters
#[derive(Error, Debug)]
pub enum QpError {
    /// No candidate questions at all
    #[error("Question pool is empty")]
    EmptyPool,

    /// Selection criteria named no units
    #[error("No units selected; choose at least one unit")]
    NoUnitsSelected,

    /// No positive total up to the target can be assembled from the filtered pool
    #[error(
        "Cannot assemble a paper of up to {target} marks (smallest question: {}, largest achievable total: {max_achievable})",
        describe_min(.min_achievable)
    )]
    InfeasiblePlan {
        target: u32,
        min_achievable: Option<u32>,
        max_achievable: u32,
    },

    /// The sampler was asked for more questions than a tier holds
    #[error("Plan requests {requested} questions of {marks} marks but only {available} are available")]
    InsufficientQuestions {
        marks: u32,
        requested: usize,
        available: usize,
    },

    #[error("Invalid selection criteria: {0}")]
    InvalidCriteria(String),

    #[error("Duplicate question id: {0}")]
    DuplicateQuestionId(String),

    #[error("Invalid question {id}: {reason}")]
    InvalidQuestion { id: String, reason: String },

    #[error("Unsupported question bank format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

fn describe_min(min: &Option<u32>) -> String {
    match min {
        Some(m) => m.to_string(),
        None => "none".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, QpError>;
