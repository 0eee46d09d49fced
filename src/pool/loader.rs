//! @acp:module "Pool Loader"
//! @acp:summary "Read normalized question banks from JSON or YAML files"
//! @acp:domain pool
//! @acp:layer io

use serde::Deserialize;
use std::path::Path;

use super::types::{Question, QuestionPool};
use crate::error::{QpError, Result};

/// Accepted document shapes: a bare list, or an object with a `questions` list
#[derive(Deserialize)]
#[serde(untagged)]
enum BankDocument {
    List(Vec<Question>),
    Wrapped { questions: Vec<Question> },
}

impl BankDocument {
    fn into_questions(self) -> Vec<Question> {
        match self {
            BankDocument::List(questions) => questions,
            BankDocument::Wrapped { questions } => questions,
        }
    }
}

/// Load a question pool from disk, choosing the parser by file extension
pub fn load_pool(path: &Path) -> Result<QuestionPool> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let yaml = match ext.as_str() {
        "json" => false,
        "yaml" | "yml" => true,
        "" => return Err(QpError::UnsupportedFormat(path.display().to_string())),
        other => return Err(QpError::UnsupportedFormat(format!(".{}", other))),
    };

    let content = std::fs::read_to_string(path)?;
    let document: BankDocument = if yaml {
        serde_yaml::from_str(&content)?
    } else {
        serde_json::from_str(&content)?
    };

    let pool = QuestionPool::new(document.into_questions())?;
    tracing::debug!("Loaded {} questions from {}", pool.len(), path.display());
    Ok(pool)
}
