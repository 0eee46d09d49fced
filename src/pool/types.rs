//! @acp:module "Pool Types"
//! @acp:summary "Question records and the read-only question pool"
//! @acp:domain pool
//! @acp:layer types

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::error::{QpError, Result};

/// A single question from the bank. Immutable once pooled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,

    #[serde(alias = "question")]
    pub text: String,

    #[serde(alias = "subject")]
    pub unit: String,

    #[serde(default = "default_marks")]
    pub marks: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,

    #[serde(
        default,
        rename = "type",
        alias = "questionType",
        skip_serializing_if = "Option::is_none"
    )]
    pub question_type: Option<String>,
}

fn default_marks() -> u32 {
    2
}

impl Question {
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        unit: impl Into<String>,
        marks: u32,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            unit: unit.into(),
            marks,
            topic: None,
            difficulty: None,
            question_type: None,
        }
    }
}

/// Ordered collection of questions with unique ids
#[derive(Debug, Clone, Default, Serialize)]
pub struct QuestionPool {
    questions: Vec<Question>,
}

impl QuestionPool {
    /// Build a pool, rejecting duplicate ids, blank units and zero-mark questions
    pub fn new(questions: Vec<Question>) -> Result<Self> {
        let mut seen: HashSet<&str> = HashSet::with_capacity(questions.len());
        for q in &questions {
            if !seen.insert(q.id.as_str()) {
                return Err(QpError::DuplicateQuestionId(q.id.clone()));
            }
            if q.marks == 0 {
                return Err(QpError::InvalidQuestion {
                    id: q.id.clone(),
                    reason: "mark value must be positive".to_string(),
                });
            }
            if q.unit.trim().is_empty() {
                return Err(QpError::InvalidQuestion {
                    id: q.id.clone(),
                    reason: "unit tag is empty".to_string(),
                });
            }
        }
        Ok(Self { questions })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Distinct unit tags, sorted
    pub fn units(&self) -> Vec<String> {
        let units: std::collections::BTreeSet<&str> =
            self.questions.iter().map(|q| q.unit.as_str()).collect();
        units.into_iter().map(str::to_string).collect()
    }

    /// Distinct mark values, ascending
    pub fn tiers(&self) -> Vec<u32> {
        let tiers: std::collections::BTreeSet<u32> =
            self.questions.iter().map(|q| q.marks).collect();
        tiers.into_iter().collect()
    }

    pub fn stats(&self) -> PoolStats {
        let mut stats = PoolStats {
            total_questions: self.questions.len(),
            ..Default::default()
        };
        for q in &self.questions {
            *stats.by_tier.entry(q.marks).or_default() += 1;
            let unit = stats.by_unit.entry(q.unit.clone()).or_default();
            *unit.entry(q.marks).or_default() += 1;
        }
        stats
    }
}

/// Question counts per tier and per unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolStats {
    pub total_questions: usize,
    /// marks -> count
    pub by_tier: BTreeMap<u32, usize>,
    /// unit -> marks -> count
    pub by_unit: BTreeMap<String, BTreeMap<u32, usize>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = QuestionPool::new(vec![
            Question::new("q1", "Define a graph", "Unit 1", 2),
            Question::new("q1", "Define a tree", "Unit 1", 2),
        ]);
        assert!(matches!(result, Err(QpError::DuplicateQuestionId(id)) if id == "q1"));
    }

    #[test]
    fn test_zero_marks_rejected() {
        let result = QuestionPool::new(vec![Question::new("q1", "Define a graph", "Unit 1", 0)]);
        assert!(matches!(result, Err(QpError::InvalidQuestion { .. })));
    }

    #[test]
    fn test_units_and_stats() {
        let pool = QuestionPool::new(vec![
            Question::new("a", "A", "Unit 2", 2),
            Question::new("b", "B", "Unit 1", 16),
            Question::new("c", "C", "Unit 1", 2),
        ])
        .unwrap();

        assert_eq!(pool.units(), vec!["Unit 1", "Unit 2"]);
        assert_eq!(pool.tiers(), vec![2, 16]);

        let stats = pool.stats();
        assert_eq!(stats.total_questions, 3);
        assert_eq!(stats.by_tier[&2], 2);
        assert_eq!(stats.by_unit["Unit 1"][&16], 1);
    }

    #[test]
    fn test_question_deserialize_aliases() {
        let json = r#"{"id": "x", "question": "What is a heap?", "subject": "Unit 3"}"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.text, "What is a heap?");
        assert_eq!(q.unit, "Unit 3");
        assert_eq!(q.marks, 2);
    }
}
