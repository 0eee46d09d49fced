//! @acp:module "Paper Session"
//! @acp:summary "Explicit session value threaded through successive paper generations"
//! @acp:domain paper
//! @acp:layer logic

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::selector::select_paper;
use super::types::{PaperConfig, SelectionCriteria, SelectionResult};
use crate::error::Result;
use crate::pool::QuestionPool;

/// Choices a user has made so far. Owned by the caller, never global.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub units: BTreeSet<String>,
    pub target_marks: Option<u32>,
    pub papers_generated: usize,
    /// Ids of the last paper, primaries then alternates
    pub last_paper: Vec<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Criteria from the remembered units and target, if both are set
    pub fn criteria(&self) -> Option<SelectionCriteria> {
        match self.target_marks {
            Some(target) if !self.units.is_empty() => {
                Some(SelectionCriteria::new(self.units.iter().cloned(), target))
            }
            _ => None,
        }
    }

    pub fn with_units<I, S>(mut self, units: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.units = units.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_target(mut self, target_marks: u32) -> Self {
        self.target_marks = Some(target_marks);
        self
    }
}

/// Run the engine once and hand back the session updated with this run
pub fn generate_paper<'a, R: Rng + ?Sized>(
    pool: &'a QuestionPool,
    config: &PaperConfig,
    session: Session,
    criteria: &SelectionCriteria,
    rng: &mut R,
) -> Result<(SelectionResult<'a>, Session)> {
    let result = select_paper(pool, criteria, config, rng)?;

    let updated = Session {
        units: criteria.units.clone(),
        target_marks: Some(criteria.target_marks),
        papers_generated: session.papers_generated + 1,
        last_paper: result.used_ids().into_iter().map(str::to_string).collect(),
    };

    Ok((result, updated))
}
