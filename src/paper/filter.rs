//! @acp:module "Unit Filter"
//! @acp:summary "Restrict the question pool to the selected units"
//! @acp:domain paper
//! @acp:layer logic

use std::collections::BTreeSet;

use crate::error::{QpError, Result};
use crate::pool::{Question, QuestionPool};

/// Questions whose unit tag is in `units`, in pool order.
///
/// Unknown unit tags match nothing and are not an error.
pub fn filter<'a>(pool: &'a QuestionPool, units: &BTreeSet<String>) -> Result<Vec<&'a Question>> {
    if pool.is_empty() {
        return Err(QpError::EmptyPool);
    }
    if units.is_empty() {
        return Err(QpError::NoUnitsSelected);
    }

    let subset: Vec<&Question> = pool
        .questions()
        .iter()
        .filter(|q| units.contains(&q.unit))
        .collect();

    for unit in units {
        if !subset.iter().any(|q| &q.unit == unit) {
            tracing::debug!("Unit {:?} matched no questions", unit);
        }
    }

    tracing::debug!(
        "Unit filter kept {} of {} questions",
        subset.len(),
        pool.len()
    );
    Ok(subset)
}
