//! @acp:module "Paper Selector"
//! @acp:summary "Filter, plan, sample and augment in one stateless pass"
//! @acp:domain paper
//! @acp:layer logic

use rand::Rng;

use super::choice::augment;
use super::filter::filter;
use super::planner::{plan, plan_explicit};
use super::sampler::sample;
use super::types::*;
use crate::error::Result;
use crate::pool::QuestionPool;

/// Assemble a paper for `criteria` using a 4-stage pipeline:
/// 1. Unit filter (reject empty pools and empty unit sets)
/// 2. Mark-distribution plan (deterministic)
/// 3. Sample primaries per tier (random, without replacement)
/// 4. Attach alternates to choice-eligible primaries
pub fn select_paper<'a, R: Rng + ?Sized>(
    pool: &'a QuestionPool,
    criteria: &SelectionCriteria,
    config: &PaperConfig,
    rng: &mut R,
) -> Result<SelectionResult<'a>> {
    criteria.validate()?;

    let subset = filter(pool, &criteria.units)?;

    let outcome = match criteria.distribution {
        Some(ref counts) => plan_explicit(&subset, criteria.target_marks, counts, &config.planning)?,
        None => plan(&subset, criteria.target_marks, &config.planning)?,
    };

    let primaries = sample(&subset, &outcome.realized, rng)?;
    let (items, choice_degradations) = augment(&subset, primaries, &config.choice, rng);

    let mut degradations = outcome.shortfalls;
    degradations.extend(choice_degradations);

    let achieved_marks = items.iter().map(|item| item.primary.marks).sum();

    let result = SelectionResult {
        items,
        achieved_marks,
        target_marks: criteria.target_marks,
        plan: outcome.realized,
        ideal_plan: outcome.ideal,
        degradations,
    };

    tracing::info!(
        "Selected {} questions ({} with choices) for {}/{} marks",
        result.items.len(),
        result.alternates().count(),
        result.achieved_marks,
        result.target_marks
    );
    for degradation in &result.degradations {
        tracing::debug!("Degraded: {}", degradation);
    }

    Ok(result)
}
