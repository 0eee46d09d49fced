//! @acp:module "Mark-Distribution Planner"
//! @acp:summary "Band-table heuristic that turns a target total into per-tier counts"
//! @acp:domain paper
//! @acp:layer logic
//!
//! Planning is deterministic: the same subset and target always give the
//! same plan. Three passes:
//! 1. Ideal split from the first matching band rule
//! 2. Cap each tier at its available questions, moving the lost marks to
//!    other tiers (next-lowest value first, then higher values)
//! 3. Optionally search spare capacity for the closest reachable total,
//!    keeping as much of the capped plan as possible

use std::cmp::Reverse;
use std::collections::BTreeMap;

use super::types::*;
use crate::error::{QpError, Result};
use crate::pool::Question;

/// Plans before and after capacity limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOutcome {
    pub ideal: DistributionPlan,
    pub realized: DistributionPlan,
    /// One `TierShortfall` per capped tier
    pub shortfalls: Vec<Degradation>,
}

/// Available distinct questions per mark tier
pub fn tier_capacity(subset: &[&Question]) -> BTreeMap<u32, usize> {
    let mut capacity = BTreeMap::new();
    for q in subset {
        *capacity.entry(q.marks).or_insert(0) += 1;
    }
    capacity
}

/// Plan a paper using the band table of `policy`
pub fn plan(subset: &[&Question], target_marks: u32, policy: &PlanningPolicy) -> Result<PlanOutcome> {
    let capacity = tier_capacity(subset);
    check_feasible(&capacity, target_marks)?;

    let ideal = match policy.rule_for(target_marks) {
        Some(rule) => ideal_plan(&rule.strategy, &capacity, target_marks),
        None => DistributionPlan::default(),
    };
    tracing::debug!("Ideal plan for {} marks: {}", target_marks, ideal);

    Ok(realize(ideal, &capacity, target_marks, policy.fill_to_target))
}

/// Plan a paper from caller-supplied counts instead of the band table
pub fn plan_explicit(
    subset: &[&Question],
    target_marks: u32,
    counts: &BTreeMap<u32, usize>,
    policy: &PlanningPolicy,
) -> Result<PlanOutcome> {
    let capacity = tier_capacity(subset);
    check_feasible(&capacity, target_marks)?;

    if counts.contains_key(&0) {
        return Err(QpError::InvalidCriteria(
            "distribution contains a zero-mark tier".to_string(),
        ));
    }
    let ideal = DistributionPlan::from_counts(counts.clone());
    if ideal.total_marks() > target_marks {
        return Err(QpError::InvalidCriteria(format!(
            "distribution totals {} marks, above the target of {}",
            ideal.total_marks(),
            target_marks
        )));
    }

    Ok(realize(ideal, &capacity, target_marks, policy.fill_to_target))
}

/// Largest total the subset could ever supply
pub fn max_achievable(capacity: &BTreeMap<u32, usize>) -> u32 {
    DistributionPlan::from_counts(capacity.clone()).total_marks()
}

fn check_feasible(capacity: &BTreeMap<u32, usize>, target_marks: u32) -> Result<()> {
    if capacity.contains_key(&0) {
        return Err(QpError::InvalidCriteria(
            "candidate questions include a zero-mark question".to_string(),
        ));
    }

    let smallest = capacity.keys().next().copied();
    match smallest {
        Some(marks) if marks <= target_marks => Ok(()),
        _ => Err(QpError::InfeasiblePlan {
            target: target_marks,
            min_achievable: smallest,
            max_achievable: max_achievable(capacity),
        }),
    }
}

fn ideal_plan(
    strategy: &BandStrategy,
    capacity: &BTreeMap<u32, usize>,
    target_marks: u32,
) -> DistributionPlan {
    let mut plan = DistributionPlan::default();
    let (lowest, highest) = match (capacity.keys().next(), capacity.keys().next_back()) {
        (Some(&lo), Some(&hi)) => (lo, hi),
        _ => return plan,
    };

    match *strategy {
        BandStrategy::ShortAnswerFirst { max_count } => {
            let low_count = ((target_marks / lowest) as usize).min(max_count);
            plan.set(lowest, low_count);

            let mut remaining = target_marks - lowest * low_count as u32;
            for &marks in capacity.keys().rev().filter(|&&m| m != lowest) {
                let n = remaining / marks;
                plan.add(marks, n as usize);
                remaining -= n * marks;
            }
        }
        BandStrategy::LongAnswerRatio {
            marks_per_question,
            max_count,
        } => {
            let by_ratio = target_marks / marks_per_question.max(1);
            let high_count = (by_ratio.min(target_marks / highest) as usize).min(max_count);
            plan.set(highest, high_count);

            let remaining = target_marks - highest * high_count as u32;
            plan.add(lowest, (remaining / lowest) as usize);
        }
    }

    plan
}

fn realize(
    ideal: DistributionPlan,
    capacity: &BTreeMap<u32, usize>,
    target_marks: u32,
    fill_to_target: bool,
) -> PlanOutcome {
    let mut realized = DistributionPlan::default();
    let mut capped: Vec<(u32, usize, usize)> = Vec::new();

    for (marks, wanted) in ideal.iter() {
        let available = capacity.get(&marks).copied().unwrap_or(0);
        let take = wanted.min(available);
        realized.set(marks, take);
        if take < wanted {
            capped.push((marks, wanted, take));
        }
    }

    for &(marks, wanted, take) in &capped {
        let missing = u32::try_from(wanted - take).unwrap_or(u32::MAX);
        let deficit = target_marks.saturating_sub(realized.total_marks());
        let mut budget = marks.saturating_mul(missing).min(deficit);

        for other in reallocation_order(marks, capacity) {
            budget -= absorb(&mut realized, capacity, other, budget);
        }
        tracing::debug!(
            "Tier {} capped at {} of {}; plan now {}",
            marks,
            take,
            wanted,
            realized
        );
    }

    if fill_to_target && realized.total_marks() < target_marks {
        let closest = closest_plan(&realized, capacity, target_marks);
        if closest != realized {
            tracing::debug!("Filled {} to {}", realized, closest);
            realized = closest;
        }
    }

    let shortfalls = capped
        .iter()
        .map(|&(marks, planned, _)| Degradation::TierShortfall {
            marks,
            planned,
            realized: realized.count(marks),
        })
        .collect();

    debug_assert!(realized.total_marks() <= target_marks);

    PlanOutcome {
        ideal,
        realized,
        shortfalls,
    }
}

/// Add as many `marks`-tier questions as fit in `budget` and spare capacity.
/// Returns the marks consumed.
fn absorb(
    realized: &mut DistributionPlan,
    capacity: &BTreeMap<u32, usize>,
    marks: u32,
    budget: u32,
) -> u32 {
    let spare = capacity
        .get(&marks)
        .copied()
        .unwrap_or(0)
        .saturating_sub(realized.count(marks));
    let n = ((budget / marks) as usize).min(spare);
    realized.add(marks, n);
    marks * n as u32
}

/// Bounded subset-sum over the tier capacities.
///
/// Picks the largest total not above `target_marks`. Among plans with that
/// total it keeps the most questions of `current`, then uses the fewest
/// questions. `current` is itself reachable, so the result never totals less.
fn closest_plan(
    current: &DistributionPlan,
    capacity: &BTreeMap<u32, usize>,
    target_marks: u32,
) -> DistributionPlan {
    let target = target_marks as usize;
    let tiers: Vec<(u32, usize)> = capacity
        .iter()
        .filter(|(&marks, _)| marks > 0)
        .map(|(&marks, &available)| (marks, available))
        .collect();

    // best[s]: (kept from current, fewest questions) over plans totalling s
    let mut best: Vec<Option<(usize, Reverse<usize>)>> = vec![None; target + 1];
    best[0] = Some((0, Reverse(0)));
    // choices[t][s]: how many tier-t questions the best plan for s uses
    let mut choices: Vec<Vec<usize>> = Vec::with_capacity(tiers.len());

    for &(marks, available) in &tiers {
        let step = marks as usize;
        let keep = current.count(marks);
        let mut next: Vec<Option<(usize, Reverse<usize>)>> = vec![None; target + 1];
        let mut choice = vec![0usize; target + 1];

        for (sum, score) in best.iter().enumerate() {
            let Some((kept, Reverse(questions))) = *score else {
                continue;
            };
            let max_take = available.min((target - sum) / step);
            for take in 0..=max_take {
                let reached = sum + take * step;
                let candidate = (kept + take.min(keep), Reverse(questions + take));
                if next[reached].map_or(true, |existing| candidate > existing) {
                    next[reached] = Some(candidate);
                    choice[reached] = take;
                }
            }
        }

        best = next;
        choices.push(choice);
    }

    let Some(total) = (0..=target).rev().find(|&sum| best[sum].is_some()) else {
        return current.clone();
    };

    let mut plan = DistributionPlan::default();
    let mut sum = total;
    for (&(marks, _), choice) in tiers.iter().zip(&choices).rev() {
        let take = choice[sum];
        plan.set(marks, take);
        sum -= take * marks as usize;
    }
    plan
}

/// Next-lowest tiers first (descending), then higher tiers (ascending)
fn reallocation_order(marks: u32, capacity: &BTreeMap<u32, usize>) -> Vec<u32> {
    let lower = capacity.keys().rev().filter(|&&m| m < marks);
    let higher = capacity.keys().filter(|&&m| m > marks);
    lower.chain(higher).copied().collect()
}
