//! @acp:module "Sampler"
//! @acp:summary "Uniform draws without replacement per mark tier"
//! @acp:domain paper
//! @acp:layer logic

use rand::Rng;

use super::types::DistributionPlan;
use crate::error::{QpError, Result};
use crate::pool::Question;

/// Draw the planned number of questions from each tier.
///
/// Output is grouped by tier, lowest mark value first. Each tier draws from a
/// candidate list that shrinks after every pick, so no id is drawn twice.
pub fn sample<'a, R: Rng + ?Sized>(
    subset: &[&'a Question],
    plan: &DistributionPlan,
    rng: &mut R,
) -> Result<Vec<&'a Question>> {
    let mut primaries = Vec::with_capacity(plan.total_questions());

    for (marks, count) in plan.iter() {
        let mut candidates: Vec<&'a Question> =
            subset.iter().copied().filter(|q| q.marks == marks).collect();

        if count > candidates.len() {
            tracing::error!(
                "Plan requests {} questions of {} marks, only {} available",
                count,
                marks,
                candidates.len()
            );
            return Err(QpError::InsufficientQuestions {
                marks,
                requested: count,
                available: candidates.len(),
            });
        }

        for _ in 0..count {
            let idx = rng.random_range(0..candidates.len());
            primaries.push(candidates.swap_remove(idx));
        }
    }

    Ok(primaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::{BTreeMap, HashSet};

    fn questions() -> Vec<Question> {
        let mut qs = Vec::new();
        for i in 0..8 {
            qs.push(Question::new(format!("s{}", i), "short", "Unit 1", 2));
        }
        for i in 0..3 {
            qs.push(Question::new(format!("l{}", i), "long", "Unit 1", 16));
        }
        qs
    }

    #[test]
    fn test_sample_counts_and_order() {
        let qs = questions();
        let subset: Vec<&Question> = qs.iter().collect();
        let plan = DistributionPlan::from_counts(BTreeMap::from([(16, 2), (2, 5)]));
        let mut rng = StdRng::seed_from_u64(7);

        let drawn = sample(&subset, &plan, &mut rng).unwrap();
        assert_eq!(drawn.len(), 7);
        assert!(drawn[..5].iter().all(|q| q.marks == 2));
        assert!(drawn[5..].iter().all(|q| q.marks == 16));
    }

    #[test]
    fn test_sample_never_repeats() {
        let qs = questions();
        let subset: Vec<&Question> = qs.iter().collect();
        let plan = DistributionPlan::from_counts(BTreeMap::from([(2, 8), (16, 3)]));

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let drawn = sample(&subset, &plan, &mut rng).unwrap();
            let ids: HashSet<&str> = drawn.iter().map(|q| q.id.as_str()).collect();
            assert_eq!(ids.len(), 11);
        }
    }

    #[test]
    fn test_sample_rejects_oversized_plan() {
        let qs = questions();
        let subset: Vec<&Question> = qs.iter().collect();
        let plan = DistributionPlan::from_counts(BTreeMap::from([(16, 4)]));
        let mut rng = StdRng::seed_from_u64(1);

        let err = sample(&subset, &plan, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            QpError::InsufficientQuestions {
                marks: 16,
                requested: 4,
                available: 3
            }
        ));
    }

    #[test]
    fn test_same_seed_same_draw() {
        let qs = questions();
        let subset: Vec<&Question> = qs.iter().collect();
        let plan = DistributionPlan::from_counts(BTreeMap::from([(2, 4), (16, 1)]));

        let a = sample(&subset, &plan, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = sample(&subset, &plan, &mut StdRng::seed_from_u64(42)).unwrap();
        let ids = |v: &[&Question]| v.iter().map(|q| q.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&a), ids(&b));
    }
}
