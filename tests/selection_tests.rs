//! End-to-end paper selection tests
//!
//! Exercises the full filter, plan, sample and augment pipeline through the
//! public library API.

use std::collections::{BTreeSet, HashSet};

use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use qpgen::paper::{filter, ChoicePolicy, ChoiceTiers, Degradation};
use qpgen::{
    generate_paper, select_paper, PaperConfig, QpError, Question, QuestionPool,
    SelectionCriteria, Session,
};

fn bank(units: &[&str], short_per_unit: usize, long_per_unit: usize) -> QuestionPool {
    let mut questions = Vec::new();
    for unit in units {
        let slug = unit.to_lowercase().replace(' ', "");
        for i in 0..short_per_unit {
            questions.push(Question::new(
                format!("{}-s{}", slug, i),
                format!("Short question {} on {}", i, unit),
                *unit,
                2,
            ));
        }
        for i in 0..long_per_unit {
            questions.push(Question::new(
                format!("{}-l{}", slug, i),
                format!("Long question {} on {}", i, unit),
                *unit,
                16,
            ));
        }
    }
    QuestionPool::new(questions).unwrap()
}

fn assert_distinct(ids: &[&str]) {
    let unique: HashSet<&str> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len(), "duplicate ids in {:?}", ids);
}

// =============================================================================
// Result invariants
// =============================================================================

mod invariant_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_never_exceeds_target() {
        let pool = bank(&["Unit 1", "Unit 2", "Unit 3"], 20, 5);
        let config = PaperConfig::default();

        for target in [2, 3, 10, 30, 50, 60, 80, 100, 150] {
            for seed in 0..25 {
                let criteria = SelectionCriteria::new(["Unit 1", "Unit 2", "Unit 3"], target);
                let mut rng = StdRng::seed_from_u64(seed);
                let result = select_paper(&pool, &criteria, &config, &mut rng).unwrap();

                assert!(result.achieved_marks <= target);
                assert_eq!(result.achieved_marks, result.plan.total_marks());
            }
        }
    }

    #[test]
    fn test_no_question_used_twice() {
        let pool = bank(&["Unit 1", "Unit 2"], 15, 6);
        let config = PaperConfig::default();

        for seed in 0..50 {
            let criteria = SelectionCriteria::new(["Unit 1", "Unit 2"], 100);
            let mut rng = StdRng::seed_from_u64(seed);
            let result = select_paper(&pool, &criteria, &config, &mut rng).unwrap();

            assert_distinct(&result.used_ids());
        }
    }

    #[test]
    fn test_everything_comes_from_requested_units() {
        let pool = bank(&["Unit 1", "Unit 2", "Unit 3"], 10, 4);
        let config = PaperConfig::default();
        let wanted: BTreeSet<String> = ["Unit 1", "Unit 3"].iter().map(|s| s.to_string()).collect();

        for seed in 0..30 {
            let criteria = SelectionCriteria::new(wanted.iter().cloned(), 60);
            let mut rng = StdRng::seed_from_u64(seed);
            let result = select_paper(&pool, &criteria, &config, &mut rng).unwrap();

            for q in result.primaries().chain(result.alternates()) {
                assert!(wanted.contains(&q.unit), "{} is from {}", q.id, q.unit);
            }
        }
    }

    #[test]
    fn test_alternates_share_their_primary_tier() {
        let pool = bank(&["Unit 1", "Unit 2"], 20, 8);
        let criteria = SelectionCriteria::new(["Unit 1", "Unit 2"], 100);
        let mut rng = StdRng::seed_from_u64(11);
        let result = select_paper(&pool, &criteria, &PaperConfig::default(), &mut rng).unwrap();

        for item in &result.items {
            if let Some(alternate) = item.alternate {
                assert_eq!(alternate.marks, item.primary.marks);
                assert_eq!(item.primary.marks, 16);
            }
        }
    }

    #[test]
    fn test_random_banks_hold_invariants() {
        let tiers = [1, 2, 5, 10, 16];
        let mut bank_rng = StdRng::seed_from_u64(2024);

        for round in 0..40 {
            let mut questions = Vec::new();
            for (i, &marks) in tiers.iter().enumerate() {
                let count = bank_rng.random_range(0..8);
                for j in 0..count {
                    questions.push(Question::new(
                        format!("q{}-{}-{}", round, i, j),
                        "generated",
                        format!("Unit {}", j % 3),
                        marks,
                    ));
                }
            }
            if questions.is_empty() {
                continue;
            }
            let pool = QuestionPool::new(questions).unwrap();
            let units = pool.units();
            let target = bank_rng.random_range(1..120);

            let criteria = SelectionCriteria::new(units.iter().cloned(), target);
            let mut rng = StdRng::seed_from_u64(round);
            match select_paper(&pool, &criteria, &PaperConfig::default(), &mut rng) {
                Ok(result) => {
                    assert!(result.achieved_marks <= target);
                    assert_distinct(&result.used_ids());
                }
                Err(e) => assert!(
                    matches!(e, QpError::InfeasiblePlan { .. }),
                    "unexpected error: {}",
                    e
                ),
            }
        }
    }
}

// =============================================================================
// Unit filter
// =============================================================================

mod filter_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_filter_is_idempotent() {
        let pool = bank(&["Unit 1", "Unit 2", "Unit 3"], 5, 2);
        let units: BTreeSet<String> = ["Unit 2", "Unit 3"].iter().map(|s| s.to_string()).collect();

        let first: Vec<&str> = filter(&pool, &units)
            .unwrap()
            .into_iter()
            .map(|q| q.id.as_str())
            .collect();
        let second: Vec<&str> = filter(&pool, &units)
            .unwrap()
            .into_iter()
            .map(|q| q.id.as_str())
            .collect();

        assert_eq!(first, second);
        assert_eq!(first.len(), 14);
    }

    #[test]
    fn test_empty_unit_set_is_rejected() {
        let pool = bank(&["Unit 1"], 5, 2);
        let criteria = SelectionCriteria::new(Vec::<String>::new(), 40);
        let mut rng = StdRng::seed_from_u64(0);

        let err = select_paper(&pool, &criteria, &PaperConfig::default(), &mut rng).unwrap_err();
        assert!(matches!(err, QpError::NoUnitsSelected));
    }

    #[test]
    fn test_empty_pool_is_rejected() {
        let pool = QuestionPool::new(vec![]).unwrap();
        let criteria = SelectionCriteria::new(["Unit 1"], 40);
        let mut rng = StdRng::seed_from_u64(0);

        let err = select_paper(&pool, &criteria, &PaperConfig::default(), &mut rng).unwrap_err();
        assert!(matches!(err, QpError::EmptyPool));
    }

    #[test]
    fn test_unknown_unit_is_infeasible() {
        let pool = bank(&["Unit 1"], 5, 2);
        let criteria = SelectionCriteria::new(["Unit 9"], 40);
        let mut rng = StdRng::seed_from_u64(0);

        let err = select_paper(&pool, &criteria, &PaperConfig::default(), &mut rng).unwrap_err();
        assert!(matches!(err, QpError::InfeasiblePlan { .. }));
    }
}

// =============================================================================
// Planning scenarios
// =============================================================================

mod scenario_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sixty_marks_from_one_unit() {
        let pool = bank(&["Unit 1"], 30, 10);
        let criteria = SelectionCriteria::new(["Unit 1"], 60);

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let result = select_paper(&pool, &criteria, &PaperConfig::default(), &mut rng).unwrap();

            assert!([58, 60].contains(&result.achieved_marks));
            assert_eq!(result.plan.count(16), 3);
            assert_eq!(result.plan.count(2), 6);
            assert_eq!(result.alternates().count(), 3);
            assert!(!result.is_degraded());
        }
    }

    #[test]
    fn test_scarce_long_answers_move_marks_to_short_answers() {
        let pool = bank(&["Unit 1"], 30, 2);
        let criteria = SelectionCriteria::new(["Unit 1"], 100);
        let mut rng = StdRng::seed_from_u64(4);

        let result = select_paper(&pool, &criteria, &PaperConfig::default(), &mut rng).unwrap();

        assert_eq!(result.ideal_plan.count(16), 4);
        assert_eq!(result.plan.count(16), 2);
        assert_eq!(result.plan.count(2), 30);
        assert_eq!(result.achieved_marks, 92);
        assert!(result.degradations.contains(&Degradation::TierShortfall {
            marks: 16,
            planned: 4,
            realized: 2,
        }));
    }

    #[test]
    fn test_single_long_answer_gets_no_alternate() {
        let pool = bank(&["Unit 1"], 10, 1);
        let criteria = SelectionCriteria::new(["Unit 1"], 60);
        let mut rng = StdRng::seed_from_u64(1);

        let result = select_paper(&pool, &criteria, &PaperConfig::default(), &mut rng).unwrap();
        let long = result.items_for_tier(16);

        assert_eq!(long.len(), 1);
        assert!(!long[0].has_alternate());
        assert!(result.degradations.contains(&Degradation::NoAlternate {
            question_id: "unit1-l0".to_string(),
        }));
    }

    #[test]
    fn test_cross_unit_alternate_is_reported() {
        let pool = bank(&["Unit 1", "Unit 2"], 0, 1);
        let criteria = SelectionCriteria::new(["Unit 1", "Unit 2"], 16);
        let mut rng = StdRng::seed_from_u64(9);

        let result = select_paper(&pool, &criteria, &PaperConfig::default(), &mut rng).unwrap();

        assert_eq!(result.items.len(), 1);
        let item = &result.items[0];
        let alternate = item.alternate.unwrap();
        assert_ne!(alternate.unit, item.primary.unit);
        assert!(matches!(
            result.degradations.as_slice(),
            [Degradation::CrossUnitAlternate { .. }]
        ));
    }

    #[test]
    fn test_choices_can_be_disabled() {
        let pool = bank(&["Unit 1"], 30, 10);
        let criteria = SelectionCriteria::new(["Unit 1"], 60);
        let mut config = PaperConfig::default();
        config.choice = ChoicePolicy {
            enabled: false,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(2);

        let result = select_paper(&pool, &criteria, &config, &mut rng).unwrap();
        assert_eq!(result.alternates().count(), 0);
    }

    #[test]
    fn test_choices_on_every_tier() {
        let pool = bank(&["Unit 1"], 30, 10);
        let criteria = SelectionCriteria::new(["Unit 1"], 60);
        let mut config = PaperConfig::default();
        config.choice.tiers = ChoiceTiers::AtLeast(2);
        let mut rng = StdRng::seed_from_u64(2);

        let result = select_paper(&pool, &criteria, &config, &mut rng).unwrap();
        assert_eq!(result.alternates().count(), result.items.len());
        assert_distinct(&result.used_ids());
    }

    #[test]
    fn test_explicit_distribution_is_topped_up() {
        let pool = bank(&["Unit 1", "Unit 2"], 10, 3);
        let criteria = SelectionCriteria::new(["Unit 1", "Unit 2"], 100)
            .with_distribution([(2, 8), (16, 4)].into_iter().collect());
        let mut rng = StdRng::seed_from_u64(6);

        let result = select_paper(&pool, &criteria, &PaperConfig::default(), &mut rng).unwrap();
        assert_eq!(result.ideal_plan.count(2), 8);
        assert_eq!(result.ideal_plan.count(16), 4);
        assert_eq!(result.plan.count(16), 5);
        assert_eq!(result.plan.count(2), 10);
        assert_eq!(result.achieved_marks, 100);
    }

    #[test]
    fn test_explicit_distribution_without_fill() {
        let pool = bank(&["Unit 1", "Unit 2"], 10, 3);
        let criteria = SelectionCriteria::new(["Unit 1", "Unit 2"], 100)
            .with_distribution([(2, 8), (16, 4)].into_iter().collect());
        let mut config = PaperConfig::default();
        config.planning.fill_to_target = false;
        let mut rng = StdRng::seed_from_u64(6);

        let result = select_paper(&pool, &criteria, &config, &mut rng).unwrap();
        assert_eq!(result.plan.count(2), 8);
        assert_eq!(result.plan.count(16), 4);
        assert_eq!(result.achieved_marks, 80);
    }
}

// =============================================================================
// Reproducibility and sessions
// =============================================================================

mod session_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_same_seed_same_paper() {
        let pool = bank(&["Unit 1", "Unit 2"], 20, 6);
        let criteria = SelectionCriteria::new(["Unit 1", "Unit 2"], 80);
        let config = PaperConfig::default();

        let a = select_paper(&pool, &criteria, &config, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = select_paper(&pool, &criteria, &config, &mut StdRng::seed_from_u64(42)).unwrap();

        assert_eq!(a.used_ids(), b.used_ids());
    }

    #[test]
    fn test_session_threads_through_generations() {
        let pool = bank(&["Unit 1", "Unit 2"], 20, 6);
        let config = PaperConfig::default();
        let mut rng = StdRng::seed_from_u64(8);

        let session = Session::new().with_units(["Unit 1"]).with_target(40);
        let criteria = session.criteria().unwrap();
        let (first, session) = generate_paper(&pool, &config, session, &criteria, &mut rng).unwrap();
        let first_ids: Vec<String> = first.used_ids().into_iter().map(str::to_string).collect();

        assert_eq!(session.papers_generated, 1);
        assert_eq!(session.last_paper, first_ids);

        let criteria = SelectionCriteria::new(["Unit 1", "Unit 2"], 60);
        let (_, session) = generate_paper(&pool, &config, session, &criteria, &mut rng).unwrap();

        assert_eq!(session.papers_generated, 2);
        assert_eq!(session.target_marks, Some(60));
        assert_eq!(session.units.len(), 2);
    }
}
