//! @acp:module "Choice Augmenter"
//! @acp:summary "Attach same-tier either/or alternates to choice-eligible primaries"
//! @acp:domain paper
//! @acp:layer logic

use rand::Rng;
use std::collections::HashSet;

use super::types::{ChoicePolicy, Degradation, SelectedItem};
use crate::pool::Question;

/// Pair each choice-eligible primary with one unused alternate.
///
/// Lookup order: same tier and unit, then same tier in any unit, then none.
/// A single used-id set spans the whole pass and is updated right after each
/// pick, so no alternate is handed out twice or collides with a primary.
pub fn augment<'a, R: Rng + ?Sized>(
    subset: &[&'a Question],
    primaries: Vec<&'a Question>,
    policy: &ChoicePolicy,
    rng: &mut R,
) -> (Vec<SelectedItem<'a>>, Vec<Degradation>) {
    let mut degradations = Vec::new();

    if !policy.enabled {
        let items = primaries
            .into_iter()
            .map(|primary| SelectedItem {
                primary,
                alternate: None,
            })
            .collect();
        return (items, degradations);
    }

    let highest_tier = subset.iter().map(|q| q.marks).max().unwrap_or(0);
    let mut used: HashSet<&'a str> = primaries.iter().map(|q| q.id.as_str()).collect();
    let mut items = Vec::with_capacity(primaries.len());

    for primary in primaries {
        if !policy.tiers.is_eligible(primary.marks, highest_tier) {
            items.push(SelectedItem {
                primary,
                alternate: None,
            });
            continue;
        }

        let same_unit = if policy.prefer_same_unit {
            pick(subset, &used, rng, |q| {
                q.marks == primary.marks && q.unit == primary.unit
            })
        } else {
            None
        };

        let alternate = match same_unit {
            Some(q) => Some(q),
            None => {
                let any_unit = pick(subset, &used, rng, |q| q.marks == primary.marks);
                match any_unit {
                    Some(q) if q.unit != primary.unit && policy.prefer_same_unit => {
                        tracing::warn!(
                            "No same-unit choice for question {}; using {} from {}",
                            primary.id,
                            q.id,
                            q.unit
                        );
                        degradations.push(Degradation::CrossUnitAlternate {
                            question_id: primary.id.clone(),
                            alternate_id: q.id.clone(),
                        });
                    }
                    Some(_) => {}
                    None => {
                        tracing::warn!("No choice available for question {}", primary.id);
                        degradations.push(Degradation::NoAlternate {
                            question_id: primary.id.clone(),
                        });
                    }
                }
                any_unit
            }
        };

        if let Some(q) = alternate {
            used.insert(q.id.as_str());
        }
        items.push(SelectedItem { primary, alternate });
    }

    (items, degradations)
}

/// Uniform pick among unused questions matching `accept`
fn pick<'a, R, F>(
    subset: &[&'a Question],
    used: &HashSet<&'a str>,
    rng: &mut R,
    accept: F,
) -> Option<&'a Question>
where
    R: Rng + ?Sized,
    F: Fn(&Question) -> bool,
{
    let candidates: Vec<&'a Question> = subset
        .iter()
        .copied()
        .filter(|q| !used.contains(q.id.as_str()) && accept(*q))
        .collect();

    if candidates.is_empty() {
        None
    } else {
        Some(candidates[rng.random_range(0..candidates.len())])
    }
}
